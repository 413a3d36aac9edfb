//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the inventory store's UI boundary to Dart via FRB.
//! - Hold the single process-wide store instance.
//! - Flatten core results into stable response envelopes.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - The store is started at most once per process.
//! - Mutations before `inventory_start` fail with a message, never panic.

use bookshelf_core::seed::OPEN_LIBRARY_SEARCH_URL;
use bookshelf_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    Book, BookForm, InventoryConfig, InventoryStore, OpenLibrarySeed, SortDirection, SortKey,
    SqliteSlot, SubmitError, ViewQuery,
};
use log::{error, warn};
use std::sync::{Mutex, OnceLock, PoisonError};

static INVENTORY: OnceLock<Mutex<InventoryStore<SqliteSlot>>> = OnceLock::new();

const NOT_STARTED_MESSAGE: &str = "Inventory is not started.";

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Catalog URL the host should fetch to provide seed data.
#[flutter_rust_bridge::frb(sync)]
pub fn seed_source_url() -> String {
    OPEN_LIBRARY_SEARCH_URL.to_string()
}

/// Book row for list/detail rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookItem {
    pub id: String,
    pub title: String,
    pub author: String,
    /// `None` renders as `N/A`.
    pub author_age: Option<u32>,
    pub author_email: String,
    pub publisher: String,
    pub published_date: String,
    pub overview: String,
    pub isbn: String,
}

/// Raw form fields exactly as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookFormInput {
    pub title: String,
    pub author: String,
    pub author_age: String,
    pub author_email: String,
    pub publisher: String,
    pub published_date: String,
    pub overview: String,
    pub isbn: String,
}

/// One failed form field (`field` uses camelCase wire names).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldErrorItem {
    pub field: String,
    pub message: String,
}

/// Store state consumed by the list view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventorySnapshot {
    pub loading: bool,
    /// User-facing startup error, if the seed failed.
    pub error_message: Option<String>,
    pub editing_id: Option<String>,
    /// Records in store order.
    pub items: Vec<BookItem>,
    /// Diagnostic message for the host.
    pub message: String,
}

/// Generic action envelope for mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryActionResponse {
    pub ok: bool,
    pub book_id: Option<String>,
    pub field_errors: Vec<FieldErrorItem>,
    pub message: String,
}

impl InventoryActionResponse {
    fn success(message: impl Into<String>, book_id: String) -> Self {
        Self {
            ok: true,
            book_id: Some(book_id),
            field_errors: Vec::new(),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            book_id: None,
            field_errors: Vec::new(),
            message: message.into(),
        }
    }
}

/// Starts the inventory: stored data first, else the supplied seed.
///
/// Input semantics:
/// - `seed_body`: body of a successful GET to [`seed_source_url`].
/// - `seed_error`: failure message when the host could not fetch.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Repeated calls return the current snapshot without re-running startup.
#[flutter_rust_bridge::frb(sync)]
pub fn inventory_start(seed_body: Option<String>, seed_error: Option<String>) -> InventorySnapshot {
    if let Some(snapshot) = with_store(|store| snapshot_of(store, "Inventory already started.")) {
        return snapshot;
    }

    let config = InventoryConfig::from_env();
    let slot = match open_slot(&config) {
        Ok(slot) => slot,
        Err(message) => return not_started_snapshot(message),
    };

    let seed = match (seed_body, seed_error) {
        (Some(body), _) => OpenLibrarySeed::from_body(body),
        (None, Some(message)) => OpenLibrarySeed::unavailable(message),
        (None, None) => OpenLibrarySeed::unavailable(String::new()),
    };

    let mut store = InventoryStore::with_config(slot, &config);
    let message = match store.start(&seed) {
        Ok(report) if report.storage_unreadable => format!(
            "Loaded {} book(s); saved inventory could not be read and was left untouched.",
            report.record_count
        ),
        Ok(report) => format!("Loaded {} book(s).", report.record_count),
        Err(err) => format!("inventory_start failed: {err}"),
    };
    let snapshot = snapshot_of(&store, message);

    if INVENTORY.set(Mutex::new(store)).is_err() {
        warn!("event=inventory_start module=ffi status=error error_code=already_installed");
    }
    snapshot
}

/// Returns the current store state.
#[flutter_rust_bridge::frb(sync)]
pub fn inventory_snapshot() -> InventorySnapshot {
    with_store(|store| snapshot_of(store, "ok"))
        .unwrap_or_else(|| not_started_snapshot(NOT_STARTED_MESSAGE.to_string()))
}

/// Runs the view pipeline with live list-view UI state.
///
/// Unknown `sort_key` falls back to `title`; unknown direction to `asc`.
#[flutter_rust_bridge::frb(sync)]
pub fn inventory_view(search: String, sort_key: String, sort_direction: String) -> Vec<BookItem> {
    let query = ViewQuery::new(
        search,
        parse_sort_key(&sort_key),
        parse_sort_direction(&sort_direction),
    );
    with_store(|store| store.view(&query).iter().map(to_book_item).collect())
        .unwrap_or_default()
}

/// Looks up one book for the detail view.
#[flutter_rust_bridge::frb(sync)]
pub fn inventory_get(book_id: String) -> Option<BookItem> {
    with_store(|store| store.get(book_id.as_str()).map(to_book_item)).flatten()
}

/// Validates the form and creates, or updates the selected record.
///
/// # FFI contract
/// - Validation failures return every failed field in `field_errors`.
#[flutter_rust_bridge::frb(sync)]
pub fn inventory_submit(form: BookFormInput) -> InventoryActionResponse {
    let form = to_core_form(form);
    with_store_mut(|store| {
        let editing = store.editing_id().is_some();
        match store.submit(&form) {
            Ok(book_id) if editing => InventoryActionResponse::success("Book updated.", book_id),
            Ok(book_id) => InventoryActionResponse::success("Book added.", book_id),
            Err(SubmitError::Invalid(errors)) => InventoryActionResponse {
                ok: false,
                book_id: None,
                field_errors: errors
                    .iter()
                    .map(|(field, message)| FieldErrorItem {
                        field: field.as_str().to_string(),
                        message: message.to_string(),
                    })
                    .collect(),
                message: "Please fix the highlighted fields.".to_string(),
            },
            Err(err) => InventoryActionResponse::failure(format!("inventory_submit failed: {err}")),
        }
    })
    .unwrap_or_else(|| InventoryActionResponse::failure(NOT_STARTED_MESSAGE))
}

/// Deletes one book; deleting an unknown id succeeds as a no-op.
#[flutter_rust_bridge::frb(sync)]
pub fn inventory_delete(book_id: String) -> InventoryActionResponse {
    with_store_mut(|store| match store.delete(book_id.as_str()) {
        Ok(true) => InventoryActionResponse::success("Book deleted.", book_id.clone()),
        Ok(false) => InventoryActionResponse::success("Book already removed.", book_id.clone()),
        Err(err) => InventoryActionResponse::failure(format!("inventory_delete failed: {err}")),
    })
    .unwrap_or_else(|| InventoryActionResponse::failure(NOT_STARTED_MESSAGE))
}

/// Selects a book for editing and returns the form prefill.
///
/// Returns `None` for unknown ids or before start.
#[flutter_rust_bridge::frb(sync)]
pub fn inventory_select_for_edit(book_id: String) -> Option<BookFormInput> {
    with_store_mut(|store| {
        if store.select_for_edit(book_id.as_str()) {
            store.edit_form().map(to_form_input)
        } else {
            None
        }
    })
    .flatten()
}

/// Clears the edit selection.
#[flutter_rust_bridge::frb(sync)]
pub fn inventory_cancel_edit() {
    with_store_mut(|store| store.cancel_edit());
}

fn open_slot(config: &InventoryConfig) -> Result<SqliteSlot, String> {
    SqliteSlot::open(&config.db_path, config.storage_key.as_str()).map_err(|err| {
        error!(
            "event=inventory_start module=ffi status=error error_code=db_open_failed error={}",
            err
        );
        format!("inventory_start failed: {err}")
    })
}

fn with_store<T>(f: impl FnOnce(&InventoryStore<SqliteSlot>) -> T) -> Option<T> {
    let store = INVENTORY.get()?;
    let guard = store.lock().unwrap_or_else(PoisonError::into_inner);
    Some(f(&guard))
}

fn with_store_mut<T>(f: impl FnOnce(&mut InventoryStore<SqliteSlot>) -> T) -> Option<T> {
    let store = INVENTORY.get()?;
    let mut guard = store.lock().unwrap_or_else(PoisonError::into_inner);
    Some(f(&mut guard))
}

fn snapshot_of(store: &InventoryStore<SqliteSlot>, message: impl Into<String>) -> InventorySnapshot {
    InventorySnapshot {
        loading: store.is_loading(),
        error_message: store.error_message().map(str::to_string),
        editing_id: store.editing_id().map(str::to_string),
        items: store.books().iter().map(to_book_item).collect(),
        message: message.into(),
    }
}

fn not_started_snapshot(message: String) -> InventorySnapshot {
    InventorySnapshot {
        loading: true,
        error_message: None,
        editing_id: None,
        items: Vec::new(),
        message,
    }
}

fn parse_sort_key(value: &str) -> SortKey {
    value.parse().unwrap_or_default()
}

fn parse_sort_direction(value: &str) -> SortDirection {
    value.parse().unwrap_or_default()
}

fn to_book_item(book: &Book) -> BookItem {
    BookItem {
        id: book.id.clone(),
        title: book.title.clone(),
        author: book.author.clone(),
        author_age: book.author_age,
        author_email: book.author_email.clone(),
        publisher: book.publisher.clone(),
        published_date: book.published_date.clone(),
        overview: book.overview.clone(),
        isbn: book.isbn.clone(),
    }
}

fn to_core_form(input: BookFormInput) -> BookForm {
    BookForm {
        title: input.title,
        author: input.author,
        author_age: input.author_age,
        author_email: input.author_email,
        publisher: input.publisher,
        published_date: input.published_date,
        overview: input.overview,
        isbn: input.isbn,
    }
}

fn to_form_input(form: BookForm) -> BookFormInput {
    BookFormInput {
        title: form.title,
        author: form.author,
        author_age: form.author_age,
        author_email: form.author_email,
        publisher: form.publisher,
        published_date: form.published_date,
        overview: form.overview,
        isbn: form.isbn,
    }
}

#[cfg(test)]
mod tests {
    use super::{
        core_version, init_logging, inventory_delete, inventory_get, inventory_select_for_edit,
        inventory_snapshot, inventory_start, inventory_submit, inventory_view, open_slot,
        parse_sort_direction, parse_sort_key, ping, BookFormInput,
    };
    use bookshelf_core::config::ENV_DB_PATH;
    use bookshelf_core::{InventoryConfig, SortDirection, SortKey};

    const SEED_BODY: &str = r#"{"docs":[
        {"key":"/works/OL1W","title":"Clean Code","author_name":["Robert Martin"],
         "first_publish_year":2008,"publisher":["Prentice Hall"]},
        {"key":"/works/OL2W","title":"The Pragmatic Programmer","author_name":["Andrew Hunt"],
         "first_publish_year":1999,"publisher":["Addison-Wesley"]}
    ]}"#;

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "/tmp/logs".to_string());
        assert!(error.contains("unsupported log level"));
    }

    #[test]
    fn sort_options_fall_back_to_defaults() {
        assert_eq!(parse_sort_key("authorAge"), SortKey::AuthorAge);
        assert_eq!(parse_sort_key("shelf"), SortKey::Title);
        assert_eq!(parse_sort_direction("desc"), SortDirection::Desc);
        assert_eq!(parse_sort_direction("sideways"), SortDirection::Asc);
    }

    #[test]
    fn unopenable_database_is_reported_not_replaced() {
        let dir = tempfile::tempdir().expect("temp dir");
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"file").expect("write blocker");
        let config = InventoryConfig {
            db_path: blocker.join("inventory.sqlite3"),
            ..InventoryConfig::default()
        };

        let err = open_slot(&config).err().expect("open should fail");
        assert!(err.starts_with("inventory_start failed:"), "{err}");
    }

    #[test]
    fn inventory_lifecycle_through_ffi() {
        let dir = tempfile::tempdir().expect("temp dir");
        std::env::set_var(ENV_DB_PATH, dir.path().join("ffi.sqlite3"));

        let started = inventory_start(Some(SEED_BODY.to_string()), None);
        assert!(!started.loading, "{}", started.message);
        assert_eq!(started.error_message, None);
        assert_eq!(started.items.len(), 2);

        let again = inventory_start(None, Some("offline".to_string()));
        assert_eq!(again.items.len(), 2);

        let rejected = inventory_submit(BookFormInput {
            author_email: "bad".to_string(),
            ..BookFormInput::default()
        });
        assert!(!rejected.ok);
        assert!(rejected
            .field_errors
            .iter()
            .any(|item| item.field == "authorEmail"));

        let created = inventory_submit(BookFormInput {
            title: "Refactoring".to_string(),
            author: "Martin Fowler".to_string(),
            author_age: "61".to_string(),
            author_email: "martin@example.com".to_string(),
            publisher: "Addison-Wesley".to_string(),
            published_date: "2018-11-20".to_string(),
            overview: "Improving existing code.".to_string(),
            isbn: String::new(),
        });
        assert!(created.ok, "{}", created.message);
        let created_id = created.book_id.expect("created id");
        assert_eq!(inventory_snapshot().items[0].id, created_id);

        let hits = inventory_view("martin".to_string(), "title".to_string(), "asc".to_string());
        let titles = hits.iter().map(|item| item.title.as_str()).collect::<Vec<_>>();
        assert_eq!(titles, vec!["Clean Code", "Refactoring"]);

        let prefill = inventory_select_for_edit(created_id.clone()).expect("prefill");
        assert_eq!(prefill.isbn, "");
        let updated = inventory_submit(BookFormInput {
            title: "Refactoring (2nd ed.)".to_string(),
            ..prefill
        });
        assert!(updated.ok, "{}", updated.message);
        assert_eq!(
            inventory_get(created_id.clone()).map(|item| item.title),
            Some("Refactoring (2nd ed.)".to_string())
        );
        assert_eq!(inventory_snapshot().editing_id, None);

        assert!(inventory_delete(created_id.clone()).ok);
        assert!(inventory_delete(created_id.clone()).ok);
        assert_eq!(inventory_get(created_id), None);
        assert_eq!(inventory_snapshot().items.len(), 2);
    }
}
