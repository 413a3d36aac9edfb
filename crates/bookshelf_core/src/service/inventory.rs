//! Inventory store: lifecycle, mutations and persistence.
//!
//! # Responsibility
//! - Own the authoritative in-memory list of books.
//! - Run the startup transition (stored state, else seed, else empty).
//! - Persist the full list after every mutation once ready.
//! - Track the transient edit selection for form flows.
//!
//! # Invariants
//! - Lifecycle is `Uninitialized -> Loading -> Ready`, entered exactly once.
//! - No ids are empty or duplicated inside the store.
//! - Nothing is written to storage before `Ready` is reached.
//! - Mutations are rejected before `Ready`.
//! - Each save serializes the current list (last write wins).

use crate::config::InventoryConfig;
use crate::form::validate::{validate_book_form, BookForm, FormErrors};
use crate::model::book::{Book, BookId, RawBook};
use crate::model::normalize::{generate_book_id, normalize_book};
use crate::seed::{SeedError, SeedSource};
use crate::storage::StorageSlot;
use crate::view::pipeline::{view_books, ViewQuery};
use log::{error, info, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    Uninitialized,
    Loading,
    Ready,
}

impl LoadPhase {
    fn as_str(self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Loading => "loading",
            Self::Ready => "ready",
        }
    }
}

/// Where the startup list came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartupSource {
    /// Parsed from the storage slot.
    Storage,
    /// Fetched from the seed source.
    Seed,
    /// Seed failed; the store started empty with an error message.
    Empty,
}

impl StartupSource {
    fn as_str(self) -> &'static str {
        match self {
            Self::Storage => "storage",
            Self::Seed => "seed",
            Self::Empty => "empty",
        }
    }
}

/// Summary of one completed startup transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupReport {
    pub source: StartupSource,
    pub record_count: usize,
    /// Stored data existed but could not be parsed.
    pub storage_corrupt: bool,
    /// The slot could not be read; startup did not write to it.
    pub storage_unreadable: bool,
}

/// Store-level failures. None of them leave the store inconsistent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InventoryError {
    /// Mutation attempted before startup completed.
    NotReady(LoadPhase),
    /// `start` was called a second time.
    AlreadyStarted,
    /// No record with this id.
    NotFound(BookId),
    /// `create` received an id that is already taken.
    DuplicateId(BookId),
}

impl Display for InventoryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotReady(phase) => {
                write!(f, "inventory is not ready (phase: {})", phase.as_str())
            }
            Self::AlreadyStarted => write!(f, "inventory startup already ran"),
            Self::NotFound(id) => write!(f, "book not found: {id}"),
            Self::DuplicateId(id) => write!(f, "book id already exists: {id}"),
        }
    }
}

impl Error for InventoryError {}

/// Failure of a form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    Invalid(FormErrors),
    Inventory(InventoryError),
}

impl Display for SubmitError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invalid(errors) => write!(f, "{errors}"),
            Self::Inventory(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SubmitError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Invalid(errors) => Some(errors),
            Self::Inventory(err) => Some(err),
        }
    }
}

impl From<FormErrors> for SubmitError {
    fn from(value: FormErrors) -> Self {
        Self::Invalid(value)
    }
}

impl From<InventoryError> for SubmitError {
    fn from(value: InventoryError) -> Self {
        Self::Inventory(value)
    }
}

/// Owning store for the book inventory.
pub struct InventoryStore<S: StorageSlot> {
    slot: S,
    seed_failure_message: String,
    phase: LoadPhase,
    books: Vec<Book>,
    error_message: Option<String>,
    editing_id: Option<BookId>,
    last_persist_error: Option<String>,
}

impl<S: StorageSlot> InventoryStore<S> {
    /// Creates an uninitialized store with default configuration.
    pub fn new(slot: S) -> Self {
        Self::with_config(slot, &InventoryConfig::default())
    }

    pub fn with_config(slot: S, config: &InventoryConfig) -> Self {
        Self {
            slot,
            seed_failure_message: config.seed_failure_message.clone(),
            phase: LoadPhase::Uninitialized,
            books: Vec::new(),
            error_message: None,
            editing_id: None,
            last_persist_error: None,
        }
    }

    /// Runs the startup transition and enters `Ready`.
    ///
    /// Stored data wins when it parses. Absent, corrupt or unreadable stored
    /// data falls back to `seed`. A failing seed leaves an empty list and a
    /// user-facing error message. The adopted list is written back unless the
    /// seed failed or the slot could not be read.
    ///
    /// # Errors
    /// - `InventoryError::AlreadyStarted` on any call after the first.
    pub fn start(&mut self, seed: &impl SeedSource) -> Result<StartupReport, InventoryError> {
        if self.phase != LoadPhase::Uninitialized {
            return Err(InventoryError::AlreadyStarted);
        }
        self.phase = LoadPhase::Loading;
        info!("event=inventory_start module=inventory status=start");

        let mut storage_corrupt = false;
        let mut storage_unreadable = false;
        let stored = match self.slot.load() {
            Ok(value) => value,
            Err(err) => {
                storage_unreadable = true;
                error!(
                    "event=storage_load module=inventory status=error error={}",
                    err
                );
                None
            }
        };

        let mut source = StartupSource::Seed;
        let mut adopted = None;
        if let Some(text) = stored {
            match serde_json::from_str::<Vec<RawBook>>(&text) {
                Ok(raws) => {
                    source = StartupSource::Storage;
                    adopted = Some(raws);
                }
                Err(err) => {
                    storage_corrupt = true;
                    warn!(
                        "event=storage_corrupt module=inventory status=fallback bytes={} error={}",
                        text.len(),
                        err
                    );
                }
            }
        }

        let raws = match adopted {
            Some(raws) => raws,
            None => match seed.fetch_seed() {
                Ok(raws) => {
                    info!(
                        "event=seed_fetch module=inventory status=ok count={}",
                        raws.len()
                    );
                    raws
                }
                Err(err) => {
                    error!(
                        "event=seed_fetch module=inventory status=error error={}",
                        err
                    );
                    source = StartupSource::Empty;
                    self.error_message = Some(self.seed_error_message(&err));
                    Vec::new()
                }
            },
        };

        if source != StartupSource::Empty {
            self.error_message = None;
        }
        self.books = adopt_unique(&raws);
        self.phase = LoadPhase::Ready;

        // An unreadable slot may still hold the user's list.
        if source != StartupSource::Empty && !storage_unreadable {
            self.persist();
        }

        info!(
            "event=inventory_start module=inventory status=ok source={} count={} storage_corrupt={} storage_unreadable={}",
            source.as_str(),
            self.books.len(),
            storage_corrupt,
            storage_unreadable
        );
        Ok(StartupReport {
            source,
            record_count: self.books.len(),
            storage_corrupt,
            storage_unreadable,
        })
    }

    /// Adds a record at the front of the list and returns its id.
    ///
    /// The record is normalized first; an empty `book.id` is replaced by a
    /// generated one.
    ///
    /// # Errors
    /// - `NotReady` before startup, `DuplicateId` for a taken explicit id.
    pub fn create(&mut self, book: Book) -> Result<BookId, InventoryError> {
        self.ensure_ready()?;
        let id = if book.id.is_empty() {
            self.fresh_id()
        } else if self.position(&book.id).is_some() {
            return Err(InventoryError::DuplicateId(book.id));
        } else {
            book.id.clone()
        };
        let book = normalize_with_id(&book, id.clone());

        self.books.insert(0, book);
        self.log_mutation("create", &id);
        self.persist();
        Ok(id)
    }

    /// Replaces the record with the same id, keeping its position.
    ///
    /// The replacement is normalized like any stored record. Clears the edit
    /// selection when it pointed at this record.
    ///
    /// # Errors
    /// - `NotReady` before startup, `NotFound` for unknown ids (no change).
    pub fn update(&mut self, book: Book) -> Result<(), InventoryError> {
        self.ensure_ready()?;
        let Some(index) = self.position(&book.id) else {
            return Err(InventoryError::NotFound(book.id));
        };
        let book = normalize_with_id(&book, book.id.clone());

        if self.editing_id.as_deref() == Some(book.id.as_str()) {
            self.editing_id = None;
        }
        self.log_mutation("update", &book.id);
        self.books[index] = book;
        self.persist();
        Ok(())
    }

    /// Removes the record with `id`, returning whether one was removed.
    ///
    /// Idempotent: unknown ids are a no-op and nothing is persisted.
    ///
    /// # Errors
    /// - `NotReady` before startup.
    pub fn delete(&mut self, id: &str) -> Result<bool, InventoryError> {
        self.ensure_ready()?;
        if self.editing_id.as_deref() == Some(id) {
            self.editing_id = None;
        }
        let Some(index) = self.position(id) else {
            return Ok(false);
        };

        self.books.remove(index);
        self.log_mutation("delete", id);
        self.persist();
        Ok(true)
    }

    /// Swaps in a whole new record list and persists it.
    ///
    /// Records pass through normalization and duplicate re-keying like
    /// startup data. The edit selection survives only if its id remains.
    ///
    /// # Errors
    /// - `NotReady` before startup.
    pub fn replace_all(&mut self, raws: &[RawBook]) -> Result<usize, InventoryError> {
        self.ensure_ready()?;
        self.books = adopt_unique(raws);
        if let Some(id) = self.editing_id.as_deref() {
            if self.position(id).is_none() {
                self.editing_id = None;
            }
        }
        info!(
            "event=inventory_mutation module=inventory status=ok action=replace_all count={}",
            self.books.len()
        );
        self.persist();
        Ok(self.books.len())
    }

    /// Validates a form and creates or updates accordingly.
    ///
    /// With an edit selection the selected record is replaced; otherwise a
    /// new record is created. Returns the affected id.
    pub fn submit(&mut self, form: &BookForm) -> Result<BookId, SubmitError> {
        self.ensure_ready()?;
        let editing_id = self.editing_id.clone();
        let book = validate_book_form(form, editing_id.as_deref())?;
        match editing_id {
            Some(id) => {
                self.update(book)?;
                Ok(id)
            }
            None => Ok(self.create(book)?),
        }
    }

    /// Selects a known record for editing. Unknown ids leave selection as is.
    pub fn select_for_edit(&mut self, id: &str) -> bool {
        if self.position(id).is_none() {
            return false;
        }
        self.editing_id = Some(id.to_string());
        true
    }

    pub fn cancel_edit(&mut self) {
        self.editing_id = None;
    }

    pub fn editing_id(&self) -> Option<&str> {
        self.editing_id.as_deref()
    }

    pub fn editing_book(&self) -> Option<&Book> {
        self.editing_id.as_deref().and_then(|id| self.get(id))
    }

    /// Form prefill for the current edit selection.
    pub fn edit_form(&self) -> Option<BookForm> {
        self.editing_book().map(BookForm::from_book)
    }

    pub fn get(&self, id: &str) -> Option<&Book> {
        self.books.iter().find(|book| book.id == id)
    }

    /// Records in store order (newest created first).
    pub fn books(&self) -> &[Book] {
        &self.books
    }

    /// Runs the view pipeline over the current records.
    pub fn view(&self, query: &ViewQuery) -> Vec<Book> {
        view_books(&self.books, query)
    }

    pub fn phase(&self) -> LoadPhase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase != LoadPhase::Ready
    }

    pub fn has_error(&self) -> bool {
        self.error_message.is_some()
    }

    /// User-facing startup error, if the seed failed.
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Message of the most recent failed save, cleared by the next success.
    pub fn last_persist_error(&self) -> Option<&str> {
        self.last_persist_error.as_deref()
    }

    pub fn slot(&self) -> &S {
        &self.slot
    }

    pub fn into_slot(self) -> S {
        self.slot
    }

    fn ensure_ready(&self) -> Result<(), InventoryError> {
        if self.phase == LoadPhase::Ready {
            Ok(())
        } else {
            Err(InventoryError::NotReady(self.phase))
        }
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.books.iter().position(|book| book.id == id)
    }

    fn fresh_id(&self) -> BookId {
        loop {
            let id = generate_book_id();
            if self.position(&id).is_none() {
                return id;
            }
        }
    }

    fn seed_error_message(&self, err: &SeedError) -> String {
        match err {
            SeedError::Unavailable(message) if !message.trim().is_empty() => message.clone(),
            _ => self.seed_failure_message.clone(),
        }
    }

    fn persist(&mut self) {
        debug_assert_eq!(self.phase, LoadPhase::Ready);
        let serialized = match serde_json::to_string(&self.books) {
            Ok(serialized) => serialized,
            Err(err) => {
                error!(
                    "event=inventory_persist module=inventory status=error error_code=serialize_failed error={}",
                    err
                );
                self.last_persist_error = Some(err.to_string());
                return;
            }
        };

        match self.slot.save(&serialized) {
            Ok(()) => {
                self.last_persist_error = None;
                info!(
                    "event=inventory_persist module=inventory status=ok count={} bytes={}",
                    self.books.len(),
                    serialized.len()
                );
            }
            Err(err) => {
                error!(
                    "event=inventory_persist module=inventory status=error error_code=save_failed error={}",
                    err
                );
                self.last_persist_error = Some(err.to_string());
            }
        }
    }

    fn log_mutation(&self, action: &'static str, id: &str) {
        info!(
            "event=inventory_mutation module=inventory status=ok action={} book_id={}",
            action, id
        );
    }
}

/// Normalizes a caller-built record under an id the store already checked.
fn normalize_with_id(book: &Book, id: BookId) -> Book {
    let mut normalized = normalize_book(&RawBook::from(book));
    normalized.id = id;
    normalized
}

/// Normalizes raw records, re-keying any id already seen.
fn adopt_unique(raws: &[RawBook]) -> Vec<Book> {
    let mut seen = HashSet::with_capacity(raws.len());
    raws.iter()
        .map(normalize_book)
        .map(|mut book| {
            if !seen.insert(book.id.clone()) {
                let replacement = loop {
                    let candidate = generate_book_id();
                    if !seen.contains(&candidate) {
                        break candidate;
                    }
                };
                warn!(
                    "event=inventory_adopt module=inventory status=rekeyed duplicate_id={} new_id={}",
                    book.id, replacement
                );
                seen.insert(replacement.clone());
                book.id = replacement;
            }
            book
        })
        .collect()
}
