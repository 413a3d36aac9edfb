use bookshelf_core::{view_books, Book, SortDirection, SortKey, ViewQuery};

#[test]
fn search_matches_title_author_or_publisher_ignoring_case() {
    let books = vec![
        book("1", "Clean Code", "Robert Martin", "Prentice Hall"),
        book("2", "The Pragmatic Programmer", "Andrew Hunt", "Addison-Wesley"),
    ];

    let hits = view_books(&books, &query("martin", SortKey::Title, SortDirection::Asc));
    assert_eq!(ids(&hits), vec!["1"]);

    let hits = view_books(&books, &query("  ADDISON ", SortKey::Title, SortDirection::Asc));
    assert_eq!(ids(&hits), vec!["2"]);

    let hits = view_books(&books, &query("code", SortKey::Title, SortDirection::Asc));
    assert_eq!(ids(&hits), vec!["1"]);
}

#[test]
fn search_ignores_other_fields() {
    let mut only = book("1", "Clean Code", "Robert Martin", "Prentice Hall");
    only.overview = "refactoring stories".to_string();
    only.isbn = "9780132350884".to_string();

    let hits = view_books(&[only], &query("refactoring", SortKey::Title, SortDirection::Asc));
    assert!(hits.is_empty());
}

#[test]
fn blank_search_returns_everything() {
    let books = vec![
        book("1", "b", "x", "p"),
        book("2", "a", "y", "q"),
    ];
    let hits = view_books(&books, &query("   ", SortKey::Title, SortDirection::Asc));
    assert_eq!(ids(&hits), vec!["2", "1"]);
}

#[test]
fn text_keys_sort_case_insensitively() {
    let books = vec![
        book("1", "beta", "Zed", "acme"),
        book("2", "Alpha", "amy", "Bravo"),
        book("3", "gamma", "Mike", "charlie"),
    ];

    let by_author = view_books(&books, &query("", SortKey::Author, SortDirection::Asc));
    assert_eq!(ids(&by_author), vec!["2", "3", "1"]);

    let by_publisher = view_books(&books, &query("", SortKey::Publisher, SortDirection::Desc));
    assert_eq!(ids(&by_publisher), vec!["3", "2", "1"]);
}

#[test]
fn published_date_sorts_by_time_with_unparseable_as_epoch() {
    let mut old = book("old", "a", "a", "a");
    old.published_date = "1960-06-01".to_string();
    let mut unknown = book("unknown", "b", "b", "b");
    unknown.published_date = "someday".to_string();
    let mut recent = book("recent", "c", "c", "c");
    recent.published_date = "2020-02-29".to_string();
    let mut year_only = book("year", "d", "d", "d");
    year_only.published_date = "1999".to_string();

    let books = vec![recent, unknown, old, year_only];
    let sorted = view_books(&books, &query("", SortKey::PublishedDate, SortDirection::Asc));
    assert_eq!(ids(&sorted), vec!["old", "unknown", "year", "recent"]);
}

#[test]
fn author_age_sorts_numerically_with_absent_as_zero() {
    let mut young = book("young", "a", "a", "a");
    young.author_age = Some(9);
    let mut old = book("old", "b", "b", "b");
    old.author_age = Some(100);
    let absent = book("absent", "c", "c", "c");

    let sorted = view_books(
        &[old, absent, young],
        &query("", SortKey::AuthorAge, SortDirection::Asc),
    );
    assert_eq!(ids(&sorted), vec!["absent", "young", "old"]);
}

#[test]
fn descending_reverses_distinct_values_and_keeps_ties_stable() {
    let books = vec![
        book("tie-1", "Same", "a", "a"),
        book("z", "Zulu", "a", "a"),
        book("tie-2", "same", "a", "a"),
        book("a", "Able", "a", "a"),
    ];

    let asc = view_books(&books, &query("", SortKey::Title, SortDirection::Asc));
    let desc = view_books(&books, &query("", SortKey::Title, SortDirection::Desc));

    assert_eq!(ids(&asc), vec!["a", "tie-1", "tie-2", "z"]);
    assert_eq!(ids(&desc), vec!["z", "tie-1", "tie-2", "a"]);
}

#[test]
fn view_does_not_mutate_input() {
    let books = vec![book("2", "b", "b", "b"), book("1", "a", "a", "a")];
    let snapshot = books.clone();

    let _ = view_books(&books, &query("", SortKey::Title, SortDirection::Asc));
    assert_eq!(books, snapshot);
}

#[test]
fn default_query_sorts_by_title_ascending() {
    let query = ViewQuery::default();
    assert_eq!(query.sort_key, SortKey::Title);
    assert_eq!(query.direction, SortDirection::Asc);
    assert!(query.search.is_empty());
}

fn query(search: &str, key: SortKey, direction: SortDirection) -> ViewQuery {
    ViewQuery::new(search, key, direction)
}

fn book(id: &str, title: &str, author: &str, publisher: &str) -> Book {
    Book {
        id: id.to_string(),
        title: title.to_string(),
        author: author.to_string(),
        author_age: None,
        author_email: String::new(),
        publisher: publisher.to_string(),
        published_date: String::new(),
        overview: String::new(),
        isbn: "N/A".to_string(),
    }
}

fn ids(books: &[Book]) -> Vec<&str> {
    books.iter().map(|book| book.id.as_str()).collect()
}
