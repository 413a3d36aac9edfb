use bookshelf_core::{normalize_book, normalize_books, Book, RawBook, ISBN_UNKNOWN};
use serde_json::json;

#[test]
fn missing_fields_get_defaults_and_a_generated_id() {
    let book = normalize_book(&RawBook::default());

    assert!(!book.id.is_empty());
    assert_eq!(book.title, "");
    assert_eq!(book.author, "");
    assert_eq!(book.author_age, None);
    assert_eq!(book.author_email, "");
    assert_eq!(book.publisher, "");
    assert_eq!(book.published_date, "");
    assert_eq!(book.overview, "");
    assert_eq!(book.isbn, ISBN_UNKNOWN);
}

#[test]
fn falsy_values_are_treated_as_missing() {
    let raw: RawBook = serde_json::from_value(json!({
        "id": "",
        "title": null,
        "author": false,
        "authorAge": 0,
        "isbn": ""
    }))
    .unwrap();

    let book = normalize_book(&raw);
    assert!(!book.id.is_empty());
    assert_eq!(book.title, "");
    assert_eq!(book.author, "");
    assert_eq!(book.author_age, None);
    assert_eq!(book.isbn, ISBN_UNKNOWN);
}

#[test]
fn present_values_are_kept_verbatim() {
    let raw: RawBook = serde_json::from_value(json!({
        "id": "OL123W",
        "title": " Clean Code ",
        "author": "Robert Martin",
        "authorAge": 61,
        "authorEmail": "robert.martin@books.local",
        "publisher": "Prentice Hall",
        "publishedDate": "2008-01-01",
        "overview": "Craft",
        "isbn": "9780132350884",
        "coverId": 42
    }))
    .unwrap();

    let book = normalize_book(&raw);
    assert_eq!(book.id, "OL123W");
    assert_eq!(book.title, " Clean Code ");
    assert_eq!(book.author_age, Some(61));
    assert_eq!(book.isbn, "9780132350884");
}

#[test]
fn loosely_typed_values_are_coerced() {
    let raw: RawBook = serde_json::from_value(json!({
        "id": 17,
        "title": 1984,
        "authorAge": "44",
        "isbn": 9780132350884_u64
    }))
    .unwrap();

    let book = normalize_book(&raw);
    assert_eq!(book.id, "17");
    assert_eq!(book.title, "1984");
    assert_eq!(book.author_age, Some(44));
    assert_eq!(book.isbn, "9780132350884");
}

#[test]
fn normalization_does_not_mutate_input_and_keeps_order() {
    let raws = vec![
        RawBook {
            title: Some(json!("first")),
            ..RawBook::default()
        },
        RawBook {
            id: Some(json!("second-id")),
            ..RawBook::default()
        },
    ];
    let before = raws.clone();

    let books = normalize_books(&raws);
    assert_eq!(raws, before);
    assert_eq!(books.len(), 2);
    assert_eq!(books[0].title, "first");
    assert_eq!(books[1].id, "second-id");
    assert_ne!(books[0].id, books[1].id);
}

#[test]
fn book_round_trips_through_raw_shape() {
    let book = Book {
        id: "b-1".to_string(),
        title: "Refactoring".to_string(),
        author: "Martin Fowler".to_string(),
        author_age: Some(61),
        author_email: "martin@example.com".to_string(),
        publisher: "Addison-Wesley".to_string(),
        published_date: "2018-11-20".to_string(),
        overview: "Improving existing code.".to_string(),
        isbn: ISBN_UNKNOWN.to_string(),
    };

    assert_eq!(normalize_book(&RawBook::from(&book)), book);

    let wire = serde_json::to_string(&book).unwrap();
    let raw: RawBook = serde_json::from_str(&wire).unwrap();
    assert_eq!(normalize_book(&raw), book);
}

#[test]
fn wire_shape_uses_camel_case_field_names() {
    let book = normalize_book(&RawBook {
        id: Some(json!("x")),
        author_age: Some(json!(30)),
        ..RawBook::default()
    });
    let json = serde_json::to_value(&book).unwrap();
    for key in [
        "id",
        "title",
        "author",
        "authorAge",
        "authorEmail",
        "publisher",
        "publishedDate",
        "overview",
        "isbn",
    ] {
        assert!(json.get(key).is_some(), "missing {key}");
    }
}
