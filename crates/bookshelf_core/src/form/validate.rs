//! Book form validation.
//!
//! # Responsibility
//! - Turn raw form field strings into a validated `Book`.
//! - Report every violated field rule at once.
//!
//! # Invariants
//! - All fields are checked; errors never short-circuit.
//! - Success returns trimmed strings, a parsed age and `"N/A"` for a blank
//!   isbn.
//! - Failure never yields a partial record.

use crate::model::book::{Book, BookId, ISBN_UNKNOWN};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const AUTHOR_AGE_MIN: u32 = 12;
pub const AUTHOR_AGE_MAX: u32 = 120;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));
static DIGITS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+$").expect("valid digits regex"));

/// Editable form field, keyed by its wire name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormField {
    Title,
    Author,
    AuthorAge,
    AuthorEmail,
    Publisher,
    PublishedDate,
    Overview,
    Isbn,
}

impl FormField {
    /// Returns the camelCase key used on the wire and by UI bindings.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Author => "author",
            Self::AuthorAge => "authorAge",
            Self::AuthorEmail => "authorEmail",
            Self::Publisher => "publisher",
            Self::PublishedDate => "publishedDate",
            Self::Overview => "overview",
            Self::Isbn => "isbn",
        }
    }
}

impl Display for FormField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw form input, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookForm {
    pub title: String,
    pub author: String,
    pub author_age: String,
    pub author_email: String,
    pub publisher: String,
    pub published_date: String,
    pub overview: String,
    pub isbn: String,
}

impl BookForm {
    /// Prefills a form from an existing record for editing.
    ///
    /// An absent age and the `"N/A"` isbn sentinel render as empty inputs.
    pub fn from_book(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            author: book.author.clone(),
            author_age: book.author_age.map(|age| age.to_string()).unwrap_or_default(),
            author_email: book.author_email.clone(),
            publisher: book.publisher.clone(),
            published_date: book.published_date.clone(),
            overview: book.overview.clone(),
            isbn: if book.has_isbn() {
                book.isbn.clone()
            } else {
                String::new()
            },
        }
    }
}

/// Field-level validation failures.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    messages: BTreeMap<FormField, &'static str>,
}

impl FormErrors {
    /// Returns the message for one field, if it failed.
    pub fn get(&self, field: FormField) -> Option<&'static str> {
        self.messages.get(&field).copied()
    }

    pub fn contains(&self, field: FormField) -> bool {
        self.messages.contains_key(&field)
    }

    /// Failed fields in stable order.
    pub fn fields(&self) -> impl Iterator<Item = FormField> + '_ {
        self.messages.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FormField, &'static str)> + '_ {
        self.messages.iter().map(|(field, message)| (*field, *message))
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    fn insert(&mut self, field: FormField, message: &'static str) {
        self.messages.insert(field, message);
    }
}

impl Display for FormErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "form validation failed:")?;
        for (field, message) in self.iter() {
            write!(f, " {field}: {message}")?;
        }
        Ok(())
    }
}

impl Error for FormErrors {}

/// Validates raw form input.
///
/// `editing_id` is carried into the result when editing an existing record.
/// New entries come back with an empty id; the store assigns one on create.
///
/// # Errors
/// - Returns `FormErrors` holding one message per violated field.
pub fn validate_book_form(form: &BookForm, editing_id: Option<&str>) -> Result<Book, FormErrors> {
    let mut errors = FormErrors::default();

    require(&mut errors, FormField::Title, &form.title, "Title is required.");
    require(&mut errors, FormField::Author, &form.author, "Author name is required.");
    require(&mut errors, FormField::Publisher, &form.publisher, "Publisher is required.");
    if form.published_date.is_empty() {
        errors.insert(FormField::PublishedDate, "Published date is required.");
    }
    require(&mut errors, FormField::Overview, &form.overview, "Overview is required.");

    let author_age = match parse_author_age(&form.author_age) {
        Ok(age) => Some(age),
        Err(message) => {
            errors.insert(FormField::AuthorAge, message);
            None
        }
    };

    // Patterns run on the raw input; only the required checks trim.
    if form.author_email.trim().is_empty() {
        errors.insert(FormField::AuthorEmail, "Author email is required.");
    } else if !EMAIL_RE.is_match(&form.author_email) {
        errors.insert(FormField::AuthorEmail, "Author email must be a valid address.");
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    let isbn = form.isbn.trim();
    Ok(Book {
        id: editing_id.map(BookId::from).unwrap_or_default(),
        title: form.title.trim().to_string(),
        author: form.author.trim().to_string(),
        author_age,
        author_email: form.author_email.trim().to_string(),
        publisher: form.publisher.trim().to_string(),
        published_date: form.published_date.trim().to_string(),
        overview: form.overview.trim().to_string(),
        isbn: if isbn.is_empty() {
            ISBN_UNKNOWN.to_string()
        } else {
            isbn.to_string()
        },
    })
}

fn require(errors: &mut FormErrors, field: FormField, value: &str, message: &'static str) {
    if value.trim().is_empty() {
        errors.insert(field, message);
    }
}

fn parse_author_age(raw: &str) -> Result<u32, &'static str> {
    if raw.trim().is_empty() {
        return Err("Author age is required.");
    }
    if !DIGITS_RE.is_match(raw) {
        return Err("Author age must be an integer.");
    }
    // Digit-only input that overflows u32 is out of range, not malformed.
    match raw.parse::<u32>() {
        Ok(age) if (AUTHOR_AGE_MIN..=AUTHOR_AGE_MAX).contains(&age) => Ok(age),
        _ => Err("Author age must be between 12 and 120."),
    }
}

#[cfg(test)]
mod tests {
    use super::parse_author_age;

    #[test]
    fn age_parser_distinguishes_format_from_range() {
        assert_eq!(parse_author_age("42"), Ok(42));
        assert_eq!(parse_author_age(" 12 "), Err("Author age must be an integer."));
        assert_eq!(parse_author_age("   "), Err("Author age is required."));
        assert_eq!(parse_author_age("4.5"), Err("Author age must be an integer."));
        assert_eq!(parse_author_age("-20"), Err("Author age must be an integer."));
        assert_eq!(
            parse_author_age("99999999999"),
            Err("Author age must be between 12 and 120.")
        );
    }
}
