//! Domain models that mirror the SQLite schema and get passed between the
//! persistence layer and the menu loop. These types stay light-weight data
//! holders so the other layers can focus on prompting and queries. The
//! `Display` impls reproduce the tuple-style row rendering the inventory
//! listings have always used, so the on-screen output stays stable.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
/// One row of the `book` table. The id doubles as the operator-facing book
/// number, which is why it is entered by hand instead of being assigned by the
/// store.
pub struct Book {
    /// Primary key, immutable once inserted. Update flows rewrite every other
    /// field but never this one.
    pub id: i64,
    pub title: String,
    /// Reference to `author.id`. Not declared as a foreign key in the schema,
    /// so the joined views are responsible for skipping dangling references.
    pub author_id: i64,
    /// Copies on hand, never negative.
    pub qty: i64,
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {}, {})",
            self.id,
            quote_text(&self.title),
            self.author_id,
            self.qty
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One row of the `author` table. Authors are only ever created alongside a
/// book or by the startup seed; there is no standalone author management.
pub struct Author {
    pub id: i64,
    pub name: String,
    /// Stored capitalized; normalization happens at entry time, not here.
    pub country: String,
}

impl fmt::Display for Author {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {})",
            self.id,
            quote_text(&self.name),
            quote_text(&self.country)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Result of joining a book with its author row. Books whose `author_id`
/// matches nothing are never materialized into this type.
pub struct BookDetail {
    pub title: String,
    pub author_name: String,
    pub country: String,
}

impl fmt::Display for BookDetail {
    /// Multi-line block used by the detail views, terminated by the 15-dash
    /// rule that separates entries in the "view all" listing.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Title: {}\nAuthor: {}\nCountry: {}\n{}",
            self.title,
            self.author_name,
            self.country,
            "-".repeat(15)
        )
    }
}

/// Quote a text field the way the store's native row representation does:
/// single quotes normally, double quotes when the text itself contains an
/// apostrophe (e.g. "Alice's Adventures in Wonderland").
fn quote_text(text: &str) -> String {
    if text.contains('\'') {
        format!("\"{text}\"")
    } else {
        format!("'{text}'")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn book_renders_as_tuple() {
        let book = Book {
            id: 3001,
            title: "A Tale of Two Cities".to_string(),
            author_id: 1290,
            qty: 30,
        };
        assert_eq!(book.to_string(), "(3001, 'A Tale of Two Cities', 1290, 30)");
    }

    #[test]
    fn apostrophes_switch_to_double_quotes() {
        let book = Book {
            id: 3005,
            title: "Alice's Adventures in Wonderland".to_string(),
            author_id: 5620,
            qty: 12,
        };
        assert_eq!(
            book.to_string(),
            "(3005, \"Alice's Adventures in Wonderland\", 5620, 12)"
        );
    }

    #[test]
    fn detail_block_ends_with_rule() {
        let detail = BookDetail {
            title: "The Lord of the Rings".to_string(),
            author_name: "J.R.R Tolkien".to_string(),
            country: "South Africa".to_string(),
        };
        assert_eq!(
            detail.to_string(),
            "Title: The Lord of the Rings\nAuthor: J.R.R Tolkien\nCountry: South Africa\n---------------"
        );
    }
}
