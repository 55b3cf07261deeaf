//! Queries against the `book` table plus the joined views that pull in author
//! details. Each function wraps a single statement so callers can compose them
//! inside one transaction when a menu action touches both tables.

use anyhow::{Context, Result};
use log::debug;
use rusqlite::{params, Connection, OptionalExtension};

use crate::models::{Book, BookDetail};

/// Insert a book unless a row with the same id already exists. A duplicate id
/// is a silent no-op, not an error, so callers that want to reject duplicates
/// must check with [`fetch_book`] first.
pub fn insert_book_if_absent(
    conn: &Connection,
    id: i64,
    title: &str,
    author_id: i64,
    qty: i64,
) -> Result<()> {
    let inserted = conn
        .execute(
            "INSERT OR IGNORE INTO book (id, title, authorID, qty) VALUES (?1, ?2, ?3, ?4)",
            params![id, title, author_id, qty],
        )
        .context("failed to insert book")?;
    debug!("insert book {id}: {inserted} row(s)");
    Ok(())
}

/// Look up a single book by id.
pub fn fetch_book(conn: &Connection, id: i64) -> Result<Option<Book>> {
    conn.query_row(
        "SELECT id, title, authorID, qty FROM book WHERE id = ?1",
        params![id],
        |row| {
            Ok(Book {
                id: row.get(0)?,
                title: row.get(1)?,
                author_id: row.get(2)?,
                qty: row.get(3)?,
            })
        },
    )
    .optional()
    .context("failed to query book")
}

/// Retrieve every book in primary-key order, the order the full-table
/// listings have always shown.
pub fn fetch_all_books(conn: &Connection) -> Result<Vec<Book>> {
    let mut stmt = conn
        .prepare("SELECT id, title, authorID, qty FROM book ORDER BY id")
        .context("failed to prepare book listing query")?;

    let books = stmt
        .query_map([], |row| {
            Ok(Book {
                id: row.get(0)?,
                title: row.get(1)?,
                author_id: row.get(2)?,
                qty: row.get(3)?,
            })
        })
        .context("failed to load books")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect books")?;

    Ok(books)
}

/// Joined title/author/country view for one book. Returns `None` both when
/// the book is missing and when its author reference matches nothing; the
/// inner join is what hides dangling references.
pub fn fetch_book_details(conn: &Connection, id: i64) -> Result<Option<BookDetail>> {
    conn.query_row(
        "SELECT book.title, author.name, author.country
         FROM book
         INNER JOIN author ON book.authorID = author.id
         WHERE book.id = ?1",
        params![id],
        |row| {
            Ok(BookDetail {
                title: row.get(0)?,
                author_name: row.get(1)?,
                country: row.get(2)?,
            })
        },
    )
    .optional()
    .context("failed to query book details")
}

/// Joined view across the whole inventory. Books whose `authorID` has no
/// matching author row are excluded, not reported.
pub fn fetch_all_book_details(conn: &Connection) -> Result<Vec<BookDetail>> {
    let mut stmt = conn
        .prepare(
            "SELECT book.title, author.name, author.country
             FROM book
             INNER JOIN author ON book.authorID = author.id
             ORDER BY book.id",
        )
        .context("failed to prepare joined listing query")?;

    let details = stmt
        .query_map([], |row| {
            Ok(BookDetail {
                title: row.get(0)?,
                author_name: row.get(1)?,
                country: row.get(2)?,
            })
        })
        .context("failed to load joined listing")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect joined listing")?;

    Ok(details)
}

/// Rewrite the three mutable fields of a book. The id never changes. Touching
/// zero rows is a no-op; callers are expected to have checked existence.
pub fn update_book(
    conn: &Connection,
    id: i64,
    title: &str,
    author_id: i64,
    qty: i64,
) -> Result<()> {
    let updated = conn
        .execute(
            "UPDATE book SET title = ?1, authorID = ?2, qty = ?3 WHERE id = ?4",
            params![title, author_id, qty, id],
        )
        .context("failed to update book")?;
    debug!("update book {id}: {updated} row(s)");
    Ok(())
}

/// Remove a book by id. Deleting an absent id is a no-op.
pub fn delete_book(conn: &Connection, id: i64) -> Result<()> {
    let deleted = conn
        .execute("DELETE FROM book WHERE id = ?1", params![id])
        .context("failed to delete book")?;
    debug!("delete book {id}: {deleted} row(s)");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{insert_author_if_absent, open_in_memory_store, seed_inventory};

    fn seeded() -> Connection {
        let conn = open_in_memory_store().unwrap();
        seed_inventory(&conn).unwrap();
        conn
    }

    #[test]
    fn insert_is_idempotent_and_keeps_existing_row() {
        let conn = seeded();
        insert_book_if_absent(&conn, 3001, "Imposter", 1, 999).unwrap();

        let book = fetch_book(&conn, 3001).unwrap().unwrap();
        assert_eq!(book.title, "A Tale of Two Cities");
        assert_eq!(book.author_id, 1290);
        assert_eq!(book.qty, 30);
    }

    #[test]
    fn inserted_fields_round_trip() {
        let conn = seeded();
        insert_book_if_absent(&conn, 4100, "Bleak House", 1290, 7).unwrap();

        let book = fetch_book(&conn, 4100).unwrap().unwrap();
        assert_eq!(
            book,
            crate::models::Book {
                id: 4100,
                title: "Bleak House".to_string(),
                author_id: 1290,
                qty: 7,
            }
        );
    }

    #[test]
    fn delete_then_fetch_returns_absent() {
        let conn = seeded();
        assert!(fetch_book(&conn, 3001).unwrap().is_some());
        delete_book(&conn, 3001).unwrap();
        assert!(fetch_book(&conn, 3001).unwrap().is_none());
    }

    #[test]
    fn delete_of_missing_id_is_a_noop() {
        let conn = seeded();
        delete_book(&conn, 9999).unwrap();
        assert_eq!(fetch_all_books(&conn).unwrap().len(), 5);
    }

    #[test]
    fn update_rewrites_fields_but_not_id() {
        let conn = seeded();
        update_book(&conn, 3002, "Harry Potter", 1290, 99).unwrap();

        let book = fetch_book(&conn, 3002).unwrap().unwrap();
        assert_eq!(book.id, 3002);
        assert_eq!(book.title, "Harry Potter");
        assert_eq!(book.author_id, 1290);
        assert_eq!(book.qty, 99);
    }

    #[test]
    fn joined_listing_skips_books_without_an_author() {
        let conn = seeded();
        insert_book_if_absent(&conn, 4200, "Orphaned Manuscript", 7777, 1).unwrap();

        let details = fetch_all_book_details(&conn).unwrap();
        assert_eq!(details.len(), 5);
        assert!(details.iter().all(|d| d.title != "Orphaned Manuscript"));
        assert!(fetch_book_details(&conn, 4200).unwrap().is_none());

        insert_author_if_absent(&conn, 7777, "Anonymous", "Unknown").unwrap();
        assert_eq!(fetch_all_book_details(&conn).unwrap().len(), 6);
    }

    #[test]
    fn seed_scenario_search_delete_update() {
        let conn = seeded();

        let book = fetch_book(&conn, 3001).unwrap().unwrap();
        assert_eq!(book.to_string(), "(3001, 'A Tale of Two Cities', 1290, 30)");

        delete_book(&conn, 3001).unwrap();
        assert!(fetch_book(&conn, 3001).unwrap().is_none());

        let before = fetch_book(&conn, 3002).unwrap().unwrap();
        update_book(&conn, 3002, &before.title, before.author_id, 99).unwrap();
        let after = fetch_book(&conn, 3002).unwrap().unwrap();
        assert_eq!(after.qty, 99);
        assert_eq!(after.title, before.title);
    }
}
