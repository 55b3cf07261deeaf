//! Queries against the `author` table. Authors have no menu of their own;
//! everything here is invoked as part of a book flow or the startup seed.

use anyhow::{Context, Result};
use log::debug;
use rusqlite::{params, Connection, OptionalExtension};

use crate::models::Author;

/// Insert an author unless a row with the same id already exists. Duplicate
/// ids are a silent no-op, mirroring the book insert.
pub fn insert_author_if_absent(
    conn: &Connection,
    id: i64,
    name: &str,
    country: &str,
) -> Result<()> {
    let inserted = conn
        .execute(
            "INSERT OR IGNORE INTO author (id, name, country) VALUES (?1, ?2, ?3)",
            params![id, name, country],
        )
        .context("failed to insert author")?;
    debug!("insert author {id}: {inserted} row(s)");
    Ok(())
}

/// Look up a single author by id.
pub fn fetch_author(conn: &Connection, id: i64) -> Result<Option<Author>> {
    conn.query_row(
        "SELECT id, name, country FROM author WHERE id = ?1",
        params![id],
        |row| {
            Ok(Author {
                id: row.get(0)?,
                name: row.get(1)?,
                country: row.get(2)?,
            })
        },
    )
    .optional()
    .context("failed to query author")
}

/// Retrieve every author in primary-key order.
pub fn fetch_all_authors(conn: &Connection) -> Result<Vec<Author>> {
    let mut stmt = conn
        .prepare("SELECT id, name, country FROM author ORDER BY id")
        .context("failed to prepare author listing query")?;

    let authors = stmt
        .query_map([], |row| {
            Ok(Author {
                id: row.get(0)?,
                name: row.get(1)?,
                country: row.get(2)?,
            })
        })
        .context("failed to load authors")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect authors")?;

    Ok(authors)
}

/// Rewrite an author row's primary key in place. This exists only for the
/// legacy update path, which moves the author row to the book's new author id
/// instead of leaving the author table alone. Fails with a constraint fault if
/// an author with `new_id` already exists, which the transaction wrapping the
/// update flow turns into a full rollback.
pub fn rewrite_author_id(conn: &Connection, old_id: i64, new_id: i64) -> Result<()> {
    let updated = conn
        .execute(
            "UPDATE author SET id = ?1 WHERE id = ?2",
            params![new_id, old_id],
        )
        .context("failed to rewrite author id")?;
    debug!("rewrite author {old_id} -> {new_id}: {updated} row(s)");
    Ok(())
}

/// Rewrite an author's name and country, leaving the id alone. This is the
/// corrected-design counterpart to [`rewrite_author_id`]: editing the author's
/// own fields instead of its key. Touching zero rows is a no-op.
pub fn update_author_details(conn: &Connection, id: i64, name: &str, country: &str) -> Result<()> {
    let updated = conn
        .execute(
            "UPDATE author SET name = ?1, country = ?2 WHERE id = ?3",
            params![name, country, id],
        )
        .context("failed to update author details")?;
    debug!("update author {id}: {updated} row(s)");
    Ok(())
}
