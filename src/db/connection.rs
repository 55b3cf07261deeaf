//! Store bootstrap: locate the database file, create the schema, and load the
//! starter inventory. Seeding uses insert-if-absent so running it on every
//! startup is harmless once real data exists.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::BaseDirs;
use log::info;
use rusqlite::{params, Connection};

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".shelf-track";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "shelf.sqlite";

/// Starter books inserted on every launch. Ids are the operator-facing book
/// numbers, so they are fixed rather than auto-assigned.
const SEED_BOOKS: [(i64, &str, i64, i64); 5] = [
    (3001, "A Tale of Two Cities", 1290, 30),
    (3002, "Harry Potter and the Philosopher's Stone", 8937, 40),
    (3003, "The Lion, the Witch and the Wardrobe", 2356, 25),
    (3004, "The Lord of the Rings", 6380, 37),
    (3005, "Alice's Adventures in Wonderland", 5620, 12),
];

/// Authors matching the starter books, one per referenced author id.
const SEED_AUTHORS: [(i64, &str, &str); 5] = [
    (1290, "Charles Dickens", "England"),
    (8937, "J.K. Rowling", "England"),
    (2356, "C.S. Lewis", "Ireland"),
    (6380, "J.R.R Tolkien", "South Africa"),
    (5620, "Lewis Carroll", "England"),
];

/// Open (creating if necessary) the store at its default location inside the
/// user's home directory and make sure the schema exists.
pub fn open_default_store() -> Result<Connection> {
    open_store(&db_path()?)
}

/// Open the store at an explicit path. Split out from [`open_default_store`]
/// so tests can point at a scratch directory.
pub fn open_store(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create data directory")?;
    }

    let conn = Connection::open(path).context("failed to open SQLite database")?;
    ensure_schema(&conn)?;
    Ok(conn)
}

/// Fully in-memory store with the same schema. Used by the test suites, which
/// never want to touch the operator's real inventory file.
pub fn open_in_memory_store() -> Result<Connection> {
    let conn = Connection::open_in_memory().context("failed to open in-memory database")?;
    ensure_schema(&conn)?;
    Ok(conn)
}

/// Create both tables if they are missing. `authorID` is deliberately not
/// declared as a foreign key: the schema predates any enforcement, and the
/// legacy author-rewrite compatibility path could not run under it.
fn ensure_schema(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS book (
            id INTEGER PRIMARY KEY,
            title TEXT,
            authorID INTEGER,
            qty INTEGER
        )",
        [],
    )
    .context("failed to create book table")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS author (
            id INTEGER PRIMARY KEY,
            name TEXT,
            country TEXT
        )",
        [],
    )
    .context("failed to create author table")?;

    Ok(())
}

/// Insert the starter books and authors, skipping any id that already exists.
pub fn seed_inventory(conn: &Connection) -> Result<()> {
    let mut insert_book = conn
        .prepare("INSERT OR IGNORE INTO book (id, title, authorID, qty) VALUES (?1, ?2, ?3, ?4)")
        .context("failed to prepare book seed statement")?;
    for (id, title, author_id, qty) in SEED_BOOKS {
        insert_book
            .execute(params![id, title, author_id, qty])
            .context("failed to seed book table")?;
    }

    let mut insert_author = conn
        .prepare("INSERT OR IGNORE INTO author (id, name, country) VALUES (?1, ?2, ?3)")
        .context("failed to prepare author seed statement")?;
    for (id, name, country) in SEED_AUTHORS {
        insert_author
            .execute(params![id, name, country])
            .context("failed to seed author table")?;
    }

    info!("seeded inventory ({} books, {} authors)", SEED_BOOKS.len(), SEED_AUTHORS.len());
    Ok(())
}

/// Resolve the absolute path to the SQLite database inside the user's home.
fn db_path() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME).join(DB_FILE_NAME))
}
