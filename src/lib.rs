//! Core library surface for the shelf-track bookstore inventory manager.
//!
//! The public modules exposed here provide an intentionally small API so the
//! `bin` target as well as the test suites can reuse the same pieces: the
//! SQLite persistence layer, the domain models, and the interactive session.
pub mod db;
pub mod models;
pub mod ui;

/// Convenience re-exports for the persistence layer. These functions are
/// typically used by `main.rs` to initialize the embedded SQLite store and
/// preload the starter inventory.
pub use db::{open_default_store, seed_inventory};

/// The primary domain types that other layers manipulate.
pub use models::{Author, Book, BookDetail};

/// The interactive menu loop and its state container.
pub use ui::Session;
