//! Persistence module split across logical submodules.

mod authors;
mod books;
mod connection;

pub use authors::{
    fetch_all_authors, fetch_author, insert_author_if_absent, rewrite_author_id,
    update_author_details,
};
pub use books::{
    delete_book, fetch_all_book_details, fetch_all_books, fetch_book, fetch_book_details,
    insert_book_if_absent, update_book,
};
pub use connection::{open_default_store, open_in_memory_store, open_store, seed_inventory};
