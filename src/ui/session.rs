//! The interactive menu loop. A [`Session`] owns the database connection plus
//! its input and output handles, which keeps every flow scriptable from tests
//! with a byte cursor standing in for the terminal.
//!
//! Error policy: validation failures and missing ids are handled inside each
//! flow by re-prompting; only storage faults (and a closed input stream)
//! escape `run`, at which point the process is expected to die.

use std::env;
use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use rusqlite::Connection;

use crate::db;
use crate::ui::prompt::{
    capitalize, prompt_id, prompt_qty, prompt_text, prompt_yes_no, read_line,
};

/// Environment variable selecting the legacy author-rewrite behavior for the
/// update flow. The legacy behavior moved the author row's primary key to the
/// book's new author id and silently discarded any freshly entered author
/// name and country. That is almost certainly a defect, so the corrected
/// behavior is the default and the legacy one is opt-in for compatibility.
const LEGACY_REWRITE_ENV: &str = "SHELF_TRACK_LEGACY_AUTHOR_REWRITE";

/// State container for one interactive run: the live connection, the terminal
/// handles, and the author-update compatibility switch.
pub struct Session<R, W> {
    conn: Connection,
    input: R,
    output: W,
    legacy_author_rewrite: bool,
}

impl<R: BufRead, W: Write> Session<R, W> {
    /// Build a session, reading the compatibility switch from the environment.
    pub fn new(conn: Connection, input: R, output: W) -> Self {
        let legacy = env::var(LEGACY_REWRITE_ENV)
            .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        Self {
            conn,
            input,
            output,
            legacy_author_rewrite: legacy,
        }
    }

    /// Override the author-update compatibility switch explicitly.
    pub fn with_legacy_rewrite(mut self, legacy: bool) -> Self {
        self.legacy_author_rewrite = legacy;
        self
    }

    /// Display the menu and dispatch until the operator picks exit. Returns
    /// only on exit or on a fault; there is no other terminal state.
    pub fn run(&mut self) -> Result<()> {
        loop {
            self.say("\n--------MENU CHOICE INVENTORY--------\n")?;
            self.say("Choose from the menu options below:")?;
            self.say("1. Enter book")?;
            self.say("2. Update book")?;
            self.say("3. Delete book")?;
            self.say("4. Search book")?;
            self.say("5. View details of all books")?;
            self.say("0. Exit")?;

            let choice = read_line(&mut self.input, &mut self.output, "Enter an option (0-5): ")?;
            match choice.trim() {
                "1" => self.add_book()?,
                "2" => self.update_book()?,
                "3" => self.delete_book()?,
                "4" => self.search_book()?,
                "5" => self.view_all()?,
                "0" => {
                    self.say("Quitting the program. Goodbye!")?;
                    return Ok(());
                }
                _ => self.say("Please enter a number between 0 and 5.")?,
            }
        }
    }

    /// Menu option 1: collect a new book (and optionally its author) and
    /// insert both rows in one transaction, then show the full book table.
    fn add_book(&mut self) -> Result<()> {
        self.say("\nAdding a new book to the inventory.\n")?;

        // The id prompt also rejects duplicates, since insert-if-absent would
        // otherwise swallow the new row without telling the operator.
        let id = loop {
            let id = prompt_id(
                &mut self.input,
                &mut self.output,
                "Enter the book ID: ",
                "Book ID",
            )?;
            if db::fetch_book(&self.conn, id)?.is_some() {
                self.say("Book ID already exists. Please try again.")?;
                continue;
            }
            break id;
        };

        let title = prompt_text(&mut self.input, &mut self.output, "Enter the title of the book: ")?;
        let author_id = prompt_id(
            &mut self.input,
            &mut self.output,
            "Enter the author's ID: ",
            "Author ID",
        )?;
        let qty = prompt_qty(
            &mut self.input,
            &mut self.output,
            "Enter the quantity of the book: ",
        )?;

        let new_author = if prompt_yes_no(
            &mut self.input,
            &mut self.output,
            "Would you like to add the author's details (y/n): ",
        )? {
            let name = prompt_text(&mut self.input, &mut self.output, "Enter the name of the author: ")?;
            let country = capitalize(&prompt_text(
                &mut self.input,
                &mut self.output,
                "Enter the country name: ",
            )?);
            let new_author_id = prompt_id(
                &mut self.input,
                &mut self.output,
                "Enter the author ID: ",
                "Author ID",
            )?;
            Some((new_author_id, name, country))
        } else {
            None
        };

        let tx = self.conn.transaction().context("failed to begin transaction")?;
        db::insert_book_if_absent(&tx, id, &title, author_id, qty)?;
        if let Some((author_id, name, country)) = &new_author {
            db::insert_author_if_absent(&tx, *author_id, name, country)?;
        }
        tx.commit().context("failed to commit book insert")?;

        self.say("Book added successfully!\n")?;
        self.print_book_table()
    }

    /// Menu option 2: pick an existing book, show its current joined details,
    /// collect replacement values, and write them in one transaction.
    fn update_book(&mut self) -> Result<()> {
        let (book, current) = loop {
            let id = prompt_id(
                &mut self.input,
                &mut self.output,
                "Enter the book ID you wish to update: ",
                "Book ID",
            )?;
            let Some(book) = db::fetch_book(&self.conn, id)? else {
                self.say("Book ID does not exist. Please try again.")?;
                continue;
            };
            self.say(&format!("Book details found: {book}"))?;
            // A book whose author reference matches nothing has no joined
            // details to review, so the flow cannot proceed with it.
            let Some(current) = db::fetch_book_details(&self.conn, id)? else {
                self.say("No matching book found.")?;
                continue;
            };
            break (book, current);
        };

        self.say(&format!("Current Title: {}", current.title))?;
        self.say(&format!("Current Author: {}", current.author_name))?;
        self.say(&format!("Author's Country: {}", current.country))?;

        let new_title = prompt_text(
            &mut self.input,
            &mut self.output,
            "Enter the new title of the book: ",
        )?;
        let new_author_id = prompt_id(
            &mut self.input,
            &mut self.output,
            "Enter the new author's ID: ",
            "Author ID",
        )?;
        let new_qty = prompt_qty(
            &mut self.input,
            &mut self.output,
            "Enter the new quantity of the book: ",
        )?;

        let author_details = if prompt_yes_no(
            &mut self.input,
            &mut self.output,
            "Would you like to update the author's details (y/n): ",
        )? {
            let name = prompt_text(&mut self.input, &mut self.output, "Enter the new author name: ")?;
            let country = capitalize(&prompt_text(
                &mut self.input,
                &mut self.output,
                "Enter the new country name: ",
            )?);
            Some((name, country))
        } else {
            None
        };

        let tx = self.conn.transaction().context("failed to begin transaction")?;
        db::update_book(&tx, book.id, &new_title, new_author_id, new_qty)?;
        if self.legacy_author_rewrite {
            // Legacy behavior: move the author row's primary key to the new
            // id and drop the freshly entered name/country on the floor.
            if new_author_id != book.author_id {
                db::rewrite_author_id(&tx, book.author_id, new_author_id)?;
            }
        } else if let Some((name, country)) = &author_details {
            db::insert_author_if_absent(&tx, new_author_id, name, country)?;
            db::update_author_details(&tx, new_author_id, name, country)?;
        }
        tx.commit().context("failed to commit book update")?;

        self.say("Update completed!")?;
        if let Some(detail) = db::fetch_book_details(&self.conn, book.id)? {
            self.say(&detail.to_string())?;
        }
        Ok(())
    }

    /// Menu option 3: pick an existing book, delete it, and show the table.
    fn delete_book(&mut self) -> Result<()> {
        let id = loop {
            let id = prompt_id(
                &mut self.input,
                &mut self.output,
                "Enter the book ID you wish to delete: ",
                "Book ID",
            )?;
            if db::fetch_book(&self.conn, id)?.is_none() {
                self.say("Book ID does not exist. Please try again.")?;
                continue;
            }
            break id;
        };

        db::delete_book(&self.conn, id)?;
        self.say(&format!("Book with ID {id} has been deleted."))?;
        self.print_book_table()
    }

    /// Menu option 4: look up one book by id. The id's sign is validated
    /// before the query runs; a valid id that matches nothing prints nothing.
    fn search_book(&mut self) -> Result<()> {
        let id = prompt_id(
            &mut self.input,
            &mut self.output,
            "Enter the book ID you wish to search: ",
            "Book ID",
        )?;
        if let Some(book) = db::fetch_book(&self.conn, id)? {
            self.say(&format!("Book found: {book}"))?;
        }
        Ok(())
    }

    /// Menu option 5: print every joined title/author/country block.
    fn view_all(&mut self) -> Result<()> {
        for detail in db::fetch_all_book_details(&self.conn)? {
            self.say(&detail.to_string())?;
        }
        Ok(())
    }

    /// Dump the full book table, one tuple per line.
    fn print_book_table(&mut self) -> Result<()> {
        for book in db::fetch_all_books(&self.conn)? {
            self.say(&book.to_string())?;
        }
        Ok(())
    }

    fn say(&mut self, text: &str) -> Result<()> {
        writeln!(self.output, "{text}").context("failed to write output")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{
        fetch_all_authors, fetch_all_books, fetch_author, fetch_book, insert_book_if_absent,
        open_in_memory_store, seed_inventory,
    };
    use std::io::Cursor;

    /// Run a scripted session against a fresh seeded store and hand back the
    /// connection plus everything that was printed.
    fn run_script(script: &str) -> (Connection, String) {
        run_script_with(script, false, |_| {})
    }

    fn run_script_with(
        script: &str,
        legacy: bool,
        prepare: impl FnOnce(&Connection),
    ) -> (Connection, String) {
        let conn = open_in_memory_store().unwrap();
        seed_inventory(&conn).unwrap();
        prepare(&conn);

        let mut session = Session::new(conn, Cursor::new(script.as_bytes().to_vec()), Vec::new())
            .with_legacy_rewrite(legacy);
        session.run().unwrap();

        let transcript = String::from_utf8(session.output).unwrap();
        (session.conn, transcript)
    }

    #[test]
    fn add_then_search_round_trips_every_field() {
        let (conn, transcript) = run_script("1\n4100\nBleak House\n1290\n7\nn\n4\n4100\n0\n");

        assert!(transcript.contains("Book added successfully!"));
        assert!(transcript.contains("Book found: (4100, 'Bleak House', 1290, 7)"));
        let book = fetch_book(&conn, 4100).unwrap().unwrap();
        assert_eq!((book.title.as_str(), book.author_id, book.qty), ("Bleak House", 1290, 7));
    }

    #[test]
    fn add_rejects_duplicate_id_then_accepts_a_fresh_one() {
        let (conn, transcript) =
            run_script("1\n3001\n4100\nBleak House\n1290\n7\nn\n0\n");

        assert!(transcript.contains("Book ID already exists. Please try again."));
        // The seeded 3001 row is untouched.
        let original = fetch_book(&conn, 3001).unwrap().unwrap();
        assert_eq!(original.title, "A Tale of Two Cities");
        assert!(fetch_book(&conn, 4100).unwrap().is_some());
    }

    #[test]
    fn add_with_author_details_inserts_and_capitalizes() {
        let (conn, _) = run_script(
            "1\n4100\nWar and Peace\n9001\n3\ny\nLeo Tolstoy\nrussia\n9001\n0\n",
        );

        let author = fetch_author(&conn, 9001).unwrap().unwrap();
        assert_eq!(author.name, "Leo Tolstoy");
        assert_eq!(author.country, "Russia");
    }

    #[test]
    fn update_rewrites_book_and_leaves_authors_alone_by_default() {
        let (conn, transcript) = run_script("2\n3002\nHarry Potter\n8937\n99\nn\n0\n");

        assert!(transcript.contains("Current Title: Harry Potter and the Philosopher's Stone"));
        assert!(transcript.contains("Current Author: J.K. Rowling"));
        assert!(transcript.contains("Update completed!"));
        assert!(transcript.contains("Title: Harry Potter\nAuthor: J.K. Rowling\nCountry: England"));

        let book = fetch_book(&conn, 3002).unwrap().unwrap();
        assert_eq!(book.id, 3002);
        assert_eq!(book.title, "Harry Potter");
        assert_eq!(book.qty, 99);
        assert_eq!(fetch_all_authors(&conn).unwrap().len(), 5);
    }

    #[test]
    fn corrected_update_persists_entered_author_details() {
        let (conn, _) = run_script(
            "2\n3002\nHarry Potter\n8937\n40\ny\nJoanne Rowling\nSCOTLAND\n0\n",
        );

        let author = fetch_author(&conn, 8937).unwrap().unwrap();
        assert_eq!(author.id, 8937);
        assert_eq!(author.name, "Joanne Rowling");
        assert_eq!(author.country, "Scotland");
    }

    #[test]
    fn legacy_update_moves_the_author_row_and_drops_entered_details() {
        let (conn, _) = run_script_with(
            "2\n3002\nHarry Potter\n4444\n40\ny\nNew Name\nscotland\n0\n",
            true,
            |_| {},
        );

        let book = fetch_book(&conn, 3002).unwrap().unwrap();
        assert_eq!(book.author_id, 4444);
        assert!(fetch_author(&conn, 8937).unwrap().is_none());
        // The row moved but its fields were never touched.
        let moved = fetch_author(&conn, 4444).unwrap().unwrap();
        assert_eq!(moved.name, "J.K. Rowling");
        assert_eq!(moved.country, "England");
    }

    #[test]
    fn update_reprompts_for_a_book_whose_author_is_missing() {
        let (conn, transcript) = run_script_with(
            "2\n4200\n3003\nThe Silver Chair\n2356\n25\nn\n0\n",
            false,
            |conn| {
                insert_book_if_absent(conn, 4200, "Orphaned Manuscript", 7777, 1).unwrap();
            },
        );

        assert!(transcript.contains("No matching book found."));
        assert_eq!(fetch_book(&conn, 3003).unwrap().unwrap().title, "The Silver Chair");
        // The orphan itself was never updated.
        assert_eq!(
            fetch_book(&conn, 4200).unwrap().unwrap().title,
            "Orphaned Manuscript"
        );
    }

    #[test]
    fn delete_flow_removes_the_row_and_prints_the_table() {
        let (conn, transcript) = run_script("3\n9999\n3001\n0\n");

        assert!(transcript.contains("Book ID does not exist. Please try again."));
        assert!(transcript.contains("Book with ID 3001 has been deleted."));
        assert!(fetch_book(&conn, 3001).unwrap().is_none());
        assert_eq!(fetch_all_books(&conn).unwrap().len(), 4);
    }

    #[test]
    fn search_validates_sign_before_querying_and_is_silent_on_absent() {
        let (_, transcript) = run_script("4\n-3\n9999\n4\n3001\n0\n");

        assert!(transcript.contains("Book ID cannot be zero or a negative number."));
        assert!(!transcript.contains("Book found: (9999"));
        assert!(transcript.contains("Book found: (3001, 'A Tale of Two Cities', 1290, 30)"));
    }

    #[test]
    fn view_all_prints_joined_blocks_with_dash_rule() {
        let (_, transcript) = run_script_with("5\n0\n", false, |conn| {
            insert_book_if_absent(conn, 4200, "Orphaned Manuscript", 7777, 1).unwrap();
        });

        assert!(transcript.contains("Title: A Tale of Two Cities\nAuthor: Charles Dickens\nCountry: England"));
        assert_eq!(transcript.matches("---------------").count(), 5);
        assert!(!transcript.contains("Orphaned Manuscript"));
    }

    #[test]
    fn unknown_menu_option_reprompts() {
        let (_, transcript) = run_script("7\n0\n");
        assert!(transcript.contains("Please enter a number between 0 and 5."));
        assert!(transcript.contains("Quitting the program. Goodbye!"));
    }

    #[test]
    fn rejected_input_mutates_nothing() {
        let conn = open_in_memory_store().unwrap();
        seed_inventory(&conn).unwrap();
        let books_before = fetch_all_books(&conn).unwrap();
        let authors_before = fetch_all_authors(&conn).unwrap();

        // Every entry is rejected, then the input runs dry mid-flow, which
        // surfaces as a fault before any write happens.
        let mut session = Session::new(conn, Cursor::new(b"1\n-5\nabc\n0\n".to_vec()), Vec::new())
            .with_legacy_rewrite(false);
        assert!(session.run().is_err());

        assert_eq!(fetch_all_books(&session.conn).unwrap(), books_before);
        assert_eq!(fetch_all_authors(&session.conn).unwrap(), authors_before);
    }
}
