//! Binary entry point that glues the SQLite-backed inventory to the terminal
//! menu: bring up the database, seed the starter stock, and drive the prompt
//! loop until the operator exits.
use std::io;

use shelf_track::{open_default_store, seed_inventory, Session};

/// Initialize persistence, seed the inventory, and run the menu loop.
///
/// Returning a `Result` bubbles up fatal problems (an unreadable data
/// directory, a storage fault mid-operation) to the terminal with context
/// instead of crashing silently; validation failures never reach here.
fn main() -> anyhow::Result<()> {
    env_logger::init();

    let conn = open_default_store()?;
    seed_inventory(&conn)?;

    let stdin = io::stdin();
    let mut session = Session::new(conn, stdin.lock(), io::stdout());
    session.run()
}
