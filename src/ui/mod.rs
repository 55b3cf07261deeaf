//! Terminal front-end split across logical submodules: line prompting with
//! per-field validation, and the menu session that drives the flows.

pub mod prompt;
mod session;

pub use prompt::InputError;
pub use session::Session;
