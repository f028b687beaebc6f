//! Where interactions and feedback end up: SQLite for the HTTP front end,
//! a JSON file plus in-memory session history for the interactive one.

pub mod feedback_file;
pub mod session;
pub mod sqlite;

pub use feedback_file::FeedbackFile;
pub use session::{SessionEntry, SessionHistory};
pub use sqlite::SqliteStore;
