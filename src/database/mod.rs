//! Dishbook database layer.
//!
//! Provides SQLite connection management and schema migrations.
//!
//! # Usage
//!
//! ```no_run
//! use dishbook::database::Database;
//!
//! let db = Database::open("dishbook.db").expect("failed to open database");
//! let conn = db.connection().expect("connection lock");
//! ```

pub mod connection;
pub mod migrations;

pub use connection::Database;
