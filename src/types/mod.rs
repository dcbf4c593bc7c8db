// Dishbook shared type definitions
// Each submodule defines types used across the library.

pub mod dish;
pub mod errors;
pub mod favorite;
pub mod history;
pub mod ingredient;
pub mod settings;
