//! Dishbook: resolves dishes from a bundled dataset or a remote catalog,
//! enriches remote ingredients with nutrition and allergen facts, and keeps
//! persisted favorites and recently-viewed history.
//!
//! This library crate exposes all modules for use by the binary and integration tests.

pub mod app;
pub mod database;
pub mod platform;
pub mod rpc_handler;
pub mod services;
pub mod stores;
pub mod types;
