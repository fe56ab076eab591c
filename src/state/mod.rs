/// State management module
///
/// This module handles all application state, including:
/// - The durable key-value slot backed by SQLite (library.rs)
/// - Shared data structures (data.rs)
/// - The catalog store, single source of truth for films (catalog.rs)
/// - Filtering, search and sort of the view list (query.rs)
/// - Ephemeral browsing state of the UI (session.rs)

pub mod catalog;
pub mod data;
pub mod library;
pub mod query;
pub mod session;
