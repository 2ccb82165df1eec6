//! In-process storage.
//!
//! When no data service is configured, project descriptions live only in the
//! [`ContextStore`], which is created at startup and handed to every handler.

mod context_store;

pub use context_store::ContextStore;
