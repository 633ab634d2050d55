//! Schema store
//!
//! Holds the single live schema tree of an editing session, applies
//! add/edit/delete/seed operations to it, and notifies subscribed listeners
//! with a fresh copy after every change.

mod navigate;
mod schema_store;
mod subscription;

pub use schema_store::SchemaStore;
pub use subscription::{Listener, ListenerRegistry, Subscription};
