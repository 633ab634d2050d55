//! schema-builder - An in-memory schema editing engine
//!
//! A nested schema (string, integer, boolean, object, array) is held by a
//! single [`store::SchemaStore`] and edited through path-addressed
//! add/edit/delete operations. Every successful mutation is published to
//! subscribers as an independent copy of the tree.

pub mod cli;
pub mod form;
pub mod observability;
pub mod schema;
pub mod store;
