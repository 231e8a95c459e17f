//! Core types for the team newsdesk
//!
//! This crate defines the shared data structures used across the newsdesk,
//! including normalized news entries, the aggregated collection, and the
//! workspace-wide error type.

pub mod error;
pub mod news;

pub use error::{NewsdeskError, NewsdeskResult};
pub use news::{NewsCollection, NewsEntry, SortOrder, sentinel};
