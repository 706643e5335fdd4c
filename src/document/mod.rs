//! Hypermedia document module
//!
//! Models one API response (a page envelope of primary resources plus
//! side-loaded `included` resources) and resolves relationship references
//! against a per-page index.
//!
//! # Overview
//!
//! Resources never hold pointers to each other. Every traversal goes through
//! [`IncludedIndex`], keyed by `(type, id)`, so cyclic graphs (a sale pointing
//! at a customer whose history points back at sales) cannot loop. A reference
//! that is missing from the index resolves to `None`; callers pick the default.

mod index;
mod types;

pub use index::IncludedIndex;
pub use types::{coerce_amount, value_text, Page, Reference, Relationship, Resource};
