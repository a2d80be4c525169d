//! Backend-independent query primitives.
//!
//! Search predicates and page windows are built once here and handed to the
//! store facade unchanged, so every read that shares a predicate shares its
//! semantics.

pub mod filter;
pub mod pagination;

pub use filter::{CustomerFilter, InvoiceFilter, LIKE_ESCAPE};
pub use pagination::{page_count, PageWindow, ITEMS_PER_PAGE};
