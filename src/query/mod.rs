//! Query Module
//!
//! Pagination request parsing and injection-safe list-query builders for
//! relational and document stores.

mod document;
mod paginate;
mod sql;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use document::{build_document_query, DocumentQuery};
pub use paginate::{
    Condition, Filter, Paginated, Pagination, Sort, SortOrder, DEFAULT_PAGE, DEFAULT_PER_PAGE,
};
pub use sql::{build_count_query, build_query, SqlValue};

use std::collections::HashMap;

// == Field Whitelist ==
/// Mapping from logical filter/sort key to physical column/field name.
///
/// Supplied by the repository layer, never derived from request input.
/// This mapping is the sole injection defense for identifiers: values are
/// always bound as parameters, and only names found here are ever
/// concatenated into query text.
pub type FieldWhitelist = HashMap<String, String>;
