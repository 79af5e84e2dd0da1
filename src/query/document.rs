//! Document-Store Query Builder
//!
//! Translates a pagination request into a filter document, an ordered sort
//! specification and a projection, mirroring the relational builder's
//! semantics. Scalar values are opportunistically coerced to numeric or
//! timestamp types before matching, because document stores do not coerce
//! types the way SQL placeholders do.

use chrono::DateTime;
use serde_json::{json, Map, Value};

use crate::query::{Condition, FieldWhitelist, Filter, Pagination, Sort, SortOrder};

// == Document Query ==
/// Store-agnostic description of a paginated document query.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentQuery {
    /// Match document, e.g. `{"age": {"$gte": 30.0}}`
    pub filter: Value,
    /// Sort specification in request order: `1` ascending, `-1` descending
    pub sort: Vec<(String, i32)>,
    /// Included fields; empty means all
    pub projection: Vec<String>,
    pub limit: i64,
    pub skip: i64,
}

// == Build Document Query ==
/// Builds the filter/sort/projection documents for a document store.
///
/// Follows the same whitelist and malformed-clause policy as the
/// relational builder; the sort specification is an explicitly ordered
/// sequence so the output is deterministic. As with the relational
/// builder, a projection whose entries are all unknown comes back empty,
/// which document stores read as "all fields".
pub fn build_document_query(pagination: &Pagination, whitelist: &FieldWhitelist) -> DocumentQuery {
    DocumentQuery {
        filter: filter_document(&pagination.filters, whitelist),
        sort: sort_spec(&pagination.sort, whitelist),
        projection: pagination
            .fields
            .iter()
            .filter_map(|field| whitelist.get(field).cloned())
            .collect(),
        limit: i64::from(pagination.per_page),
        skip: pagination.offset(),
    }
}

// == Filter Document ==

fn filter_document(filters: &[Filter], whitelist: &FieldWhitelist) -> Value {
    let mut doc = Map::new();

    for filter in filters {
        let Some(field) = whitelist.get(&filter.key) else {
            continue;
        };

        let condition_doc = match filter.condition {
            Condition::Like => json!({ "$regex": filter.value, "$options": "i" }),
            Condition::In => {
                let values: Vec<&str> = filter.value.split(',').collect();
                if values.len() < 2 {
                    continue;
                }
                let coerced: Vec<Value> = values.into_iter().map(coerce).collect();
                json!({ "$in": coerced })
            }
            Condition::Between => {
                let bounds: Vec<&str> = filter.value.split(',').collect();
                if bounds.len() != 2 {
                    continue;
                }
                json!({ "$gte": coerce(bounds[0]), "$lte": coerce(bounds[1]) })
            }
            condition => {
                if filter.value.contains(',') {
                    continue;
                }
                json!({ (comparison_operator(condition)): coerce(&filter.value) })
            }
        };

        merge_field(&mut doc, field, condition_doc);
    }

    Value::Object(doc)
}

/// Merges a new condition object into the field's existing one, so
/// `age=18&age=gte&age=30&age=lte` matches both bounds instead of the
/// last one winning.
fn merge_field(doc: &mut Map<String, Value>, field: &str, condition: Value) {
    if let (Some(Value::Object(existing)), Value::Object(incoming)) =
        (doc.get_mut(field), &condition)
    {
        existing.extend(incoming.clone());
        return;
    }
    doc.insert(field.to_string(), condition);
}

fn comparison_operator(condition: Condition) -> &'static str {
    match condition {
        Condition::Neq => "$ne",
        Condition::Gt => "$gt",
        Condition::Gte => "$gte",
        Condition::Lt => "$lt",
        Condition::Lte => "$lte",
        // eq; the compound conditions are handled by the caller
        _ => "$eq",
    }
}

// == Sort Specification ==

fn sort_spec(sort: &[Sort], whitelist: &FieldWhitelist) -> Vec<(String, i32)> {
    sort.iter()
        .filter_map(|entry| {
            whitelist.get(&entry.field).map(|field| {
                let direction = match entry.order {
                    SortOrder::Asc => 1,
                    SortOrder::Desc => -1,
                };
                (field.clone(), direction)
            })
        })
        .collect()
}

// == Value Coercion ==

/// Opportunistically types a raw string: number first, then RFC3339
/// timestamp, else plain text.
fn coerce(raw: &str) -> Value {
    if let Ok(number) = raw.parse::<f64>() {
        if number.is_finite() {
            return json!(number);
        }
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return json!({ "$date": timestamp.to_rfc3339() });
    }
    Value::String(raw.to_string())
}
