//! Relational Query Builder
//!
//! Turns a pagination request plus a field whitelist into a parameterized
//! SELECT and a matching row-count query. Identifiers only ever come from
//! the whitelist; every value is bound as a parameter, so client input
//! never reaches the SQL text.

use std::fmt;

use crate::query::{Condition, Filter, FieldWhitelist, Pagination, Sort};

// == Sql Value ==
/// A value bound to one `?` placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Text(String),
    Int(i64),
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Text(s) => write!(f, "{s}"),
            SqlValue::Int(i) => write!(f, "{i}"),
        }
    }
}

// == Build Query ==
/// Builds the paginated data query and its bound parameters.
///
/// Filters and sort entries whose key is absent from the whitelist are
/// silently dropped, never forwarded. The output is deterministic for
/// identical inputs: clauses follow the request order.
///
/// Dropping applies to the projection too, with one caveat: when every
/// requested field is unknown the projection degrades to `SELECT *`, so
/// unlike a dropped filter this widens the result instead of narrowing
/// it. Callers that must not expose extra columns should validate
/// `fields` against the whitelist up front.
pub fn build_query(
    table: &str,
    pagination: &Pagination,
    whitelist: &FieldWhitelist,
) -> (String, Vec<SqlValue>) {
    let mut query = select_clause(table, &pagination.fields, whitelist);
    let mut params = Vec::new();

    let (where_sql, mut where_params) = where_clause(&pagination.filters, whitelist);
    if !where_sql.is_empty() {
        query.push(' ');
        query.push_str(&where_sql);
        params.append(&mut where_params);
    }

    let order_by = order_by_clause(&pagination.sort, whitelist);
    if !order_by.is_empty() {
        query.push(' ');
        query.push_str(&order_by);
    }

    query.push_str(" LIMIT ? OFFSET ?");
    params.push(SqlValue::Int(i64::from(pagination.per_page)));
    params.push(SqlValue::Int(pagination.offset()));

    (query, params)
}

// == Build Count Query ==
/// Builds the total-count query over the same filter predicate as
/// [`build_query`], without LIMIT/OFFSET/ORDER BY.
pub fn build_count_query(
    table: &str,
    pagination: &Pagination,
    whitelist: &FieldWhitelist,
) -> (String, Vec<SqlValue>) {
    let (where_sql, params) = where_clause(&pagination.filters, whitelist);

    let mut query = format!("SELECT count(1) FROM {table}");
    if !where_sql.is_empty() {
        query.push(' ');
        query.push_str(&where_sql);
    }

    (query, params)
}

// == Clause Construction ==

fn select_clause(table: &str, fields: &[String], whitelist: &FieldWhitelist) -> String {
    let columns: Vec<&str> = fields
        .iter()
        .filter_map(|field| whitelist.get(field).map(String::as_str))
        .collect();

    if columns.is_empty() {
        format!("SELECT * FROM {table}")
    } else {
        format!("SELECT {} FROM {table}", columns.join(","))
    }
}

fn where_clause(filters: &[Filter], whitelist: &FieldWhitelist) -> (String, Vec<SqlValue>) {
    let mut predicates: Vec<String> = Vec::new();
    let mut params: Vec<SqlValue> = Vec::new();

    for filter in filters {
        let Some(column) = whitelist.get(&filter.key) else {
            continue;
        };

        match filter.condition {
            Condition::Between => {
                let bounds: Vec<&str> = filter.value.split(',').collect();
                if bounds.len() != 2 {
                    continue;
                }
                predicates.push(format!("{column} BETWEEN ? AND ?"));
                params.push(SqlValue::Text(bounds[0].to_string()));
                params.push(SqlValue::Text(bounds[1].to_string()));
            }
            Condition::In => {
                let values: Vec<&str> = filter.value.split(',').collect();
                if values.len() < 2 {
                    continue;
                }
                let placeholders = vec!["?"; values.len()].join(",");
                predicates.push(format!("{column} IN ({placeholders})"));
                params.extend(values.into_iter().map(|v| SqlValue::Text(v.to_string())));
            }
            condition => {
                // A comma in a scalar value marks a malformed clause.
                if filter.value.contains(',') {
                    continue;
                }
                predicates.push(format!("{column} {} ?", operator_sql(condition)));
                params.push(SqlValue::Text(filter.value.clone()));
            }
        }
    }

    if predicates.is_empty() {
        return (String::new(), Vec::new());
    }
    (format!("WHERE {}", predicates.join(" AND ")), params)
}

fn order_by_clause(sort: &[Sort], whitelist: &FieldWhitelist) -> String {
    let pairs: Vec<String> = sort
        .iter()
        .filter_map(|entry| {
            whitelist
                .get(&entry.field)
                .map(|column| format!("{column} {}", entry.order.as_sql()))
        })
        .collect();

    if pairs.is_empty() {
        String::new()
    } else {
        format!("ORDER BY {}", pairs.join(", "))
    }
}

fn operator_sql(condition: Condition) -> &'static str {
    match condition {
        Condition::Eq => "=",
        Condition::Neq => "<>",
        Condition::Gt => ">",
        Condition::Gte => ">=",
        Condition::Lt => "<",
        Condition::Lte => "<=",
        Condition::Like => "LIKE",
        Condition::In => "IN",
        Condition::Between => "BETWEEN",
    }
}
