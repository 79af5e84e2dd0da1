//! Pagination Request Model
//!
//! Normalized description of page/per-page/fields/sort/filters parsed from
//! untrusted query-string input. Parsing is permissive: a malformed or
//! malicious parameter degrades to a dropped clause or a
//! default value, never an error, so a bad query string can at most narrow
//! functionality for that request.

use serde::Serialize;
use url::form_urlencoded;

// == Defaults ==
/// Page number used when the request carries none or an invalid one.
pub const DEFAULT_PAGE: u32 = 1;

/// Page size used when the request carries none or an invalid one.
pub const DEFAULT_PER_PAGE: u32 = 10;

// == Reserved Parameter Names ==
const PAGE_PARAM: &str = "page";
const PER_PAGE_PARAM: &str = "per_page";
const SORT_PARAM: &str = "sort";
const FIELDS_PARAM: &str = "fields";

// == Filter Condition ==
/// Comparison operator carried by a filter clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
    In,
    Between,
    Like,
}

impl Condition {
    /// Parses a condition token as it appears in a query string.
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "eq" => Some(Self::Eq),
            "neq" => Some(Self::Neq),
            "gt" => Some(Self::Gt),
            "gte" => Some(Self::Gte),
            "lt" => Some(Self::Lt),
            "lte" => Some(Self::Lte),
            "in" => Some(Self::In),
            "between" => Some(Self::Between),
            "like" => Some(Self::Like),
            _ => None,
        }
    }
}

// == Sort Order ==
/// Direction of one sort entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    /// Parses a direction token as it appears in a query string.
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }

    /// SQL keyword for this direction.
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

// == Filter ==
/// One filter clause: logical key, raw value and comparison operator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Filter {
    pub key: String,
    pub value: String,
    pub condition: Condition,
}

// == Sort ==
/// One sort entry in request order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sort {
    pub field: String,
    pub order: SortOrder,
}

// == Pagination ==
/// Normalized, validated list-query description.
///
/// Constructed once per request from raw input, mutated only by
/// [`set_total_items`](Self::set_total_items) after a count query runs.
#[derive(Debug, Clone, Serialize)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
    /// Requested projection; empty means all fields
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sort: Vec<Sort>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<Filter>,
    pub total_items: i64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
            fields: Vec::new(),
            sort: Vec::new(),
            filters: Vec::new(),
            total_items: 0,
        }
    }
}

impl Pagination {
    // == Parser ==
    /// Parses a raw query string, e.g. `page=2&sort=age&sort=asc&name=smith`.
    ///
    /// Never fails: unparseable page/per_page values fall back to the
    /// defaults, and any parameter name or value containing a space or a
    /// semicolon is dropped outright as defense in depth, even though the
    /// builders never interpolate values unescaped.
    pub fn from_query(query: &str) -> Self {
        let pairs = form_urlencoded::parse(query.as_bytes())
            .map(|(name, value)| (name.into_owned(), value.into_owned()));
        Self::from_pairs(pairs)
    }

    /// Parses pre-decoded parameters, walking them in arrival order.
    ///
    /// Multi-valued parameters are read in that order: a `sort` value that
    /// is a direction token applies retroactively to the preceding sort
    /// field, and a filter value that is a condition token applies to the
    /// most recent filter for that key. Tokens with nothing to apply to
    /// are dropped.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut pagination = Self::default();

        for (name, value) in pairs {
            if has_forbidden_chars(&name) || has_forbidden_chars(&value) {
                continue;
            }

            match name.as_str() {
                PAGE_PARAM => {
                    if let Ok(page) = value.parse::<u32>() {
                        if page > 0 {
                            pagination.page = page;
                        }
                    }
                }
                PER_PAGE_PARAM => {
                    if let Ok(per_page) = value.parse::<u32>() {
                        if per_page > 0 {
                            pagination.per_page = per_page;
                        }
                    }
                }
                FIELDS_PARAM => {
                    pagination.fields = value
                        .split(',')
                        .filter(|field| !field.is_empty())
                        .map(str::to_string)
                        .collect();
                }
                SORT_PARAM => {
                    if let Some(order) = SortOrder::parse(&value) {
                        if let Some(last) = pagination.sort.last_mut() {
                            last.order = order;
                        }
                    } else {
                        pagination.sort.push(Sort {
                            field: value,
                            order: SortOrder::Desc,
                        });
                    }
                }
                _ => {
                    if let Some(condition) = Condition::parse(&value) {
                        if let Some(last) = pagination
                            .filters
                            .iter_mut()
                            .rev()
                            .find(|filter| filter.key == name)
                        {
                            last.condition = condition;
                        }
                    } else {
                        pagination.filters.push(Filter {
                            key: name,
                            value,
                            condition: Condition::Eq,
                        });
                    }
                }
            }
        }

        pagination
    }

    // == Total Items ==
    /// Records the result of the companion count query.
    pub fn set_total_items(&mut self, total_items: i64) {
        self.total_items = total_items;
    }

    // == Offset ==
    /// Row offset of the current page.
    ///
    /// Saturates instead of wrapping, so extreme page/per_page values
    /// degrade to an out-of-range offset rather than a panic. A page of
    /// zero behaves like page one.
    pub fn offset(&self) -> i64 {
        let offset = u64::from(self.page.saturating_sub(1)) * u64::from(self.per_page);
        i64::try_from(offset).unwrap_or(i64::MAX)
    }
}

fn has_forbidden_chars(s: &str) -> bool {
    s.contains(' ') || s.contains(';')
}

// == Paginated Response ==
/// List items together with the pagination echo.
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Paginated<T> {
    /// Bundles query results with the pagination that produced them.
    pub fn new(items: Vec<T>, mut pagination: Pagination, total_items: i64) -> Self {
        pagination.set_total_items(total_items);
        Self { items, pagination }
    }
}
