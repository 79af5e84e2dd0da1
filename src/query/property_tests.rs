//! Property-Based Tests for the Query Module
//!
//! Uses proptest to verify structural safety properties of the parser and
//! builders.

use proptest::prelude::*;

use crate::query::{build_count_query, build_query, FieldWhitelist, Pagination};

// == Strategies ==
/// Generates logical keys, some of which fall outside the whitelist.
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-z_]{1,12}"
}

/// Generates filter values, including condition tokens and comma lists.
fn value_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z0-9.,-]{1,24}",
        Just("in".to_string()),
        Just("between".to_string()),
        Just("like".to_string()),
        Just("gte".to_string()),
    ]
}

fn pairs_strategy() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::vec((key_strategy(), value_strategy()), 0..24)
}

fn whitelist() -> FieldWhitelist {
    [("id", "id"), ("name", "name"), ("age", "age")]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // The parser never fails, whatever the raw query string looks like,
    // and the offset it yields is always a valid non-negative row count.
    #[test]
    fn prop_parser_total(query in ".{0,128}") {
        let pagination = Pagination::from_query(&query);
        prop_assert!(pagination.page >= 1);
        prop_assert!(pagination.per_page >= 1);
        prop_assert!(pagination.offset() >= 0);
    }

    // Every `?` placeholder in the data query has exactly one bound
    // parameter, and vice versa.
    #[test]
    fn prop_placeholders_match_params(pairs in pairs_strategy()) {
        let pagination = Pagination::from_pairs(pairs);
        let (query, params) = build_query("users", &pagination, &whitelist());

        let placeholders = query.matches('?').count();
        prop_assert_eq!(placeholders, params.len(), "query: {}", query);
    }

    // The count query always shares the data query's WHERE clause and its
    // parameters, so both run over the same predicate.
    #[test]
    fn prop_count_query_shares_predicate(pairs in pairs_strategy()) {
        let pagination = Pagination::from_pairs(pairs);
        let wl = whitelist();

        let (query, params) = build_query("users", &pagination, &wl);
        let (count_query, count_params) = build_count_query("users", &pagination, &wl);

        match query.split(" WHERE ").nth(1) {
            Some(rest) => {
                let where_clause = rest
                    .split(" ORDER BY ")
                    .next()
                    .and_then(|r| r.split(" LIMIT").next())
                    .unwrap();
                let expected_suffix = format!("WHERE {}", where_clause);
                prop_assert!(count_query.ends_with(&expected_suffix));
                // Data-query params are the predicate params plus LIMIT/OFFSET.
                prop_assert_eq!(&params[..params.len() - 2], &count_params[..]);
            }
            None => {
                prop_assert_eq!(count_query, "SELECT count(1) FROM users");
                prop_assert!(count_params.is_empty());
            }
        }
    }

    // Identifiers in the generated SQL only ever come from the whitelist:
    // a key outside it never shows up in the query text.
    #[test]
    fn prop_unknown_keys_never_reach_sql(value in "[a-zA-Z0-9]{1,16}") {
        let pagination = Pagination::from_pairs([
            ("secret_column".to_string(), value),
        ]);
        let (query, _) = build_query("users", &pagination, &whitelist());

        prop_assert!(!query.contains("secret_column"));
        prop_assert!(!query.contains("WHERE"));
    }
}
