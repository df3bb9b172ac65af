//! Result filter
//!
//! Narrows a resolved query list to the entries whose label, description or
//! query contains a keyword, ignoring case.

use tracing::debug;

use crate::substitute::ResolvedQuery;

/// Whether a resolved query matches an already case-folded keyword
fn matches_folded(query: &ResolvedQuery, folded: &str) -> bool {
    query.label.to_lowercase().contains(folded)
        || query.description.to_lowercase().contains(folded)
        || query.query.to_lowercase().contains(folded)
}

/// Whether a resolved query matches a keyword (case-insensitive)
pub fn matches(query: &ResolvedQuery, keyword: &str) -> bool {
    keyword.is_empty() || matches_folded(query, &keyword.to_lowercase())
}

/// Keep the queries matching `keyword`, preserving order
///
/// An empty keyword keeps everything.
pub fn filter(queries: &[ResolvedQuery], keyword: &str) -> Vec<ResolvedQuery> {
    debug!(count = queries.len(), %keyword, "filter: called");
    if keyword.is_empty() {
        return queries.to_vec();
    }

    let folded = keyword.to_lowercase();
    queries.iter().filter(|q| matches_folded(q, &folded)).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn rq(label: &str, query: &str, description: &str) -> ResolvedQuery {
        ResolvedQuery {
            label: label.to_string(),
            query: query.to_string(),
            description: description.to_string(),
        }
    }

    fn sample() -> Vec<ResolvedQuery> {
        vec![
            rq("PDF documents", "site:example.com filetype:pdf", "PDF files hosted on the site"),
            rq("Login pages", "site:example.com intitle:login", "Login forms"),
            rq("Log files", "site:example.com ext:log", "Application and server logs"),
            rq("Spreadsheets", "site:example.com filetype:xls", "Spreadsheets and CSV exports"),
        ]
    }

    #[test]
    fn test_empty_keyword_is_identity() {
        assert_eq!(filter(&sample(), ""), sample());
    }

    #[test]
    fn test_matches_label_case_insensitive() {
        let result = filter(&sample(), "LOGIN");
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].label, "Login pages");
    }

    #[test]
    fn test_matches_description() {
        let result = filter(&sample(), "csv");
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].label, "Spreadsheets");
    }

    #[test]
    fn test_matches_query_text() {
        let result = filter(&sample(), "FILETYPE:");
        let labels: Vec<_> = result.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["PDF documents", "Spreadsheets"]);
    }

    #[test]
    fn test_preserves_order() {
        let result = filter(&sample(), "log");
        let labels: Vec<_> = result.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["Login pages", "Log files"]);
    }

    #[test]
    fn test_no_match() {
        assert!(filter(&sample(), "vulnerab").is_empty());
    }

    #[test]
    fn test_matches_single() {
        let q = rq("Exposed index", r#"intitle:"index of""#, "Open listings");
        assert!(matches(&q, ""));
        assert!(matches(&q, "INDEX"));
        assert!(!matches(&q, "admin"));
    }

    fn resolved_strategy() -> impl Strategy<Value = ResolvedQuery> {
        ("[a-cA-C ]{0,8}", "[a-cA-C:]{0,8}", "[a-cA-C ]{0,8}").prop_map(|(l, q, d)| rq(&l, &q, &d))
    }

    proptest! {
        #[test]
        fn prop_result_is_ordered_subsequence(
            queries in prop::collection::vec(resolved_strategy(), 0..10),
            keyword in "[a-cA-C]{0,3}",
        ) {
            let result = filter(&queries, &keyword);
            let mut it = queries.iter();
            for r in &result {
                prop_assert!(it.any(|q| q == r));
            }
        }

        #[test]
        fn prop_longer_keyword_narrows(
            queries in prop::collection::vec(resolved_strategy(), 0..10),
            prefix in "[a-cA-C]{0,2}",
            k1 in "[a-cA-C]{0,2}",
            suffix in "[a-cA-C]{0,2}",
        ) {
            let k2 = format!("{}{}{}", prefix, k1, suffix);
            let wide = filter(&queries, &k1);
            let narrow = filter(&queries, &k2);
            for r in &narrow {
                prop_assert!(wide.contains(r));
            }
        }
    }
}
