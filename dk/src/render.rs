//! Terminal and JSON rendering shared by the `dk` commands and the shell

use colored::Colorize;
use serde_json::{Value, json};

use crate::catalog::Category;
use crate::dispatch::SearchTarget;
use crate::substitute::ResolvedQuery;

/// One-line category summary: `icon id  name`
pub fn category_line(category: &Category) -> String {
    format!("{} {:18} {}", category.icon, category.id.yellow(), category.name)
}

pub fn category_json(category: &Category) -> Value {
    json!({
        "id": category.id,
        "name": category.name,
        "source-id": category.source_id,
        "requires-input": category.requires_input,
        "prompt": category.prompt,
    })
}

/// Heading printed above a category's queries
pub fn category_heading(category: &Category, shown: usize, total: usize) -> String {
    let count = if shown == total {
        format!("({})", total)
    } else {
        format!("({} of {})", shown, total)
    };
    format!("{} {} {}", category.icon, category.name.bright_cyan().bold(), count.dimmed())
}

/// Numbered query block; with a target, the search URL (or why there is none) follows
pub fn query_block(index: usize, query: &ResolvedQuery, target: Option<&SearchTarget>) -> String {
    let mut out = format!(
        "{:>3}. {}\n     {}\n     {}",
        index + 1,
        query.label.bold(),
        query.query.green(),
        query.description.dimmed()
    );
    if let Some(target) = target {
        let line = match target.url_for(&query.query) {
            Ok(url) => url.blue().underline().to_string(),
            Err(e) => format!("({})", e).yellow().to_string(),
        };
        out.push_str("\n     ");
        out.push_str(&line);
    }
    out
}

/// JSON document for one category's resolved queries
pub fn queries_json(category: &Category, subject: &str, queries: &[ResolvedQuery], target: Option<&SearchTarget>) -> Value {
    let items: Vec<Value> = queries
        .iter()
        .map(|q| {
            let mut item = json!({
                "label": q.label,
                "query": q.query,
                "description": q.description,
            });
            if let Some(url) = target.and_then(|t| t.url_for(&q.query).ok()) {
                item["url"] = Value::String(url);
            }
            item
        })
        .collect();

    json!({
        "category": category.id,
        "subject": subject.trim(),
        "queries": items,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    fn websites() -> &'static Category {
        Catalog::builtin().get("websites").unwrap()
    }

    fn rq(query: &str) -> ResolvedQuery {
        ResolvedQuery {
            label: "Exposed index".to_string(),
            query: query.to_string(),
            description: "Open listings".to_string(),
        }
    }

    #[test]
    fn test_query_block_with_url() {
        colored::control::set_override(false);
        let block = query_block(0, &rq("site:example.com"), Some(&SearchTarget::default()));
        assert_eq!(
            block,
            "  1. Exposed index\n     site:example.com\n     Open listings\n     https://www.google.com/search?q=site%3Aexample.com"
        );
    }

    #[test]
    fn test_query_block_reports_unresolved() {
        colored::control::set_override(false);
        let block = query_block(4, &rq("site:{input}"), Some(&SearchTarget::default()));
        assert!(block.starts_with("  5. Exposed index"));
        assert!(block.contains("placeholder"));
    }

    #[test]
    fn test_queries_json() {
        let doc = queries_json(
            websites(),
            " example.com ",
            &[rq("site:example.com"), rq("site:{input}")],
            Some(&SearchTarget::default()),
        );
        assert_eq!(doc["category"], "websites");
        assert_eq!(doc["subject"], "example.com");
        assert_eq!(doc["queries"][0]["url"], "https://www.google.com/search?q=site%3Aexample.com");
        assert!(doc["queries"][1].get("url").is_none());
    }

    #[test]
    fn test_category_json() {
        let doc = category_json(websites());
        assert_eq!(doc["source-id"], "websites.json");
        assert_eq!(doc["requires-input"], true);
    }
}
