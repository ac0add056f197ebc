use crate::crawler::PageRecord;
use crate::report::StructuredDataSummary;
use serde_json::Value;
use std::collections::BTreeSet;

/// Counts pages with JSON-LD and collects every `@type` they declare
///
/// `@type` may be a string or an array of strings; nodes nested under
/// `@graph` are visited as well.
pub fn summarize_structured_data(pages: &[PageRecord]) -> StructuredDataSummary {
    let mut types = BTreeSet::new();
    let mut pages_with_structured_data = 0;

    for page in pages {
        if page.structured_data.is_empty() {
            continue;
        }
        pages_with_structured_data += 1;
        for block in &page.structured_data {
            collect_types(block, &mut types);
        }
    }

    StructuredDataSummary {
        pages_with_structured_data,
        types: types.into_iter().collect(),
    }
}

fn collect_types(value: &Value, types: &mut BTreeSet<String>) {
    match value {
        Value::Array(items) => {
            for item in items {
                collect_types(item, types);
            }
        }
        Value::Object(object) => {
            match object.get("@type") {
                Some(Value::String(t)) => {
                    types.insert(t.clone());
                }
                Some(Value::Array(list)) => {
                    types.extend(list.iter().filter_map(Value::as_str).map(str::to_string));
                }
                _ => {}
            }
            if let Some(graph) = object.get("@graph") {
                collect_types(graph, types);
            }
        }
        _ => {}
    }
}
