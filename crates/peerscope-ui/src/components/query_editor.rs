//! DQL editor with results view.

use dioxus::prelude::*;
use peerscope_core::{QueryExecutionResult, QueryPhase};
use serde_json::Value;

use crate::components::{Button, ButtonVariant, Notice, NoticeKind};
use crate::hooks::use_query_execution;

/// Heading for a result, e.g. "3 documents" or "1 document mutated".
pub fn result_summary(result: &QueryExecutionResult) -> String {
    let count = result.total_count();
    let noun = if count == 1 { "document" } else { "documents" };
    if result.is_mutating() {
        format!("{} {} mutated", count, noun)
    } else {
        format!("{} {}", count, noun)
    }
}

/// Pretty-printed JSON for each result item.
pub fn format_items(items: &[Value]) -> Vec<String> {
    items
        .iter()
        .map(|item| serde_json::to_string_pretty(item).unwrap_or_else(|_| item.to_string()))
        .collect()
}

#[component]
pub fn QueryEditor() -> Element {
    let query = use_query_execution();
    let mut text = use_signal(String::new);

    let pipeline = query.pipeline.read();
    let export = query.export.read();
    let can_execute = pipeline.can_execute(&text.read());
    let executing = pipeline.phase() == QueryPhase::Executing;

    rsx! {
        div { class: "query-editor",
            textarea {
                class: "query-input",
                placeholder: "SELECT * FROM collection",
                spellcheck: false,
                value: "{text}",
                oninput: move |evt| text.set(evt.value()),
            }

            div { class: "query-actions",
                Button {
                    busy: executing,
                    disabled: !can_execute,
                    onclick: move |_| query.execute.call(text.peek().clone()),
                    "Execute"
                }
                Button {
                    variant: ButtonVariant::Ghost,
                    disabled: executing,
                    onclick: move |_| query.clear.call(()),
                    "Clear"
                }
                Button {
                    variant: ButtonVariant::Ghost,
                    busy: export.is_exporting,
                    disabled: pipeline.results().is_none(),
                    onclick: move |_| query.export_results.call(()),
                    "Export Results"
                }
            }

            if let Some(error) = pipeline.error() {
                Notice { kind: NoticeKind::Error, message: error.to_string() }
            }
            if let Some(error) = export.error.clone() {
                Notice { kind: NoticeKind::Error, message: error }
            }
            if let Some(warning) = export.warning.clone() {
                Notice { kind: NoticeKind::Warning, message: warning }
            }

            if let Some(result) = pipeline.results() {
                QueryResults { result: result.clone() }
            }
        }
    }
}

#[component]
fn QueryResults(result: QueryExecutionResult) -> Element {
    let summary = result_summary(&result);

    rsx! {
        div { class: "query-results",
            h4 { class: "query-results-summary", "{summary}" }
            match result {
                QueryExecutionResult::Read { items, .. } => rsx! {
                    if items.is_empty() {
                        p { class: "empty-state", "No documents" }
                    }
                    for (i, doc) in format_items(&items).into_iter().enumerate() {
                        pre { key: "{i}", class: "query-document", "{doc}" }
                    }
                },
                QueryExecutionResult::Mutation { mutated_document_ids, commit_id, .. } => rsx! {
                    if let Some(commit) = commit_id {
                        p { class: "query-commit", "Commit {commit}" }
                    }
                    ul { class: "query-mutated-ids",
                        for (i, id) in mutated_document_ids.iter().enumerate() {
                            li { key: "{i}", "{id}" }
                        }
                    }
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn summary_for_reads_and_mutations() {
        let read = QueryExecutionResult::Read {
            items: vec![json!({ "_id": "a" })],
            total_count: 1,
        };
        assert_eq!(result_summary(&read), "1 document");

        let mutation = QueryExecutionResult::Mutation {
            mutated_document_ids: vec![json!("a"), json!("b")],
            commit_id: Some("7".into()),
            total_count: 2,
        };
        assert_eq!(result_summary(&mutation), "2 documents mutated");
    }

    #[test]
    fn items_render_parsed_values() {
        // A document whose JSON did not parse arrives as its raw value
        let items = vec![json!({ "_id": "a", "n": 1 }), json!("{truncated")];
        let docs = format_items(&items);

        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0], "{\n  \"_id\": \"a\",\n  \"n\": 1\n}");
        assert_eq!(docs[1], "\"{truncated\"");
        assert!(format_items(&[]).is_empty());
    }
}
