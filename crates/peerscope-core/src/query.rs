//! DQL query execution
//!
//! ```text
//! Idle ──execute──► Executing ──┬──► Succeeded(Read)
//!   ▲                           ├──► Succeeded(Mutation)
//!   └───────── clear ◄──────────┴──► Failed
//! ```
//!
//! [`QueryPipeline`] holds the state a query screen renders. The async work
//! lives in [`run_query`] so UI code can flip the pipeline into `Executing`,
//! await the store without holding a borrow, and hand the outcome back with
//! [`QueryPipeline::finish`].

use serde_json::{json, Value};

use crate::error::{ToolsError, ToolsResult};
use crate::instance::Store;

/// Outcome of a successful statement.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryExecutionResult {
    /// SELECT-style statement
    Read { items: Vec<Value>, total_count: usize },
    /// INSERT/UPDATE/DELETE-style statement
    Mutation {
        mutated_document_ids: Vec<Value>,
        commit_id: Option<String>,
        total_count: usize,
    },
}

impl QueryExecutionResult {
    pub fn is_mutating(&self) -> bool {
        matches!(self, QueryExecutionResult::Mutation { .. })
    }

    pub fn total_count(&self) -> usize {
        match self {
            QueryExecutionResult::Read { total_count, .. }
            | QueryExecutionResult::Mutation { total_count, .. } => *total_count,
        }
    }

    /// Document layout written by the results export
    pub fn to_export_json(&self) -> Value {
        match self {
            QueryExecutionResult::Read { items, total_count } => json!({
                "type": "query",
                "totalCount": total_count,
                "items": items,
            }),
            QueryExecutionResult::Mutation {
                mutated_document_ids,
                commit_id,
                total_count,
            } => json!({
                "type": "mutation",
                "mutatedDocumentIDs": mutated_document_ids,
                "commitID": commit_id,
                "totalMutated": total_count,
            }),
        }
    }
}

/// Result plus the JSON strings read from the SDK, one per read item.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryOutput {
    pub result: QueryExecutionResult,
    pub json_cache: Vec<String>,
}

/// Execute `query` and materialize the result.
///
/// Each read item is parsed from its JSON string (falling back to the raw
/// value when that fails) and dematerialized straight away so large result
/// sets never hold SDK memory for more than one item at a time.
pub async fn run_query(store: &dyn Store, query: &str) -> ToolsResult<QueryOutput> {
    let mut result = store.execute(query).await?;

    if let Some(ids) = result.mutated_document_ids() {
        tracing::debug!(mutated = ids.len(), "Mutating statement executed");
        return Ok(QueryOutput {
            result: QueryExecutionResult::Mutation {
                total_count: ids.len(),
                commit_id: result.commit_id(),
                mutated_document_ids: ids,
            },
            json_cache: Vec::new(),
        });
    }

    let items = result.take_items();
    let mut processed = Vec::with_capacity(items.len());
    let mut json_cache = Vec::with_capacity(items.len());

    for (index, mut item) in items.into_iter().enumerate() {
        let json_string = item.json_string();
        let value = match serde_json::from_str::<Value>(&json_string) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::debug!(index, error = %e, "Item JSON did not parse, using raw value");
                item.value()
            }
        };

        if let Err(e) = item.dematerialize() {
            tracing::warn!(index, error = %e, "Failed to dematerialize item");
        }

        json_cache.push(json_string);
        processed.push(value);
    }

    tracing::debug!(items = processed.len(), "Read statement executed");
    Ok(QueryOutput {
        result: QueryExecutionResult::Read {
            total_count: processed.len(),
            items: processed,
        },
        json_cache,
    })
}

/// Coarse state for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryPhase {
    Idle,
    Executing,
    Succeeded,
    Failed,
}

/// State of one query editor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryPipeline {
    results: Option<QueryExecutionResult>,
    error: Option<String>,
    is_loading: bool,
    json_cache: Vec<String>,
}

impl QueryPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn results(&self) -> Option<&QueryExecutionResult> {
        self.results.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// JSON strings of the current read result
    pub fn cached_json(&self) -> &[String] {
        &self.json_cache
    }

    pub fn phase(&self) -> QueryPhase {
        if self.is_loading {
            QueryPhase::Executing
        } else if self.results.is_some() {
            QueryPhase::Succeeded
        } else if self.error.is_some() {
            QueryPhase::Failed
        } else {
            QueryPhase::Idle
        }
    }

    /// Whether the execute button should be enabled for `text`
    pub fn can_execute(&self, text: &str) -> bool {
        !self.is_loading && !text.trim().is_empty()
    }

    /// Enter `Executing` for `text`.
    ///
    /// Blank text records the empty-statement error and leaves results
    /// untouched. A second call while executing is rejected.
    pub fn begin(&mut self, text: &str) -> ToolsResult<()> {
        if text.trim().is_empty() {
            self.error = Some(ToolsError::EmptyStatement.to_string());
            return Err(ToolsError::EmptyStatement);
        }
        if self.is_loading {
            return Err(ToolsError::QueryInFlight);
        }
        self.is_loading = true;
        self.error = None;
        self.json_cache.clear();
        Ok(())
    }

    /// Leave `Executing` with the outcome of [`run_query`].
    pub fn finish(&mut self, outcome: ToolsResult<QueryOutput>) {
        self.is_loading = false;
        match outcome {
            Ok(output) => {
                self.results = Some(output.result);
                self.json_cache = output.json_cache;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Query failed");
                self.error = Some(e.to_string());
                self.results = None;
                self.json_cache.clear();
            }
        }
    }

    /// Back to `Idle`, dropping results, error and cached JSON
    pub fn clear_results(&mut self) {
        self.results = None;
        self.error = None;
        self.json_cache.clear();
    }

    /// `begin`, `run_query`, `finish` in one call.
    pub async fn execute_query(&mut self, store: &dyn Store, text: &str) -> ToolsResult<()> {
        self.begin(text)?;
        let outcome = run_query(store, text).await;
        let failed = outcome.as_ref().err().map(|e| ToolsError::Query(e.to_string()));
        self.finish(outcome);
        match failed {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_statement_keeps_results() {
        let mut pipeline = QueryPipeline::new();
        pipeline.finish(Ok(QueryOutput {
            result: QueryExecutionResult::Read {
                items: vec![json!({"_id": 1})],
                total_count: 1,
            },
            json_cache: vec!["{\"_id\":1}".into()],
        }));

        let err = pipeline.begin("   \n").unwrap_err();
        assert!(matches!(err, ToolsError::EmptyStatement));
        assert_eq!(pipeline.error(), Some("Please enter a valid DQL statement"));
        assert_eq!(pipeline.results().map(|r| r.total_count()), Some(1));
        assert!(!pipeline.is_loading());
    }

    #[test]
    fn test_reentrant_begin_rejected() {
        let mut pipeline = QueryPipeline::new();
        pipeline.begin("SELECT * FROM cars").unwrap();
        assert_eq!(pipeline.phase(), QueryPhase::Executing);
        assert!(!pipeline.can_execute("SELECT * FROM cars"));
        assert!(matches!(
            pipeline.begin("SELECT * FROM cars"),
            Err(ToolsError::QueryInFlight)
        ));
    }

    #[test]
    fn test_failure_discards_prior_results() {
        let mut pipeline = QueryPipeline::new();
        pipeline.finish(Ok(QueryOutput {
            result: QueryExecutionResult::Mutation {
                mutated_document_ids: vec![json!("a")],
                commit_id: None,
                total_count: 1,
            },
            json_cache: Vec::new(),
        }));
        pipeline.begin("DELETE FROM cars").unwrap();
        pipeline.finish(Err(ToolsError::Query("collection locked".into())));

        assert_eq!(pipeline.phase(), QueryPhase::Failed);
        assert!(pipeline.results().is_none());
        assert_eq!(pipeline.error(), Some("collection locked"));
    }

    #[test]
    fn test_clear_returns_to_idle() {
        let mut pipeline = QueryPipeline::new();
        pipeline.begin("x").unwrap();
        pipeline.finish(Ok(QueryOutput {
            result: QueryExecutionResult::Read {
                items: vec![],
                total_count: 0,
            },
            json_cache: vec![],
        }));
        pipeline.clear_results();
        assert_eq!(pipeline.phase(), QueryPhase::Idle);
        assert!(pipeline.cached_json().is_empty());
    }

    #[test]
    fn test_export_json_layout() {
        let read = QueryExecutionResult::Read {
            items: vec![json!({"a": 1})],
            total_count: 1,
        };
        assert_eq!(
            read.to_export_json(),
            json!({"type": "query", "totalCount": 1, "items": [{"a": 1}]})
        );

        let mutation = QueryExecutionResult::Mutation {
            mutated_document_ids: vec![json!("id1"), json!("id2")],
            commit_id: None,
            total_count: 2,
        };
        assert_eq!(
            mutation.to_export_json(),
            json!({
                "type": "mutation",
                "mutatedDocumentIDs": ["id1", "id2"],
                "commitID": null,
                "totalMutated": 2
            })
        );
    }
}
