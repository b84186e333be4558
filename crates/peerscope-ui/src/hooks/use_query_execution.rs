//! DQL editor state.

use dioxus::prelude::*;
use peerscope_core::{export_results, run_query, QueryPipeline, ToolsError};

use crate::context::{use_instance, use_tools};
use crate::hooks::ExportStatus;

/// Query editor state plus its actions.
#[derive(Clone, Copy)]
pub struct QueryExecution {
    pub pipeline: Signal<QueryPipeline>,
    pub export: Signal<ExportStatus>,
    /// Run a statement; ignored while one is executing
    pub execute: Callback<String>,
    pub clear: Callback<()>,
    /// Share the current results as JSON
    pub export_results: Callback<()>,
}

pub fn use_query_execution() -> QueryExecution {
    let tools = use_tools();
    let handle = use_instance();
    let mut pipeline = use_signal(QueryPipeline::new);
    let mut export = use_signal(ExportStatus::default);

    let execute = use_callback(move |text: String| {
        if pipeline.write().begin(&text).is_err() {
            return;
        }
        let Some(instance) = handle.instance.peek().clone() else {
            pipeline.write().finish(Err(ToolsError::NotInitialized));
            return;
        };

        spawn(async move {
            let outcome = run_query(instance.store(), &text).await;
            pipeline.write().finish(outcome);
        });
    });

    let clear = use_callback(move |_: ()| pipeline.write().clear_results());

    let export_action = use_callback(move |_: ()| {
        // Snapshot before awaiting so a new query cannot swap them out
        let results = pipeline.peek().results().cloned();
        if !export.write().start() {
            return;
        }
        let share = tools.share.clone();
        let dir = tools.results_export_dir();

        spawn(async move {
            let outcome = export_results(results.as_ref(), share.as_ref(), &dir).await;
            export.write().record(outcome);
        });
    });

    QueryExecution {
        pipeline,
        export,
        execute,
        clear,
        export_results: export_action,
    }
}
