#![allow(non_snake_case)]

mod app;
mod components;
mod context;
mod pages;
mod share;
mod theme;

use std::path::PathBuf;

use clap::Parser;
use dioxus::desktop::{Config, WindowBuilder};
use peerscope_core::logging::LoggingBuilder;
use peerscope_core::ToolsConfig;

use crate::context::AppSettings;

/// peerscope - diagnostics for peer-to-peer store apps
#[derive(Parser, Debug)]
#[command(name = "peerscope-desktop")]
#[command(about = "peerscope - Presence, query and export tools for a syncing document store")]
struct Args {
    /// Data directory for the store and logs
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Instance name (creates data dir: peerscope-<name>)
    #[arg(short, long)]
    name: Option<String>,

    /// Config file (defaults to <data-dir>/peerscope.json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the presence throttle window in milliseconds
    #[arg(long)]
    throttle_ms: Option<u64>,

    /// Upper bound on simulated remote peers
    #[arg(long, default_value_t = 6)]
    peers: usize,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let (data_dir, display_name) = if let Some(dir) = args.data_dir {
        let name = dir
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("custom")
            .to_string();
        (dir, name)
    } else if let Some(ref name) = args.name {
        let base = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(format!("peerscope-{}", name));
        (base, name.clone())
    } else {
        let base = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("peerscope");
        (base, String::new())
    };

    let config_path = args
        .config
        .unwrap_or_else(|| data_dir.join("peerscope.json"));
    let mut config = ToolsConfig::load(&config_path)?;
    if let Some(ms) = args.throttle_ms {
        config.throttle_window_ms = ms.max(1);
    }

    let session = format!("{}", std::process::id());
    let log_path = LoggingBuilder::new(config.log_dir_or(&data_dir), session).init()?;

    tracing::info!(
        data_dir = %data_dir.display(),
        log = %log_path.display(),
        "Starting '{}'",
        display_name
    );

    let title = if !display_name.is_empty() {
        format!("peerscope - {}", display_name)
    } else {
        "peerscope".to_string()
    };

    context::install(AppSettings {
        data_dir,
        config,
        log_path,
        max_sim_peers: args.peers,
    });

    let window = Config::new().with_window(
        WindowBuilder::new()
            .with_title(&title)
            .with_inner_size(dioxus::desktop::LogicalSize::new(760.0, 900.0))
            .with_resizable(true),
    );

    dioxus::LaunchBuilder::desktop()
        .with_cfg(window)
        .launch(app::App);

    Ok(())
}
