//! CLI entry point.
//!
//! # Responsibility
//! - Load one diagram from the store selected by `FLOWGRAPH_*` variables.
//! - Print its view tree (`view`, default) or a short summary (`summary`).

use clap::{Parser, Subcommand};
use flowgraph_core::{
    init_logging, CoreConfig, DiagramSession, JsonFileStore, PropertyGraphStore,
    SqlitePropertyGraph, StoreKind,
};
use log::error;
use std::error::Error;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "flowgraph")]
#[command(version)]
#[command(about = "Load a workflow diagram from the configured store and print it")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
enum Command {
    /// Print the view tree as JSON (default)
    View,
    /// Print store, graph id and element counts
    Summary,
    /// Print the core library version
    Version,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Command::View);

    match run(command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_run module=cli status=error error={err}");
            eprintln!("flowgraph: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<(), Box<dyn Error>> {
    if command == Command::Version {
        println!("flowgraph_core version={}", flowgraph_core::core_version());
        return Ok(());
    }

    let config = CoreConfig::from_env()?;
    if let Some(log_dir) = &config.log_dir {
        init_logging(&config.log_level, log_dir)?;
    }

    let session = match config.store {
        StoreKind::File => {
            DiagramSession::open(&JsonFileStore::new(), config.store_path.as_path())?
        }
        StoreKind::SqliteGraph => {
            let store = PropertyGraphStore::new(SqlitePropertyGraph::open(&config.store_path)?);
            DiagramSession::open(&store, config.diagram_label.as_str())?
        }
    };

    match command {
        Command::Summary => {
            let graph = session.graph();
            println!(
                "store={} graph_id={} nodes={} edges={}",
                config.store.as_str(),
                graph.id,
                graph.nodes.len(),
                graph.edges.len()
            );
        }
        _ => println!("{}", serde_json::to_string_pretty(&session.view_tree())?),
    }
    Ok(())
}
