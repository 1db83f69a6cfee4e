//! Burnish - Bundle Manifest Decoder
//!
//! Main entry point for the Burnish CLI.

use anyhow::Context;
use burnish::manifest;
use burnish::state::EngineState;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process;

/// Burnish - decode installer bundle manifests into engine state
#[derive(Parser, Debug)]
#[command(name = "burnish")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Load a manifest and print a summary of the decoded engine state
    Inspect {
        /// Path to the bundle manifest XML
        manifest: PathBuf,
    },

    /// Load a manifest and dump the decoded engine state as JSON
    Dump {
        /// Path to the bundle manifest XML
        manifest: PathBuf,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    burnish::logging::init()?;
    let cli = Cli::parse();

    match cli.command {
        Commands::Inspect { manifest: path } => {
            let state = load(&path)?;
            print_summary(&state);
        }
        Commands::Dump { manifest: path } => {
            let state = load(&path)?;
            println!("{}", serde_json::to_string_pretty(&state)?);
        }
    }

    Ok(())
}

fn load(path: &Path) -> anyhow::Result<EngineState> {
    let mut state = EngineState::default();
    manifest::load_from_file(path, &mut state)
        .with_context(|| format!("failed to load manifest {}", path.display()))?;
    Ok(state)
}

fn print_summary(state: &EngineState) {
    match &state.registration {
        Some(registration) => println!(
            "Bundle {} version {} ({})",
            registration.id,
            registration.version,
            if registration.per_machine {
                "per-machine"
            } else {
                "per-user"
            }
        ),
        None => println!("Unregistered bundle"),
    }

    if let Some(condition) = &state.condition {
        println!("Condition: {}", condition);
    }
    if let Some(update) = &state.update {
        println!("Update feed: {}", update.location);
    }

    println!(
        "{} variables, {} searches, {} extensions",
        state.variables.len(),
        state.searches.len(),
        state.extensions.len()
    );
    println!(
        "{} containers, {} payloads ({} layout-only), {} packages, {} approved exes",
        state.containers.len(),
        state.payloads.len(),
        state.layout_payloads.len(),
        state.packages.len(),
        state.approved_exes.len()
    );

    for package in &state.packages {
        println!(
            "  package {} ({:?}, {} payloads)",
            package.id,
            package.kind,
            package.payload_refs.len()
        );
    }
}
