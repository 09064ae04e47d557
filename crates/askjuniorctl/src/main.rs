//! AskJunior Control - CLI client for the legal information assistant.
//!
//! Thin front-end over `askjunior_core`: asks a question, optionally with a
//! plain-text document attached, and renders the structured answer.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "askjuniorctl")]
#[command(about = "AskJunior - junior legal information assistant", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the assistant config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask a legal question
    Ask {
        /// The question, quoted
        question: String,

        /// Attach a plain-text document as supporting context
        #[arg(long)]
        document: Option<PathBuf>,

        /// Print the structured answer as raw JSON
        #[arg(long)]
        json: bool,
    },

    /// Check that the assistant is configured and ready
    Doctor,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Ask {
            question,
            document,
            json,
        } => commands::ask(cli.config.as_deref(), &question, document.as_deref(), json).await,
        Commands::Doctor => commands::doctor(cli.config.as_deref()),
    }
}
