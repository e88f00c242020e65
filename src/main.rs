//! commitsmith - CLI entry point.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use dialoguer::Confirm;
use tracing_subscriber::EnvFilter;

use commitsmith::git::{create_commit, open_repository, staged_diff};
use commitsmith::model::{ClaudeClient, check_model_installed};
use commitsmith::workflow::Workflow;

/// Generate a conventional commit message and changelog entry from the
/// staged diff using Claude.
#[derive(Parser, Debug)]
#[command(name = "commitsmith")]
#[command(about = "Generate a commit message and changelog entry from staged changes")]
#[command(version)]
struct Cli {
    /// Path to changelog file
    #[arg(short = 'o', long, default_value = "CHANGELOG.md")]
    output: PathBuf,

    /// Create the commit with the generated message
    #[arg(long)]
    commit: bool,

    /// Skip the confirmation prompt before committing
    #[arg(short = 'y', long)]
    yes: bool,

    /// Enable verbose workflow tracing
    #[arg(short = 'v', long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "commitsmith=debug" } else { "commitsmith=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with_writer(std::io::stderr)
        .init();

    // Step 1: Check prerequisites
    check_model_installed()
        .await
        .context("Claude Code CLI is required")?;

    // Step 2: Open git repository and collect the staged diff
    let repo = open_repository(std::path::Path::new("."))
        .context("Not a git repository. Run commitsmith from within a git repository.")?;

    let diff_text = staged_diff(&repo).context("Failed to collect staged changes")?;

    println!("Analyzing staged changes...");

    // Step 3: Run the message workflow
    let model = ClaudeClient::new();
    let outcome = Workflow::new(&model, cli.output.clone())
        .run(&diff_text)
        .await
        .context("Failed to generate commit message")?;

    println!("\n{}\n", outcome.message);
    println!(
        "✓ Changelog updated: {} ({} file(s), {} improvement pass(es))",
        cli.output.display(),
        outcome.analysis.files.len(),
        outcome.state.attempts
    );

    if cli.verbose {
        for event in &outcome.state.events {
            eprintln!("[{}] {}: {}", event.at.format("%H:%M:%S"), event.step, event.detail);
        }
    }

    // Step 4: Optionally create the commit
    if cli.commit {
        let confirmed = cli.yes
            || Confirm::new()
                .with_prompt("Create commit with this message?")
                .default(true)
                .interact()
                .context("Failed to read confirmation")?;

        if confirmed {
            let oid = create_commit(&repo, &outcome.message)
                .context("Failed to create commit")?;
            println!("✓ Created commit {}", oid);
        } else {
            println!("Commit skipped.");
        }
    }

    Ok(())
}
