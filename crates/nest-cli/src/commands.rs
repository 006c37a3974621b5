use anyhow::Context;
use async_trait::async_trait;
use colored::Colorize;
use dialoguer::Confirm;
use nest_config::{ConfigDir, Project, IGNORE_FILE, META_FILE};
use nest_diff::{render_lines, render_titled, DisplayLine, LineKind};
use nest_sync::{
    ConfigSync, DiffReport, FileStatus, PlaceholderRegistry, PullOutcome, PushOutcome, Review,
    Reviewer, StatusReport, SyncError, SyncOutcome, SyncResult,
};
use serde::Serialize;

use crate::cli::*;

/// Environment variable holding the registry token.
const TOKEN_VAR: &str = "NEST_TOKEN";

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let dir = ConfigDir::new(&cli.dir);
    let format = cli.format;
    match cli.command {
        Command::Init(args) => cmd_init(&dir, args).await,
        Command::Config(ConfigArgs { action }) => match action {
            ConfigAction::Status => cmd_status(workflow(dir, true), format).await,
            ConfigAction::Diff(args) => cmd_diff(workflow(dir, true), args, format).await,
            ConfigAction::Pull(args) => cmd_pull(workflow(dir, args.yes), args, format).await,
            ConfigAction::Push(args) => cmd_push(workflow(dir, true), args, format).await,
        },
        Command::Sync(args) => cmd_sync(workflow(dir, args.yes), format).await,
    }
}

fn workflow(dir: ConfigDir, assume_yes: bool) -> ConfigSync<PlaceholderRegistry, Prompt> {
    let sync = ConfigSync::new(dir, PlaceholderRegistry, Prompt { assume_yes });
    match std::env::var(TOKEN_VAR) {
        Ok(token) if !token.is_empty() => sync.with_token(token),
        _ => sync,
    }
}

/// Shows the merge result and asks on the terminal before it is written.
struct Prompt {
    assume_yes: bool,
}

#[async_trait]
impl Reviewer for Prompt {
    async fn confirm(&self, review: &Review) -> SyncResult<bool> {
        print_lines(&render_titled(META_FILE, &review.meta));
        print_lines(&render_lines(IGNORE_FILE, &review.ignore));
        if review.conflict {
            println!("{} {}", "!".yellow().bold(), "Conflict detected: both sides were kept.".yellow());
        }
        if self.assume_yes {
            return Ok(true);
        }

        tokio::task::spawn_blocking(|| {
            Confirm::new()
                .with_prompt("Apply these changes to the local config?")
                .default(true)
                .interact()
                .map_err(|e| SyncError::Review(e.to_string()))
        })
        .await
        .map_err(|e| SyncError::Review(e.to_string()))?
    }
}

async fn cmd_init(dir: &ConfigDir, args: InitArgs) -> anyhow::Result<()> {
    let project = Project::new(args.author, args.name, args.version);
    dir.init(&project)
        .await
        .with_context(|| format!("failed to initialize {}", dir.root().display()))?;
    println!(
        "{} Initialized {} in {}",
        "✓".green().bold(),
        project.module().to_string().bold(),
        dir.root().display()
    );
    Ok(())
}

async fn cmd_status(
    sync: ConfigSync<PlaceholderRegistry, Prompt>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let report = sync.status().await?;
    if format == OutputFormat::Json {
        return print_json(&report);
    }
    print_status(&report);
    Ok(())
}

async fn cmd_diff(
    sync: ConfigSync<PlaceholderRegistry, Prompt>,
    args: DiffArgs,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let report = sync.diff(args.remote).await?;
    if format == OutputFormat::Json {
        return print_json(&report);
    }
    print_diff(&report);
    Ok(())
}

async fn cmd_pull(
    sync: ConfigSync<PlaceholderRegistry, Prompt>,
    args: PullArgs,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let outcome = sync.pull(args.force).await?;
    if format == OutputFormat::Json {
        return print_json(&outcome);
    }
    print_pull(outcome);
    Ok(())
}

async fn cmd_push(
    sync: ConfigSync<PlaceholderRegistry, Prompt>,
    args: PushArgs,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let outcome = sync.push(args.force).await?;
    if format == OutputFormat::Json {
        return print_json(&outcome);
    }
    print_push(outcome);
    Ok(())
}

async fn cmd_sync(
    sync: ConfigSync<PlaceholderRegistry, Prompt>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let outcome = sync.sync().await?;
    if format == OutputFormat::Json {
        return print_json(&outcome);
    }
    let SyncOutcome { pull, push } = outcome;
    if let Some(pull) = pull {
        print_pull(pull);
    }
    match push {
        Some(push) => print_push(push),
        None => println!("{} Config was not uploaded.", "!".yellow().bold()),
    }
    Ok(())
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn paint(line: &DisplayLine) -> String {
    let text = line.plain();
    match line.kind {
        LineKind::Title => text.bold().to_string(),
        LineKind::Added => text.green().to_string(),
        LineKind::Removed => text.red().to_string(),
        LineKind::Modified => text.yellow().to_string(),
        LineKind::Unchanged => text.dimmed().to_string(),
    }
}

fn print_lines(lines: &[DisplayLine]) {
    for line in lines {
        println!("{}", paint(line));
    }
}

fn status_word(modified: bool) -> String {
    if modified {
        "modified".green().bold().to_string()
    } else {
        "unchanged".yellow().bold().to_string()
    }
}

fn print_files(heading: &str, status: FileStatus) {
    println!("{heading}");
    println!("  {} {} {}", "-".dimmed(), META_FILE, status_word(status.meta));
    println!("  {} {} {}", "-".dimmed(), IGNORE_FILE, status_word(status.ignore));
    println!();
}

fn print_status(report: &StatusReport) {
    print_files("Local diff status:", report.local);
    print_files("Remote diff status:", report.remote);
    let age = if report.local_newer {
        "newer".green().bold()
    } else {
        "older".red().bold()
    };
    println!("Current config is {age} than remote config");
}

fn print_diff(report: &DiffReport) {
    if report.meta.is_unchanged() && report.ignore.is_unchanged() {
        println!("No changes.");
        return;
    }
    if report.meta.is_modified() {
        print_lines(&render_titled(META_FILE, &report.meta));
    }
    if report.ignore.is_modified() {
        print_lines(&render_lines(IGNORE_FILE, &report.ignore));
        println!(
            "  {} {}",
            format!("+{}", report.ignore.additions()).green(),
            format!("-{}", report.ignore.deletions()).red()
        );
    }
    if report.conflict {
        println!("{} {}", "!".yellow().bold(), "Pulling would produce a conflict.".yellow());
    }
}

fn print_pull(outcome: PullOutcome) {
    match outcome {
        PullOutcome::Forced => println!("{} Config was force pulled to local.", "✓".green().bold()),
        PullOutcome::UpToDate => println!("{} Already synced.", "✓".green().bold()),
        PullOutcome::FastForward => println!("{} Local config updated from remote.", "✓".green().bold()),
        PullOutcome::Merged { conflict: false } => {
            println!("{} Successfully updated config.", "✓".green().bold())
        }
        PullOutcome::Merged { conflict: true } => println!(
            "{} {}",
            "!".yellow().bold(),
            "Conflict detected. Please resolve this conflict before pushing to remote.".yellow()
        ),
        PullOutcome::Declined => println!("Pull cancelled. No file was written."),
    }
}

fn print_push(outcome: PushOutcome) {
    match outcome {
        PushOutcome::Uploaded => println!("{} Config pushed to remote.", "✓".green().bold()),
        PushOutcome::Forced => println!("{} Config was force pushed to remote.", "✓".green().bold()),
    }
}
