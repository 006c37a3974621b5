use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use nest_config::NEST_DIRECTORY;

#[derive(Parser)]
#[command(
    name = "nest",
    about = "nest.land module tool: manage and sync module config with the registry",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Config directory of the module
    #[arg(long, global = true, default_value = NEST_DIRECTORY)]
    pub dir: PathBuf,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create the config directory for a new module
    Init(InitArgs),
    /// Inspect and exchange the module config
    Config(ConfigArgs),
    /// Synchronize remote and local configuration
    Sync(SyncArgs),
}

#[derive(Args)]
pub struct InitArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub author: String,
    #[arg(long, default_value = "0.1.0")]
    pub version: String,
}

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show the current config status
    Status,
    /// Show changes to the config
    Diff(DiffArgs),
    /// Fetch from and integrate with remote config
    Pull(PullArgs),
    /// Update remote config with local config
    Push(PushArgs),
}

#[derive(Args)]
pub struct DiffArgs {
    /// Show what a pull would change instead of the local edits
    #[arg(long)]
    pub remote: bool,
}

#[derive(Args)]
pub struct PullArgs {
    /// Overwrite local config
    #[arg(short, long)]
    pub force: bool,
    /// Accept the merge without asking
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Args)]
pub struct PushArgs {
    /// Overwrite remote config
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args)]
pub struct SyncArgs {
    #[arg(short, long)]
    pub yes: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_init() {
        let cli = Cli::try_parse_from(["nest", "init", "--name", "mod", "--author", "alice"]).unwrap();
        if let Command::Init(args) = cli.command {
            assert_eq!(args.name, "mod");
            assert_eq!(args.author, "alice");
            assert_eq!(args.version, "0.1.0");
        } else { panic!("wrong command"); }
        assert_eq!(cli.dir, PathBuf::from(".nest"));
    }

    #[test]
    fn init_requires_name() {
        assert!(Cli::try_parse_from(["nest", "init", "--author", "alice"]).is_err());
    }

    #[test]
    fn parse_config_status() {
        let cli = Cli::try_parse_from(["nest", "config", "status"]).unwrap();
        assert!(matches!(cli.command, Command::Config(ConfigArgs { action: ConfigAction::Status })));
    }

    #[test]
    fn parse_config_diff_remote() {
        let cli = Cli::try_parse_from(["nest", "config", "diff", "--remote"]).unwrap();
        if let Command::Config(ConfigArgs { action: ConfigAction::Diff(args) }) = cli.command {
            assert!(args.remote);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_config_pull_flags() {
        let cli = Cli::try_parse_from(["nest", "config", "pull", "-f", "--yes"]).unwrap();
        if let Command::Config(ConfigArgs { action: ConfigAction::Pull(args) }) = cli.command {
            assert!(args.force);
            assert!(args.yes);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_config_push_force() {
        let cli = Cli::try_parse_from(["nest", "config", "push", "--force"]).unwrap();
        if let Command::Config(ConfigArgs { action: ConfigAction::Push(args) }) = cli.command {
            assert!(args.force);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_sync_with_globals() {
        let cli = Cli::try_parse_from([
            "nest", "sync", "-y", "--verbose", "--dir", "/tmp/m/.nest", "--format", "json",
        ])
        .unwrap();
        if let Command::Sync(args) = &cli.command {
            assert!(args.yes);
        } else { panic!("wrong command"); }
        assert!(cli.verbose);
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.dir, PathBuf::from("/tmp/m/.nest"));
    }

    #[test]
    fn unknown_subcommand_is_rejected() {
        assert!(Cli::try_parse_from(["nest", "config", "merge"]).is_err());
    }
}
