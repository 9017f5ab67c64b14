use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tplg_sdk::{load_config, SessionConfig};

#[derive(Debug, Parser)]
#[command(
    name = "tplgc",
    about = "Audio topology compiler",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compile a topology source into a binary blob
    Compile(CompileArgs),
    /// Build a topology and report what would be written
    Check(CheckArgs),
}

#[derive(Debug, Args)]
pub struct CompileArgs {
    /// Topology source (TOML)
    pub input: PathBuf,
    /// Output file
    #[arg(short, long)]
    pub output: PathBuf,
    #[command(flatten)]
    pub session: SessionArgs,
}

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Topology source (TOML)
    pub input: PathBuf,
    #[command(flatten)]
    pub session: SessionArgs,
}

/// Session settings: a config file plus per-flag overrides.
#[derive(Debug, Default, Args)]
pub struct SessionArgs {
    /// Session config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Version stamped into block headers
    #[arg(long = "abi-version")]
    pub abi_version: Option<u32>,
    /// Directory for `file` data sources
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
    /// Reject unknown sections and keys
    #[arg(long)]
    pub strict: bool,
}

impl SessionArgs {
    pub fn resolve(&self) -> anyhow::Result<SessionConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => SessionConfig::default(),
        };
        if let Some(version) = self.abi_version {
            config.version = version;
        }
        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
        if self.strict {
            config.strict = true;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_compile() {
        let cli = Cli::try_parse_from([
            "tplgc",
            "compile",
            "board.toml",
            "-o",
            "board.bin",
            "--abi-version",
            "3",
            "--strict",
        ])
        .unwrap();
        assert!(!cli.verbose);
        assert_eq!(cli.format, OutputFormat::Text);
        match cli.command {
            Command::Compile(args) => {
                assert_eq!(args.input, PathBuf::from("board.toml"));
                assert_eq!(args.output, PathBuf::from("board.bin"));
                let config = args.session.resolve().unwrap();
                assert_eq!(config.version, 3);
                assert!(config.strict);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn compile_requires_output() {
        assert!(Cli::try_parse_from(["tplgc", "compile", "board.toml"]).is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["tplgc", "check", "board.toml", "--format", "json", "-v"])
                .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.format, OutputFormat::Json);
    }

    #[test]
    fn flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.toml");
        std::fs::write(&path, "version = 1\ndata_dir = \"fw\"\n").unwrap();
        let args = SessionArgs {
            config: Some(path),
            abi_version: Some(9),
            ..SessionArgs::default()
        };
        let config = args.resolve().unwrap();
        assert_eq!(config.version, 9);
        assert_eq!(config.data_dir, PathBuf::from("fw"));
        assert!(!config.strict);
    }
}
