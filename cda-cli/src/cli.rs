use cda_parser::decode::RotationBackend;
use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "cda2url",
    about = "Resolve cda.pl video pages into direct stream URLs",
    version,
    author
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// The URL of the video page to resolve
    #[arg(short, long)]
    pub url: Option<String>,

    /// Output format
    #[arg(short, long)]
    pub output: Option<OutputFormat>,

    /// Save output to file
    #[arg(short = 'O', long)]
    pub output_file: Option<PathBuf>,

    /// Only print streams of this quality (code such as "hd" or label such as "1080p")
    #[arg(long)]
    pub quality: Option<String>,

    /// Accept video ids that do not end in two lowercase hex digits
    #[arg(long)]
    pub lenient_id: bool,

    /// Decode malformed percent escapes instead of copying them through
    #[arg(long)]
    pub lenient_escapes: bool,

    /// Count every manifest quality key instead of assuming one is "auto"
    #[arg(long)]
    pub no_manifest_auto_quirk: bool,

    /// Force a rotation backend instead of detecting the fastest one
    #[arg(long, value_enum)]
    pub backend: Option<RotationBackend>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Number of retry attempts after a network failure
    #[arg(long, global = true)]
    pub retries: Option<u32>,

    /// Proxy URL (supports http, https, socks5)
    #[arg(long, global = true, env = "CDA2URL_PROXY")]
    pub proxy: Option<String>,

    /// Proxy username (if proxy requires authentication)
    #[arg(long, global = true)]
    pub proxy_username: Option<String>,

    /// Proxy password (if proxy requires authentication)
    #[arg(long, global = true)]
    pub proxy_password: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List rotation backends and whether this CPU supports them
    Backends {
        /// Output format
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,
    },

    /// Generate shell completions
    Completions {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },

    /// Show configuration information
    Config {
        /// Show current configuration
        #[arg(short, long)]
        show: bool,

        /// Reset configuration to defaults
        #[arg(long)]
        reset: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One human-readable line per stream
    #[default]
    Pretty,
    /// Compact JSON object with json_type, qualities and urls
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Pretty => write!(f, "pretty"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_resolve_flags() {
        let args = Args::try_parse_from([
            "cda2url",
            "-u",
            "https://www.cda.pl/video/12345ab",
            "--output",
            "json",
            "--lenient-escapes",
            "--backend",
            "swar",
        ])
        .unwrap();
        assert!(args.command.is_none());
        assert_eq!(args.url.as_deref(), Some("https://www.cda.pl/video/12345ab"));
        assert_eq!(args.output, Some(OutputFormat::Json));
        assert!(args.lenient_escapes);
        assert!(!args.lenient_id);
        assert_eq!(args.backend, Some(RotationBackend::Swar));
    }

    #[test]
    fn test_parse_subcommand() {
        let args = Args::try_parse_from(["cda2url", "config", "--show"]).unwrap();
        assert!(matches!(
            args.command,
            Some(Commands::Config {
                show: true,
                reset: false
            })
        ));
    }
}
