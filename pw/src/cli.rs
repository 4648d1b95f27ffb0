//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// ProposalWriter - client proposal generator
#[derive(Parser)]
#[command(
    name = "pw",
    about = "Generate client proposals with Claude",
    version,
    after_help = "Reads the API key from ANTHROPIC_API_KEY unless llm.api-key-env says otherwise.\nUse '-' as a file argument to read stdin."
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true, help = "Log level (trace, debug, info, warn, error)")]
    pub log_level: Option<String>,

    /// Subcommand to execute; defaults to `serve`
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP API
    Serve {
        /// Address to bind (overrides server.bind)
        #[arg(short, long)]
        bind: Option<String>,

        /// Port to listen on (overrides server.port)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Generate one proposal from an input JSON file
    Generate {
        /// ProposalInput JSON file
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Write the proposal JSON here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the prompt that would be sent, without calling the API
    Prompt {
        /// ProposalInput JSON file
        #[arg(value_name = "INPUT")]
        input: PathBuf,
    },

    /// Render a generated proposal as Markdown
    Render {
        /// GeneratedProposal JSON file
        #[arg(value_name = "PROPOSAL")]
        proposal: PathBuf,

        /// Write the Markdown here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print a sample input with the form defaults
    Sample,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_no_command() {
        let cli = Cli::parse_from(["pw"]);
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_cli_parse_serve_overrides() {
        let cli = Cli::parse_from(["pw", "serve", "--bind", "127.0.0.1", "--port", "8080"]);
        match cli.command {
            Some(Command::Serve { bind, port }) => {
                assert_eq!(bind.as_deref(), Some("127.0.0.1"));
                assert_eq!(port, Some(8080));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_parse_generate() {
        let cli = Cli::parse_from(["pw", "generate", "input.json", "-o", "out.json"]);
        match cli.command {
            Some(Command::Generate { input, output }) => {
                assert_eq!(input, PathBuf::from("input.json"));
                assert_eq!(output, Some(PathBuf::from("out.json")));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_parse_render_stdin() {
        let cli = Cli::parse_from(["pw", "render", "-"]);
        assert!(matches!(cli.command, Some(Command::Render { ref proposal, output: None }) if proposal.as_os_str() == "-"));
    }

    #[test]
    fn test_cli_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["pw", "sample", "--log-level", "debug", "--config", "pw.yml"]);
        assert!(matches!(cli.command, Some(Command::Sample)));
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert_eq!(cli.config, Some(PathBuf::from("pw.yml")));
    }

    #[test]
    fn test_cli_invalid_port() {
        assert!(Cli::try_parse_from(["pw", "serve", "--port", "not-a-port"]).is_err());
    }
}
