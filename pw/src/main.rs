//! ProposalWriter - client proposal generator
//!
//! CLI entry point: serve the HTTP API or run one-off generation, prompt
//! preview and rendering from files.

use std::fs;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use serde::de::DeserializeOwned;
use tokio::net::TcpListener;
use tracing::info;

use proposalwriter::cli::{Cli, Command};
use proposalwriter::config::Config;
use proposalwriter::domain::{GeneratedProposal, ProposalInput};
use proposalwriter::generator::ProposalGenerator;
use proposalwriter::llm::create_client;
use proposalwriter::prompts::PromptBuilder;
use proposalwriter::render::PreviewRenderer;
use proposalwriter::server::{self, InnerAppState};

fn setup_logging(level: &str) -> Result<()> {
    let level: tracing::Level = level.parse().context(format!("Invalid log level '{}'", level))?;

    // stdout carries command output; logs go to stderr
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Priority: CLI > config file > INFO
    let level = cli
        .log_level
        .clone()
        .or_else(|| Config::load_log_level(cli.config.as_ref()))
        .unwrap_or_else(|| "info".to_string());
    setup_logging(&level).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    info!(
        "ProposalWriter loaded config: provider={}, model={}",
        config.llm.provider, config.llm.model
    );

    match cli.command {
        Some(Command::Serve { bind, port }) => cmd_serve(&config, bind, port).await,
        Some(Command::Generate { input, output }) => cmd_generate(&config, &input, output.as_deref()).await,
        Some(Command::Prompt { input }) => cmd_prompt(&config, &input),
        Some(Command::Render { proposal, output }) => cmd_render(&config, &proposal, output.as_deref()),
        Some(Command::Sample) => cmd_sample(),
        None => cmd_serve(&config, None, None).await,
    }
}

fn build_generator(config: &Config) -> Result<ProposalGenerator> {
    let llm = create_client(&config.llm).context("Failed to create LLM client")?;
    let prompts = PromptBuilder::from_config(&config.prompts).context("Failed to load system prompt")?;
    Ok(ProposalGenerator::new(llm, prompts, config.generator.clone()))
}

/// Run the HTTP API
async fn cmd_serve(config: &Config, bind: Option<String>, port: Option<u16>) -> Result<()> {
    config.validate()?;

    let state = Arc::new(InnerAppState {
        generator: build_generator(config)?,
        renderer: PreviewRenderer::from_config(&config.prompts)?,
    });
    let router = server::build_router(state, &config.server)?;

    let addr = format!(
        "{}:{}",
        bind.as_deref().unwrap_or(&config.server.bind),
        port.unwrap_or(config.server.port)
    );
    let listener = TcpListener::bind(&addr)
        .await
        .context(format!("Failed to bind {}", addr))?;

    eprintln!("{} Serving proposals on {}", "✓".green(), format!("http://{}", addr).cyan());
    server::serve(listener, router).await
}

/// Generate one proposal
async fn cmd_generate(config: &Config, input: &Path, output: Option<&Path>) -> Result<()> {
    config.validate()?;

    let form: ProposalInput = read_json(input)?;
    let generator = build_generator(config)?;
    let proposal = generator.generate(form).await.context("Failed to generate proposal")?;

    let json = serde_json::to_string_pretty(&proposal)?;
    write_output(output, &json)?;
    eprintln!("{} Generated proposal {}", "✓".green(), proposal.id.cyan());
    Ok(())
}

/// Print the assembled prompt
fn cmd_prompt(config: &Config, input: &Path) -> Result<()> {
    let form: ProposalInput = read_json(input)?;
    let prompt = PromptBuilder::from_config(&config.prompts)?.build(&form);

    println!("{}", "=== SYSTEM ===".bright_cyan().bold());
    println!("{}", prompt.system);
    println!();
    println!("{}", "=== USER ===".bright_cyan().bold());
    print!("{}", prompt.user);
    Ok(())
}

/// Render a proposal to Markdown
fn cmd_render(config: &Config, proposal: &Path, output: Option<&Path>) -> Result<()> {
    let proposal: GeneratedProposal = read_json(proposal)?;
    let markdown = PreviewRenderer::from_config(&config.prompts)?.render(&proposal)?;
    write_output(output, &markdown)
}

/// Print the form defaults as JSON
fn cmd_sample() -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&ProposalInput::default())?);
    Ok(())
}

/// Read and parse a JSON file; `-` reads stdin
fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf).context("Failed to read stdin")?;
        buf
    } else {
        fs::read_to_string(path).context(format!("Failed to read {}", path.display()))?
    };
    serde_json::from_str(&content).context(format!("Failed to parse {}", path.display()))
}

fn write_output(path: Option<&Path>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            fs::write(path, content).context(format!("Failed to write {}", path.display()))?;
            eprintln!("{} Wrote {}", "✓".green(), path.display().to_string().cyan());
        }
        None => println!("{}", content),
    }
    Ok(())
}
