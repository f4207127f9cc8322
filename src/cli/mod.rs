//! CLI entry point for seekchat.

pub mod repl;

use std::path::PathBuf;

use clap::Parser;

/// Interactive chat against a DeepSeek-compatible endpoint
#[derive(Parser, Debug)]
#[command(name = "seekchat", version, about = "Interactive DeepSeek chat")]
pub struct Cli {
    /// Model id (deepseek-chat, deepseek-reasoner, or any compatible id)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Persona used as the system prompt
    #[arg(short, long)]
    pub system: Option<String>,

    /// Temperature (0.0 - 2.0)
    #[arg(short, long)]
    pub temperature: Option<f32>,

    /// Max tokens (1 - 8192)
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Config file (defaults to ~/.seekchat/config.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Parse CLI arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
