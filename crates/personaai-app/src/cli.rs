use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// CLI arguments for PersonaAI
#[derive(Parser)]
#[command(name = "personaai")]
#[command(about = "PersonaAI - persona-steered chat over the Gemini API")]
#[command(version = "0.1.0")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Run the interactive terminal chat
    #[arg(short, long, action = clap::ArgAction::SetTrue)]
    pub interactive: bool,

    /// Start the web server (relay + chat page)
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub web: bool,

    /// Web server port
    #[arg(long, default_value = "3000", env = "PERSONAAI_WEB_PORT")]
    pub web_port: u16,

    /// Web server bind address
    #[arg(long, default_value = "127.0.0.1", env = "PERSONAAI_WEB_BIND")]
    pub web_bind: String,

    /// Override the Gemini model name
    #[arg(long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Override the Gemini API base URL (e.g. a local mock server)
    #[arg(long, value_name = "URL")]
    pub api_url: Option<String>,

    /// Path to a persona preset file (default: personas.toml if present)
    #[arg(long, value_name = "PATH")]
    pub personas_file: Option<String>,

    /// Persona to start with, by label or 1-based index
    #[arg(long, value_name = "NAME")]
    pub persona: Option<String>,

    /// Generate shell completions
    #[arg(long, value_enum)]
    pub generate: Option<Shell>,

    /// Enable verbose debug output (HTTP requests, stream chunks)
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Disable the conversation transcript log (logs/*.jsonl)
    #[arg(long)]
    pub no_log: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the available persona presets
    Personas,
}
