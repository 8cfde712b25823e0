use anyhow::Result;
use clap::{CommandFactory, Parser};
use colored::Colorize;

use personaai::app;
use personaai::cli::{Cli, Commands};
use personaai::config::{self, ClientConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Generate shell completions and exit
    if let Some(shell) = cli.generate {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
        return Ok(());
    }

    // If a subcommand was provided, execute it and exit
    if let Some(command) = &cli.command {
        match command {
            Commands::Personas => {
                let personas = config::load_personas(cli.personas_file.as_deref())?;
                for (i, p) in personas.iter().enumerate() {
                    println!("{}. {} - {}", i + 1, p.label.bright_cyan(), p.directive);
                }
            }
        }
        return Ok(());
    }

    let client_config = ClientConfig::from_cli(&cli);

    if cli.web {
        return app::run_web_server(&cli, client_config).await;
    }

    if !cli.interactive {
        println!("Nothing to do: pass --web to start the server or --interactive for terminal chat.");
        return Ok(());
    }

    app::run_repl_mode(&cli, client_config).await
}
