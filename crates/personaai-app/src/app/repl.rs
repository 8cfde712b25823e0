use anyhow::{Context, Result};
use colored::Colorize;
use futures_util::StreamExt;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::io::{self, Write};
use std::sync::Arc;

use personaai_api::{GeminiClient, TextGenerator, TokenUsage};
use personaai_chat::{ChatView, ViewError};

use crate::cli::Cli;
use crate::config::{self, ClientConfig};
use crate::conversation_logger::ConversationLogger;

/// Run the interactive terminal chat. Drives the same chat-view state
/// machine as the web page, printing chunks as they arrive.
pub async fn run_repl_mode(cli: &Cli, client_config: ClientConfig) -> Result<()> {
    let personas = config::load_personas(cli.personas_file.as_deref())?;
    let persona = config::resolve_persona(&personas, cli.persona.as_deref())?;

    let gemini_config = client_config
        .gemini_config()
        .context("GOOGLE_API_KEY is not set - export it or add it to .env")?;
    let generator: Arc<dyn TextGenerator> = Arc::new(GeminiClient::new(gemini_config));

    println!(
        "{}",
        "🤖 PersonaAI - persona-steered chat".bright_cyan().bold()
    );
    println!("{}", format!("Model: {}", client_config.model).bright_black());
    println!("{}", format!("Persona: {}", persona.label).bright_black());
    println!(
        "{}",
        "Type 'exit' or 'quit' to leave, '/personas' to list presets, '/persona <name|index>' to switch\n"
            .bright_black()
    );

    let mut view = ChatView::new(persona);

    // Transcript log under ./logs; a failure disables logging only
    let mut logger = if cli.no_log {
        None
    } else {
        match ConversationLogger::new(&std::env::current_dir()?).await {
            Ok(l) => Some(l),
            Err(e) => {
                eprintln!("Logging disabled: {}", e);
                None
            }
        }
    };

    let mut rl = DefaultEditor::new()?;

    loop {
        let persona_indicator = format!("[{}]", view.persona().label).bright_magenta();
        let readline = rl.readline(&format!(
            "{} {} ",
            persona_indicator,
            "You:".bright_green().bold()
        ));

        match readline {
            Ok(line) => {
                let line = line.trim().to_string();

                if line.is_empty() {
                    continue;
                }

                if line == "exit" || line == "quit" {
                    println!("{}", "Goodbye!".bright_cyan());
                    break;
                }

                if line == "/personas" {
                    for (i, p) in personas.iter().enumerate() {
                        let marker = if p.label == view.persona().label {
                            "▶"
                        } else {
                            " "
                        };
                        println!(
                            "{} {}. {} - {}",
                            marker,
                            i + 1,
                            p.label.bright_cyan(),
                            p.directive.bright_black()
                        );
                    }
                    continue;
                }

                if let Some(selector) = line.strip_prefix("/persona ") {
                    match config::resolve_persona(&personas, Some(selector.trim())) {
                        Ok(p) => {
                            println!("🎭 Persona switched to {}", p.label.bright_cyan());
                            view.set_persona(p);
                        }
                        Err(e) => eprintln!("{} {}", "❌".bright_red(), e),
                    }
                    continue;
                }

                let _ = rl.add_history_entry(&line);

                view.set_input(line);
                let request = match view.submit() {
                    Ok(request) => request,
                    Err(ViewError::EmptyInput) => continue,
                    Err(e) => {
                        eprintln!("{} {}", "❌".bright_red(), e);
                        continue;
                    }
                };

                if let Some(logger) = &mut logger {
                    if let Some(msg) = request.messages.last() {
                        logger
                            .log("user", &msg.text, Some(&view.persona().label))
                            .await;
                    }
                }

                match generator
                    .stream_reply(&request.messages, &request.full_prompt)
                    .await
                {
                    Ok(mut stream) => {
                        if view.begin_stream().is_err() {
                            continue;
                        }

                        print!("{} ", "Bot:".bright_blue().bold());
                        io::stdout().flush().ok();

                        let mut usage: Option<TokenUsage> = None;
                        let mut stream_failed = false;

                        while let Some(item) = stream.next().await {
                            match item {
                                Ok(chunk) => {
                                    if !chunk.delta.is_empty() {
                                        // Write and flush per chunk for minimal latency
                                        print!("{}", chunk.delta);
                                        io::stdout().flush().ok();
                                        let _ = view.apply_chunk(&chunk.delta);
                                    }
                                    if chunk.usage.is_some() {
                                        usage = chunk.usage;
                                    }
                                }
                                Err(e) => {
                                    eprintln!(
                                        "\n{} Streaming error: {}",
                                        "❌".bright_red(),
                                        e
                                    );
                                    view.fail(e.to_string());
                                    stream_failed = true;
                                    break;
                                }
                            }
                        }
                        println!();

                        if !stream_failed {
                            let _ = view.finish_stream();
                        }

                        if let Some(usage) = usage {
                            println!(
                                "{} Prompt: {} | Completion: {} | Total: {}",
                                "📊".bright_black(),
                                usage.prompt_tokens.to_string().bright_black(),
                                usage.completion_tokens.to_string().bright_black(),
                                usage.total_tokens.to_string().bright_black()
                            );
                        }

                        if let Some(logger) = &mut logger {
                            if let Some(msg) = view.messages().last() {
                                logger.log("bot", &msg.text, None).await;
                            }
                        }
                    }
                    Err(e) => {
                        // Developer surface: show the underlying provider error
                        eprintln!("{} {}", "❌".bright_red(), e);
                        view.fail(e.to_string());
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "Goodbye!".bright_cyan());
                break;
            }
            Err(e) => {
                eprintln!("Readline error: {}", e);
                break;
            }
        }
    }

    Ok(())
}
