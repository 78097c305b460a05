//! Interactive REPL for the chat session.
//!
//! One line of input per turn, read with rustyline so the user gets line
//! editing and persistent history. Slash commands are handled here and
//! never reach the model.

use std::path::PathBuf;

use console::style;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use serde_json::Value;

use hubchat_core::config::Config;
use hubchat_core::provider::LlmProvider;
use hubchat_core::session::{ChatSession, SessionObserver};
use hubchat_core::tools::ToolProvider;

use crate::commands::{CommandAction, handle_command};

/// Observer that echoes tool activity to stdout.
struct ConsoleObserver;

impl SessionObserver for ConsoleObserver {
    fn tool_started(&mut self, name: &str, arguments: &Value) {
        println!(
            "🔧 Calling tool: {} with params: {}",
            style(name).cyan(),
            arguments
        );
    }

    fn tool_finished(&mut self, name: &str, success: bool) {
        if success {
            println!("✅ Tool '{name}' executed successfully");
        } else {
            println!("{} Tool '{name}' reported an error", style("✗").red());
        }
    }
}

/// Derive a display name for the LLM provider from its base URL.
fn provider_name(base_url: Option<&str>) -> String {
    let Some(url) = base_url else {
        return "openai.com".to_string();
    };

    let domain = url
        .split("//")
        .nth(1)
        .unwrap_or(url)
        .split('/')
        .next()
        .unwrap_or(url);

    domain.strip_prefix("api.").unwrap_or(domain).to_string()
}

fn history_path() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("hubchat").join("history.txt"))
}

/// Run the REPL until the user exits.
pub async fn run<L, P>(config: &Config, mut session: ChatSession<L, P>) -> anyhow::Result<()>
where
    L: LlmProvider,
    P: ToolProvider,
{
    let mut rl = DefaultEditor::new()?;

    let history = history_path();
    if let Some(ref path) = history {
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let _ = rl.load_history(path);
    }

    print_welcome(config);

    let mut observer = ConsoleObserver;
    let mut failure = None;

    loop {
        match rl.readline(">>> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                if line.starts_with('/') {
                    match handle_command(line, session.tools()) {
                        CommandAction::Continue => continue,
                        CommandAction::Exit => break,
                    }
                }

                let _ = rl.add_history_entry(line);

                match session.run_turn(line, &mut observer).await {
                    Ok(Some(answer)) => println!("{answer}\n"),
                    Ok(None) => {}
                    Err(e) => {
                        // Provider and protocol breakage ends the session;
                        // everything recoverable was already absorbed into
                        // the transcript.
                        eprintln!("Error: {e}");
                        failure = Some(e);
                        break;
                    }
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                println!("\nGoodbye!");
                break;
            }
            Err(err) => {
                eprintln!("Error: {err:?}");
                break;
            }
        }
    }

    if let Some(ref path) = history {
        let _ = rl.save_history(path);
    }

    match failure {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}

fn print_welcome(config: &Config) {
    println!(
        "Using {} via {}",
        style(&config.model).green(),
        provider_name(config.base_url.as_deref())
    );
    println!("Type /help for commands");
    println!();
}
