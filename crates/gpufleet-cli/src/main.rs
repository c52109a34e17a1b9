use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use gpufleet_console::{ConsoleEvent, ConsoleManager, EventSink, HttpRemoteShell};

/// Interactive remote command console for a GPU fleet dashboard
#[derive(Debug, Parser)]
#[command(name = "gpufleet")]
struct Cli {
    /// Dashboard server base URL
    #[arg(long, env = "GPUFLEET_URL", default_value = "http://127.0.0.1:8000")]
    url: String,

    /// Host to open a console session on
    #[arg(long, env = "GPUFLEET_HOST")]
    host: String,

    /// Directory for per-host console logs
    #[arg(long, env = "GPUFLEET_LOG_DIR")]
    log_dir: Option<PathBuf>,
}

/// Renders console events to the terminal
///
/// The transcript event carries the full text; only the newly appended
/// tail gets printed so the terminal scrolls naturally.
struct TerminalSink {
    last_transcript: Mutex<String>,
}

impl TerminalSink {
    fn new() -> Self {
        Self {
            last_transcript: Mutex::new(String::new()),
        }
    }
}

impl EventSink for TerminalSink {
    fn emit(&self, event: ConsoleEvent) {
        match event {
            ConsoleEvent::TranscriptChanged { text, .. } => {
                let mut last = self.last_transcript.lock().unwrap();
                {
                    let delta = text.strip_prefix(last.as_str()).unwrap_or(&text);
                    let delta = delta.strip_prefix('\n').unwrap_or(delta);
                    if !delta.is_empty() {
                        println!("{}", delta);
                    }
                }
                *last = text;
            }
            ConsoleEvent::Notice { message, .. } => {
                eprintln!("{}", message.yellow());
            }
            ConsoleEvent::ExitCodeReported {
                exit_code: Some(code),
                ..
            } if code != 0 => {
                println!("{}", format!("exit {}", code).red());
            }
            ConsoleEvent::ExitCodeReported { .. } => {}
            ConsoleEvent::PromptChanged { .. } => {}
            ConsoleEvent::BusyChanged { .. } => {}
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    println!("{}", "GPU Fleet Console".bright_cyan().bold());
    println!(
        "{}",
        format!("Dashboard: {} • Host: {}", cli.url, cli.host).bright_black()
    );
    println!(
        "{}",
        "Type 'exit' to quit, ':clear' to clear the transcript\n".bright_black()
    );

    let remote = HttpRemoteShell::new(&cli.url);
    let mut manager = ConsoleManager::new(Box::new(remote), Box::new(TerminalSink::new()));
    if let Some(log_dir) = cli.log_dir.clone() {
        manager = manager.with_log_dir(log_dir);
    }

    manager.select_host(&cli.host).await;

    let mut rl = DefaultEditor::new()?;
    loop {
        let prompt = format!("{} ", manager.prompt(&cli.host));
        match rl.readline(&prompt) {
            Ok(line) => {
                let input = line.trim().to_string();
                if input.is_empty() {
                    continue;
                }
                if input == "exit" || input == "quit" {
                    break;
                }
                if input == ":clear" {
                    manager.clear_transcript(&cli.host, "Output cleared.");
                    continue;
                }
                let _ = rl.add_history_entry(&input);
                manager.submit(&cli.host, &input).await;
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("{}", format!("Input error: {}", err).red());
                break;
            }
        }
    }

    Ok(())
}
