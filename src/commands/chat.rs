//! Interactive chat command

use crate::backend::Backend;
use crate::config::Config;
use crate::corpus::Scope;
use crate::error::Result;
use crate::session::{ChatSession, UploadPhase};
use crate::transcript::{Role, Turn};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;

/// Run the interactive chat loop
pub async fn cmd_chat(config: &Config, backend: Box<dyn Backend>) -> Result<()> {
    let mut session = ChatSession::new(backend, config.chat.clone());

    if let Err(e) = session.start().await {
        warn!("Initial document load failed: {}", e);
        println!("⚠ Could not load documents from {}: {}", config.backend_url, e);
    }

    if let Some(greeting) = session.transcript().last() {
        print_turn(greeting);
    }
    print_scope(&session);
    println!("Type a question, or /help for commands.\n");

    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(command) = line.strip_prefix('/') {
            if !handle_command(&mut session, command).await {
                break;
            }
            continue;
        }

        let spinner = spinner("Thinking...");
        let result = session.ask(line).await;
        spinner.finish_and_clear();

        match result {
            Ok(()) => {
                if let Some(turn) = session.transcript().last() {
                    print_turn(turn);
                }
            }
            Err(e) if e.is_contract_violation() => println!("⚠ {}", e),
            Err(e) => {
                warn!("Ask error: {}", e);
                println!("⚠ {}", e);
            }
        }
    }

    Ok(())
}

/// Dispatch a slash command; returns false when the loop should exit
async fn handle_command(session: &mut ChatSession, input: &str) -> bool {
    let mut parts = input.splitn(2, char::is_whitespace);
    let command = parts.next().unwrap_or("");
    let arg = parts.next().map(str::trim).unwrap_or("");

    match command {
        "help" | "h" => print_help(),

        "docs" | "documents" => print_corpus(session),

        "refresh" => match session.refresh().await {
            Ok(()) => print_corpus(session),
            Err(e) => println!("⚠ {}", e),
        },

        "use" => match arg.parse::<i64>() {
            Ok(id) => match session.select(Some(id)) {
                Ok(()) => print_scope(session),
                Err(e) => println!("⚠ {}", e),
            },
            Err(_) => println!("⚠ Usage: /use <document id>"),
        },

        "all" => match session.select(None) {
            Ok(()) => print_scope(session),
            Err(e) => println!("⚠ {}", e),
        },

        "upload" => {
            if arg.is_empty() {
                println!("⚠ Usage: /upload <path to .pdf or .txt>");
            } else {
                let bar = spinner("Uploading and indexing...");
                let phase = session.upload(PathBuf::from(arg)).await;
                bar.finish_and_clear();

                let message = session.upload_attempt().message().unwrap_or("");
                match phase {
                    UploadPhase::Succeeded => {
                        println!("✓ {}", message);
                        print_scope(session);
                    }
                    _ => println!("✗ {}", message),
                }
            }
        }

        "delete" | "remove" => match arg.parse::<i64>() {
            Ok(id) => match session.delete(id).await {
                Ok(()) => {
                    println!("✓ Removed document {}", id);
                    print_scope(session);
                }
                Err(e) => println!("⚠ Could not remove document {}: {}", id, e),
            },
            Err(_) => println!("⚠ Usage: /delete <document id>"),
        },

        "quit" | "exit" | "q" => return false,

        _ => println!("⚠ Unknown command: /{}. Try /help.", command),
    }

    true
}

fn print_help() {
    println!("Commands:");
    println!("  /docs             List documents (* marks the active scope)");
    println!("  /use <id>         Scope questions to one document");
    println!("  /all              Scope questions to all documents");
    println!("  /upload <path>    Upload a .pdf or .txt document");
    println!("  /delete <id>      Remove a document");
    println!("  /refresh          Re-fetch the document list");
    println!("  /quit             Leave the chat");
    println!("Anything else is sent as a question.");
}

fn print_corpus(session: &ChatSession) {
    let documents = session.corpus().documents();
    if documents.is_empty() {
        println!("No documents uploaded yet. Use /upload <path>.");
        return;
    }

    let scope = session.corpus().scope();
    for doc in documents {
        let marker = if scope == Scope::Document(doc.id) {
            "*"
        } else {
            " "
        };
        println!("{} {} (id {})", marker, doc.filename, doc.id);
    }
}

fn print_scope(session: &ChatSession) {
    match session.corpus().scope() {
        Scope::All => println!("Scope: all documents"),
        Scope::Document(id) => {
            let name = session.corpus().filename_of(id).unwrap_or("?");
            println!("Scope: {} (id {})", name, id);
        }
    }
}

fn print_turn(turn: &Turn) {
    match turn.role {
        Role::User => println!("You: {}", turn.text),
        Role::Bot => {
            println!("\nDocuMind: {}", turn.text);
            if !turn.sources.is_empty() {
                let names: Vec<&str> = turn
                    .sources
                    .iter()
                    .map(|source| source.filename.as_str())
                    .collect();
                println!("Sources: {}", names.join(", "));
            }
            println!();
        }
    }
}

fn spinner(message: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(ProgressStyle::default_spinner());
    bar.set_message(message.to_string());
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}
