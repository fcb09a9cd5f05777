//! Interactive chat REPL.
//!
//! Sends run as background tasks so the prompt stays usable (for `/clear`)
//! while a reply is outstanding. A render task follows the conversation
//! snapshots and prints replies as their placeholders settle.

use super::admin::print_history;
use super::prompt_credentials;
use crate::console::ConsoleNavigator;
use crate::helper::{COMMANDS, CliHelper};
use anyhow::Result;
use colored::Colorize;
use rustyline::Editor;
use rustyline::error::ReadlineError;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::watch;
use unibot_application::{AppBootstrap, ConversationSnapshot, Dispatcher, UiEvent};
use unibot_core::conversation::{MessageId, Sender};
use unibot_core::navigation::{Navigator, Route};

pub async fn run(app: &AppBootstrap, navigator: Arc<ConsoleNavigator>) -> Result<()> {
    let dispatcher = app.dispatcher.clone();
    let renderer = tokio::spawn(render(dispatcher.chat().subscribe()));

    let mut rl = Editor::new()?;
    rl.set_helper(Some(CliHelper));

    println!("{}", "=== Unibot ===".bright_magenta().bold());
    println!(
        "{}",
        "Ask anything about the university. Type '/help' for commands or 'quit' to exit."
            .bright_black()
    );
    println!();

    loop {
        let line = match rl.readline(">> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        };

        let trimmed = line.trim();
        if trimmed == "quit" || trimmed == "exit" {
            println!("{}", "Goodbye!".bright_green());
            break;
        }
        if trimmed.is_empty() {
            continue;
        }
        let _ = rl.add_history_entry(trimmed);

        if trimmed.starts_with('/') {
            handle_command(&dispatcher, &navigator, trimmed).await;
            continue;
        }

        // Reserve the send before echoing, so a refused line is never shown
        // as if it had been sent.
        let Some(pending) = dispatcher.chat().begin_send(trimmed).await else {
            println!("{}", "Still waiting for the previous reply.".bright_black());
            continue;
        };

        println!("{}", format!("> {}", trimmed).green());
        let dispatcher = dispatcher.clone();
        tokio::spawn(async move {
            dispatcher.deliver(pending).await;
        });
    }

    renderer.abort();
    Ok(())
}

async fn handle_command(dispatcher: &Arc<Dispatcher>, navigator: &ConsoleNavigator, line: &str) {
    let (command, arg) = match line.split_once(' ') {
        Some((command, arg)) => (command, Some(arg.trim()).filter(|a| !a.is_empty())),
        None => (line, None),
    };

    match command {
        "/help" => {
            for cmd in COMMANDS {
                println!("  {}", cmd.bright_cyan());
            }
        }
        "/clear" => {
            dispatcher.dispatch(UiEvent::ClearConversation).await;
            println!("{}", "Conversation cleared.".bright_black());
        }
        "/chat" => navigator.navigate(Route::Chat),
        "/login" => {
            if dispatcher.dispatch(UiEvent::OpenLogin).await != Some(Route::Login) {
                return;
            }
            match prompt_credentials(arg.map(str::to_string)) {
                Ok((identifier, password)) => {
                    dispatcher
                        .dispatch(UiEvent::Login {
                            identifier,
                            password,
                        })
                        .await;
                }
                Err(err) => eprintln!("{}", format!("Login cancelled: {}", err).red()),
            }
        }
        "/logout" => {
            dispatcher.dispatch(UiEvent::Logout).await;
        }
        "/admin" => {
            if dispatcher.dispatch(UiEvent::OpenAdmin).await == Some(Route::Admin) {
                print_history(&dispatcher.uploads().history().await);
            }
        }
        "/upload" | "/history" if navigator.current() != Route::Admin => {
            println!("{}", "Open the admin panel first with /admin.".bright_black());
        }
        "/upload" => {
            let route = dispatcher
                .dispatch(UiEvent::Upload(arg.map(PathBuf::from)))
                .await;
            if route.is_none() {
                print_history(&dispatcher.uploads().history().await);
            }
        }
        "/history" => {
            if dispatcher.dispatch(UiEvent::RefreshHistory).await.is_none() {
                print_history(&dispatcher.uploads().history().await);
            }
        }
        _ => println!("{}", "Unknown command".bright_black()),
    }
}

/// Prints bot replies as they settle and a typing line while one streams.
async fn render(mut snapshots: watch::Receiver<ConversationSnapshot>) {
    let mut shown: HashSet<MessageId> = HashSet::new();
    let mut typing: Option<MessageId> = None;

    while snapshots.changed().await.is_ok() {
        let snapshot = snapshots.borrow_and_update().clone();
        if snapshot.messages.is_empty() {
            shown.clear();
            typing = None;
            continue;
        }

        for message in &snapshot.messages {
            if shown.contains(&message.id) {
                continue;
            }
            match (message.sender, message.streaming) {
                // Echoed by the prompt already.
                (Sender::User, _) => {
                    shown.insert(message.id);
                }
                (Sender::Bot, true) => {
                    if typing != Some(message.id) {
                        println!("{}", "unibot is typing...".bright_black().italic());
                        typing = Some(message.id);
                    }
                }
                (Sender::Bot, false) => {
                    for line in message.text.lines() {
                        println!("{}", line.bright_blue());
                    }
                    println!();
                    shown.insert(message.id);
                }
            }
        }
    }
}
