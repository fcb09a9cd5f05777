pub mod admin;
pub mod auth;
pub mod chat;

use anyhow::Result;
use rustyline::DefaultEditor;

/// Reads an identifier (unless given) and a password from the terminal.
pub fn prompt_credentials(identifier: Option<String>) -> Result<(String, String)> {
    let mut rl = DefaultEditor::new()?;
    let identifier = match identifier {
        Some(identifier) => identifier,
        None => rl.readline("Username or email: ")?,
    };
    let password = rl.readline("Password: ")?;
    Ok((identifier, password))
}
