use super::prompt_credentials;
use anyhow::{Result, bail};
use colored::Colorize;
use unibot_application::{AppBootstrap, UiEvent};
use unibot_core::navigation::Route;

pub async fn login(app: &AppBootstrap, username: Option<String>) -> Result<()> {
    if let Some(user) = app.dispatcher.auth().current_user() {
        println!(
            "{}",
            format!(
                "Already logged in as {}.",
                user.display_name().unwrap_or("admin")
            )
            .bright_black()
        );
        return Ok(());
    }

    let (identifier, password) = prompt_credentials(username)?;
    let route = app
        .dispatcher
        .dispatch(UiEvent::Login {
            identifier,
            password,
        })
        .await;

    if route != Some(Route::Admin) {
        bail!("Login failed");
    }
    Ok(())
}

pub async fn logout(app: &AppBootstrap) {
    app.dispatcher.dispatch(UiEvent::Logout).await;
}
