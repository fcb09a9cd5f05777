use anyhow::{Result, bail};
use colored::Colorize;
use std::path::PathBuf;
use unibot_application::{AppBootstrap, UiEvent, UploadOutcome};
use unibot_core::navigation::Route;
use unibot_core::upload::UploadHistoryEntry;

async fn open_admin(app: &AppBootstrap) -> Result<()> {
    if app.dispatcher.dispatch(UiEvent::OpenAdmin).await != Some(Route::Admin) {
        bail!("Not logged in. Run `unibot login` first.");
    }
    Ok(())
}

pub async fn upload(app: &AppBootstrap, file: PathBuf) -> Result<()> {
    open_admin(app).await?;
    let (outcome, route) = app.dispatcher.upload(Some(&file)).await;
    if route == Some(Route::Login) {
        bail!("Session expired. Run `unibot login` again.");
    }
    match outcome {
        UploadOutcome::Rejected => bail!("Upload rejected: {}", file.display()),
        UploadOutcome::Failed(err) => bail!("Upload failed: {}", err),
        UploadOutcome::Uploaded { .. } => {}
    }
    print_history(&app.dispatcher.uploads().history().await);
    Ok(())
}

pub async fn history(app: &AppBootstrap) -> Result<()> {
    open_admin(app).await?;
    print_history(&app.dispatcher.uploads().history().await);
    Ok(())
}

pub fn print_history(entries: &[UploadHistoryEntry]) {
    if entries.is_empty() {
        println!("{}", "No uploads yet.".bright_black());
        return;
    }

    println!(
        "{}",
        format!(
            "{:<32} {:<16} {:<17} {:>8} {:>8}",
            "File", "Uploaded by", "Uploaded at", "Inserted", "Skipped"
        )
        .bold()
    );
    for entry in entries {
        println!(
            "{:<32} {:<16} {:<17} {:>8} {:>8}",
            entry.file_name,
            entry.uploaded_by,
            entry.uploaded_at.format("%Y-%m-%d %H:%M").to_string(),
            entry.inserted_count,
            entry.skipped_count
        );
    }
}
