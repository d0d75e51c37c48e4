//! Callback command - resolve an inbound deep link

use anyhow::{Context, Result};
use appconnect_lib::CallbackReport;

use super::Scope;
use crate::ui;

pub async fn run(scope: &Scope, url: &str, verbose: bool) -> Result<()> {
    let terminal = scope.open(false)?;
    let report = terminal.connect.handle_url(url).await;

    ui::header("Callback");
    ui::namespace(terminal.connect.namespace());
    ui::report(&report);

    match report {
        CallbackReport::Succeeded => {
            if let Some(params) = terminal.connect.result_params() {
                ui::json(&serde_json::to_value(&params)?);
            }
            let replaced = terminal.navigator.replaced();
            ui::key_value(
                "Navigate to",
                replaced.as_deref().unwrap_or("(no redirect path)"),
            );
            let dismissed = if terminal.browser.dismissed() { "yes" } else { "no" };
            ui::key_value("Browser dismissed", dismissed);
        }
        CallbackReport::Ignored(_) => {
            if verbose {
                ui::info("No session state was used; run 'appconnect-demo status' to inspect");
            }
        }
        CallbackReport::Failed(err) => {
            return Err(err).context("Failed to handle callback");
        }
    }

    if let Some(err) = terminal.connect.error() {
        ui::error(&format!("Cleanup failed: {}", err));
        return Err(err).context("Failed to clear session");
    }

    Ok(())
}
