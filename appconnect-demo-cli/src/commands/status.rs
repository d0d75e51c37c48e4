//! Status command - show the stored session

use anyhow::Result;

use super::Scope;
use crate::ui;

pub async fn run(scope: &Scope) -> Result<()> {
    let terminal = scope.open(false)?;
    let stores = terminal.connect.stores();

    ui::header("Session Status");
    ui::key_value("Target", terminal.connect.identifier());
    ui::namespace(terminal.connect.namespace());
    ui::key_value("Store", &scope.storage_path().display().to_string());

    let session_id = stores.session_id.find().await?;
    ui::stored("Session ID", session_id.as_deref());
    let redirect = stores.redirect_path.find().await?;
    ui::stored("Redirect", redirect.as_deref());

    Ok(())
}
