//! Clear command - remove the stored session

use anyhow::Result;

use super::Scope;
use crate::ui;

pub async fn run(scope: &Scope) -> Result<()> {
    let terminal = scope.open(false)?;
    terminal.connect.clear_session().await?;

    ui::success(&format!(
        "Cleared session for namespace '{}'",
        terminal.connect.namespace()
    ));
    Ok(())
}
