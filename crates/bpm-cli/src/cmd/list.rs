//! List command

use anyhow::Result;
use bpm_core::Reporter;

use super::Session;
use crate::ui::table;

/// Print the catalog, or the installed registry with `installed`.
pub async fn list(session: &Session, installed: bool) -> Result<()> {
    if installed {
        if session.registry.is_empty() {
            session.output.info("No packages installed.");
            return Ok(());
        }
        let table = table::installed_table(session.registry.entries());
        session.output.line(&table.to_string());
        return Ok(());
    }

    let catalog = session.catalog().await;
    if catalog.is_empty() {
        session.output.warning("No packages available.");
        return Ok(());
    }
    let records: Vec<_> = catalog.records().iter().collect();
    session
        .output
        .line(&table::catalog_table(&records).to_string());
    Ok(())
}
