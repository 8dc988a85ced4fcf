//! Search command

use anyhow::Result;
use bpm_core::Reporter;

use super::Session;

/// Print catalog records whose name contains `query`.
pub async fn search(session: &Session, query: &str) -> Result<()> {
    let catalog = session.catalog().await;
    let results = catalog.search(query);

    if results.is_empty() {
        session
            .output
            .warning(&format!("No packages found for query: {query}"));
        return Ok(());
    }

    for record in results {
        session.output.package_line(&record.name, &record.version);
    }
    Ok(())
}
