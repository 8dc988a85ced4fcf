//! The merged package catalog.
//!
//! Every configured source is fetched once, in order, and the records are
//! concatenated without deduplication. A source that cannot be reached or
//! decoded is skipped with a warning; fetching never fails as a whole.

use bpm_schema::{PackageRecord, Version};

use crate::Reporter;
use crate::io::download::{Transport, TransportError};

/// A source that contributed nothing to the catalog.
#[derive(Debug)]
pub struct SourceUnavailable {
    pub url: String,
    pub reason: TransportError,
}

/// Records from all reachable sources, in source order.
#[derive(Debug, Default)]
pub struct Catalog {
    records: Vec<PackageRecord>,
    reached: usize,
    failures: Vec<SourceUnavailable>,
}

impl Catalog {
    /// Fetch and merge every source in `sources`.
    pub async fn fetch(transport: &Transport, sources: &[String], reporter: &dyn Reporter) -> Self {
        let mut catalog = Self::default();

        for url in sources {
            match transport.fetch_json::<Vec<PackageRecord>>(url).await {
                Ok(records) => {
                    tracing::debug!("Loaded {} records from {url}", records.len());
                    catalog.reached += 1;
                    catalog.records.extend(records);
                }
                Err(reason) => {
                    tracing::warn!("Skipping package source {url}: {reason}");
                    reporter.warning(&format!("Failed to fetch {url}: {reason}"));
                    catalog.failures.push(SourceUnavailable {
                        url: url.clone(),
                        reason,
                    });
                }
            }
        }

        catalog
    }

    /// Build a catalog from already-loaded records, as if from one source.
    pub fn from_records(records: Vec<PackageRecord>) -> Self {
        Self {
            records,
            reached: 1,
            failures: Vec::new(),
        }
    }

    pub fn records(&self) -> &[PackageRecord] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// No source could be reached at all.
    pub fn is_unavailable(&self) -> bool {
        self.reached == 0
    }

    pub fn failed_sources(&self) -> &[SourceUnavailable] {
        &self.failures
    }

    /// First record named `name`, in source order.
    pub fn find(&self, name: &str) -> Option<&PackageRecord> {
        self.records.iter().find(|r| r.name == name)
    }

    /// Every version published for `name`, in source order.
    pub fn versions_of<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Version> + 'a {
        self.records
            .iter()
            .filter(move |r| r.name == name)
            .map(|r| &r.version)
    }

    /// Records whose name contains `query`, ignoring ASCII case.
    pub fn search(&self, query: &str) -> Vec<&PackageRecord> {
        let query = query.to_lowercase();
        self.records
            .iter()
            .filter(|r| r.name.to_lowercase().contains(&query))
            .collect()
    }
}
