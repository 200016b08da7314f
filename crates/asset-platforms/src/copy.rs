//! Concurrent asset copies

use std::collections::BTreeMap;

use asset_fs::NormalizedPath;
use asset_meta::AssetRecord;
use tokio::task::JoinSet;

use crate::integration::{AssetWarning, LinkOutcome};

/// One file to place into a native project.
#[derive(Debug, Clone)]
pub(crate) struct CopyJob {
    pub record: AssetRecord,
    pub destination: NormalizedPath,
}

/// Plan copies for `records`.
///
/// Every asset occupies the slot returned by `slot`. The first asset in
/// `current` to claim a slot owns it, after any `reserved` claims; later
/// assets in that slot are skipped with a warning and count as failed.
pub(crate) fn plan_copies<'a>(
    records: impl IntoIterator<Item = &'a AssetRecord>,
    current: &[AssetRecord],
    slot: impl Fn(&AssetRecord) -> NormalizedPath,
    destination: impl Fn(&AssetRecord) -> NormalizedPath,
    reserved: &BTreeMap<NormalizedPath, String>,
    outcome: &mut LinkOutcome,
) -> Vec<CopyJob> {
    let mut owners: BTreeMap<NormalizedPath, &str> = reserved
        .iter()
        .map(|(slot, owner)| (slot.clone(), owner.as_str()))
        .collect();
    for record in current {
        owners
            .entry(slot(record))
            .or_insert(record.relative_path.as_str());
    }

    let mut jobs = Vec::new();
    for record in records {
        let claimed = slot(record);
        match owners.get(&claimed) {
            Some(owner) if *owner != record.relative_path => outcome.warn(AssetWarning::for_asset(
                record,
                format!("{} is already provided by {}", claimed, owner),
            )),
            _ => jobs.push(CopyJob {
                record: record.clone(),
                destination: destination(record),
            }),
        }
    }
    jobs
}

async fn copy_one(source: NormalizedPath, destination: NormalizedPath) -> std::io::Result<()> {
    if let Some(parent) = destination.parent() {
        tokio::fs::create_dir_all(parent.to_native()).await?;
    }
    tokio::fs::copy(source.to_native(), destination.to_native()).await?;
    Ok(())
}

/// Copy every job concurrently. Destinations are disjoint.
///
/// Failures become warnings on `outcome`; the records that were copied are
/// returned in job order.
pub(crate) async fn copy_assets(jobs: Vec<CopyJob>, outcome: &mut LinkOutcome) -> Vec<AssetRecord> {
    let mut tasks = JoinSet::new();
    for (index, job) in jobs.iter().enumerate() {
        let source = job.record.absolute_path.clone();
        let destination = job.destination.clone();
        tasks.spawn(async move { (index, copy_one(source, destination).await) });
    }

    let mut results: Vec<Option<std::io::Result<()>>> = jobs.iter().map(|_| None).collect();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, result)) => results[index] = Some(result),
            Err(err) => tracing::error!(error = %err, "copy task did not complete"),
        }
    }

    let mut copied = Vec::new();
    for (job, result) in jobs.into_iter().zip(results) {
        match result {
            Some(Ok(())) => {
                outcome.action(format!(
                    "copied {} to {}",
                    job.record.relative_path, job.destination
                ));
                copied.push(job.record);
            }
            Some(Err(err)) => outcome.warn(AssetWarning::for_asset(
                &job.record,
                format!("failed to copy to {}: {}", job.destination, err),
            )),
            None => outcome.warn(AssetWarning::for_asset(
                &job.record,
                format!("copy to {} was interrupted", job.destination),
            )),
        }
    }
    copied
}
