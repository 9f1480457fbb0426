use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use futures_util::{stream, StreamExt, TryStreamExt};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::error::SyncError;
use crate::manifest::ObservationDate;

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct SyncTask {
    url: String,
    output: String,
}

impl SyncTask {
    pub fn new(url: &str, output: &str) -> Self {
        SyncTask {
            url: url.to_string(),
            output: output.to_string(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug)]
pub struct SyncPlan {
    collection: String,
    tasks: Vec<SyncTask>,
}

/// Outcome of one executed plan. Per-task failures are collected here rather
/// than aborting the run.
#[derive(Debug, Default)]
pub struct SyncSummary {
    pub downloaded: Vec<PathBuf>,
    pub skipped: usize,
    pub failed: Vec<(String, String)>,
}

pub enum Outcome {
    Downloaded(PathBuf),
    AlreadyPresent,
}

impl SyncPlan {
    pub fn new(collection: &str, tasks: Vec<SyncTask>) -> Self {
        Self {
            collection: collection.to_string(),
            tasks,
        }
    }

    pub fn len(self: &Self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(self: &Self) -> bool {
        self.tasks.is_empty()
    }

    /// Resolve every image published for the given dates into a download
    /// task. `max_dates` bounds how many missing dates one run will process.
    pub async fn generate(
        catalog: &Catalog,
        missing: &[ObservationDate],
        output_dir: &Path,
        max_dates: Option<usize>,
    ) -> Result<SyncPlan, SyncError> {
        let bounded = match max_dates {
            Some(limit) => &missing[..missing.len().min(limit)],
            None => missing,
        };

        let mut tasks: Vec<SyncTask> = vec![];
        for date in bounded {
            let records = catalog.manifest(date).await?;
            info!("{}: {} images published", date, records.len());
            for record in records {
                let url = catalog.archive_url(&record)?;
                let output = output_dir.join(format!("{}.png", record.image));
                tasks.push(SyncTask::new(url.as_str(), output.to_str().unwrap()));
            }
        }
        Ok(SyncPlan::new(catalog.collection(), tasks))
    }

    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self, SyncError> {
        let content = fs::read_to_string(path)?;
        let plan: Self = serde_json::from_str(&content)?;
        Ok(plan)
    }

    pub fn write<P: AsRef<Path>>(self: &Self, path: P) -> Result<(), SyncError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Run every task, at most `concurrency` downloads in flight at once.
    /// Tasks are independent, so one failed download is recorded and the
    /// rest keep going.
    pub async fn execute(self: &Self, client: &reqwest::Client, concurrency: usize) -> SyncSummary {
        let mut summary = SyncSummary::default();
        let mut outcomes = stream::iter(self.tasks.iter().map(|task| async move {
            (task, try_download(client, &task.url, &task.output).await)
        }))
        .buffer_unordered(concurrency.max(1));

        while let Some((task, result)) = outcomes.next().await {
            match result {
                Ok(Outcome::Downloaded(path)) => {
                    info!("downloaded {}", path.display());
                    summary.downloaded.push(path);
                }
                Ok(Outcome::AlreadyPresent) => {
                    info!("{} already exists", task.output);
                    summary.skipped += 1;
                }
                Err(err) => {
                    warn!("{}: {err}", task.output);
                    summary.failed.push((task.output.clone(), err.to_string()));
                }
            }
        }
        summary
    }
}

/// Stream the response body to `{output}.partial` and rename once the
/// transfer completes, so a failed transfer never leaves a truncated final
/// artifact.
pub async fn try_download(
    client: &reqwest::Client,
    url: &str,
    output: &str,
) -> Result<Outcome, SyncError> {
    let dst = Path::new(output);
    if dst.exists() {
        return Ok(Outcome::AlreadyPresent);
    }

    // Make parent directories as necessary
    if let Some(parent_dir) = dst.parent() {
        if !parent_dir.exists() {
            fs::create_dir_all(parent_dir)?;
        }
    }

    let response = client.get(url).send().await?.error_for_status()?;

    let partial = format!("{}.partial", output);
    let mut file = File::create(&partial)?;
    let mut body = response.bytes_stream();
    while let Some(bytes) = body.try_next().await? {
        file.write_all(&bytes)?;
    }
    file.flush()?;
    fs::rename(&partial, dst)?;

    Ok(Outcome::Downloaded(dst.to_path_buf()))
}
