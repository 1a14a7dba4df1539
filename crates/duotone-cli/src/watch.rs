//! Rebuild-on-change loop.

use anyhow::{Context, Result};
use duotone_css::TransformOptions;
use duotone_css::hot_reload::{ChangeKind, StylesheetChangeEvent, StylesheetWatcher};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::build::{Job, build_all, plan};

/// Build everything once, then rebuild changed stylesheets until interrupted.
pub fn run(inputs: &[PathBuf], out_dir: &Path, options: &TransformOptions) -> Result<()> {
    let jobs = plan(inputs, Some(out_dir))?;
    build_all(&jobs, options).log();

    let mut watcher = StylesheetWatcher::new().context("Failed to start file watcher")?;
    for input in inputs {
        watcher
            .watch(input)
            .with_context(|| format!("Failed to watch {}", input.display()))?;
    }
    tracing::info!("Watching {} path(s) for changes", watcher.watched_count());
    for path in watcher.watched_paths() {
        tracing::debug!("Watching {}", path.display());
    }

    loop {
        let changes = watcher.wait_for_changes(Duration::from_millis(500));
        if changes.is_empty() {
            continue;
        }

        for change in changes.iter().filter(|c| c.kind == ChangeKind::Removed) {
            tracing::info!("Stylesheet removed: {}", change.path.display());
        }

        // Re-plan so files created since the last build are picked up
        let jobs = match plan(inputs, Some(out_dir)) {
            Ok(jobs) => jobs,
            Err(err) => {
                tracing::error!("{:#}", err);
                continue;
            }
        };

        let changed = changed_jobs(&jobs, &changes);
        if !changed.is_empty() {
            build_all(&changed, options).log();
        }
    }
}

/// Jobs whose input appears among the changes.
///
/// Change paths are canonical, so job inputs are canonicalized for the
/// comparison.
fn changed_jobs(jobs: &[Job], changes: &[StylesheetChangeEvent]) -> Vec<Job> {
    jobs.iter()
        .filter(|job| {
            job.input.canonicalize().is_ok_and(|input| {
                changes
                    .iter()
                    .any(|change| change.kind == ChangeKind::Modified && change.path == input)
            })
        })
        .cloned()
        .collect()
}
