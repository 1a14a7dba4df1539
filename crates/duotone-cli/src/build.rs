//! Build driver: input discovery, output mapping and parallel transforms.

use anyhow::{Context, Result, bail};
use duotone_css::{TransformOptions, TransformStats, transform_css};
use rayon::prelude::*;
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// One stylesheet to build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    /// Source stylesheet.
    pub input: PathBuf,
    /// Destination, or `None` to print to stdout.
    pub output: Option<PathBuf>,
}

/// Outcome of building a set of jobs.
#[derive(Debug, Default)]
pub struct BuildReport {
    /// Number of stylesheets written.
    pub built: usize,
    /// Totals over every built stylesheet.
    pub stats: TransformStats,
    /// Stylesheets that failed, with the reason.
    pub failures: Vec<(PathBuf, anyhow::Error)>,
}

impl BuildReport {
    /// Log failures and a summary line.
    pub fn log(&self) {
        for (path, err) in &self.failures {
            tracing::error!("{}: {:#}", path.display(), err);
        }
        tracing::info!(
            "Built {} stylesheet(s): {} rule(s) expanded, {} declaration(s) moved, {} failed",
            self.built,
            self.stats.rules_expanded,
            self.stats.declarations_moved,
            self.failures.len()
        );
    }

    /// Fail if any stylesheet failed.
    pub fn into_result(self) -> Result<()> {
        if !self.failures.is_empty() {
            bail!(
                "{} of {} stylesheet(s) failed",
                self.failures.len(),
                self.failures.len() + self.built
            );
        }
        Ok(())
    }
}

/// Expand inputs into jobs.
///
/// Directories are searched recursively for `*.css` files; their outputs keep
/// the path relative to the directory. A file input maps to its file name.
/// Without an output directory exactly one stylesheet is allowed.
pub fn plan(inputs: &[PathBuf], out_dir: Option<&Path>) -> Result<Vec<Job>> {
    let mut jobs = vec![];

    for input in inputs {
        if input.is_dir() {
            let mut files = vec![];
            find_stylesheets(input, out_dir, &mut files)
                .with_context(|| format!("Failed to search {}", input.display()))?;
            files.sort();

            for file in files {
                let relative = file.strip_prefix(input).unwrap_or(&file).to_path_buf();
                jobs.push(Job {
                    output: out_dir.map(|dir| dir.join(&relative)),
                    input: file,
                });
            }
        } else if input.is_file() {
            let name = input
                .file_name()
                .with_context(|| format!("Invalid input path {}", input.display()))?;
            jobs.push(Job {
                input: input.clone(),
                output: out_dir.map(|dir| dir.join(name)),
            });
        } else {
            bail!("Input not found: {}", input.display());
        }
    }

    if out_dir.is_none() && jobs.len() > 1 {
        bail!(
            "{} stylesheets found; pass an output directory with -o to build more than one",
            jobs.len()
        );
    }

    dedupe_outputs(jobs)
}

/// Drop repeated jobs and fail when two different inputs would be written to
/// the same file.
fn dedupe_outputs(jobs: Vec<Job>) -> Result<Vec<Job>> {
    let mut claimed: HashMap<PathBuf, PathBuf> = HashMap::new();
    let mut unique = Vec::with_capacity(jobs.len());

    for job in jobs {
        let Some(output) = &job.output else {
            unique.push(job);
            continue;
        };
        match claimed.get(output) {
            Some(previous) if *previous == job.input => continue,
            Some(previous) => bail!(
                "{} and {} would both be written to {}",
                previous.display(),
                job.input.display(),
                output.display()
            ),
            None => {
                claimed.insert(output.clone(), job.input.clone());
                unique.push(job);
            }
        }
    }

    Ok(unique)
}

fn find_stylesheets(dir: &Path, skip: Option<&Path>, files: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();

        // Never read back our own output
        if skip.is_some_and(|skip| path.starts_with(skip)) {
            continue;
        }

        if path.is_dir() {
            find_stylesheets(&path, skip, files)?;
        } else if path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("css"))
        {
            files.push(path);
        }
    }
    Ok(())
}

/// Build every job on the rayon pool, collecting all failures.
pub fn build_all(jobs: &[Job], options: &TransformOptions) -> BuildReport {
    let results: Vec<_> = jobs
        .par_iter()
        .map(|job| (job, build_file(job, options)))
        .collect();

    let mut report = BuildReport::default();
    for (job, result) in results {
        match result {
            Ok(stats) => {
                report.built += 1;
                report.stats += stats;
            }
            Err(err) => report.failures.push((job.input.clone(), err)),
        }
    }
    report
}

/// Transform one stylesheet and write the result.
pub fn build_file(job: &Job, options: &TransformOptions) -> Result<TransformStats> {
    let css = fs::read_to_string(&job.input)
        .with_context(|| format!("Failed to read {}", job.input.display()))?;

    let out = transform_css(&css, options)
        .with_context(|| format!("Failed to transform {}", job.input.display()))?;

    match &job.output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            fs::write(path, &out.css).with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!(
                "{} -> {} ({} rule(s) expanded)",
                job.input.display(),
                path.display(),
                out.stats.rules_expanded
            );
        }
        None => {
            std::io::stdout()
                .lock()
                .write_all(out.css.as_bytes())
                .context("Failed to write to stdout")?;
        }
    }

    if out.stats.malformed > 0 {
        tracing::warn!(
            "{}: {} malformed light-dark() call(s) left unchanged",
            job.input.display(),
            out.stats.malformed
        );
    }

    Ok(out.stats)
}
