use crate::tools::write_selectcols::{SelectcolsOptions, select_columns};
use crate::utils::job_script::{JobConfig, PipelinePaths, job_name};
use anyhow::{Context, Result, anyhow};
use colored::Colorize;
use rayon::prelude::*;
use std::path::{Path, PathBuf};

const VERSION: &str = "1.0.0";

fn process_alignment(
    alignment: &Path,
    paths: &PipelinePaths,
    job: &JobConfig,
    options: &SelectcolsOptions,
    script_dir: &Path,
) -> Result<PathBuf> {
    let selection = select_columns(alignment, paths, options)?;
    let script_file = script_dir.join(format!("{}.pbs", job_name(&selection.base_filename)));

    std::fs::write(&script_file, selection.job_script(paths, job))
        .with_context(|| format!("Trying to write to file {:?}", script_file))?;

    Ok(script_file)
}

/// Writes one job script per alignment, in parallel. A failure in one
/// alignment does not stop the others; every failure is returned with the
/// alignment it belongs to.
fn process_alignments<'a>(
    alignments: &'a [PathBuf],
    paths: &PipelinePaths,
    job: &JobConfig,
    options: &SelectcolsOptions,
    script_dir: &Path,
) -> Vec<(&'a PathBuf, anyhow::Error)> {
    alignments
        .par_iter()
        .map(|alignment| {
            (
                alignment,
                process_alignment(alignment, paths, job, options, script_dir),
            )
        })
        .filter_map(|(alignment, result)| match result {
            Ok(script_file) => {
                log::info!("Wrote {:?}", script_file);
                None
            }
            Err(error) => Some((alignment, error)),
        })
        .collect()
}

pub fn run(
    alignments: &[PathBuf],
    paths: &PipelinePaths,
    job: &JobConfig,
    options: &SelectcolsOptions,
    script_dir: &PathBuf,
) -> Result<()> {
    simple_logger::SimpleLogger::new().env().init()?;

    log::info!(
        "{}",
        format!("This is {} version {}", "batch-selectcols".italic(), VERSION)
            .bold()
            .bright_green()
    );

    std::fs::create_dir_all(script_dir)
        .with_context(|| format!("Could not create script directory {:?}", script_dir))?;

    log::info!("Processing {} alignments.", alignments.len());
    let failures = process_alignments(alignments, paths, job, options, script_dir);

    for (alignment, error) in &failures {
        log::error!("{} {:?}: {:#}", "Failed".bold().red(), alignment, error);
    }

    if !failures.is_empty() {
        return Err(anyhow!(
            "{} of {} alignments failed",
            failures.len(),
            alignments.len()
        ));
    }

    log::info!("Done. Exiting.");
    Ok(())
}
