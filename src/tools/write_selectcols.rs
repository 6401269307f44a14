use crate::utils::column_ranges::{MergeMode, compress, merge_selections, resolve_complement};
use crate::utils::fasta_utils::{alignment_length, base_filename};
use crate::utils::job_script::{JobConfig, PipelinePaths, render_job_script};
use crate::utils::upstream::{
    MissingSourcePolicy, masked_columns_path, read_masked_columns, read_retained_columns,
    retained_columns_path,
};
use anyhow::{Context, Result};
use colored::Colorize;
use serde_json::json;
use std::path::{Path, PathBuf};

const VERSION: &str = "1.0.0";

#[derive(Debug, Clone, Copy, Default)]
pub struct SelectcolsOptions {
    pub missing_source: MissingSourcePolicy,
    pub merge_mode: MergeMode,
}

/// Everything worked out for one alignment before the job script is written.
#[derive(Debug)]
pub struct ColumnSelection {
    pub alignment_file_name: String,
    pub base_filename: String,
    pub alignment_length: usize,
    pub retained_columns: usize,
    pub trimmed_columns: String,
    pub masked_columns: String,
    pub selectcols: String,
}

impl ColumnSelection {
    pub fn job_script(&self, paths: &PipelinePaths, job: &JobConfig) -> String {
        render_job_script(
            &self.base_filename,
            &self.selectcols,
            &self.alignment_file_name,
            paths,
            job,
        )
    }

    pub fn write_report(&self, report_file: &Path) -> Result<()> {
        let report = json!({
            "alignment": self.alignment_file_name,
            "base_filename": self.base_filename,
            "alignment_length": self.alignment_length,
            "retained_columns": self.retained_columns,
            "trimmed_columns": self.trimmed_columns,
            "masked_columns": self.masked_columns,
            "selectcols": self.selectcols,
        });
        std::fs::write(report_file, serde_json::to_string_pretty(&report)?)
            .with_context(|| format!("Trying to write report {:?}", report_file))
    }
}

/// Combines the trimAl and UPP outputs for one alignment into a single
/// `-selectcols` argument.
pub fn select_columns(
    alignment: &Path,
    paths: &PipelinePaths,
    options: &SelectcolsOptions,
) -> Result<ColumnSelection> {
    let alignment_file_name = alignment
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("{:?} is not an alignment file name", alignment))?
        .to_string();
    let base_filename = base_filename(alignment)?;
    let alignment_path = paths.alignment_dir.join(&alignment_file_name);

    log::info!("Reading alignment length from {:?}", alignment_path);
    let alignment_length = alignment_length(&alignment_path)?;
    log::info!("{} has {} columns", base_filename, alignment_length);

    let retained_path = retained_columns_path(&paths.trimal_dir, &base_filename);
    let retained = read_retained_columns(&retained_path, options.missing_source)?;
    let (retained_columns, trimmed_columns) = match retained {
        Some(retained) => {
            let trimmed = resolve_complement(alignment_length, &retained)
                .with_context(|| format!("Resolving trimmed columns from {:?}", retained_path))?;
            log::info!(
                "trimAl kept {} columns and trimmed {}",
                retained.len(),
                trimmed.len()
            );
            (retained.len(), compress(&trimmed))
        }
        // Without a column map there is nothing trimmed to add
        None => (alignment_length, String::new()),
    };

    let masked_path = masked_columns_path(&paths.masked_dir, &base_filename);
    let masked_columns =
        read_masked_columns(&masked_path, options.missing_source, alignment_length)?;

    let selectcols = merge_selections(
        &masked_columns,
        &trimmed_columns,
        options.merge_mode,
        alignment_length,
    )
    .with_context(|| format!("Merging the selected columns for {}", base_filename))?;
    log::info!("Selected columns for {}: {{ {} }}", base_filename, selectcols);

    Ok(ColumnSelection {
        alignment_file_name,
        base_filename,
        alignment_length,
        retained_columns,
        trimmed_columns,
        masked_columns,
        selectcols,
    })
}

pub fn run(
    alignment: &PathBuf,
    paths: &PipelinePaths,
    job: &JobConfig,
    options: &SelectcolsOptions,
    output_file: Option<&PathBuf>,
    report_file: Option<&PathBuf>,
) -> Result<()> {
    simple_logger::SimpleLogger::new().env().init()?;

    log::info!(
        "{}",
        format!("This is {} version {}", "write-selectcols".italic(), VERSION)
            .bold()
            .bright_green()
    );

    let selection = select_columns(alignment, paths, options)?;
    let script = selection.job_script(paths, job);

    match output_file {
        Some(output_file) => {
            log::info!("Writing job script to {:?}", output_file);
            std::fs::write(output_file, &script)
                .with_context(|| format!("Trying to write to file {:?}", output_file))?;
        }
        None => print!("{}", script),
    }

    if let Some(report_file) = report_file {
        log::info!("Writing report to {:?}", report_file);
        selection.write_report(report_file)?;
    }

    log::info!("Done. Exiting.");
    Ok(())
}
