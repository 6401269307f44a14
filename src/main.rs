mod tools;
mod utils;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tools::write_selectcols::SelectcolsOptions;
use utils::column_ranges::MergeMode;
use utils::job_script::{
    DEFAULT_QUEUE, DEFAULT_SCRATCH_DIR, DEFAULT_TRIMAL_BIN, JobConfig, PipelinePaths,
};
use utils::upstream::MissingSourcePolicy;

#[derive(Parser)]
#[command(name = "selectcols")]
#[command(about = "Merge trimAl and UPP column masks into a trimAl -selectcols job")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct PathArgs {
    /// Directory containing the original FASTA alignments
    #[arg(short = 'a', long)]
    alignment_dir: PathBuf,

    /// Directory containing the trimAl `<base>_alignment.sites` column maps
    #[arg(short = 't', long)]
    trimal_dir: PathBuf,

    /// Directory containing the UPP `<base>_insertion_columns.txt` files. Defaults to the
    /// alignment directory.
    #[arg(short = 'm', long)]
    masked_dir: Option<PathBuf>,

    /// Directory the generated job writes the masked alignment into
    #[arg(short = 'o', long)]
    out_dir: PathBuf,
}

impl From<&PathArgs> for PipelinePaths {
    fn from(args: &PathArgs) -> Self {
        PipelinePaths {
            alignment_dir: args.alignment_dir.clone(),
            trimal_dir: args.trimal_dir.clone(),
            masked_dir: args
                .masked_dir
                .clone()
                .unwrap_or_else(|| args.alignment_dir.clone()),
            out_dir: args.out_dir.clone(),
        }
    }
}

#[derive(Args)]
struct JobArgs {
    /// PBS queue to submit to
    #[arg(long, default_value_t = String::from(DEFAULT_QUEUE))]
    queue: String,

    /// Walltime of the job in hours
    #[arg(long, default_value_t = 6)]
    walltime_hours: u32,

    /// Number of CPUs to request
    #[arg(long, default_value_t = 1)]
    num_cpu: u32,

    /// Path to the trimAl binary on the cluster
    #[arg(long, default_value_t = String::from(DEFAULT_TRIMAL_BIN))]
    trimal_bin: String,

    /// Working directory of the job
    #[arg(long, default_value_t = String::from(DEFAULT_SCRATCH_DIR))]
    scratch_dir: String,
}

impl From<&JobArgs> for JobConfig {
    fn from(args: &JobArgs) -> Self {
        JobConfig {
            queue: args.queue.clone(),
            walltime_hours: args.walltime_hours,
            num_cpu: args.num_cpu,
            trimal_bin: args.trimal_bin.clone(),
            scratch_dir: args.scratch_dir.clone(),
        }
    }
}

#[derive(Args)]
struct SelectionArgs {
    /// What to do when the trimAl or UPP output for an alignment does not exist
    #[arg(long, value_enum, default_value_t = MissingSourcePolicy::Empty)]
    missing_source: MissingSourcePolicy,

    /// How to combine the masked and trimmed columns
    #[arg(long, value_enum, default_value_t = MergeMode::Concatenate)]
    merge_mode: MergeMode,
}

impl From<&SelectionArgs> for SelectcolsOptions {
    fn from(args: &SelectionArgs) -> Self {
        SelectcolsOptions {
            missing_source: args.missing_source,
            merge_mode: args.merge_mode,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Write the trimAl job script for a single alignment
    WriteSelectcols {
        /// File name of the alignment inside the alignment directory
        alignment: PathBuf,

        #[command(flatten)]
        paths: PathArgs,

        #[command(flatten)]
        job: JobArgs,

        #[command(flatten)]
        selection: SelectionArgs,

        /// Where to write the job script. Printed to stdout when omitted.
        #[arg(long)]
        output: Option<PathBuf>,

        /// Optionally write a JSON summary of the selected columns
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Write one trimAl job script per alignment, processing the alignments in parallel
    BatchSelectcols {
        /// File names of the alignments inside the alignment directory
        #[arg(required = true)]
        alignments: Vec<PathBuf>,

        #[command(flatten)]
        paths: PathArgs,

        #[command(flatten)]
        job: JobArgs,

        #[command(flatten)]
        selection: SelectionArgs,

        /// Directory to write the `<base>.trimal-AA.pbs` scripts into
        #[arg(short = 's', long)]
        script_dir: PathBuf,
    },
    /// Range-encode a comma separated list of column indices
    CompressRanges {
        /// File containing the indices
        #[arg(short = 'i', long, conflicts_with = "indices")]
        input: Option<PathBuf>,

        /// The indices themselves, e.g. "0, 1, 2, 5"
        #[arg(short = 'l', long)]
        indices: Option<String>,

        /// Number of columns in the alignment
        #[arg(short = 'n', long)]
        total_columns: Option<usize>,

        /// Encode the columns missing from the list instead of the list itself
        #[arg(short = 'c', long, default_value_t = false, requires = "total_columns")]
        complement: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::WriteSelectcols {
            alignment,
            paths,
            job,
            selection,
            output,
            report,
        } => tools::write_selectcols::run(
            alignment,
            &paths.into(),
            &job.into(),
            &selection.into(),
            output.as_ref(),
            report.as_ref(),
        )?,
        Commands::BatchSelectcols {
            alignments,
            paths,
            job,
            selection,
            script_dir,
        } => tools::batch_selectcols::run(
            alignments,
            &paths.into(),
            &job.into(),
            &selection.into(),
            script_dir,
        )?,
        Commands::CompressRanges {
            input,
            indices,
            total_columns,
            complement,
        } => tools::compress_ranges::run(
            input.as_ref(),
            indices.as_ref(),
            *total_columns,
            *complement,
        )?,
    }
    Ok(())
}
