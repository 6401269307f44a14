use std::path::PathBuf;

pub const DEFAULT_QUEUE: &str = "q06h32c";
pub const DEFAULT_TRIMAL_BIN: &str = "/share/apps/bioinformatics/trimal/1.4rev22/trimal";
pub const DEFAULT_SCRATCH_DIR: &str = "/scratch/$PBS_JOBID";
const JOB_SUFFIX: &str = "trimal-AA";

/// Where the alignments and the upstream tool outputs live.
#[derive(Debug, Clone)]
pub struct PipelinePaths {
    pub alignment_dir: PathBuf,
    pub trimal_dir: PathBuf,
    pub masked_dir: PathBuf,
    pub out_dir: PathBuf,
}

/// Resources requested from PBS and the trimAl binary the job runs.
#[derive(Debug, Clone)]
pub struct JobConfig {
    pub queue: String,
    pub walltime_hours: u32,
    pub num_cpu: u32,
    pub trimal_bin: String,
    pub scratch_dir: String,
}

impl Default for JobConfig {
    fn default() -> Self {
        JobConfig {
            queue: DEFAULT_QUEUE.to_string(),
            walltime_hours: 6,
            num_cpu: 1,
            trimal_bin: DEFAULT_TRIMAL_BIN.to_string(),
            scratch_dir: DEFAULT_SCRATCH_DIR.to_string(),
        }
    }
}

pub fn job_name(base_filename: &str) -> String {
    format!("{}.{}", base_filename, JOB_SUFFIX)
}

/// Renders the PBS script that runs trimAl with every selected column removed.
pub fn render_job_script(
    base_filename: &str,
    selectcols: &str,
    alignment_file_name: &str,
    paths: &PipelinePaths,
    job: &JobConfig,
) -> String {
    let name = job_name(base_filename);
    let input = paths.alignment_dir.join(alignment_file_name);
    let output = paths.out_dir.join(alignment_file_name);
    let sites = paths.out_dir.join(format!("{}_trimal.sites", base_filename));
    let errors = paths.out_dir.join(format!("{}_alignment.err", base_filename));

    format!(
        "#PBS -N {name}\n\
         #PBS -q {queue}\n\
         #PBS -j oe\n\
         #PBS -o {name}.$PBS_JOBID\n\
         #PBS -l nodes=1:ppn={num_cpu}\n\
         #PBS -l walltime={walltime:02}:00:00\n\
         \n\
         cd {scratch}\n\
         \n\
         # run trimal\n\
         {trimal} -selectcols {{ {selectcols} }} -keepheader -colnumbering \
         -in {input} -out {output} > {sites} 2> {errors}\n",
        queue = job.queue,
        num_cpu = job.num_cpu,
        walltime = job.walltime_hours,
        scratch = job.scratch_dir,
        trimal = job.trimal_bin,
        input = input.display(),
        output = output.display(),
        sites = sites.display(),
        errors = errors.display(),
    )
}
