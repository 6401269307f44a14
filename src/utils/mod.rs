pub mod column_ranges;
pub mod fasta_utils;
pub mod job_script;
pub mod upstream;
