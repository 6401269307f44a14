use crate::utils::column_ranges::ColumnError;
use anyhow::{Context, Result};
use bio::io::fasta;
use std::path::Path;

/// Number of columns in an alignment, taken from its first record.
pub fn alignment_length(alignment_file: &Path) -> Result<usize> {
    let reader = fasta::Reader::from_file(alignment_file)
        .with_context(|| format!("Could not open alignment {:?}", alignment_file))?;

    let first_record = reader
        .records()
        .next()
        .with_context(|| format!("The alignment {:?} contains no sequences", alignment_file))?
        .with_context(|| format!("Failed to parse the first record of {:?}", alignment_file))?;

    match first_record.seq().len() {
        0 => Err(ColumnError::EmptyAlignment)
            .with_context(|| format!("Reading alignment {:?}", alignment_file)),
        length => Ok(length),
    }
}

/// The identifier shared by every file of one orthogroup, e.g. `OG0001234`
/// for `OG0001234_aligned.fasta`.
pub fn base_filename(alignment_file: &Path) -> Result<String> {
    let file_name = alignment_file
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("{:?} has no usable file name", alignment_file))?;

    Ok(file_name
        .split('_')
        .next()
        .unwrap_or(file_name)
        .to_string())
}
