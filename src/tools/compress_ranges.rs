use crate::utils::column_ranges::{check_ascending, compress, parse_index_list, resolve_complement};
use anyhow::{Context, Result, bail};
use colored::Colorize;
use std::path::PathBuf;

const VERSION: &str = "1.0.0";

/// Range-encodes an index list, or the complement of it when `total_columns`
/// is given together with `complement`.
pub fn encode_indices(
    text: &str,
    total_columns: Option<usize>,
    complement: bool,
) -> Result<String> {
    let indices = parse_index_list(text)?;
    check_ascending(&indices)?;

    if !complement {
        return Ok(compress(&indices));
    }
    let Some(total_columns) = total_columns else {
        bail!("--complement needs --total-columns to know the alignment length");
    };
    Ok(compress(&resolve_complement(total_columns, &indices)?))
}

pub fn run(
    input_file: Option<&PathBuf>,
    indices: Option<&String>,
    total_columns: Option<usize>,
    complement: bool,
) -> Result<()> {
    simple_logger::SimpleLogger::new().env().init()?;

    log::info!(
        "{}",
        format!("This is {} version {}", "compress-ranges".italic(), VERSION)
            .bold()
            .bright_purple()
    );

    let text = match (input_file, indices) {
        (Some(input_file), None) => {
            log::info!("Reading indices from {:?}", input_file);
            std::fs::read_to_string(input_file)
                .with_context(|| format!("Could not read {:?}", input_file))?
        }
        (None, Some(indices)) => indices.clone(),
        _ => bail!("Provide exactly one of --input or --indices"),
    };

    println!("{}", encode_indices(&text, total_columns, complement)?);

    Ok(())
}
