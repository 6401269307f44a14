use itertools::Itertools;
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ColumnError {
    #[error("{token:?} is not a valid column index")]
    MalformedIndex { token: String },

    #[error("Column index {token:?} is negative")]
    NegativeIndex { token: String },

    #[error("Column index {index} is outside an alignment of {total_columns} columns")]
    OutOfRange { index: usize, total_columns: usize },

    #[error("Column indices must be strictly ascending, but {next} follows {previous}")]
    NotAscending { previous: usize, next: usize },

    #[error("The range {start}-{end} ends before it starts")]
    InvertedRange { start: usize, end: usize },

    #[error("The alignment has no columns")]
    EmptyAlignment,
}

/// A maximal run of consecutive column indices, both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnRange {
    pub start: usize,
    pub end: usize,
}

impl fmt::Display for ColumnRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// How the masked and trimmed selections are combined into one string.
#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MergeMode {
    /// Join the masked text and the trimmed text as they are
    #[default]
    Concatenate,
    /// Decode both sides and re-encode their sorted union
    Union,
}

/// Returns every column of `[0, total_columns)` that is not in `retained`.
///
/// `retained` must be strictly ascending and lie inside the alignment. The
/// result is ascending and, together with `retained`, covers every column
/// exactly once.
pub fn resolve_complement(
    total_columns: usize,
    retained: &[usize],
) -> Result<Vec<usize>, ColumnError> {
    if total_columns == 0 {
        return Err(ColumnError::EmptyAlignment);
    }
    check_ascending(retained)?;
    if let Some(&index) = retained.last() {
        if index >= total_columns {
            return Err(ColumnError::OutOfRange {
                index,
                total_columns,
            });
        }
    }

    let mut trimmed = Vec::with_capacity(total_columns - retained.len());
    let mut kept = retained.iter().peekable();
    for column in 0..total_columns {
        if kept.next_if_eq(&&column).is_none() {
            trimmed.push(column);
        }
    }

    Ok(trimmed)
}

/// Errors unless every element is larger than the one before it.
pub fn check_ascending(indices: &[usize]) -> Result<(), ColumnError> {
    match indices
        .iter()
        .tuple_windows()
        .find(|(previous, next)| next <= previous)
    {
        Some((&previous, &next)) => Err(ColumnError::NotAscending { previous, next }),
        None => Ok(()),
    }
}

/// Groups an ascending sequence into maximal runs of consecutive integers.
pub fn column_runs(sequence: &[usize]) -> Vec<ColumnRange> {
    let mut runs = Vec::new();
    let mut values = sequence.iter().copied();

    let Some(first) = values.next() else {
        return runs;
    };
    let mut current = ColumnRange {
        start: first,
        end: first,
    };

    for value in values {
        if value == current.end + 1 {
            current.end = value;
        } else {
            runs.push(current);
            current = ColumnRange {
                start: value,
                end: value,
            };
        }
    }
    runs.push(current);

    runs
}

/// Range-encodes an ascending sequence, e.g. `[0, 2, 3, 4, 9]` becomes `0,2-4,9`.
pub fn compress(sequence: &[usize]) -> String {
    column_runs(sequence).iter().join(",")
}

pub fn merge(masked_text: &str, trimmed_text: &str) -> String {
    match (masked_text.is_empty(), trimmed_text.is_empty()) {
        (false, false) => format!("{},{}", masked_text, trimmed_text),
        (false, true) => masked_text.to_string(),
        (true, false) => trimmed_text.to_string(),
        (true, true) => String::new(),
    }
}

/// Merges two range-encoded selections according to `mode`.
///
/// In union mode both sides are decoded against an alignment of
/// `total_columns`, so malformed or out of range text is rejected here rather
/// than handed on to trimAl.
pub fn merge_selections(
    masked_text: &str,
    trimmed_text: &str,
    mode: MergeMode,
    total_columns: usize,
) -> Result<String, ColumnError> {
    match mode {
        MergeMode::Concatenate => Ok(merge(masked_text, trimmed_text)),
        MergeMode::Union => {
            let mut columns: BTreeSet<usize> = expand_ranges(masked_text, total_columns)?
                .into_iter()
                .collect();
            columns.extend(expand_ranges(trimmed_text, total_columns)?);
            let columns: Vec<usize> = columns.into_iter().collect();
            Ok(compress(&columns))
        }
    }
}

fn parse_index(token: &str) -> Result<usize, ColumnError> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        let is_negative = token
            .strip_prefix('-')
            .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()));
        return Err(if is_negative {
            ColumnError::NegativeIndex {
                token: token.to_string(),
            }
        } else {
            ColumnError::MalformedIndex {
                token: token.to_string(),
            }
        });
    }

    token.parse().map_err(|_| ColumnError::MalformedIndex {
        token: token.to_string(),
    })
}

/// Parses a comma separated list of plain column indices, such as the body
/// of a trimAl column map (`"0, 1, 2, 5"`).
pub fn parse_index_list(text: &str) -> Result<Vec<usize>, ColumnError> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    text.split(',').map(|token| parse_index(token.trim())).collect()
}

/// Parses range-encoded text such as `0,2-4,9` into its runs, without
/// expanding them.
pub fn parse_ranges(text: &str) -> Result<Vec<ColumnRange>, ColumnError> {
    let mut ranges = Vec::new();

    for token in text.split(',').map(str::trim).filter(|token| !token.is_empty()) {
        match token.split_once('-') {
            // A leading '-' is a negative number, not a range
            Some((start, end)) if !start.is_empty() => {
                let start = parse_index(start.trim())?;
                let end = parse_index(end.trim())?;
                if end < start {
                    return Err(ColumnError::InvertedRange { start, end });
                }
                ranges.push(ColumnRange { start, end });
            }
            _ => {
                let index = parse_index(token)?;
                ranges.push(ColumnRange {
                    start: index,
                    end: index,
                });
            }
        }
    }

    Ok(ranges)
}

/// Errors if any range reaches past the last column of the alignment.
pub fn check_ranges_within(
    ranges: &[ColumnRange],
    total_columns: usize,
) -> Result<(), ColumnError> {
    match ranges.iter().find(|range| range.end >= total_columns) {
        Some(range) => Err(ColumnError::OutOfRange {
            index: range.end,
            total_columns,
        }),
        None => Ok(()),
    }
}

/// Decodes range-encoded text back into the individual column indices of an
/// alignment with `total_columns` columns.
pub fn expand_ranges(text: &str, total_columns: usize) -> Result<Vec<usize>, ColumnError> {
    let ranges = parse_ranges(text)?;
    check_ranges_within(&ranges, total_columns)?;

    Ok(ranges
        .iter()
        .flat_map(|range| range.start..=range.end)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(&[], "")]
    #[case(&[7], "7")]
    #[case(&[4, 7, 8], "4,7-8")]
    #[case(&[0, 1, 2, 3, 4], "0-4")]
    #[case(&[0, 2, 3, 4, 9], "0,2-4,9")]
    #[case(&[1, 3, 5], "1,3,5")]
    #[case(&[10, 11, 20, 21, 22, 40], "10-11,20-22,40")]
    fn compresses_ascending_sequences(#[case] sequence: &[usize], #[case] expected: &str) {
        assert_eq!(compress(sequence), expected);
    }

    #[test]
    fn trimmed_scenario_with_gaps() {
        let trimmed = resolve_complement(10, &[0, 1, 2, 3, 5, 6, 9]).unwrap();
        assert_eq!(trimmed, vec![4, 7, 8]);
        assert_eq!(compress(&trimmed), "4,7-8");
    }

    #[test]
    fn nothing_retained_trims_everything() {
        let trimmed = resolve_complement(5, &[]).unwrap();
        assert_eq!(trimmed, vec![0, 1, 2, 3, 4]);
        assert_eq!(compress(&trimmed), "0-4");
    }

    #[test]
    fn everything_retained_leaves_only_masked() {
        let trimmed = resolve_complement(6, &[0, 1, 2, 3, 4, 5]).unwrap();
        assert!(trimmed.is_empty());
        let trimmed_text = compress(&trimmed);
        assert_eq!(trimmed_text, "");
        assert_eq!(merge("2,4", &trimmed_text), "2,4");
    }

    #[test]
    fn complement_rejects_bad_input() {
        assert_eq!(resolve_complement(0, &[]), Err(ColumnError::EmptyAlignment));
        assert_eq!(
            resolve_complement(4, &[1, 4]),
            Err(ColumnError::OutOfRange {
                index: 4,
                total_columns: 4
            })
        );
        assert_eq!(
            resolve_complement(4, &[2, 1]),
            Err(ColumnError::NotAscending {
                previous: 2,
                next: 1
            })
        );
        assert_eq!(
            resolve_complement(4, &[1, 1]),
            Err(ColumnError::NotAscending {
                previous: 1,
                next: 1
            })
        );
    }

    #[test]
    fn partition_law_holds_for_every_small_subset() {
        for total_columns in 1..=10usize {
            for mask in 0u32..(1 << total_columns) {
                let retained: Vec<usize> = (0..total_columns)
                    .filter(|column| mask & (1 << column) != 0)
                    .collect();
                let trimmed = resolve_complement(total_columns, &retained).unwrap();

                check_ascending(&trimmed).unwrap();
                assert!(trimmed.iter().all(|column| !retained.contains(column)));

                let mut union: Vec<usize> = retained.iter().chain(&trimmed).copied().collect();
                union.sort_unstable();
                assert_eq!(union, (0..total_columns).collect::<Vec<_>>());
            }
        }
    }

    #[test]
    fn compressed_text_decodes_to_the_input_and_is_minimal() {
        for mask in 0u32..(1 << 12) {
            let sequence: Vec<usize> = (0..12).filter(|bit| mask & (1 << bit) != 0).collect();
            let text = compress(&sequence);
            assert_eq!(expand_ranges(&text, 12).unwrap(), sequence, "text {:?}", text);

            // Adjacent runs must be separated by at least one missing column
            for (left, right) in column_runs(&sequence).iter().tuple_windows() {
                assert!(right.start > left.end + 1, "{} and {} could merge", left, right);
            }
        }
    }

    #[rstest]
    #[case("", "", "")]
    #[case("1,2", "", "1,2")]
    #[case("", "3-5", "3-5")]
    #[case("1,2", "3-5", "1,2,3-5")]
    fn merge_never_leaves_stray_commas(
        #[case] masked: &str,
        #[case] trimmed: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(merge(masked, trimmed), expected);
        assert_eq!(
            merge_selections(masked, trimmed, MergeMode::Concatenate, 10).unwrap(),
            expected
        );
    }

    #[test]
    fn union_merge_is_canonical() {
        assert_eq!(
            merge_selections("5,1-3", "2-4,9", MergeMode::Union, 10).unwrap(),
            "1-5,9"
        );
        assert_eq!(merge_selections("", "", MergeMode::Union, 10).unwrap(), "");
        assert!(merge_selections("1,x", "2", MergeMode::Union, 10).is_err());
        assert_eq!(
            merge_selections("0-18446744073709551615", "2", MergeMode::Union, 10),
            Err(ColumnError::OutOfRange {
                index: usize::MAX,
                total_columns: 10
            })
        );
    }

    #[test]
    fn index_list_accepts_trimal_separator() {
        assert_eq!(parse_index_list("0, 1, 2, 5").unwrap(), vec![0, 1, 2, 5]);
        assert_eq!(parse_index_list("0,1").unwrap(), vec![0, 1]);
        assert_eq!(parse_index_list("  ").unwrap(), Vec::<usize>::new());
    }

    #[rstest]
    #[case("0, a, 2", ColumnError::MalformedIndex { token: "a".to_string() })]
    #[case("0, 1.5", ColumnError::MalformedIndex { token: "1.5".to_string() })]
    #[case("0, , 2", ColumnError::MalformedIndex { token: "".to_string() })]
    #[case("0, -3", ColumnError::NegativeIndex { token: "-3".to_string() })]
    fn index_list_fails_fast(#[case] text: &str, #[case] expected: ColumnError) {
        assert_eq!(parse_index_list(text), Err(expected));
    }

    #[test]
    fn expand_ranges_rejects_bad_tokens() {
        assert_eq!(
            expand_ranges("1,5-3", 10),
            Err(ColumnError::InvertedRange { start: 5, end: 3 })
        );
        assert_eq!(
            expand_ranges("-2", 10),
            Err(ColumnError::NegativeIndex {
                token: "-2".to_string()
            })
        );
        assert!(matches!(
            expand_ranges("1-", 10),
            Err(ColumnError::MalformedIndex { .. })
        ));
        assert_eq!(expand_ranges("0, 3-4 ,7", 10).unwrap(), vec![0, 3, 4, 7]);
    }

    #[test]
    fn huge_ranges_are_rejected_without_expanding() {
        assert_eq!(
            expand_ranges("0-18446744073709551615", 100),
            Err(ColumnError::OutOfRange {
                index: usize::MAX,
                total_columns: 100
            })
        );
        assert_eq!(
            expand_ranges("3,0-5000000000", 100),
            Err(ColumnError::OutOfRange {
                index: 5_000_000_000,
                total_columns: 100
            })
        );
        assert!(matches!(
            expand_ranges("0-18446744073709551616", 100),
            Err(ColumnError::MalformedIndex { .. })
        ));
    }

    #[test]
    fn ranges_parse_without_expansion() {
        assert_eq!(
            parse_ranges("0-18446744073709551615, 7").unwrap(),
            vec![
                ColumnRange {
                    start: 0,
                    end: usize::MAX
                },
                ColumnRange { start: 7, end: 7 },
            ]
        );
        assert_eq!(parse_ranges("").unwrap(), Vec::new());
        assert_eq!(
            check_ranges_within(&parse_ranges("0-9").unwrap(), 10),
            Ok(())
        );
        assert_eq!(
            check_ranges_within(&parse_ranges("2,10").unwrap(), 10),
            Err(ColumnError::OutOfRange {
                index: 10,
                total_columns: 10
            })
        );
    }
}
