pub mod batch_selectcols;
pub mod compress_ranges;
pub mod write_selectcols;
