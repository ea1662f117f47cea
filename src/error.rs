use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum PrimoError {
    #[error("failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed input: {0}")]
    Csv(#[from] csv::Error),

    #[error("line {line}: expected 4 tab-separated fields, found {found}")]
    FieldCount { line: u64, found: usize },

    #[error("line {line}: day index {value:?} is not a number")]
    DayIndex { line: u64, value: String },

    #[error("line {line}: amount {value:?} is not an integer")]
    Amount { line: u64, value: String },

    #[error("row {position}: primogem total does not fit in 64 bits")]
    Overflow { position: usize },

    #[error("{flagged} rows start a banner but {labels} banner labels are configured")]
    BannerMismatch { flagged: usize, labels: usize },

    #[error("chart window failed: {0}")]
    Display(#[from] eframe::Error),
}

pub type PrimoResult<T> = Result<T, PrimoError>;
