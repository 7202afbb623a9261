//! Witness storage for a single component: `N` equally sized base field columns, written row by
//! row.

use std::collections::TryReserveError;

use thiserror::Error;

pub mod component_trace;
pub mod row_iterator;

pub use component_trace::ComponentTrace;
pub use row_iterator::{MutRow, RowIterMut};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TraceError {
    #[error("log size {log_size} is not supported, expected at most {max_log_size}")]
    InvalidLogSize { log_size: u32, max_log_size: u32 },
    #[error("row {row} is out of range for a trace of {n_rows} rows")]
    PositionOutOfRange { row: usize, n_rows: usize },
    #[error("column of length {actual} does not match the expected length {expected}")]
    ShapeMismatch { expected: usize, actual: usize },
    #[error(transparent)]
    Allocation(#[from] TryReserveError),
}
