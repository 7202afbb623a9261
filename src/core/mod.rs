pub mod air;
pub mod channel;
pub mod circle;
pub mod constraints;
pub mod fields;
pub mod hash;
pub mod poly;
pub mod proof_of_work;
pub mod transcript;
pub mod tree_vec;
pub mod utils;

/// A vector in which each element relates (by index) to a column in the trace.
pub type ColumnVec<T> = Vec<T>;
