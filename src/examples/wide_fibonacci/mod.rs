//! A component that enforces `N` wide fibonacci-like sequences, one per row.

mod component;
mod trace_gen;

pub use component::{Input, WideFibonacciComponent};
pub use trace_gen::{gen_trace, write_trace_row};
