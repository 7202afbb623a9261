pub mod core;
pub mod examples;
pub mod trace;
