pub mod wide_fibonacci;
