pub mod circle;
pub mod twiddles;

/// Marks evaluations stored in bit-reversed domain order, the layout of every trace and
/// composition column.
#[derive(Copy, Clone, Debug)]
pub struct BitReversedOrder;
