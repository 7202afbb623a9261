use crate::core::circle::{CirclePoint, CirclePointIndex, Coset, M31_CIRCLE_LOG_ORDER};
use crate::core::fields::m31::BaseField;

pub const MAX_CIRCLE_DOMAIN_LOG_SIZE: u32 = M31_CIRCLE_LOG_ORDER - 1;

/// The union of a coset and its conjugate, `+-C + <G_n>`, which is where trace columns and
/// composition columns are evaluated.
///
/// Position `i` is `C + i * G_n` for the first half and the conjugate of the `i - n`th point
/// for the second half.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CircleDomain {
    pub half_coset: Coset,
}

impl CircleDomain {
    pub const fn new(half_coset: Coset) -> Self {
        Self { half_coset }
    }

    pub fn iter(&self) -> impl Iterator<Item = CirclePoint<BaseField>> {
        self.half_coset
            .iter()
            .chain(self.half_coset.conjugate().iter())
    }

    pub const fn size(&self) -> usize {
        1 << self.log_size()
    }

    pub const fn log_size(&self) -> u32 {
        self.half_coset.log_size + 1
    }

    pub fn at(&self, i: usize) -> CirclePoint<BaseField> {
        self.index_at(i).to_point()
    }

    pub fn index_at(&self, i: usize) -> CirclePointIndex {
        match i.checked_sub(self.half_coset.size()) {
            Some(j) => -self.half_coset.index_at(j),
            None => self.half_coset.index_at(i),
        }
    }
}
