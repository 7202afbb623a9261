use super::CircleDomain;
use crate::core::circle::Coset;

/// The coset `G_{2n} + <G_n>` of a trace of `n = 2^log_size` rows.
///
/// Its points are the odd multiples of `G_{2n}`. Seen as a [CircleDomain] the same points are
/// split into the half coset `G_{2n} + <G_{n/2}>` and its conjugate, e.g. for `n = 8`:
///
/// ```text
///    X O X
///  O       O
/// X         X
/// O         O
/// X         X
///  O       O
///    X O X
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CanonicCoset {
    pub coset: Coset,
}

impl CanonicCoset {
    pub fn new(log_size: u32) -> Self {
        assert!(log_size > 0, "canonic cosets have at least two points");
        Self {
            coset: Coset::odds(log_size),
        }
    }

    pub fn half_coset(&self) -> Coset {
        Coset::half_odds(self.log_size() - 1)
    }

    pub fn circle_domain(&self) -> CircleDomain {
        CircleDomain::new(self.half_coset())
    }

    pub const fn log_size(&self) -> u32 {
        self.coset.log_size
    }
}
