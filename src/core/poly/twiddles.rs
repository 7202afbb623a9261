use num_traits::Zero;
use thiserror::Error;
use tracing::{span, Level};

use crate::core::circle::Coset;
use crate::core::fields::m31::BaseField;
use crate::core::fields::{batch_inverse_in_place, FieldExpOps};
use crate::core::utils::bit_reverse;

/// Log size of the chunks batch inversion of inverse twiddles is split into.
pub const CHUNK_LOG_SIZE: u32 = 12;
const CHUNK_SIZE: usize = 1 << CHUNK_LOG_SIZE;

#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum TwiddleError {
    #[error("twiddle at index {index} is zero and has no inverse")]
    SingularTwiddle { index: usize },
}

/// Precomputed twiddles for a specific coset tower.
///
/// A coset tower is every repeated doubling of a `root_coset`.
/// The largest CircleDomain that can be ffted using these twiddles is one with `root_coset` as
/// its `half_coset`.
#[derive(Clone, Debug)]
pub struct TwiddleTree {
    pub root_coset: Coset,
    pub twiddles: Vec<BaseField>,
    pub itwiddles: Vec<BaseField>,
}

impl TwiddleTree {
    pub fn len(&self) -> usize {
        self.twiddles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.twiddles.is_empty()
    }
}

/// Computes the twiddles of `coset` and their inverses.
///
/// For cosets smaller than `2^CHUNK_LOG_SIZE` every twiddle is inverted on its own; larger ones
/// are batch inverted one chunk at a time.
pub fn precompute_twiddles(coset: Coset) -> Result<TwiddleTree, TwiddleError> {
    let _span = span!(Level::INFO, "Precompute twiddles", log_size = coset.log_size()).entered();
    let root_coset = coset;
    let twiddles = slow_precompute_twiddles(coset);

    if let Some(index) = twiddles.iter().position(|t| t.is_zero()) {
        return Err(TwiddleError::SingularTwiddle { index });
    }

    // Fallback to the non-chunked version if the domain is not big enough.
    if CHUNK_SIZE > root_coset.size() {
        let itwiddles = twiddles.iter().map(|t| t.inverse()).collect();
        return Ok(TwiddleTree {
            root_coset,
            twiddles,
            itwiddles,
        });
    }

    let mut itwiddles = vec![BaseField::zero(); twiddles.len()];
    twiddles
        .chunks(CHUNK_SIZE)
        .zip(itwiddles.chunks_mut(CHUNK_SIZE))
        .for_each(|(src, dst)| batch_inverse_in_place(src, dst));

    Ok(TwiddleTree {
        root_coset,
        twiddles,
        itwiddles,
    })
}

/// Computes the twiddle tower of `coset`: for every doubling level, the x coordinates of the
/// first half of the level's points in bit reversed order, followed by a trailing `1`.
pub fn slow_precompute_twiddles(mut coset: Coset) -> Vec<BaseField> {
    let mut twiddles = Vec::with_capacity(coset.size());
    for _ in 0..coset.log_size() {
        let i0 = twiddles.len();
        twiddles.extend(coset.iter().take(coset.size() / 2).map(|p| p.x));
        bit_reverse(&mut twiddles[i0..]);
        coset = coset.double();
    }
    // Pad with an arbitrary value to make the length a power of 2.
    twiddles.push(1.into());
    twiddles
}

#[cfg(test)]
mod tests {
    use num_traits::One;

    use super::{precompute_twiddles, slow_precompute_twiddles, TwiddleError, CHUNK_LOG_SIZE};
    use crate::core::circle::{CirclePointIndex, Coset};
    use crate::core::fields::m31::BaseField;
    use crate::core::poly::circle::CanonicCoset;

    #[test_log::test]
    fn test_twiddles_times_itwiddles_is_one() {
        for log_size in [CHUNK_LOG_SIZE - 1, CHUNK_LOG_SIZE, CHUNK_LOG_SIZE + 1] {
            let coset = CanonicCoset::new(log_size + 1).half_coset();

            let tree = precompute_twiddles(coset).unwrap();

            assert_eq!(tree.len(), coset.size());
            for (t, it) in tree.twiddles.iter().zip(&tree.itwiddles) {
                assert_eq!(*t * *it, BaseField::one());
            }
        }
    }

    #[test]
    fn test_twiddle_layout() {
        let coset = CanonicCoset::new(4).half_coset();

        let twiddles = slow_precompute_twiddles(coset);

        let first_level = [0, 2, 1, 3].map(|i| coset.at(i).x);
        let second_level = [0, 1].map(|i| coset.double().at(i).x);
        let third_level = coset.double().double().at(0).x;
        assert_eq!(twiddles[..4], first_level);
        assert_eq!(twiddles[4..6], second_level);
        assert_eq!(twiddles[6], third_level);
        assert_eq!(twiddles[7], BaseField::one());
    }

    #[test]
    fn test_singular_twiddle_fails() {
        // The subgroup contains G_4 = (0, 1), which lands right after the identity.
        let coset = Coset::new(CirclePointIndex::zero(), 3);

        let result = precompute_twiddles(coset);

        assert!(matches!(
            result,
            Err(TwiddleError::SingularTwiddle { index: 1 })
        ));
    }
}
