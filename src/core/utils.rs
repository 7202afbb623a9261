pub trait IteratorMutExt<'a, T: 'a>: Iterator<Item = &'a mut T> {
    fn assign(self, other: impl IntoIterator<Item = T>)
    where
        Self: Sized,
    {
        self.zip(other).for_each(|(a, b)| *a = b);
    }
}

impl<'a, T: 'a, I: Iterator<Item = &'a mut T>> IteratorMutExt<'a, T> for I {}

/// Returns the bit reversed index of `i` which is represented by `log_size` bits.
pub const fn bit_reverse_index(i: usize, log_size: u32) -> usize {
    if log_size == 0 {
        return i;
    }
    i.reverse_bits() >> (usize::BITS - log_size)
}

/// Performs a naive bit-reversal permutation inplace.
///
/// # Panics
///
/// Panics if the length of the slice is not a power of two.
pub fn bit_reverse<T>(v: &mut [T]) {
    let n = v.len();
    assert!(n.is_power_of_two());
    let log_n = n.ilog2();
    for i in 0..n {
        let j = bit_reverse_index(i, log_n);
        if j > i {
            v.swap(i, j);
        }
    }
}

/// Maps position `position` of a bit-reversed evaluation over a domain of log size
/// `target_log_size` to the position holding the same value in a bit-reversed evaluation over
/// the domain of log size `source_log_size` obtained by repeated doubling.
///
/// The lowest bit (conjugate half selector) is kept and the `target_log_size - source_log_size`
/// bits above it are dropped. Returns `None` if `source_log_size > target_log_size`.
pub const fn lifted_index(
    position: usize,
    source_log_size: u32,
    target_log_size: u32,
) -> Option<usize> {
    if source_log_size > target_log_size {
        return None;
    }
    let shift = target_log_size - source_log_size;
    let high = match position.checked_shr(shift + 1) {
        Some(high) => high,
        None => 0,
    };
    Some((high << 1) | (position & 1))
}

#[cfg(test)]
mod tests {
    use super::{bit_reverse, bit_reverse_index, lifted_index};

    #[test]
    fn bit_reverse_works() {
        let mut data = [0, 1, 2, 3, 4, 5, 6, 7];
        bit_reverse(&mut data);
        assert_eq!(data, [0, 4, 2, 6, 1, 5, 3, 7]);
    }

    #[test]
    #[should_panic]
    fn bit_reverse_non_power_of_two_size_fails() {
        let mut data = [0, 1, 2, 3, 4, 5];
        bit_reverse(&mut data);
    }

    #[test]
    fn bit_reverse_index_works() {
        assert_eq!(bit_reverse_index(1, 3), 4);
        assert_eq!(bit_reverse_index(6, 3), 3);
        assert_eq!(bit_reverse_index(5, 0), 5);
    }

    #[test]
    fn lifted_index_keeps_conjugate_bit() {
        let lifted = (0..8).map(|p| lifted_index(p, 2, 3).unwrap()).collect::<Vec<_>>();

        assert_eq!(lifted, [0, 1, 0, 1, 2, 3, 2, 3]);
        assert_eq!(lifted_index(5, 3, 3), Some(5));
        assert_eq!(lifted_index(7, 1, 3), Some(1));
        assert_eq!(lifted_index(0, 4, 3), None);
    }
}
