use blake2::{Blake2s256, Digest};
use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use super::{impl_hash, Hasher, HASH_SIZE};

/// A Blake2s-256 digest. Also the state of [crate::core::channel::Blake2sChannel].
#[repr(C, align(32))]
#[derive(Clone, Copy, PartialEq, Default, Eq, Pod, Zeroable, Deserialize, Serialize)]
pub struct Blake2sHash(pub [u8; HASH_SIZE]);

impl_hash!(Blake2sHash);

#[derive(Clone, Debug, Default)]
pub struct Blake2sHasher {
    state: Blake2s256,
}

impl Hasher for Blake2sHasher {
    type Hash = Blake2sHash;

    fn new() -> Self {
        Self::default()
    }

    fn update(&mut self, data: &[u8]) {
        Digest::update(&mut self.state, data);
    }

    fn finalize(self) -> Blake2sHash {
        Blake2sHash(self.state.finalize().into())
    }
}

#[cfg(test)]
mod tests {
    use super::{Blake2sHash, Blake2sHasher};
    use crate::core::hash::Hasher;

    #[test]
    fn single_hash_test() {
        let hash_a = Blake2sHasher::hash(b"a");
        assert_eq!(
            hash_a.to_string(),
            "4a0d129873403037c2cd9b9048203687f6233fb6738956e0349bd4320fec3e90"
        );
    }

    #[test]
    fn hash_state_test() {
        let mut state = Blake2sHasher::new();
        state.update(b"a");
        state.update(b"b");

        assert_eq!(state.finalize(), Blake2sHasher::hash(b"ab"));
    }

    #[test]
    fn test_debug_matches_display() {
        let hash = Blake2sHash::from([0xab; 32]);

        assert_eq!(format!("{hash:?}"), "ab".repeat(32));
        assert_eq!(hash.as_ref(), [0xab; 32]);
    }
}
