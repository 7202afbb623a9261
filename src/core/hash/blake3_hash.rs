use serde::{Deserialize, Serialize};

use super::{impl_hash, Hasher, HASH_SIZE};

#[derive(Clone, Copy, PartialEq, Default, Eq, Serialize, Deserialize)]
pub struct Blake3Hash([u8; HASH_SIZE]);

impl_hash!(Blake3Hash);

#[derive(Clone, Debug, Default)]
pub struct Blake3Hasher {
    state: blake3::Hasher,
}

impl Hasher for Blake3Hasher {
    type Hash = Blake3Hash;

    fn new() -> Self {
        Self::default()
    }

    fn update(&mut self, data: &[u8]) {
        self.state.update(data);
    }

    fn finalize(self) -> Blake3Hash {
        Blake3Hash(self.state.finalize().into())
    }
}

#[cfg(test)]
mod tests {
    use super::Blake3Hasher;
    use crate::core::hash::Hasher;

    #[test]
    fn single_hash_test() {
        let hash_a = Blake3Hasher::hash(b"a");
        assert_eq!(
            hash_a.to_string(),
            "17762fddd969a453925d65717ac3eea21320b66b54342fde15128d6caf21215f"
        );
    }

    #[test]
    fn hash_state_test() {
        let mut state = Blake3Hasher::new();
        state.update(b"a");
        state.update(b"b");

        assert_eq!(state.finalize(), Blake3Hasher::hash(b"ab"));
    }
}
