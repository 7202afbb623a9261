use std::iter;

use tracing::trace;

use super::{Channel, ChannelTime, POW_PREFIX};
use crate::core::fields::m31::{BaseField, N_BYTES_FELT, P};
use crate::core::fields::qm31::{SecureField, SECURE_EXTENSION_DEGREE};
use crate::core::hash::{Blake2sHash, Blake2sHasher, Hasher};

pub const BLAKE_BYTES_PER_HASH: usize = 32;
pub const FELTS_PER_HASH: usize = 8;

/// A channel that can be used to draw random elements from a [Blake2sHash] digest.
#[derive(Default, Clone, Debug)]
pub struct Blake2sChannel {
    digest: Blake2sHash,
    pub channel_time: ChannelTime,
}

impl Blake2sChannel {
    pub fn new(digest: Blake2sHash) -> Self {
        Self {
            digest,
            channel_time: ChannelTime::default(),
        }
    }

    pub const fn digest(&self) -> Blake2sHash {
        self.digest
    }

    pub fn update_digest(&mut self, new_digest: Blake2sHash) {
        trace!(digest = %new_digest, "Channel mix");
        self.digest = new_digest;
        self.channel_time.inc_challenges();
    }

    /// Generates a uniform random vector of BaseField elements.
    pub fn draw_base_felts(&mut self) -> [BaseField; FELTS_PER_HASH] {
        // Repeats hashing with an increasing counter until getting a good result.
        // Retry probability for each round is ~ 2^(-28).
        loop {
            let u32s = self.draw_u32_array();

            // Retry if not all the u32 are in the range [0, 2P).
            if u32s.iter().all(|x| *x < 2 * P) {
                return u32s.map(BaseField::partial_reduce);
            }
        }
    }

    fn draw_u32_array(&mut self) -> [u32; FELTS_PER_HASH] {
        let mut hasher = Blake2sHasher::new();
        hasher.update(self.digest.as_ref());
        hasher.update(&self.channel_time.n_sent.to_le_bytes());
        hasher.update(&[0]);
        self.channel_time.inc_sent();

        let bytes = hasher.finalize().0;
        std::array::from_fn(|i| {
            let mut word = [0; N_BYTES_FELT];
            word.copy_from_slice(&bytes[i * N_BYTES_FELT..(i + 1) * N_BYTES_FELT]);
            u32::from_le_bytes(word)
        })
    }
}

impl Channel for Blake2sChannel {
    const BYTES_PER_HASH: usize = BLAKE_BYTES_PER_HASH;

    fn mix_u32s(&mut self, data: &[u32]) {
        let mut hasher = Blake2sHasher::new();
        hasher.update(self.digest.as_ref());
        for word in data {
            hasher.update(&word.to_le_bytes());
        }

        self.update_digest(hasher.finalize());
    }

    fn mix_felts(&mut self, felts: &[SecureField]) {
        let mut hasher = Blake2sHasher::new();
        hasher.update(self.digest.as_ref());
        for felt in felts {
            hasher.update(&felt.to_le_bytes());
        }

        self.update_digest(hasher.finalize());
    }

    fn mix_u64(&mut self, value: u64) {
        self.mix_u32s(&[value as u32, (value >> 32) as u32]);
    }

    fn draw_secure_felt(&mut self) -> SecureField {
        let felts = self.draw_base_felts();
        SecureField::from_m31_array(std::array::from_fn(|i| felts[i]))
    }

    fn draw_secure_felts(&mut self, n_felts: usize) -> Vec<SecureField> {
        let mut felts = iter::from_fn(|| Some(self.draw_base_felts())).flat_map(|batch| {
            batch
                .chunks_exact(SECURE_EXTENSION_DEGREE)
                .map(|chunk| SecureField::from_m31_array(std::array::from_fn(|i| chunk[i])))
                .collect::<Vec<_>>()
        });
        iter::repeat_with(|| felts.next())
            .take(n_felts)
            .flatten()
            .collect()
    }

    fn draw_u32s(&mut self) -> Vec<u32> {
        self.draw_u32_array().to_vec()
    }

    fn verify_pow_nonce(&self, n_bits: u32, nonce: u64) -> bool {
        let mut hasher = Blake2sHasher::new();
        hasher.update(&POW_PREFIX.to_le_bytes());
        hasher.update(&[0_u8; 12]);
        hasher.update(self.digest.as_ref());
        hasher.update(&n_bits.to_le_bytes());
        let prefixed_digest = hasher.finalize();

        let mut hasher = Blake2sHasher::new();
        hasher.update(prefixed_digest.as_ref());
        hasher.update(&nonce.to_le_bytes());
        let res = hasher.finalize();

        let n_zeros = u128::from_le_bytes(std::array::from_fn(|i| res.0[i])).trailing_zeros();
        n_zeros >= n_bits
    }
}
