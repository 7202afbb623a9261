use super::fields::qm31::SecureField;

mod blake2s;

pub use blake2s::Blake2sChannel;

/// Prefix hashed in front of the channel digest when binding a proof of work nonce.
pub const POW_PREFIX: u32 = 0x12345678;

/// Counts the mixes a channel absorbed and the draws made since the last mix.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChannelTime {
    pub n_challenges: usize,
    pub n_sent: u32,
}

impl ChannelTime {
    fn inc_sent(&mut self) {
        self.n_sent += 1;
    }

    fn inc_challenges(&mut self) {
        self.n_challenges += 1;
        self.n_sent = 0;
    }
}

/// A Fiat-Shamir channel.
///
/// Every mix replaces the digest and resets the draw counter; every draw hashes the digest
/// together with the counter and advances it. Two channels fed the same mixes produce the same
/// draws.
pub trait Channel: Default + Clone {
    const BYTES_PER_HASH: usize;

    // Mix functions.
    fn mix_u32s(&mut self, data: &[u32]);
    fn mix_felts(&mut self, felts: &[SecureField]);
    /// Mixes the little-endian `u32` halves of `value`, low half first.
    fn mix_u64(&mut self, value: u64);

    // Draw functions.
    fn draw_secure_felt(&mut self) -> SecureField;
    /// Generates a uniform random vector of SecureField elements.
    fn draw_secure_felts(&mut self, n_felts: usize) -> Vec<SecureField>;
    /// Returns `BYTES_PER_HASH / 4` random words.
    fn draw_u32s(&mut self) -> Vec<u32>;

    /// Checks that `nonce` carries at least `n_bits` of proof of work bound to the current digest.
    fn verify_pow_nonce(&self, n_bits: u32, nonce: u64) -> bool;
}
