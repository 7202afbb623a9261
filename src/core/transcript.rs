//! A domain separated Fiat-Shamir transcript over a generic [Hasher].
//!
//! Every hash invocation starts with a one byte tag naming the operation, followed by the
//! running state and a length-prefixed label, so absorbs and squeezes of different sub-protocols
//! never share a hash input.

use tracing::trace;

use crate::core::fields::m31::{BaseField, N_BYTES_FELT, P};
use crate::core::fields::qm31::SecureField;
use crate::core::hash::Hasher;

pub const INIT_TAG: u8 = 0x80;
pub const ABSORB_TAG: u8 = 0x81;
pub const SQUEEZE_TAG: u8 = 0x82;

#[derive(Clone, Debug)]
pub struct Transcript<H: Hasher> {
    state: H::Hash,
    counter: u64,
}

impl<H: Hasher> Transcript<H> {
    /// Starts a transcript bound to `domain`.
    pub fn new(domain: &[u8]) -> Self {
        let mut hasher = H::new();
        hasher.update(&[INIT_TAG]);
        update_with_len_prefix(&mut hasher, domain);
        Self {
            state: hasher.finalize(),
            counter: 0,
        }
    }

    pub fn state(&self) -> H::Hash {
        self.state
    }

    /// Absorbs `data` under `label`. Resets the squeeze counter.
    pub fn absorb(&mut self, label: &[u8], data: &[u8]) {
        let mut hasher = H::new();
        hasher.update(&[ABSORB_TAG]);
        hasher.update(self.state.as_ref());
        update_with_len_prefix(&mut hasher, label);
        hasher.update(data);
        self.state = hasher.finalize();
        self.counter = 0;
        trace!(state = %self.state, "Transcript absorb");
    }

    pub fn absorb_base_felts(&mut self, label: &[u8], felts: &[BaseField]) {
        let data = felts
            .iter()
            .flat_map(|felt| felt.to_le_bytes())
            .collect::<Vec<_>>();
        self.absorb(label, &data);
    }

    pub fn absorb_secure_felts(&mut self, label: &[u8], felts: &[SecureField]) {
        let data = felts
            .iter()
            .flat_map(|felt| felt.to_le_bytes())
            .collect::<Vec<_>>();
        self.absorb(label, &data);
    }

    pub fn absorb_u64(&mut self, label: &[u8], value: u64) {
        self.absorb(label, &value.to_le_bytes());
    }

    /// Produces a fresh output block under `label` without changing the state.
    pub fn squeeze(&mut self, label: &[u8]) -> H::Hash {
        let mut hasher = H::new();
        hasher.update(&[SQUEEZE_TAG]);
        hasher.update(self.state.as_ref());
        update_with_len_prefix(&mut hasher, label);
        hasher.update(&self.counter.to_le_bytes());
        self.counter += 1;
        hasher.finalize()
    }

    /// Draws a uniform base field element, squeezing until the leading word is below `P`.
    pub fn challenge_base_felt(&mut self, label: &[u8]) -> BaseField {
        loop {
            let block = self.squeeze(label);
            let mut word = [0; N_BYTES_FELT];
            word.copy_from_slice(&block.as_ref()[..N_BYTES_FELT]);
            let word = u32::from_le_bytes(word);
            if word < P {
                return BaseField::from_u32_unchecked(word);
            }
        }
    }

    pub fn challenge_secure_felt(&mut self, label: &[u8]) -> SecureField {
        SecureField::from_m31_array(std::array::from_fn(|_| self.challenge_base_felt(label)))
    }

    pub fn challenge_u64(&mut self, label: &[u8]) -> u64 {
        let block = self.squeeze(label);
        let mut bytes = [0; 8];
        bytes.copy_from_slice(&block.as_ref()[..8]);
        u64::from_le_bytes(bytes)
    }
}

fn update_with_len_prefix<H: Hasher>(hasher: &mut H, bytes: &[u8]) {
    hasher.update(&(bytes.len() as u32).to_le_bytes());
    hasher.update(bytes);
}
