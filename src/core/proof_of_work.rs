use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{span, Level};

use crate::core::channel::Channel;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProofOfWork {
    // Proof of work difficulty.
    pub n_bits: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofOfWorkProof {
    pub nonce: u64,
}

impl ProofOfWork {
    pub fn new(n_bits: u32) -> Self {
        Self { n_bits }
    }

    /// Finds a nonce for the current channel state and mixes it into the channel.
    pub fn prove(&self, channel: &mut impl Channel) -> ProofOfWorkProof {
        let _span = span!(Level::INFO, "Proof of work", n_bits = self.n_bits).entered();
        let proof = self.grind(channel);
        channel.mix_u64(proof.nonce);
        proof
    }

    pub fn verify(
        &self,
        channel: &mut impl Channel,
        proof: &ProofOfWorkProof,
    ) -> Result<(), ProofOfWorkVerificationError> {
        if !channel.verify_pow_nonce(self.n_bits, proof.nonce) {
            return Err(ProofOfWorkVerificationError::ProofOfWorkVerificationFailed);
        }

        channel.mix_u64(proof.nonce);
        Ok(())
    }

    /// Returns the smallest nonce accepted by the channel at `n_bits` difficulty.
    ///
    /// The search is exhaustive over `u64` nonces.
    fn grind(&self, channel: &impl Channel) -> ProofOfWorkProof {
        let nonce = (0..=u64::MAX)
            .find(|&nonce| channel.verify_pow_nonce(self.n_bits, nonce))
            .expect("Grind failed to find a solution.");
        ProofOfWorkProof { nonce }
    }
}

#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum ProofOfWorkVerificationError {
    #[error("Proof of work verification failed.")]
    ProofOfWorkVerificationFailed,
}

#[cfg(test)]
mod tests {
    use crate::core::channel::{Blake2sChannel, Channel};
    use crate::core::hash::Blake2sHash;
    use crate::core::proof_of_work::{
        ProofOfWork, ProofOfWorkProof, ProofOfWorkVerificationError,
    };

    #[test]
    fn test_verify_proof_of_work_success() {
        let mut channel = Blake2sChannel::new(Blake2sHash::default());
        let proof_of_work_verifier = ProofOfWork { n_bits: 10 };
        let proof = ProofOfWorkProof { nonce: 1003 };

        proof_of_work_verifier.verify(&mut channel, &proof).unwrap();
    }

    #[test]
    fn test_verify_proof_of_work_fail() {
        let mut channel = Blake2sChannel::new(Blake2sHash::default());
        let initial_digest = channel.digest();
        let proof_of_work_verifier = ProofOfWork { n_bits: 10 };
        let invalid_proof = ProofOfWorkProof { nonce: 1002 };

        let result = proof_of_work_verifier.verify(&mut channel, &invalid_proof);

        assert_eq!(
            result,
            Err(ProofOfWorkVerificationError::ProofOfWorkVerificationFailed)
        );
        assert_eq!(channel.digest(), initial_digest);
    }

    #[test]
    fn test_zero_difficulty_grinds_first_nonce() {
        let mut channel = Blake2sChannel::default();

        let proof = ProofOfWork::new(0).prove(&mut channel);

        assert_eq!(proof, ProofOfWorkProof { nonce: 0 });
    }

    #[test_log::test]
    fn test_proof_of_work() {
        let n_bits = 12;
        let mut prover_channel = Blake2sChannel::default();
        let mut verifier_channel = Blake2sChannel::default();
        let prover = ProofOfWork::new(n_bits);
        let verifier = ProofOfWork::new(n_bits);

        let proof = prover.prove(&mut prover_channel);
        verifier.verify(&mut verifier_channel, &proof).unwrap();

        assert_eq!(proof.nonce, 5455);
        assert_eq!(prover_channel.digest(), verifier_channel.digest());
        assert_eq!(
            prover_channel.draw_secure_felt(),
            verifier_channel.draw_secure_felt()
        );
    }
}
