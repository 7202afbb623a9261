use std::fmt::{Debug, Display};

use serde::{Deserialize, Serialize};

/// Implements [Hash] and its byte conversions and hex formatting for a newtype over
/// `[u8; HASH_SIZE]`.
macro_rules! impl_hash {
    ($hash: ident) => {
        impl From<[u8; $crate::core::hash::HASH_SIZE]> for $hash {
            fn from(value: [u8; $crate::core::hash::HASH_SIZE]) -> Self {
                Self(value)
            }
        }

        impl AsRef<[u8]> for $hash {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl ::std::fmt::Display for $hash {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(&::hex::encode(self.0))
            }
        }

        impl ::std::fmt::Debug for $hash {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                ::std::fmt::Display::fmt(self, f)
            }
        }

        impl $crate::core::hash::Hash for $hash {}
    };
}
pub(crate) use impl_hash;

pub mod blake2s_hash;
pub mod blake3_hash;

pub use self::blake2s_hash::{Blake2sHash, Blake2sHasher};
pub use self::blake3_hash::{Blake3Hash, Blake3Hasher};

/// Output size in bytes of every hash in this module.
pub const HASH_SIZE: usize = 32;

pub trait Hash:
    Copy
    + Default
    + Display
    + Debug
    + Eq
    + Send
    + Sync
    + 'static
    + AsRef<[u8]>
    + From<[u8; HASH_SIZE]>
    + Serialize
    + for<'de> Deserialize<'de>
{
}

/// An incremental hash function with a fixed 32 byte output.
///
/// # Example
///
/// ```
/// use stwo_composition::core::hash::{Blake3Hasher, Hasher};
///
/// let mut hasher = Blake3Hasher::new();
/// hasher.update(&[1, 2, 3]);
/// hasher.update(&[4, 5, 6]);
/// let hash = hasher.finalize();
///
/// assert_eq!(hash, Blake3Hasher::hash(&[1, 2, 3, 4, 5, 6]));
/// ```
pub trait Hasher: Clone + Default + Debug {
    type Hash: Hash;

    fn new() -> Self;

    fn update(&mut self, data: &[u8]);

    fn finalize(self) -> Self::Hash;

    fn hash(data: &[u8]) -> Self::Hash {
        let mut hasher = Self::new();
        hasher.update(data);
        hasher.finalize()
    }
}
