use rand_core::{OsRng, RngCore};

use crate::error::CryptoError;
use crate::zeroizing::ZeroizingBytes;

/// Smallest entropy length accepted for wallet generation (128 bits).
pub const MIN_ENTROPY_LEN: usize = 16;

/// A source of key-generation entropy.
///
/// Implementations must either fill the whole buffer or fail. There is no
/// partial fill and no fallback to a weaker generator.
pub trait EntropySource {
    fn fill(&mut self, buf: &mut [u8]) -> Result<(), CryptoError>;

    /// Returns `len` bytes of entropy in a zero-on-drop buffer.
    fn entropy(&mut self, len: usize) -> Result<ZeroizingBytes, CryptoError> {
        if len < MIN_ENTROPY_LEN {
            return Err(CryptoError::EntropyTooShort {
                min: MIN_ENTROPY_LEN,
                got: len,
            });
        }
        let mut buf = vec![0u8; len];
        self.fill(&mut buf)?;
        Ok(ZeroizingBytes::new(buf))
    }
}

/// Operating-system CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn fill(&mut self, buf: &mut [u8]) -> Result<(), CryptoError> {
        OsRng
            .try_fill_bytes(buf)
            .map_err(|e| CryptoError::EntropyUnavailable(e.to_string()))
    }
}

/// Replays a caller-supplied byte sequence.
///
/// Meant for test vectors and reproducible tooling; never for real wallets.
#[derive(Debug, Clone)]
pub struct FixedEntropy {
    bytes: ZeroizingBytes,
    cursor: usize,
}

impl FixedEntropy {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: ZeroizingBytes::new(bytes.into()),
            cursor: 0,
        }
    }
}

impl EntropySource for FixedEntropy {
    fn fill(&mut self, buf: &mut [u8]) -> Result<(), CryptoError> {
        let remaining = self.bytes.len() - self.cursor;
        if buf.len() > remaining {
            return Err(CryptoError::EntropyExhausted {
                requested: buf.len(),
                remaining,
            });
        }
        buf.copy_from_slice(&self.bytes[self.cursor..self.cursor + buf.len()]);
        self.cursor += buf.len();
        Ok(())
    }
}
