//! Certificate digest engines

use sha2::{Digest as _, Sha256};
use tiny_keccak::{Hasher, Keccak};

use crate::Digest;

/// Fixed-output 256-bit hash over a certificate's encoded bytes.
///
/// Implementations must be pure: identical payloads always produce identical
/// digests, with no salt or per-instance state.
pub trait DigestEngine {
    /// Short algorithm name, used in logs and generated file headers
    fn name(&self) -> &'static str;

    /// Hash the DER payload
    fn digest(&self, payload: &[u8]) -> Digest;
}

/// SHA-256, the algorithm builtins are published with
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Engine;

impl DigestEngine for Sha256Engine {
    fn name(&self) -> &'static str {
        "sha256"
    }

    fn digest(&self, payload: &[u8]) -> Digest {
        Sha256::digest(payload).into()
    }
}

/// Keccak-256 (pre-standard SHA-3 padding)
#[derive(Debug, Clone, Copy, Default)]
pub struct Keccak256Engine;

impl DigestEngine for Keccak256Engine {
    fn name(&self) -> &'static str {
        "keccak256"
    }

    fn digest(&self, payload: &[u8]) -> Digest {
        let mut hasher = Keccak::v256();
        hasher.update(payload);
        let mut out = [0u8; 32];
        hasher.finalize(&mut out);
        out
    }
}

impl<D: DigestEngine + ?Sized> DigestEngine for &D {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn digest(&self, payload: &[u8]) -> Digest {
        (**self).digest(payload)
    }
}

impl<D: DigestEngine + ?Sized> DigestEngine for Box<D> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn digest(&self, payload: &[u8]) -> Digest {
        (**self).digest(payload)
    }
}
