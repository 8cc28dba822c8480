//! abridged-core: Deterministic builtin table for Abridged Certificates
//!
//! Every certificate in a trust-store report is reduced to a 32-byte digest and
//! placed in a flat, position-addressed table. Peers refer to a certificate by a
//! 3-byte identifier instead of shipping the full DER:
//!
//! ```text
//! identifier = prefix:1 || counter:2 (big-endian)
//! table      = digest[0] || digest[1] || ... || digest[N-1]   (32 * N bytes)
//! ```
//!
//! # Guarantees
//!
//! - **Reproducible**: the same record set always yields the same table bytes
//! - **Stable**: counter `i` always names the `i`-th record in creation order
//! - **Bounded**: an identifier outside `[0, N)` resolves to `None`, never panics
//!
//! # Pipeline
//!
//! | Stage | Type |
//! |-------|------|
//! | Hash certificate bytes | [`DigestEngine`] |
//! | Hand out identifiers | [`IdentifierAllocator`] |
//! | Sort and bind | [`TableBuilder`] -> [`OrderedTable`] |
//! | Persist / reload | [`CacheDocument`] |
//! | Flatten and look up | [`BuiltinTable`] |

mod atomic;
mod cache;
mod config;
mod digest;
mod emitter;
mod error;
mod identifier;
mod record;
mod table;

pub use atomic::write_atomic;
pub use cache::CacheDocument;
pub use config::{DigestAlgorithm, GeneratorConfig};
pub use digest::{DigestEngine, Keccak256Engine, Sha256Engine};
pub use emitter::{render_rust_source, BuiltinTable, Provenance};
pub use error::Error;
pub use identifier::{Identifier, IdentifierAllocator};
pub use record::CertificateRecord;
pub use table::{OrderedTable, TableBuilder, TableEntry};

pub type Result<T> = std::result::Result<T, Error>;

/// 32-byte certificate digest
pub type Digest = [u8; 32];

/// Constants for the builtin table layout
pub mod constants {
    /// Digest size in bytes (one table slot)
    pub const DIGEST_SIZE: usize = 32;

    /// Identifier size in bytes (prefix + big-endian u16 counter)
    pub const IDENTIFIER_SIZE: usize = 3;

    /// Prefix used for WebPKI builtins
    pub const DEFAULT_PREFIX: u8 = 0xff;

    /// Maximum number of entries addressable by a 2-byte counter
    pub const MAX_ENTRIES: usize = u16::MAX as usize + 1;
}
