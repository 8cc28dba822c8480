//! builtins-builder: Abridged Certs builtin table generator
//!
//! Turns a trust-store certificate report (or a cache of a previous run) into
//! a generated Rust module holding the flat digest table.

pub mod builder;
pub mod feed;

pub use builder::{today, BuiltinsBuilder, GeneratedBuiltins};
pub use feed::{load_records, parse_records, FeedRecord};
