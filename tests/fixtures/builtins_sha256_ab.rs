// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Licensed under either of the Apache License, Version 2.0 or the MIT license,
// at your option. This file may not be copied, modified, or distributed
// except according to those terms.

// @generated by builtins-builder. Do not edit by hand.
// Generation Date: 2024-01-02
// Based on list version: 2024-01-01
// Digest algorithm: sha256

/// Number of builtin certificates
pub const ABRIDGED_CERT_COUNT: usize = 2;

/// Given an Abridged Cert identifier, look up the hash of the corresponding certificate
pub fn id_to_hash(id: &[u8; 3]) -> Option<&'static [u8; 32]> {
    let index = usize::from(u16::from_be_bytes([id[1], id[2]]));
    let start = index * 32;
    ABRIDGED_CERT_BYTES
        .get(start..start + 32)
        .and_then(|slice| slice.try_into().ok())
}

/// Hashes needed for this Abridged Certs scheme, in identifier order
pub fn get_needed_hashes() -> impl Iterator<Item = &'static [u8; 32]> {
    ABRIDGED_CERT_BYTES
        .chunks_exact(32)
        .filter_map(|chunk| chunk.try_into().ok())
}

static ABRIDGED_CERT_BYTES: [u8; 64] = [
    0x55, 0x9a, 0xea, 0xd0, 0x82, 0x64, 0xd5, 0x79, 0x5d, 0x39, 0x09, 0x71, 0x8c, 0xdd, 0x05, 0xab,
    0xd4, 0x95, 0x72, 0xe8, 0x4f, 0xe5, 0x55, 0x90, 0xee, 0xf3, 0x1a, 0x88, 0xa0, 0x8f, 0xdf, 0xfd,
    0xdf, 0x7e, 0x70, 0xe5, 0x02, 0x15, 0x44, 0xf4, 0x83, 0x4b, 0xbe, 0xe6, 0x4a, 0x9e, 0x37, 0x89,
    0xfe, 0xbc, 0x4b, 0xe8, 0x14, 0x70, 0xdf, 0x62, 0x9c, 0xad, 0x6d, 0xdb, 0x03, 0x32, 0x0a, 0x5c,
];
