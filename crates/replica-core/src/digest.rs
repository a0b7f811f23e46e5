//! # Script Digest
//!
//! Deterministic fingerprints of a script, so two snapshots of the same
//! graph can be compared without diffing their text.
//!
//! - `export_canonical` encodes the script as a bit-exact `postcard` stream
//! - `script_checksum` is a fast order-sensitive checksum over that stream
//! - `script_hash` (feature `crypto-hash`) is the BLAKE3 hash of it

use crate::script::Script;
use crate::types::ReplicaError;
use serde::Serialize;

/// Magic bytes prefixed to the canonical encoding.
pub const CANONICAL_MAGIC: [u8; 4] = *b"RPLS";

/// Current canonical format version.
pub const CANONICAL_VERSION: u8 = 1;

#[derive(Serialize)]
struct CanonicalHeader {
    magic: [u8; 4],
    version: u8,
    statement_count: u64,
}

/// Encode a script to its canonical byte form.
///
/// Format:
/// ```text
/// [header_len: u32 LE] [CanonicalHeader (postcard)] [Script (postcard)]
/// ```
///
/// # Errors
///
/// Returns `ReplicaError::SerializationError` if encoding fails.
pub fn export_canonical(script: &Script) -> Result<Vec<u8>, ReplicaError> {
    let header = CanonicalHeader {
        magic: CANONICAL_MAGIC,
        version: CANONICAL_VERSION,
        statement_count: script.len() as u64,
    };

    let header_bytes = postcard::to_allocvec(&header)
        .map_err(|e| ReplicaError::SerializationError(format!("Header: {e}")))?;
    let data_bytes = postcard::to_allocvec(script)
        .map_err(|e| ReplicaError::SerializationError(format!("Script: {e}")))?;

    let header_len = u32::try_from(header_bytes.len())
        .map_err(|_| ReplicaError::SerializationError("Header too large".to_string()))?;

    let mut result = Vec::with_capacity(4 + header_bytes.len() + data_bytes.len());
    result.extend_from_slice(&header_len.to_le_bytes());
    result.extend_from_slice(&header_bytes);
    result.extend_from_slice(&data_bytes);

    Ok(result)
}

/// Checksum of raw canonical bytes.
///
/// FNV-1a with a position-dependent rotation, so reordering statements
/// changes the result. Not a cryptographic hash.
#[must_use]
pub fn checksum_bytes(data: &[u8]) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;

    let mut hash = OFFSET;
    for (i, byte) in data.iter().enumerate() {
        hash ^= u64::from(*byte).rotate_left((i % 64) as u32);
        hash = hash.wrapping_mul(PRIME);
    }
    hash ^= (data.len() as u64).rotate_left(7);
    hash
}

/// Deterministic checksum of a script.
///
/// # Errors
///
/// Returns `ReplicaError::SerializationError` if encoding fails.
pub fn script_checksum(script: &Script) -> Result<u64, ReplicaError> {
    export_canonical(script).map(|bytes| checksum_bytes(&bytes))
}

/// BLAKE3 hash of a script's canonical encoding, as 64 hex characters.
///
/// # Errors
///
/// Returns `ReplicaError::SerializationError` if encoding fails.
#[cfg(feature = "crypto-hash")]
pub fn script_hash(script: &Script) -> Result<String, ReplicaError> {
    let data = export_canonical(script)?;
    Ok(blake3::hash(&data).to_hex().to_string())
}

/// Check a script against a previously recorded BLAKE3 hash.
#[cfg(feature = "crypto-hash")]
#[must_use]
pub fn verify_script_hash(script: &Script, expected: &str) -> bool {
    script_hash(script).is_ok_and(|actual| actual.eq_ignore_ascii_case(expected))
}

// =============================================================================
// TESTS
// =============================================================================
