//! Short identifier allocation.
//!
//! Normalizes caller-supplied ids and generates random ones. Allocation
//! does not check uniqueness; the link service performs the collision
//! check against the store before committing.

use crate::error::AppError;
use serde_json::json;

/// Random bytes drawn before base58 encoding.
const ID_ENTROPY_BYTES: usize = 10;

/// Length of a generated identifier.
const GENERATED_ID_LENGTH: usize = 6;

/// Bitcoin base58 alphabet: no `0`, `O`, `I`, `l`.
const BASE58_ALPHABET: &[u8] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Produces the identifier to use for a new link.
///
/// A non-empty requested id is normalized and used as-is. An absent id, or
/// one that normalizes to nothing, falls through to random generation.
///
/// # Errors
///
/// Returns [`AppError::Unexpected`] when the system random source fails.
/// Generation never falls back to a predictable value.
pub fn allocate(requested_id: Option<&str>) -> Result<String, AppError> {
    if let Some(requested) = requested_id {
        let normalized = normalize_id(requested);
        if !normalized.is_empty() {
            return Ok(normalized);
        }
    }

    generate_random_id()
}

/// Normalizes a caller-supplied identifier.
///
/// Strips characters outside digits, Latin letters, hyphens and spaces,
/// collapses whitespace runs, trims, and replaces internal spaces with
/// hyphens. May return an empty string.
pub fn normalize_id(requested: &str) -> String {
    let cleaned: String = requested
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == ' ')
        .collect();

    cleaned
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

/// Generates a 6-character base58 identifier from cryptographically random
/// bytes.
fn generate_random_id() -> Result<String, AppError> {
    let mut buffer = [0u8; ID_ENTROPY_BYTES];

    getrandom::fill(&mut buffer).map_err(|e| {
        tracing::error!(error = %e, "random source failure during id generation");
        AppError::unexpected("Failed to generate identifier", json!({}))
    })?;

    let mut encoded = base58_encode(&buffer);
    encoded.truncate(GENERATED_ID_LENGTH);

    Ok(encoded)
}

/// Base58 encoding by repeated division, most significant digit first.
fn base58_encode(bytes: &[u8]) -> String {
    let mut digits: Vec<u8> = Vec::with_capacity(bytes.len() * 2);

    for &byte in bytes {
        let mut carry = byte as u32;
        for digit in digits.iter_mut() {
            carry += (*digit as u32) << 8;
            *digit = (carry % 58) as u8;
            carry /= 58;
        }
        while carry > 0 {
            digits.push((carry % 58) as u8);
            carry /= 58;
        }
    }

    // Leading zero bytes encode as the alphabet's zero digit.
    for _ in bytes.iter().take_while(|&&b| b == 0) {
        digits.push(0);
    }

    digits
        .iter()
        .rev()
        .map(|&d| BASE58_ALPHABET[d as usize] as char)
        .collect()
}
