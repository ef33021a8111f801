//! Deal-seed derivation from the match seed.
//!
//! The match owns one 32-byte seed; each round derives its own shuffle
//! seed so a stored match seed replays every deal of the match.

/// Derive the shuffle seed for a round.
///
/// Same match seed and round number always yield the same deal.
pub fn derive_deal_seed(match_seed: &[u8; 32], round_no: u8) -> u64 {
    let mut hasher = blake3::Hasher::new();
    hasher.update(b"tichu/deal/v1");
    hasher.update(match_seed);
    hasher.update(&[round_no]);
    let hash = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&hash.as_bytes()[..8]);
    u64::from_le_bytes(bytes)
}
