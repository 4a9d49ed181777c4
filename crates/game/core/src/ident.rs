//! Identifier generation for locally created entities.

use rand::Rng;

const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generates a short, collision-resistant identifier.
///
/// Twelve random base-36 characters (~62 bits of entropy), enough for ids
/// that only need to be unique within a single player's records.
pub fn generate_id() -> String {
    let mut rng = rand::thread_rng();
    (0..12)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}
