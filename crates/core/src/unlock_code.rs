//! Unlock-code generation.
//!
//! Every booking is created with a short human-readable code that the
//! host must present to start the ride. The code is checked exactly
//! once; after the ride starts it is never used for authorization again.

use rand::Rng;

/// Code alphabet: uppercase letters and digits 1-9, minus the
/// easily-confused glyphs I, O and 0.
pub const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ123456789";

/// Length of a generated unlock code.
pub const CODE_LENGTH: usize = 6;

/// Generate a 6-character unlock code, each character drawn uniformly
/// (with replacement) from [`CODE_ALPHABET`].
///
/// No uniqueness is enforced here; collisions across bookings are
/// accepted at roughly one in a billion.
pub fn generate_unlock_code() -> String {
    let mut rng = rand::rng();
    (0..CODE_LENGTH)
        .map(|_| CODE_ALPHABET[rng.random_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}
