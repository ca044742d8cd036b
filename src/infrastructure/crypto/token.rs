//! Bearer token key generation

use rand::rngs::OsRng;
use rand::RngCore;

/// Random bytes per key; hex encoding doubles the length.
const TOKEN_BYTES: usize = 20;

/// Length of a generated key in characters.
pub const TOKEN_KEY_LENGTH: usize = TOKEN_BYTES * 2;

/// Generate an opaque key: 20 bytes from the OS CSPRNG, hex encoded.
pub fn generate_token_key() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}
