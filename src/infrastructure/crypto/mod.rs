//! Cryptographic primitives: password hashing and token generation

pub mod password;
pub mod token;

pub use password::{hash_password, verify_password, PasswordHasher};
pub use token::generate_token_key;
