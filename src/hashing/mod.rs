//! Módulo de hashing y canonicalización JSON.

pub mod hash;

pub use hash::{hash_bytes, hash_json, hash_str};
