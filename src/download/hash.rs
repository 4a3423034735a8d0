//! Hash verification for downloaded files.
//!
//! The digest algorithm is inferred from the expected hash:
//!
//! - **MD5**: 32 hexadecimal characters
//! - **SHA-256**: 64 hexadecimal characters
//!
//! Files are hashed by streaming fixed-size chunks, so arbitrarily large downloads
//! can be verified without loading them in memory.
//!
//! # Examples
//!
//! ```rust
//! use haul::download::hash::{detect_hash_type, HashType};
//!
//! assert_eq!(detect_hash_type("d41d8cd98f00b204e9800998ecf8427e"), Some(HashType::Md5));
//! assert_eq!(detect_hash_type("invalid"), None);
//! ```

use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

const CHUNK_SIZE: usize = 64 * 1024;

/// Supported hash types for file verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashType {
    /// MD5 hash algorithm
    Md5,
    /// SHA-256 hash algorithm
    Sha256,
}

/// Detect hash type based on the hash string format.
///
/// Returns `None` when the string is not a hex digest of a supported length.
pub fn detect_hash_type(hash: &str) -> Option<HashType> {
    if !hash.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match hash.len() {
        32 => Some(HashType::Md5),
        64 => Some(HashType::Sha256),
        _ => None,
    }
}

/// Streams `path` through the digest and returns it as lowercase hex.
pub fn hash_file(path: &Path, hash_type: HashType) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut buf = vec![0u8; CHUNK_SIZE];

    match hash_type {
        HashType::Md5 => {
            let mut context = md5::Context::new();
            loop {
                let read = file.read(&mut buf)?;
                if read == 0 {
                    break;
                }
                context.consume(&buf[..read]);
            }
            Ok(format!("{:x}", context.compute()))
        }
        HashType::Sha256 => {
            let mut hasher = Sha256::new();
            loop {
                let read = file.read(&mut buf)?;
                if read == 0 {
                    break;
                }
                hasher.update(&buf[..read]);
            }
            Ok(hex::encode(hasher.finalize()))
        }
    }
}

/// Case-insensitive comparison of two hex digests.
pub fn compare(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}
