//! Hash related utils.

use base64::prelude::BASE64_STANDARD;
use base64::Engine;
use sha2::Digest;
use sha2::Sha256;

/// Base64 encode.
pub fn base64_encode(content: &[u8]) -> String {
    BASE64_STANDARD.encode(content)
}

/// Base64 encoded SHA256 hash.
///
/// Use this function instead of `base64_encode(&sha256(content))` can reduce
/// extra copy.
pub fn base64_sha256(content: &[u8]) -> String {
    BASE64_STANDARD.encode(Sha256::digest(content).as_slice())
}
