pub mod expiry;

pub use expiry::{MAX_EXPIRE_IN_DAYS, SECONDS_PER_DAY, expiry_for, expiry_from, is_expired};

use crate::errors::Result;

/// 短码字符集：小写、大写字母与数字，共 62 个
pub const CODE_ALPHABET: &[u8; 62] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Largest multiple of 62 that fits in a byte. Bytes at or above it are
/// rejected so that `byte % 62` stays uniform.
const REJECTION_LIMIT: u8 = (256 / CODE_ALPHABET.len() * CODE_ALPHABET.len()) as u8;

/// Generate a random short code of `length` characters.
///
/// Every character is drawn independently and uniformly from [`CODE_ALPHABET`]
/// using the operating system CSPRNG. Uniqueness is not guaranteed here; the
/// store rejects duplicates on insert.
///
/// Bytes come straight from `getrandom` rather than `rand`'s thread RNG, which
/// panics instead of reporting a failed entropy read.
///
/// # Errors
/// Returns `TinylinkError::RandomSource` if the entropy source is unavailable.
pub fn generate_random_code(length: usize) -> Result<String> {
    let mut code = String::with_capacity(length);
    // 多取一些字节，减少被拒绝采样后再次读取熵源的次数
    let mut buffer = vec![0u8; length + length / 4 + 4];

    while code.len() < length {
        getrandom::fill(&mut buffer)?;
        for &byte in buffer.iter().filter(|&&b| b < REJECTION_LIMIT) {
            code.push(CODE_ALPHABET[(byte % CODE_ALPHABET.len() as u8) as usize] as char);
            if code.len() == length {
                break;
            }
        }
    }

    Ok(code)
}

/// A path segment can only be a short code if it is non-empty and uses the
/// code alphabet.
pub fn is_valid_short_code(code: &str) -> bool {
    !code.is_empty() && code.bytes().all(|b| b.is_ascii_alphanumeric())
}
