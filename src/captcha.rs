//! Reverse lookup of the numeric captcha by its MD5 digest
//!
//! The remote page embeds only the digest of a five-digit code,
//! so every possible code is hashed once at startup.

use std::collections::HashMap;

use md5::{Digest, Md5};

/// Number of the possible codes: `00000..=99999`
pub const CAPTCHA_SPACE: u32 = 100_000;

const CAPTCHA_DIGITS: usize = 5;

/// Failure to reverse a captcha digest
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CaptchaError {
    /// The digest of some other text
    #[error("captcha hash {0:?} is not a digest of any 5-digit code")]
    NotFound(String),
}

/// The code as it is typed by a human: zero-padded to five digits
pub fn captcha_code(number: u32) -> String {
    format!("{number:0width$}", width = CAPTCHA_DIGITS)
}

/// Lowercase hex MD5 digest of the code
pub fn captcha_hash(code: &str) -> String {
    format!("{:x}", Md5::digest(code.as_bytes()))
}

/// Digest-to-code table covering the whole captcha space.
///
/// Immutable after [`CaptchaTable::build`]; share it with `Arc`.
#[derive(Debug, Clone)]
pub struct CaptchaTable {
    codes: HashMap<String, String>,
}

impl CaptchaTable {
    /// Hash every code of the captcha space
    pub fn build() -> Self {
        let codes = (0..CAPTCHA_SPACE)
            .map(|number| {
                let code = captcha_code(number);
                (captcha_hash(&code), code)
            })
            .collect();
        Self { codes }
    }

    /// The code which digest is `hash` (hex, any case).
    ///
    /// # Errors
    /// The digest does not belong to any five-digit code.
    pub fn resolve(&self, hash: &str) -> Result<&str, CaptchaError> {
        self.codes
            .get(&hash.to_ascii_lowercase())
            .map(String::as_str)
            .ok_or_else(|| CaptchaError::NotFound(hash.to_string()))
    }

    /// Number of the known digests
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Whether no digest is known
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}
