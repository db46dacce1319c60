//! Record encryption.
//!
//! AES-256-CBC with PKCS#7 padding, base64 on disk. The key is the password
//! bytes NUL-padded (or truncated) to 32 bytes and the IV is fixed per
//! deployment, matching records written by the existing OpenSSL-based host.
//!
//! A fixed IV means equal plaintext prefixes encrypt to equal ciphertext
//! prefixes, and the password is used without stretching. Changing either
//! requires a new envelope version.

use std::fmt;
use std::str::FromStr;

use aes::Aes256;
use aes::cipher::block_padding::Pkcs7;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::{HostError, HostResult};

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

const KEY_LEN: usize = 32;
const IV_LEN: usize = 16;

/// Supported cipher methods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CipherMethod {
    Aes256Cbc,
}

impl FromStr for CipherMethod {
    type Err = HostError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("AES-256-CBC") {
            Ok(CipherMethod::Aes256Cbc)
        } else {
            Err(HostError::Config(format!("Unsupported cipher method '{s}'")))
        }
    }
}

impl fmt::Display for CipherMethod {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CipherMethod::Aes256Cbc => write!(f, "AES-256-CBC"),
        }
    }
}

/// Symmetric cipher bound to one key and IV
#[derive(Clone)]
pub struct Cipher {
    method: CipherMethod,
    key: [u8; KEY_LEN],
    iv: [u8; IV_LEN],
}

impl Cipher {
    pub fn new(method: CipherMethod, password: &str, iv: [u8; IV_LEN]) -> Self {
        Cipher {
            method,
            key: key_from_password(password),
            iv,
        }
    }

    pub fn method(&self) -> CipherMethod {
        self.method
    }

    /// Encrypt and base64-encode.
    pub fn encrypt(&self, plaintext: &[u8]) -> String {
        let ciphertext = match self.method {
            CipherMethod::Aes256Cbc => Aes256CbcEnc::new(&self.key.into(), &self.iv.into())
                .encrypt_padded_vec_mut::<Pkcs7>(plaintext),
        };
        STANDARD.encode(ciphertext)
    }

    /// Decode and decrypt, stripping NUL padding.
    ///
    /// `None` when the text isn't base64, the padding is wrong, or the result
    /// isn't UTF-8: all signs of a key that doesn't belong to the record.
    pub fn decrypt(&self, encoded: &str) -> Option<String> {
        let ciphertext = STANDARD.decode(encoded.trim()).ok()?;
        let plaintext = match self.method {
            CipherMethod::Aes256Cbc => Aes256CbcDec::new(&self.key.into(), &self.iv.into())
                .decrypt_padded_vec_mut::<Pkcs7>(&ciphertext)
                .ok()?,
        };
        let text = String::from_utf8(plaintext).ok()?;
        Some(text.trim_matches('\0').to_string())
    }
}

impl fmt::Debug for Cipher {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Cipher")
            .field("method", &self.method)
            .field("key", &"<redacted>")
            .field("iv", &hex::encode(self.iv))
            .finish()
    }
}

/// Password bytes, NUL-padded or truncated to the key length.
fn key_from_password(password: &str) -> [u8; KEY_LEN] {
    let mut key = [0u8; KEY_LEN];
    let bytes = password.as_bytes();
    let len = bytes.len().min(KEY_LEN);
    key[..len].copy_from_slice(&bytes[..len]);
    key
}

/// Parse a 32-character hex IV.
pub fn parse_iv(iv_hex: &str) -> HostResult<[u8; IV_LEN]> {
    let bytes = hex::decode(iv_hex.trim())
        .map_err(|e| HostError::Config(format!("Invalid IV '{iv_hex}': {e}")))?;

    bytes.try_into().map_err(|bytes: Vec<u8>| {
        HostError::Config(format!(
            "IV must be {IV_LEN} bytes ({} hex characters), got {} bytes",
            IV_LEN * 2,
            bytes.len()
        ))
    })
}
