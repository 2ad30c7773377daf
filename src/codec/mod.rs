//! Profile codec module
//!
//! Decodes profile files produced by the target binary:
//! - Plaintext profiles are UTF-8 JSON
//! - Encrypted profiles are AES-256-CBC ciphertext with the IV in the first
//!   16 bytes, keyed by PBKDF2-HMAC-SHA256 over the passphrase
//!
//! The key derivation is deliberately odd but must stay bit-exact with the
//! format: the salt is the lowercase hex SHA-256 digest of the passphrase
//! itself, and the iteration count is 2056. Any deviation decrypts to
//! garbage rather than an error, so the scheme is pinned by tests here.

use crate::constants::{BLOCK_LEN, KDF_ROUNDS, KEY_LEN};
use crate::models::Profile;

use aes::cipher::block_padding::{NoPadding, Pkcs7};
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use pbkdf2::pbkdf2_hmac;
use sha2::{Digest, Sha256};
use thiserror::Error;

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// Failure decoding a profile file.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("profile contains invalid json: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("profile could not be decrypted")]
    DecryptFailed,
}

/// Decode profile bytes into the raw JSON value they contain.
///
/// The suite runner validates this value against the schema before giving
/// it a typed shape, so that a structurally wrong file is reported as a
/// schema mismatch rather than a decode error.
pub fn decode_value(
    bytes: &[u8],
    encrypted: bool,
    passphrase: Option<&str>,
) -> Result<serde_json::Value, DecodeError> {
    if encrypted {
        let passphrase = passphrase.ok_or(DecodeError::DecryptFailed)?;
        let text = decrypt(bytes, passphrase)?;
        Ok(serde_json::from_str(&text)?)
    } else {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// Decode profile bytes all the way to a typed [`Profile`].
pub fn decode(
    bytes: &[u8],
    encrypted: bool,
    passphrase: Option<&str>,
) -> Result<Profile, DecodeError> {
    let value = decode_value(bytes, encrypted, passphrase)?;
    Ok(serde_json::from_value(value)?)
}

/// Encrypt plaintext the way the target binary does: PKCS#7 pad,
/// AES-256-CBC, IV prepended to the ciphertext.
///
/// The IV is the leading 16 bytes of SHA-256 over the plaintext, which
/// keeps fixture files reproducible. `decode` accepts any IV source since
/// it reads the IV back out of the file.
pub fn encrypt(plaintext: &[u8], passphrase: &str) -> Vec<u8> {
    let key = derive_key(passphrase);
    let digest = Sha256::digest(plaintext);
    let mut iv = [0u8; BLOCK_LEN];
    iv.copy_from_slice(&digest[..BLOCK_LEN]);

    let ciphertext =
        Aes256CbcEnc::new(&key.into(), &iv.into()).encrypt_padded_vec_mut::<Pkcs7>(plaintext);
    let mut out = Vec::with_capacity(BLOCK_LEN + ciphertext.len());
    out.extend_from_slice(&iv);
    out.extend_from_slice(&ciphertext);
    out
}

/// Decrypt an encrypted profile file to its JSON text.
///
/// Padding removal follows the format exactly: read the last plaintext
/// byte as the pad length and trim that many bytes, validating nothing
/// else about the pad.
fn decrypt(data: &[u8], passphrase: &str) -> Result<String, DecodeError> {
    if data.len() < BLOCK_LEN || (data.len() - BLOCK_LEN) % BLOCK_LEN != 0 {
        return Err(DecodeError::DecryptFailed);
    }
    let (iv, body) = data.split_at(BLOCK_LEN);
    let key = derive_key(passphrase);

    let mut plain = Aes256CbcDec::new_from_slices(&key, iv)
        .map_err(|_| DecodeError::DecryptFailed)?
        .decrypt_padded_vec_mut::<NoPadding>(body)
        .map_err(|_| DecodeError::DecryptFailed)?;

    let pad = match plain.last() {
        Some(&byte) => byte as usize,
        None => return Err(DecodeError::DecryptFailed),
    };
    if pad > plain.len() {
        return Err(DecodeError::DecryptFailed);
    }
    plain.truncate(plain.len() - pad);
    String::from_utf8(plain).map_err(|_| DecodeError::DecryptFailed)
}

/// Derive the AES-256 key for a passphrase. The salt is the hex-encoded
/// SHA-256 digest of the passphrase bytes, as the format dictates.
fn derive_key(passphrase: &str) -> [u8; KEY_LEN] {
    let salt = hex::encode(Sha256::digest(passphrase.as_bytes()));
    let mut key = [0u8; KEY_LEN];
    pbkdf2_hmac::<Sha256>(passphrase.as_bytes(), salt.as_bytes(), KDF_ROUNDS, &mut key);
    key
}
