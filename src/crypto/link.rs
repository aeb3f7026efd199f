// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Ethos Network

//! Passphrase-based cipher for storage pointers.
//!
//! The wire format is the OpenSSL `enc` container that CryptoJS produces for
//! `AES.encrypt(data, passphrase)`: base64 of `"Salted__" || salt(8) ||
//! ciphertext`, AES-256-CBC with PKCS#7 padding, key and IV derived from the
//! passphrase with the MD5 `EVP_BytesToKey` schedule. Pointers already
//! recorded on chain by earlier deployments decrypt unchanged.
//!
//! ## Security Note
//!
//! One process-wide passphrase covers every record, with no rotation and no
//! per-record derivation. The mode carries no authentication tag: a wrong key
//! or tampered ciphertext usually surfaces as a padding or UTF-8 error, but
//! that is not guaranteed, and garbage plaintext is possible.

use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use md5::{Digest, Md5};
use rand::RngCore;

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// Magic prefix of the OpenSSL salted container.
const SALTED_MAGIC: &[u8; 8] = b"Salted__";
const SALT_LEN: usize = 8;
const KEY_LEN: usize = 32;
const IV_LEN: usize = 16;

/// Encryption failure.
#[derive(Debug, thiserror::Error)]
pub enum EncryptionError {
    #[error("encryption key is not set")]
    EmptyKey,
}

/// Decryption failure.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecryptionError {
    #[error("ciphertext is not valid base64: {0}")]
    Malformed(String),

    #[error("ciphertext container is truncated or missing the salt header")]
    TruncatedContainer,

    #[error("padding check failed (wrong key or corrupted ciphertext)")]
    BadPadding,

    #[error("decrypted bytes are not valid UTF-8")]
    NotUtf8,
}

/// Symmetric cipher over storage pointers, keyed once per process.
#[derive(Clone)]
pub struct LinkCipher {
    passphrase: Vec<u8>,
}

impl LinkCipher {
    /// Create a cipher from the configured passphrase.
    pub fn new(passphrase: &str) -> Result<Self, EncryptionError> {
        if passphrase.is_empty() {
            return Err(EncryptionError::EmptyKey);
        }
        Ok(Self {
            passphrase: passphrase.as_bytes().to_vec(),
        })
    }

    /// Encrypt a storage pointer. A fresh salt is drawn per call, so the
    /// same plaintext produces different ciphertexts.
    pub fn encrypt(&self, plaintext: &str) -> Result<String, EncryptionError> {
        let mut salt = [0u8; SALT_LEN];
        rand::thread_rng().fill_bytes(&mut salt);

        let (key, iv) = derive_key_iv(&self.passphrase, &salt);
        let ciphertext = Aes256CbcEnc::new(&key.into(), &iv.into())
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes());

        let mut container = Vec::with_capacity(SALTED_MAGIC.len() + SALT_LEN + ciphertext.len());
        container.extend_from_slice(SALTED_MAGIC);
        container.extend_from_slice(&salt);
        container.extend_from_slice(&ciphertext);

        Ok(BASE64.encode(container))
    }

    /// Decrypt a pointer previously produced by [`encrypt`](Self::encrypt)
    /// (or by the legacy front end) under the same passphrase.
    pub fn decrypt(&self, ciphertext: &str) -> Result<String, DecryptionError> {
        let container = BASE64
            .decode(ciphertext.trim())
            .map_err(|e| DecryptionError::Malformed(e.to_string()))?;

        if container.len() < SALTED_MAGIC.len() + SALT_LEN
            || &container[..SALTED_MAGIC.len()] != SALTED_MAGIC
        {
            return Err(DecryptionError::TruncatedContainer);
        }

        let salt = &container[SALTED_MAGIC.len()..SALTED_MAGIC.len() + SALT_LEN];
        let body = &container[SALTED_MAGIC.len() + SALT_LEN..];
        if body.is_empty() || body.len() % 16 != 0 {
            return Err(DecryptionError::TruncatedContainer);
        }

        let (key, iv) = derive_key_iv(&self.passphrase, salt);
        let plaintext = Aes256CbcDec::new(&key.into(), &iv.into())
            .decrypt_padded_vec_mut::<Pkcs7>(body)
            .map_err(|_| DecryptionError::BadPadding)?;

        String::from_utf8(plaintext).map_err(|_| DecryptionError::NotUtf8)
    }
}

/// MD5 `EVP_BytesToKey` with one iteration: the derivation OpenSSL `enc`
/// and CryptoJS use for passphrase inputs.
fn derive_key_iv(passphrase: &[u8], salt: &[u8]) -> ([u8; KEY_LEN], [u8; IV_LEN]) {
    let mut material = Vec::with_capacity(KEY_LEN + IV_LEN);
    let mut previous: Vec<u8> = Vec::new();

    while material.len() < KEY_LEN + IV_LEN {
        let mut hasher = Md5::new();
        hasher.update(&previous);
        hasher.update(passphrase);
        hasher.update(salt);
        previous = hasher.finalize().to_vec();
        material.extend_from_slice(&previous);
    }

    let mut key = [0u8; KEY_LEN];
    let mut iv = [0u8; IV_LEN];
    key.copy_from_slice(&material[..KEY_LEN]);
    iv.copy_from_slice(&material[KEY_LEN..KEY_LEN + IV_LEN]);
    (key, iv)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cipher() -> LinkCipher {
        LinkCipher::new("test-passphrase").unwrap()
    }

    #[test]
    fn empty_passphrase_is_rejected() {
        assert!(matches!(
            LinkCipher::new(""),
            Err(EncryptionError::EmptyKey)
        ));
    }

    #[test]
    fn round_trip_recovers_plaintext() {
        let c = cipher();
        let encrypted = c.encrypt("ipfs://Qm123").unwrap();
        assert_eq!(c.decrypt(&encrypted).unwrap(), "ipfs://Qm123");
    }

    #[test]
    fn round_trip_handles_long_and_unicode_pointers() {
        let c = cipher();
        for plaintext in [
            "",
            "https://ipfs.io/ipfs/QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG",
            "ünïcödé → pointer",
            &"x".repeat(4096),
        ] {
            let encrypted = c.encrypt(plaintext).unwrap();
            assert_eq!(c.decrypt(&encrypted).unwrap(), plaintext);
        }
    }

    #[test]
    fn fresh_salt_makes_ciphertexts_differ() {
        let c = cipher();
        let a = c.encrypt("ipfs://Qm123").unwrap();
        let b = c.encrypt("ipfs://Qm123").unwrap();
        assert_ne!(a, b);
        assert_eq!(c.decrypt(&a).unwrap(), c.decrypt(&b).unwrap());
    }

    #[test]
    fn container_carries_openssl_salt_header() {
        let c = cipher();
        let raw = BASE64.decode(c.encrypt("x").unwrap()).unwrap();
        assert_eq!(&raw[..8], b"Salted__");
    }

    #[test]
    fn garbage_base64_is_malformed() {
        assert!(matches!(
            cipher().decrypt("not base64 at all!!!"),
            Err(DecryptionError::Malformed(_))
        ));
    }

    #[test]
    fn missing_header_is_truncated_container() {
        let bogus = BASE64.encode(b"no header here, just bytes");
        assert!(matches!(
            cipher().decrypt(&bogus),
            Err(DecryptionError::TruncatedContainer)
        ));
    }

    #[test]
    fn wrong_key_fails_to_decrypt() {
        let encrypted = cipher().encrypt("ipfs://Qm123").unwrap();
        let other = LinkCipher::new("a-different-passphrase").unwrap();
        // No authentication tag: the usual symptom of a wrong key is a
        // padding or UTF-8 failure rather than a dedicated error.
        match other.decrypt(&encrypted) {
            Err(DecryptionError::BadPadding) | Err(DecryptionError::NotUtf8) => {}
            Ok(plaintext) => assert_ne!(plaintext, "ipfs://Qm123"),
            Err(e) => panic!("unexpected error: {e:?}"),
        }
    }

    #[test]
    fn derivation_is_deterministic_for_fixed_salt() {
        let (key_a, iv_a) = derive_key_iv(b"passphrase", b"12345678");
        let (key_b, iv_b) = derive_key_iv(b"passphrase", b"12345678");
        assert_eq!(key_a, key_b);
        assert_eq!(iv_a, iv_b);

        let (key_c, _) = derive_key_iv(b"passphrase", b"87654321");
        assert_ne!(key_a, key_c);
    }
}
