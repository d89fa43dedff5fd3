use aes_gcm::{
    aead::{Aead, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};
use aes_gcm::aead::rand_core::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};
use crate::error::TokenError;

/// The size of the AES-256 key in bytes.
pub const KEY_SIZE: usize = 32;
/// The size of the AES-GCM nonce in bytes.
pub const NONCE_SIZE: usize = 12;
/// The size of the AES-GCM authentication tag in bytes.
pub const TAG_SIZE: usize = 16;

/// A secure key wrapper that ensures the key is zeroized on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecureKey([u8; KEY_SIZE]);

impl SecureKey {
    /// Creates a new `SecureKey` from a byte array.
    pub fn new(key: [u8; KEY_SIZE]) -> Self {
        Self(key)
    }

    /// Copies a key out of an arbitrary slice, rejecting any length but 32.
    pub fn from_slice(key: &[u8]) -> Result<Self, TokenError> {
        let bytes: [u8; KEY_SIZE] = key
            .try_into()
            .map_err(|_| TokenError::InvalidKeyLength(key.len()))?;
        Ok(Self(bytes))
    }

    /// Returns a reference to the key as a byte slice.
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }
}

impl std::fmt::Debug for SecureKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecureKey(..)")
    }
}

/// Generates a new random AES-256 key.
pub fn generate_key() -> Result<SecureKey, TokenError> {
    let mut key = [0u8; KEY_SIZE];
    OsRng
        .try_fill_bytes(&mut key)
        .map_err(|_| TokenError::RandomnessUnavailable)?;
    Ok(SecureKey::new(key))
}

/// Generates a new random AES-GCM nonce.
pub fn generate_nonce() -> Result<[u8; NONCE_SIZE], TokenError> {
    let mut nonce = [0u8; NONCE_SIZE];
    OsRng
        .try_fill_bytes(&mut nonce)
        .map_err(|_| TokenError::RandomnessUnavailable)?;
    Ok(nonce)
}

/// Seals `plaintext` under `key` with a fresh nonce and no associated data.
///
/// The output is `nonce || ciphertext || tag`.
pub fn seal(key: &SecureKey, plaintext: &[u8]) -> Result<Vec<u8>, TokenError> {
    let cipher = Aes256Gcm::new(key.as_bytes().into());

    let nonce_bytes = generate_nonce()?;
    let nonce = Nonce::from(nonce_bytes);

    let ciphertext = cipher
        .encrypt(&nonce, plaintext)
        .map_err(|e| TokenError::Cipher(format!("Encryption failed: {}", e)))?;

    let mut sealed = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
    sealed.extend_from_slice(&nonce_bytes);
    sealed.extend_from_slice(&ciphertext);
    Ok(sealed)
}

/// Opens a `nonce || ciphertext || tag` buffer produced by [`seal`].
///
/// Any tampering, a wrong key or truncation of the ciphertext yields
/// `AuthenticationFailed`.
pub fn open(key: &SecureKey, sealed: &[u8]) -> Result<Vec<u8>, TokenError> {
    if sealed.len() < NONCE_SIZE {
        return Err(TokenError::TokenTooShort);
    }

    let (nonce_bytes, ciphertext) = sealed.split_at(NONCE_SIZE);
    let cipher = Aes256Gcm::new(key.as_bytes().into());
    let nonce = Nonce::from_slice(nonce_bytes);

    cipher
        .decrypt(nonce, ciphertext)
        .map_err(|_| TokenError::AuthenticationFailed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sealed_output_carries_nonce_and_tag() {
        let key = generate_key().unwrap();
        let sealed = seal(&key, b"hello").unwrap();
        assert_eq!(sealed.len(), NONCE_SIZE + 5 + TAG_SIZE);
        assert_eq!(open(&key, &sealed).unwrap(), b"hello");
    }

    #[test]
    fn nonces_are_fresh_per_call() {
        let key = generate_key().unwrap();
        let a = seal(&key, b"same").unwrap();
        let b = seal(&key, b"same").unwrap();
        assert_ne!(a[..NONCE_SIZE], b[..NONCE_SIZE]);
        assert_ne!(a, b);
    }

    #[test]
    fn open_rejects_short_input() {
        let key = generate_key().unwrap();
        assert_eq!(open(&key, &[0u8; 5]), Err(TokenError::TokenTooShort));
    }

    #[test]
    fn from_slice_checks_length() {
        assert_eq!(
            SecureKey::from_slice(&[1u8; 16]).unwrap_err(),
            TokenError::InvalidKeyLength(16)
        );
        assert!(SecureKey::from_slice(&[1u8; 32]).is_ok());
    }
}
