//! Client-side encryption of dispute notes.
//!
//! Notes are sealed with ChaCha20-Poly1305 under a caller-owned [`NotesKey`]
//! and a fresh random 96-bit nonce per message. The ledger never sees the
//! notes, only their SHA-256 [`notes_digest`].

use chacha20poly1305::{
    aead::{Aead, KeyInit},
    ChaCha20Poly1305, Nonce,
};
use sha2::{Digest, Sha256};
use veracity_types::{NotesDigest, SealedNotes};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::CryptoError;

/// Symmetric key for one record's notes.
///
/// Owned and passed explicitly by the caller; nothing in this crate holds a
/// session key. Key bytes are zeroized on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct NotesKey([u8; 32]);

impl NotesKey {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Generate a key from system randomness.
    pub fn generate() -> Result<Self, CryptoError> {
        let mut bytes = [0u8; 32];
        getrandom::getrandom(&mut bytes).map_err(|e| CryptoError::Randomness(e.to_string()))?;
        Ok(Self(bytes))
    }

    fn cipher(&self) -> ChaCha20Poly1305 {
        ChaCha20Poly1305::new(&self.0.into())
    }
}

/// Encrypt plaintext notes. Returns ciphertext (plaintext + 16-byte tag) and the nonce.
pub fn encrypt_notes(plaintext: &str, key: &NotesKey) -> Result<SealedNotes, CryptoError> {
    let mut iv = [0u8; 12];
    getrandom::getrandom(&mut iv).map_err(|e| CryptoError::Randomness(e.to_string()))?;
    let ciphertext = key
        .cipher()
        .encrypt(&Nonce::from(iv), plaintext.as_bytes())
        .map_err(|_| CryptoError::Encrypt)?;
    Ok(SealedNotes { ciphertext, iv })
}

/// Decrypt sealed notes back to text.
pub fn decrypt_notes(sealed: &SealedNotes, key: &NotesKey) -> Result<String, CryptoError> {
    let plaintext = key
        .cipher()
        .decrypt(&Nonce::from(sealed.iv), sealed.ciphertext.as_slice())
        .map_err(|_| CryptoError::Decrypt)?;
    String::from_utf8(plaintext).map_err(|_| CryptoError::InvalidUtf8)
}

/// Content digest of plaintext notes, used to anchor them on the ledger.
pub fn notes_digest(plaintext: &str) -> NotesDigest {
    let mut output = [0u8; 32];
    output.copy_from_slice(&Sha256::digest(plaintext.as_bytes()));
    NotesDigest::new(output)
}
