use std::sync::Mutex;

use anyhow::{anyhow, bail, Result};
use argon2::Argon2;
use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{ChaCha20Poly1305, Key, Nonce};
use rand::RngCore;

/// Header identifying a sealed session file
const MAGIC: &[u8; 5] = b"AFDS1";
const SALT_LEN: usize = 16;
const NONCE_LEN: usize = 12;
const KEY_LEN: usize = 32;

/// Seals session files with ChaCha20-Poly1305 under an Argon2-derived key.
///
/// Layout: `MAGIC | salt | nonce | ciphertext`. The last derived key is
/// cached per salt since the client reads the session on every request.
pub struct SessionCipher {
    passphrase: String,
    derived: Mutex<Option<([u8; SALT_LEN], [u8; KEY_LEN])>>,
}

impl SessionCipher {
    pub fn new(passphrase: &str) -> Self {
        Self {
            passphrase: passphrase.to_string(),
            derived: Mutex::new(None),
        }
    }

    fn key_for(&self, salt: &[u8; SALT_LEN]) -> Result<[u8; KEY_LEN]> {
        let mut cached = self
            .derived
            .lock()
            .map_err(|_| anyhow!("Cipher key cache poisoned"))?;
        if let Some((cached_salt, key)) = cached.as_ref() {
            if cached_salt == salt {
                return Ok(*key);
            }
        }
        let mut key = [0u8; KEY_LEN];
        Argon2::default()
            .hash_password_into(self.passphrase.as_bytes(), salt, &mut key)
            .map_err(|e| anyhow!("Failed to derive session key: {}", e))?;
        *cached = Some((*salt, key));
        Ok(key)
    }

    pub fn seal(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        let mut rng = rand::thread_rng();
        // Reuse the cached salt so repeated saves skip the key derivation.
        let salt = match self.cached_salt()? {
            Some(existing) => existing,
            None => {
                let mut fresh = [0u8; SALT_LEN];
                rng.fill_bytes(&mut fresh);
                fresh
            }
        };
        let mut nonce = [0u8; NONCE_LEN];
        rng.fill_bytes(&mut nonce);

        let key = self.key_for(&salt)?;
        let cipher = ChaCha20Poly1305::new(Key::from_slice(&key));
        let ciphertext = cipher
            .encrypt(Nonce::from_slice(&nonce), plaintext)
            .map_err(|e| anyhow!("Failed to encrypt session: {}", e))?;

        let mut out = Vec::with_capacity(MAGIC.len() + SALT_LEN + NONCE_LEN + ciphertext.len());
        out.extend_from_slice(MAGIC);
        out.extend_from_slice(&salt);
        out.extend_from_slice(&nonce);
        out.extend_from_slice(&ciphertext);
        Ok(out)
    }

    pub fn open(&self, sealed: &[u8]) -> Result<Vec<u8>> {
        let header = MAGIC.len() + SALT_LEN + NONCE_LEN;
        if sealed.len() < header || &sealed[..MAGIC.len()] != MAGIC {
            bail!("Session file is not encrypted with a passphrase");
        }
        let mut salt = [0u8; SALT_LEN];
        salt.copy_from_slice(&sealed[MAGIC.len()..MAGIC.len() + SALT_LEN]);
        let nonce = &sealed[MAGIC.len() + SALT_LEN..header];

        let key = self.key_for(&salt)?;
        let cipher = ChaCha20Poly1305::new(Key::from_slice(&key));
        cipher
            .decrypt(Nonce::from_slice(nonce), &sealed[header..])
            .map_err(|_| anyhow!("Failed to decrypt session - wrong passphrase?"))
    }

    fn cached_salt(&self) -> Result<Option<[u8; SALT_LEN]>> {
        let cached = self
            .derived
            .lock()
            .map_err(|_| anyhow!("Cipher key cache poisoned"))?;
        Ok(cached.as_ref().map(|(salt, _)| *salt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seal_open_and_tamper_detection() {
        let cipher = SessionCipher::new("passphrase");
        let sealed = cipher.seal(b"{\"token\":\"A\"}").unwrap();
        assert!(sealed.starts_with(MAGIC));
        assert_eq!(cipher.open(&sealed).unwrap(), b"{\"token\":\"A\"}");

        let mut tampered = sealed.clone();
        let last = tampered.len() - 1;
        tampered[last] ^= 0xff;
        assert!(cipher.open(&tampered).is_err());

        assert!(cipher.open(b"{\"token\":\"A\"}").is_err());
    }
}
