//! File-backed operator keyring.
//!
//! Ed25519 keypairs stored as one JSON record per key under
//! `<home>/keyring/`. Records are unencrypted — this is the test-grade
//! backend for development and operations tooling, not custody.

use std::path::{Path, PathBuf};

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{CliError, CliResult};

/// Prefix of operator addresses.
pub const ADDRESS_PREFIX: &str = "bas";

/// One stored key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyRecord {
    /// Key name, unique within the keyring.
    pub name: String,
    /// Derived operator address.
    pub address: String,
    /// Hex-encoded Ed25519 public key.
    pub public_key: String,
    /// Hex-encoded Ed25519 secret key.
    pub secret_key: String,
}

/// Keyring rooted at a directory.
pub struct Keyring {
    dir: PathBuf,
}

impl Keyring {
    /// Open (creating the directory if needed) the keyring at `dir`.
    pub fn open(dir: &Path) -> CliResult<Self> {
        std::fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    /// Generate and store a new keypair under `name`.
    pub fn add(&self, name: &str) -> CliResult<KeyRecord> {
        let path = self.record_path(name)?;
        if path.exists() {
            return Err(CliError::key(format!("key \"{}\" already exists", name)));
        }

        let signing_key = SigningKey::generate(&mut OsRng);
        let verifying_key = signing_key.verifying_key();
        let record = KeyRecord {
            name: name.to_string(),
            address: derive_address(verifying_key.as_bytes()),
            public_key: hex_encode(verifying_key.as_bytes()),
            secret_key: hex_encode(&signing_key.to_bytes()),
        };

        std::fs::write(&path, serde_json::to_string_pretty(&record)?)?;
        Ok(record)
    }

    /// Load a stored key by name.
    pub fn get(&self, name: &str) -> CliResult<KeyRecord> {
        let path = self.record_path(name)?;
        if !path.exists() {
            return Err(CliError::key(format!("key \"{}\" not found", name)));
        }
        let contents = std::fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// All stored keys, ordered by name.
    pub fn list(&self) -> CliResult<Vec<KeyRecord>> {
        let mut records = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let contents = std::fs::read_to_string(&path)?;
            records.push(serde_json::from_str::<KeyRecord>(&contents)?);
        }
        records.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(records)
    }

    /// Sign a message with a stored key. Returns the hex signature and the
    /// record that produced it.
    pub fn sign(&self, name: &str, message: &[u8]) -> CliResult<(String, KeyRecord)> {
        let record = self.get(name)?;
        let secret = hex_decode(&record.secret_key)
            .and_then(|bytes| <[u8; 32]>::try_from(bytes).ok())
            .ok_or_else(|| CliError::key(format!("key \"{}\" is corrupt", name)))?;
        let signing_key = SigningKey::from_bytes(&secret);
        let signature = signing_key.sign(message);
        Ok((hex_encode(&signature.to_bytes()), record))
    }

    fn record_path(&self, name: &str) -> CliResult<PathBuf> {
        if name.is_empty()
            || !name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(CliError::key(format!(
                "invalid key name \"{}\" (use letters, digits, - and _)",
                name
            )));
        }
        Ok(self.dir.join(format!("{}.json", name)))
    }
}

/// Verify a hex signature against a record's public key.
pub fn verify(record: &KeyRecord, message: &[u8], signature_hex: &str) -> CliResult<bool> {
    let public = hex_decode(&record.public_key)
        .and_then(|bytes| <[u8; 32]>::try_from(bytes).ok())
        .ok_or_else(|| CliError::key("public key is corrupt"))?;
    let verifying_key = VerifyingKey::from_bytes(&public)
        .map_err(|e| CliError::key(format!("invalid public key: {}", e)))?;
    let sig_bytes = hex_decode(signature_hex)
        .and_then(|bytes| <[u8; 64]>::try_from(bytes).ok())
        .ok_or_else(|| CliError::key("signature is corrupt"))?;
    Ok(verifying_key
        .verify(message, &Signature::from_bytes(&sig_bytes))
        .is_ok())
}

/// Derive an operator address: bas-prefixed base58 of the truncated
/// public-key hash.
fn derive_address(public_key: &[u8]) -> String {
    let digest = Sha256::digest(public_key);
    format!("{}{}", ADDRESS_PREFIX, bs58::encode(&digest[..20]).into_string())
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

fn hex_decode(hex: &str) -> Option<Vec<u8>> {
    if hex.len() % 2 != 0 {
        return None;
    }
    hex.as_bytes()
        .chunks(2)
        .map(|chunk| {
            std::str::from_utf8(chunk)
                .ok()
                .and_then(|s| u8::from_str_radix(s, 16).ok())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn open_temp() -> (TempDir, Keyring) {
        let dir = TempDir::new().unwrap();
        let keyring = Keyring::open(&dir.path().join("keyring")).unwrap();
        (dir, keyring)
    }

    #[test]
    fn test_add_and_get_roundtrip() {
        let (_dir, keyring) = open_temp();
        let added = keyring.add("validator").unwrap();
        let loaded = keyring.get("validator").unwrap();
        assert_eq!(added.address, loaded.address);
        assert!(added.address.starts_with(ADDRESS_PREFIX));
    }

    #[test]
    fn test_add_duplicate_rejected() {
        let (_dir, keyring) = open_temp();
        keyring.add("validator").unwrap();
        assert!(keyring.add("validator").is_err());
    }

    #[test]
    fn test_get_missing_key() {
        let (_dir, keyring) = open_temp();
        let err = keyring.get("nope").unwrap_err();
        assert!(matches!(err, CliError::Key(_)));
    }

    #[test]
    fn test_list_is_sorted() {
        let (_dir, keyring) = open_temp();
        keyring.add("bob").unwrap();
        keyring.add("alice").unwrap();
        let names: Vec<_> = keyring.list().unwrap().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["alice", "bob"]);
    }

    #[test]
    fn test_sign_verifies_under_stored_public_key() {
        let (_dir, keyring) = open_temp();
        keyring.add("signer").unwrap();
        let (signature, record) = keyring.sign("signer", b"payload").unwrap();
        assert!(verify(&record, b"payload", &signature).unwrap());
        assert!(!verify(&record, b"tampered", &signature).unwrap());
    }

    #[test]
    fn test_invalid_key_name_rejected() {
        let (_dir, keyring) = open_temp();
        assert!(keyring.add("../escape").is_err());
        assert!(keyring.add("").is_err());
    }

    #[test]
    fn test_hex_roundtrip() {
        let bytes = [0u8, 1, 0xab, 0xff];
        assert_eq!(hex_decode(&hex_encode(&bytes)).unwrap(), bytes);
        assert_eq!(hex_decode("zz"), None);
        assert_eq!(hex_decode("abc"), None);
    }
}
