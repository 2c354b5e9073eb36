//! JSON persistence for key pairs.
//!
//! A stored key pair is never trusted as-is: loading re-derives it from the
//! stored `p`, `q` and `e` and rejects the file if any derived field
//! disagrees.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::KeyPair;
use crate::error::{ClassiCryptError, Result};

/// On-disk form of a key pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredKeyPair {
    p: u64,
    q: u64,
    n: u64,
    phi: u64,
    e: u64,
    d: u64,
}

impl From<&KeyPair> for StoredKeyPair {
    fn from(kp: &KeyPair) -> Self {
        StoredKeyPair {
            p: kp.p(),
            q: kp.q(),
            n: kp.n(),
            phi: kp.phi(),
            e: kp.e(),
            d: kp.d(),
        }
    }
}

/// Serializes a key pair as pretty-printed JSON.
pub fn to_json(keys: &KeyPair) -> Result<String> {
    Ok(serde_json::to_string_pretty(&StoredKeyPair::from(keys))?)
}

/// Parses and re-validates a key pair.
///
/// # Errors
/// - [`ClassiCryptError::Serialization`] if `json` is not a key pair object.
/// - Any [`KeyPair::generate`] error for the stored `p`, `q`, `e`.
/// - [`ClassiCryptError::InvalidKeyFile`] if the stored `n`, `phi` or `d`
///   do not match the values derived from `p`, `q`, `e`.
///
/// # Examples
///
/// ```
/// use classicrypt::modular::keystore;
/// use classicrypt::KeyPair;
///
/// let kp = KeyPair::generate(61, 53, Some(17)).unwrap();
/// let json = keystore::to_json(&kp).unwrap();
/// assert_eq!(keystore::from_json(&json).unwrap(), kp);
/// ```
pub fn from_json(json: &str) -> Result<KeyPair> {
    let stored: StoredKeyPair = serde_json::from_str(json)?;
    let derived = KeyPair::generate(stored.p, stored.q, Some(stored.e))?;

    let mismatch = [
        ("n", stored.n, derived.n()),
        ("phi", stored.phi, derived.phi()),
        ("d", stored.d, derived.d()),
    ]
    .into_iter()
    .find(|(_, stored, derived)| stored != derived);

    match mismatch {
        Some((field, found, expected)) => Err(ClassiCryptError::InvalidKeyFile(format!(
            "{field} is {found}, expected {expected} for p = {}, q = {}, e = {}",
            stored.p, stored.q, stored.e
        ))),
        None => Ok(derived),
    }
}

/// Writes `keys` to `path` as JSON.
pub fn save(keys: &KeyPair, path: &Path) -> Result<()> {
    let json = to_json(keys)?;
    fs::write(path, json)?;
    info!(path = %path.display(), n = keys.n(), "key pair saved");
    Ok(())
}

/// Reads and validates a key pair from `path`.
pub fn load(path: &Path) -> Result<KeyPair> {
    let json = fs::read_to_string(path)?;
    let keys = from_json(&json)?;
    debug!(path = %path.display(), n = keys.n(), e = keys.e(), "key pair loaded");
    Ok(keys)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_round_trip() {
        let kp = KeyPair::generate(17, 11, Some(7)).unwrap();
        let json = to_json(&kp).unwrap();
        assert!(json.contains("\"d\": 23"));
        assert_eq!(from_json(&json).unwrap(), kp);
    }

    #[test]
    fn test_tampered_private_exponent() {
        let json = r#"{"p":17,"q":11,"n":187,"phi":160,"e":7,"d":24}"#;
        assert!(matches!(
            from_json(json),
            Err(ClassiCryptError::InvalidKeyFile(msg)) if msg.starts_with("d is 24")
        ));
    }

    #[test]
    fn test_stored_non_prime_rejected() {
        let json = r#"{"p":15,"q":11,"n":165,"phi":80,"e":3,"d":27}"#;
        assert!(matches!(
            from_json(json),
            Err(ClassiCryptError::InvalidPrime { value: 15, .. })
        ));
    }

    #[test]
    fn test_garbage_is_serialization_error() {
        assert!(matches!(
            from_json("{\"p\": \"seventeen\"}"),
            Err(ClassiCryptError::Serialization(_))
        ));
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keys.json");
        let kp = KeyPair::generate(61, 53, None).unwrap();
        save(&kp, &path).unwrap();
        assert_eq!(load(&path).unwrap(), kp);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load(&dir.path().join("absent.json")),
            Err(ClassiCryptError::Io(_))
        ));
    }
}
