//! Local vault file used as the last-resort credential source.
//!
//! The vault lives at `<home>/.farnsworth/vault.enc`. Only three optional
//! string fields are read: `apiKey`, `gateway` and `masterKey`.

use crate::SyntekError;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Fields consumed from the vault file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultRecord {
    /// Standard access key.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Gateway base URL.
    #[serde(default)]
    pub gateway: Option<String>,

    /// Elevated key.
    #[serde(default)]
    pub master_key: Option<String>,
}

/// Default vault location for the current user.
pub fn default_vault_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join(".farnsworth")
        .join("vault.enc")
}

/// Read the vault at `path`.
///
/// Returns `Ok(None)` when the file does not exist.
pub fn load_vault(path: &Path) -> Result<Option<VaultRecord>, SyntekError> {
    if !path.exists() {
        return Ok(None);
    }

    let raw = fs::read_to_string(path)
        .map_err(|e| SyntekError::ConfigError(format!("Failed to read vault: {}", e)))?;

    let record: VaultRecord = serde_json::from_str(&raw)
        .map_err(|e| SyntekError::ConfigError(format!("Failed to parse vault: {}", e)))?;

    Ok(Some(record))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_vault() {
        let dir = TempDir::new().unwrap();
        let loaded = load_vault(&dir.path().join("vault.enc")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_load_partial_vault() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vault.enc");
        fs::write(&path, r#"{"apiKey":"sk-vault","other":1}"#).unwrap();

        let loaded = load_vault(&path).unwrap().unwrap();
        assert_eq!(loaded.api_key.as_deref(), Some("sk-vault"));
        assert!(loaded.gateway.is_none());
        assert!(loaded.master_key.is_none());
    }

    #[test]
    fn test_load_garbage_vault_errors() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vault.enc");
        fs::write(&path, b"\x00\x01 encrypted bytes").unwrap();

        assert!(load_vault(&path).is_err());
    }

    #[test]
    fn test_default_path_shape() {
        let path = default_vault_path();
        assert!(path.ends_with(".farnsworth/vault.enc"));
    }
}
