//! Encrypted record store.
//!
//! One file per record name in a base directory, each holding a
//! [`StoreRecord`] envelope. Plaintext never touches the disk.

mod cipher;
mod record;

pub use cipher::{Cipher, CipherMethod, parse_iv};
pub use record::{StoreRecord, validate_name};

use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::constants::RECORD_EXTENSION;
use crate::error::{HostError, HostResult};

/// Outcome of touching a record with the active credential.
///
/// Not being allowed in, and there being nothing to look at, are ordinary
/// results rather than errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access<T> {
    Granted(T),
    /// The record belongs to someone else, or the password doesn't open it.
    Unauthenticated,
    NotFound,
}

impl<T> Access<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Access<U> {
        match self {
            Access::Granted(value) => Access::Granted(f(value)),
            Access::Unauthenticated => Access::Unauthenticated,
            Access::NotFound => Access::NotFound,
        }
    }

    pub fn granted(self) -> Option<T> {
        match self {
            Access::Granted(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_granted(&self) -> bool {
        matches!(self, Access::Granted(_))
    }
}

/// Validated store settings. Built once; there is no way to change them afterwards.
#[derive(Clone)]
pub struct StoreConfig {
    cipher: CipherMethod,
    iv: [u8; 16],
    username: String,
    password: String,
    base_dir: PathBuf,
}

impl StoreConfig {
    pub fn new(
        cipher_method: &str,
        iv_hex: &str,
        username: &str,
        password: &str,
        base_dir: impl Into<PathBuf>,
    ) -> HostResult<Self> {
        let cipher = cipher_method.parse()?;
        let iv = parse_iv(iv_hex)?;

        if username.is_empty() {
            return Err(HostError::Config("username must not be empty".into()));
        }

        Ok(StoreConfig {
            cipher,
            iv,
            username: username.to_string(),
            password: password.to_string(),
            base_dir: base_dir.into(),
        })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("cipher", &self.cipher)
            .field("iv", &hex::encode(self.iv))
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("base_dir", &self.base_dir)
            .finish()
    }
}

/// Named-record store bound to one credential
#[derive(Debug)]
pub struct Store {
    base_dir: PathBuf,
    username: String,
    cipher: Cipher,
}

static INSTALLED: OnceLock<Store> = OnceLock::new();

/// Install the process-wide store. Only the first successful call wins;
/// later calls fail with [`HostError::Config`].
pub fn initialize(config: StoreConfig) -> HostResult<&'static Store> {
    if INSTALLED.get().is_some() {
        return Err(HostError::Config("store is already initialized".into()));
    }

    let store = Store::new(config)?;
    INSTALLED
        .set(store)
        .map_err(|_| HostError::Config("store is already initialized".into()))?;

    INSTALLED
        .get()
        .ok_or_else(|| HostError::Config("store initialization was lost".into()))
}

/// The store installed by [`initialize`], if any.
pub fn installed() -> Option<&'static Store> {
    INSTALLED.get()
}

impl Store {
    /// Open a store over an existing directory.
    pub fn new(config: StoreConfig) -> HostResult<Self> {
        if !config.base_dir.is_dir() {
            return Err(HostError::Storage(format!(
                "Store directory {} does not exist",
                config.base_dir.display()
            )));
        }

        let cipher = Cipher::new(config.cipher, &config.password, config.iv);
        Ok(Store {
            base_dir: config.base_dir,
            username: config.username,
            cipher,
        })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    fn path_for(&self, name: &str) -> HostResult<PathBuf> {
        validate_name(name)?;
        Ok(self
            .base_dir
            .join(format!("{name}.{RECORD_EXTENSION}")))
    }

    /// Whether a record file exists. Does not decrypt anything.
    pub fn exists(&self, name: &str) -> HostResult<bool> {
        Ok(self.path_for(name)?.is_file())
    }

    /// Decrypt a record's plaintext.
    pub fn load(&self, name: &str) -> HostResult<Access<String>> {
        let path = self.path_for(name)?;
        if !path.is_file() {
            return Ok(Access::NotFound);
        }

        let content = std::fs::read_to_string(&path).map_err(|e| {
            HostError::Storage(format!("Could not read {}: {e}", path.display()))
        })?;
        let record = StoreRecord::from_json(&content)?;

        if record.owner != self.username {
            tracing::warn!(record = name, "record owner does not match the active user");
            return Ok(Access::Unauthenticated);
        }

        match self.cipher.decrypt(&record.ciphertext) {
            Some(plaintext) => {
                tracing::debug!(record = name, bytes = plaintext.len(), "loaded record");
                Ok(Access::Granted(plaintext))
            }
            None => {
                tracing::warn!(record = name, "record could not be decrypted");
                Ok(Access::Unauthenticated)
            }
        }
    }

    /// Encrypt and write a record, replacing any previous one.
    ///
    /// The envelope goes to a hidden temporary file first and is renamed into
    /// place, so concurrent readers see either the old or the new record.
    pub fn save(&self, name: &str, plaintext: &[u8]) -> HostResult<()> {
        let path = self.path_for(name)?;
        let record = StoreRecord {
            owner: self.username.clone(),
            ciphertext: self.cipher.encrypt(plaintext),
        };
        let content = record.to_json()?;

        let write_err =
            |e: std::io::Error| HostError::Storage(format!("Could not write {}: {e}", path.display()));

        let mut tmp = tempfile::Builder::new()
            .prefix(".")
            .suffix(".tmp")
            .tempfile_in(&self.base_dir)
            .map_err(write_err)?;
        tmp.write_all(content.as_bytes()).map_err(write_err)?;
        tmp.as_file().sync_all().map_err(write_err)?;
        tmp.persist(&path).map_err(|e| write_err(e.error))?;

        tracing::debug!(record = name, "saved record");
        Ok(())
    }

    /// Remove a record. Returns whether there was one.
    pub fn delete(&self, name: &str) -> HostResult<bool> {
        let path = self.path_for(name)?;
        if !path.is_file() {
            return Ok(false);
        }

        std::fs::remove_file(&path).map_err(|e| {
            HostError::Storage(format!("Could not delete {}: {e}", path.display()))
        })?;
        tracing::debug!(record = name, "deleted record");
        Ok(true)
    }

    /// Raw directory entries, dotfiles and extensions included.
    pub fn list(&self) -> HostResult<Vec<String>> {
        let entries = std::fs::read_dir(&self.base_dir).map_err(|e| {
            HostError::Storage(format!("Could not list {}: {e}", self.base_dir.display()))
        })?;

        Ok(entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect())
    }

    /// Record names, sorted, with hidden files and foreign files left out.
    pub fn names(&self) -> HostResult<Vec<String>> {
        let suffix = format!(".{RECORD_EXTENSION}");

        let mut names: Vec<String> = self
            .list()?
            .into_iter()
            .filter(|file| !file.starts_with('.'))
            .filter_map(|file| file.strip_suffix(&suffix).map(str::to_string))
            .filter(|name| validate_name(name).is_ok())
            .collect();

        names.sort();
        Ok(names)
    }
}
