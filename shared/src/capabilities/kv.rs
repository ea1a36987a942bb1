use std::marker::PhantomData;

use crux_kv::error::KeyValueError;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

pub const MAX_KEY_LENGTH: usize = 512;
pub const MAX_VALUE_SIZE: usize = 1024 * 1024;

/// Validated storage key. Keys are stored verbatim by the shell.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KvKey(String);

impl KvKey {
    pub fn new(key: impl Into<String>) -> Result<Self, KvError> {
        let key = key.into();
        Self::validate_key(&key)?;
        Ok(Self(key))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    fn validate_key(key: &str) -> Result<(), KvError> {
        if key.trim().is_empty() {
            return Err(KvError::InvalidKey {
                key: key.to_string(),
                reason: "key cannot be empty".to_string(),
            });
        }

        if key.len() > MAX_KEY_LENGTH {
            return Err(KvError::InvalidKey {
                key: key.chars().take(50).collect::<String>() + "...",
                reason: format!("key exceeds maximum length of {MAX_KEY_LENGTH} bytes"),
            });
        }

        if key.contains('\0') {
            return Err(KvError::InvalidKey {
                key: key.replace('\0', "\\0"),
                reason: "key cannot contain null bytes".to_string(),
            });
        }

        if key.contains("..") || key.starts_with('/') || key.starts_with('\\') {
            return Err(KvError::InvalidKey {
                key: key.to_string(),
                reason: "key cannot contain path components".to_string(),
            });
        }

        if key.chars().any(|c| c.is_control() && c != '\t') {
            return Err(KvError::InvalidKey {
                key: key.to_string(),
                reason: "key contains invalid control characters".to_string(),
            });
        }

        Ok(())
    }
}

impl std::fmt::Display for KvKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum KvError {
    #[error("invalid key '{key}': {reason}")]
    InvalidKey { key: String, reason: String },

    #[error("value too large: {size} bytes exceeds maximum of {max} bytes")]
    ValueTooLarge { size: usize, max: usize },

    #[error("storage error: {message}")]
    Storage { message: String },

    #[error("serialization error: {message}")]
    Serialization { message: String },
}

impl From<KeyValueError> for KvError {
    fn from(error: KeyValueError) -> Self {
        match error {
            KeyValueError::Io { message } | KeyValueError::Other { message } => {
                KvError::Storage { message }
            }
            other => KvError::Storage {
                message: other.to_string(),
            },
        }
    }
}

/// Result of a `KeyValue::get`. The shell answers a missing key with an
/// empty value, which maps to `Ok(None)`.
pub fn read_result(result: Result<Vec<u8>, KeyValueError>) -> Result<Option<Vec<u8>>, KvError> {
    let value = result?;
    Ok((!value.is_empty()).then_some(value))
}

/// Result of a `KeyValue::set`; the previous value is not needed.
pub fn write_result(result: Result<Vec<u8>, KeyValueError>) -> Result<(), KvError> {
    result.map(drop).map_err(KvError::from)
}

/// JSON codec for values of one type kept in the key-value store.
pub struct TypedKvStore<T> {
    _phantom: PhantomData<T>,
}

impl<T> Default for TypedKvStore<T> {
    fn default() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

impl<T: Serialize + DeserializeOwned> TypedKvStore<T> {
    pub fn encode(&self, value: &T) -> Result<Vec<u8>, KvError> {
        let data = serde_json::to_vec(value).map_err(|e| KvError::Serialization {
            message: e.to_string(),
        })?;
        if data.len() > MAX_VALUE_SIZE {
            return Err(KvError::ValueTooLarge {
                size: data.len(),
                max: MAX_VALUE_SIZE,
            });
        }
        Ok(data)
    }

    pub fn decode(&self, data: &[u8]) -> Result<T, KvError> {
        serde_json::from_slice(data).map_err(|e| KvError::Serialization {
            message: e.to_string(),
        })
    }
}
