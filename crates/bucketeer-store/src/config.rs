use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// Largest key accepted by default, in bytes.
pub const DEFAULT_MAX_KEY_SIZE: usize = 32 * 1024;

/// Largest value accepted by default, in bytes.
pub const DEFAULT_MAX_VALUE_SIZE: usize = (1 << 31) - 2;

/// Configuration for a bucket store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Maximum length of a key or bucket name.
    pub max_key_size: usize,
    /// Maximum length of a value.
    pub max_value_size: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_key_size: DEFAULT_MAX_KEY_SIZE,
            max_value_size: DEFAULT_MAX_VALUE_SIZE,
        }
    }
}

impl StoreConfig {
    /// Reject limits that would make every write fail.
    pub fn validate(&self) -> StoreResult<()> {
        if self.max_key_size == 0 {
            return Err(StoreError::InvalidConfig(
                "max_key_size must be greater than zero".into(),
            ));
        }
        if self.max_value_size == 0 {
            return Err(StoreError::InvalidConfig(
                "max_value_size must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    /// Check a key or bucket name against the configured limits.
    pub(crate) fn check_key(&self, key: &[u8]) -> StoreResult<()> {
        if key.is_empty() {
            return Err(StoreError::KeyRequired);
        }
        if key.len() > self.max_key_size {
            return Err(StoreError::KeyTooLarge {
                len: key.len(),
                max: self.max_key_size,
            });
        }
        Ok(())
    }

    /// Check a value against the configured limits.
    pub(crate) fn check_value(&self, value: &[u8]) -> StoreResult<()> {
        if value.len() > self.max_value_size {
            return Err(StoreError::ValueTooLarge {
                len: value.len(),
                max: self.max_value_size,
            });
        }
        Ok(())
    }
}
