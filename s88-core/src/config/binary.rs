//! Binary configuration encoding
//!
//! Bus configuration stored as postcard data, e.g. in a flash sector.

use super::types::{BusConfig, ConfigError, CONFIG_VERSION};

/// Maximum serialized config size
pub const MAX_CONFIG_SIZE: usize = 512;

impl BusConfig {
    /// Serialize into `buffer`, returning the used prefix
    pub fn encode<'b>(&self, buffer: &'b mut [u8]) -> Result<&'b mut [u8], ConfigError> {
        postcard::to_slice(self, buffer).map_err(|_| ConfigError::Encode)
    }

    /// Deserialize and validate a configuration
    pub fn decode(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: BusConfig = postcard::from_bytes(bytes).map_err(|_| ConfigError::Decode)?;

        if config.version != CONFIG_VERSION {
            return Err(ConfigError::VersionMismatch);
        }
        config.validate()?;

        Ok(config)
    }
}
