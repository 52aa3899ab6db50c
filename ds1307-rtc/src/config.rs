use std::{env, fs, path::Path};

use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};

use crate::registers::{DS1307_BASE_YR, DS1307_I2C_ADDR, EEPROM_I2C_ADDR};

/// Points at a JSON file overriding [`Config::default`].
pub const CONFIG_ENV_VAR: &str = "DS1307_CONFIG";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub rtc_address: u8,
    pub eeprom_address: u8,
    pub base_year: u16,
    /// Pause after each EEPROM page write, covering the chip's write cycle.
    pub eeprom_write_delay_ms: u32,
    /// Bus number handed to the board layer; the driver never looks at it.
    pub i2c_bus: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rtc_address: DS1307_I2C_ADDR,
            eeprom_address: EEPROM_I2C_ADDR,
            base_year: DS1307_BASE_YR,
            eeprom_write_delay_ms: 10,
            i2c_bus: 1,
        }
    }
}

impl Config {
    pub fn from_json(json: &str) -> Result<Self> {
        let config = serde_json::from_str(json).context("Parsing DS1307 configuration")?;

        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .with_context(|| format!("Reading DS1307 configuration from {}", path.display()))?;

        Self::from_json(&json)
    }

    /// Loads the file named by `DS1307_CONFIG`, or the defaults when it is unset.
    pub fn from_env() -> Result<Self> {
        match env::var_os(CONFIG_ENV_VAR) {
            Some(path) => {
                info!("Loading configuration from {:?}", path);
                Self::from_json_file(path)
            }
            None => Ok(Self::default()),
        }
    }
}
