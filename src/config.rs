use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::Result;

/// Bridge configuration: the device table and where its endpoints start.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    pub first_endpoint_id: u16,
    pub devices: Vec<DeviceConfig>,
}

/// One bridged device entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceConfig {
    pub name: String,
    pub location: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            first_endpoint_id: 3,
            devices: vec![
                DeviceConfig {
                    name: "Light 1".to_string(),
                    location: "Office".to_string(),
                },
                DeviceConfig {
                    name: "Light 2".to_string(),
                    location: "Office".to_string(),
                },
                DeviceConfig {
                    name: "Light 3".to_string(),
                    location: "Kitchen".to_string(),
                },
                DeviceConfig {
                    name: "Light 4".to_string(),
                    location: "Den".to_string(),
                },
            ],
        }
    }
}

impl BridgeConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Build configuration from the environment, starting from defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(id) = std::env::var("BRIDGE_FIRST_ENDPOINT_ID")
            && let Ok(parsed) = id.parse()
        {
            config.first_endpoint_id = parsed;
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_device_table() {
        let config = BridgeConfig::default();
        assert_eq!(config.first_endpoint_id, 3);
        assert_eq!(config.devices.len(), 4);
        assert_eq!(config.devices[0].name, "Light 1");
        assert_eq!(config.devices[3].location, "Den");
    }

    #[test]
    fn test_json_deserialization() {
        let json = r#"{
            "first_endpoint_id": 10,
            "devices": [
                { "name": "Fan", "location": "Bedroom" }
            ]
        }"#;
        let config: BridgeConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.first_endpoint_id, 10);
        assert_eq!(config.devices.len(), 1);
        assert_eq!(config.devices[0].name, "Fan");
    }

    #[test]
    fn test_json_round_trip() {
        let config = BridgeConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: BridgeConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.devices.len(), config.devices.len());
        assert_eq!(parsed.first_endpoint_id, config.first_endpoint_id);
    }
}
