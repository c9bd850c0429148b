//! Device record and list envelope

use std::fmt;

use serde::de::{Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Serialize};

/// A single device row.
///
/// Decoding matches request bodies the way the HTTP clients of this service
/// expect:
/// - keys match field names regardless of case (`"ID"` sets `id`)
/// - a missing or `null` field keeps its zero value
/// - unknown keys are skipped, and a repeated key keeps its last value
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Device {
    pub id: i64,
    /// Only 0 and 1 are accepted by the store
    pub status: i64,
    pub name: String,
}

/// Case-insensitive key comparison, including the two non-ASCII characters
/// that fold onto the ASCII letters used in field names
fn key_matches(key: &str, field: &str) -> bool {
    fn fold(c: char) -> char {
        match c {
            '\u{017F}' => 's',
            '\u{212A}' => 'k',
            c => c.to_ascii_lowercase(),
        }
    }
    key.chars().map(fold).eq(field.chars())
}

impl<'de> Deserialize<'de> for Device {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct DeviceVisitor;

        impl<'de> Visitor<'de> for DeviceVisitor {
            type Value = Device;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a device object")
            }

            fn visit_map<M>(self, mut map: M) -> Result<Device, M::Error>
            where
                M: MapAccess<'de>,
            {
                let mut device = Device::default();
                while let Some(key) = map.next_key::<String>()? {
                    if key_matches(&key, "id") {
                        if let Some(id) = map.next_value::<Option<i64>>()? {
                            device.id = id;
                        }
                    } else if key_matches(&key, "status") {
                        if let Some(status) = map.next_value::<Option<i64>>()? {
                            device.status = status;
                        }
                    } else if key_matches(&key, "name") {
                        if let Some(name) = map.next_value::<Option<String>>()? {
                            device.name = name;
                        }
                    } else {
                        map.next_value::<IgnoredAny>()?;
                    }
                }
                Ok(device)
            }
        }

        deserializer.deserialize_map(DeviceVisitor)
    }
}

impl Device {
    pub fn new(id: i64, status: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            status,
            name: name.into(),
        }
    }
}

/// Body of `GET /`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceList {
    pub devices: Vec<Device>,
}

impl From<Vec<Device>> for DeviceList {
    fn from(devices: Vec<Device>) -> Self {
        Self { devices }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_take_zero_values() {
        let device: Device = serde_json::from_str(r#"{"name":"lamp"}"#).unwrap();
        assert_eq!(device, Device::new(0, 0, "lamp"));
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let device: Device =
            serde_json::from_str(r#"{"id":3,"status":1,"name":"fan","room":"attic"}"#).unwrap();
        assert_eq!(device, Device::new(3, 1, "fan"));
    }

    #[test]
    fn test_keys_match_regardless_of_case() {
        let device: Device =
            serde_json::from_str(r#"{"ID":5,"Status":1,"NAME":"caps"}"#).unwrap();
        assert_eq!(device, Device::new(5, 1, "caps"));

        let device: Device = serde_json::from_str(r#"{"\u017Ftatus":1}"#).unwrap();
        assert_eq!(device.status, 1);
    }

    #[test]
    fn test_null_fields_keep_zero_values() {
        let device: Device =
            serde_json::from_str(r#"{"id":4,"status":null,"name":null}"#).unwrap();
        assert_eq!(device, Device::new(4, 0, ""));
    }

    #[test]
    fn test_repeated_key_keeps_last_value() {
        let device: Device = serde_json::from_str(r#"{"id":1,"Id":2,"name":"x"}"#).unwrap();
        assert_eq!(device.id, 2);
    }

    #[test]
    fn test_non_object_rejected() {
        assert!(serde_json::from_str::<Device>("[1,0,\"lamp\"]").is_err());
        assert!(serde_json::from_str::<Device>("\"lamp\"").is_err());
    }

    #[test]
    fn test_wrong_type_rejected() {
        assert!(serde_json::from_str::<Device>(r#"{"id":"three"}"#).is_err());
        assert!(serde_json::from_str::<Device>(r#"{"status":1.5}"#).is_err());
        assert!(serde_json::from_str::<Device>("").is_err());
    }

    #[test]
    fn test_empty_list_serializes_as_array() {
        let json = serde_json::to_value(DeviceList::default()).unwrap();
        assert_eq!(json, serde_json::json!({ "devices": [] }));
    }
}
