//! Time slot configuration for the continuous averager.
//!
//! A slot maps a short name (e.g. "m5") to a window length in seconds over
//! which load samples are averaged. Configurations are validated at
//! construction and immutable afterwards.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::Error;

/// Named averaging windows: slot name to window length in seconds.
///
/// Built from one of the presets or from explicit entries via
/// [`SlotConfig::new`]. Slot names are unique by map semantics; iteration
/// order is the sorted name order.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct SlotConfig {
    slots: BTreeMap<String, u64>,
}

impl SlotConfig {
    /// The standard slot table: one second up to ten hours.
    pub fn standard() -> Self {
        Self::from_table(&[
            ("s1", 1),
            ("s10", 10),
            ("m1", 60),
            ("m10", 600),
            ("h1", 3600),
            ("h10", 36000),
        ])
    }

    /// The Unix-style loadavg slot table: 5, 10, and 15 minutes.
    pub fn unix() -> Self {
        Self::from_table(&[("m5", 300), ("m10", 600), ("m15", 900)])
    }

    /// Resolves a preset by name ("standard" or "unix").
    pub fn preset(name: &str) -> Result<Self, Error> {
        match name {
            "standard" => Ok(Self::standard()),
            "unix" => Ok(Self::unix()),
            other => Err(Error::InvalidConfig(format!(
                "unknown preset '{}' (expected \"standard\" or \"unix\")",
                other
            ))),
        }
    }

    /// Builds a configuration from explicit slot entries.
    ///
    /// Every slot name must be non-empty and every duration non-zero.
    /// Duplicate names collapse to the last entry.
    pub fn new<N, I>(slots: I) -> Result<Self, Error>
    where
        N: Into<String>,
        I: IntoIterator<Item = (N, u64)>,
    {
        let mut table = BTreeMap::new();
        for (name, secs) in slots {
            let name = name.into();
            if name.trim().is_empty() {
                return Err(Error::InvalidConfig(
                    "slot names must not be empty".to_string(),
                ));
            }
            if secs == 0 {
                return Err(Error::InvalidConfig(format!(
                    "slot '{}' has a zero duration",
                    name
                )));
            }
            table.insert(name, secs);
        }
        Ok(Self { slots: table })
    }

    /// Iterates over `(slot name, duration in seconds)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.slots.iter().map(|(name, secs)| (name.as_str(), *secs))
    }

    /// Number of configured slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns true if no slots are configured.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn from_table(entries: &[(&str, u64)]) -> Self {
        Self {
            slots: entries
                .iter()
                .map(|&(name, secs)| (name.to_string(), secs))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_preset_slots() {
        let config = SlotConfig::standard();
        let slots: Vec<(&str, u64)> = config.iter().collect();

        assert_eq!(config.len(), 6);
        assert!(slots.contains(&("s1", 1)));
        assert!(slots.contains(&("s10", 10)));
        assert!(slots.contains(&("m1", 60)));
        assert!(slots.contains(&("m10", 600)));
        assert!(slots.contains(&("h1", 3600)));
        assert!(slots.contains(&("h10", 36000)));
    }

    #[test]
    fn test_unix_preset_slots() {
        let config = SlotConfig::unix();
        let slots: Vec<(&str, u64)> = config.iter().collect();

        assert_eq!(slots, vec![("m10", 600), ("m15", 900), ("m5", 300)]);
    }

    #[test]
    fn test_preset_by_name() {
        assert_eq!(SlotConfig::preset("standard").unwrap().len(), 6);
        assert_eq!(SlotConfig::preset("unix").unwrap().len(), 3);
    }

    #[test]
    fn test_unknown_preset_rejected() {
        let result = SlotConfig::preset("std");
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_custom_config() {
        let config = SlotConfig::new([("burst", 5), ("m2", 120)]).unwrap();
        assert_eq!(config.len(), 2);
        let slots: Vec<(&str, u64)> = config.iter().collect();
        assert_eq!(slots, vec![("burst", 5), ("m2", 120)]);
    }

    #[test]
    fn test_zero_duration_rejected() {
        let result = SlotConfig::new([("bad", 0)]);
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_empty_name_rejected() {
        let result = SlotConfig::new([("", 60)]);
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_duplicate_names_collapse() {
        let config = SlotConfig::new([("m1", 30), ("m1", 60)]).unwrap();
        assert_eq!(config.len(), 1);
        assert_eq!(config.iter().next(), Some(("m1", 60)));
    }

    #[test]
    fn test_serializes_as_bare_map() {
        let config = SlotConfig::unix();
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(json, r#"{"m10":600,"m15":900,"m5":300}"#);
    }
}
