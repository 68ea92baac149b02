//! Registry of known telemetry services.
//!
//! Only the key set is used: every known service gets a pre-declared
//! time-series panel. A registry file is a JSON object keyed by service
//! name, in the shape the logging stack publishes its service list; the
//! per-service metadata is ignored.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use serde::de::IgnoredAny;

use crate::error::{Error, Result};

const BUILTIN: &[&str] = &[
    "accelerometer",
    "androidLog",
    "cameraOdometry",
    "can",
    "carControl",
    "carOutput",
    "carParams",
    "carState",
    "clocks",
    "controlsState",
    "deviceState",
    "driverCameraState",
    "driverEncodeIdx",
    "driverMonitoringState",
    "driverStateV2",
    "errorLogMessage",
    "gnssMeasurements",
    "gpsLocation",
    "gpsLocationExternal",
    "gyroscope",
    "lightSensor",
    "liveCalibration",
    "liveLocationKalman",
    "liveParameters",
    "liveTorqueParameters",
    "liveTracks",
    "logMessage",
    "longitudinalPlan",
    "magnetometer",
    "managerState",
    "modelV2",
    "onroadEvents",
    "pandaStates",
    "peripheralState",
    "procLog",
    "qcomGnss",
    "radarState",
    "roadCameraState",
    "roadEncodeIdx",
    "sendcan",
    "temperatureSensor",
    "thumbnail",
    "ubloxGnss",
    "ubloxRaw",
    "uploaderState",
    "userFlag",
    "wideRoadCameraState",
    "wideRoadEncodeIdx",
];

/// The set of known service names.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ServiceRegistry {
    names: BTreeSet<String>,
}

impl ServiceRegistry {
    /// The built-in service list.
    pub fn builtin() -> Self {
        BUILTIN.iter().copied().collect()
    }

    /// Load the keys of a JSON object mapping service names to metadata.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let services: BTreeMap<String, IgnoredAny> =
            serde_json::from_str(&content).map_err(|source| Error::Registry {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(services.into_keys().collect())
    }

    /// Use `path` when given, otherwise the built-in list.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::builtin()),
        }
    }

    /// Service names in lexicographic order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for ServiceRegistry {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_builtin_contains_known_services() {
        let registry = ServiceRegistry::builtin();
        let names: Vec<_> = registry.names().collect();
        assert!(names.contains(&"carState"));
        assert!(names.contains(&"thumbnail"));
        assert_eq!(registry.len(), BUILTIN.len());
    }

    #[test]
    fn test_names_are_sorted() {
        let registry = ServiceRegistry::builtin();
        let names: Vec<_> = registry.names().collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
    }

    #[test]
    fn test_from_file_uses_keys_only() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"{{
                "zeta": {{ "should_log": true, "frequency": 1.0 }},
                "alpha": [false, 20.0, 5]
            }}"#
        )
        .unwrap();

        let registry = ServiceRegistry::from_file(file.path()).unwrap();
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_from_file_invalid() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[1, 2, 3]").unwrap();

        let err = ServiceRegistry::from_file(file.path()).unwrap_err();
        assert!(matches!(err, Error::Registry { .. }));
    }

    #[test]
    fn test_load_without_path_is_builtin() {
        assert_eq!(ServiceRegistry::load(None).unwrap(), ServiceRegistry::builtin());
        assert!(ServiceRegistry::default().is_empty());
    }
}
