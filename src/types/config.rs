//! Configuration types for the file input control and the service.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::{ExtensionFilter, ValidationPolicy};
use crate::{
    DEFAULT_CONTROL_IDLE_SECS, DEFAULT_INVALID_TEXT, DEFAULT_PORT, MAX_CONTROL_IDLE_SECS,
};

/// Raw attribute values as the host receives them.
///
/// Every field is the unparsed string form; a boolean attribute is "on"
/// when present, whatever its value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct FileInputAttributes {
    pub accept: Option<String>,
    pub camera: Option<String>,
    pub directory: Option<String>,
    /// JSON array of extensions, optionally prefixed with `!`
    pub extensions: Option<String>,
    pub max_files: Option<String>,
    pub max_size: Option<String>,
    pub min_size: Option<String>,
    pub required: Option<String>,
}

impl FileInputAttributes {
    /// Fill every absent attribute from `defaults`.
    pub fn merged_with(&self, defaults: &FileInputAttributes) -> Self {
        fn pick(own: &Option<String>, fallback: &Option<String>) -> Option<String> {
            own.clone().or_else(|| fallback.clone())
        }

        Self {
            accept: pick(&self.accept, &defaults.accept),
            camera: pick(&self.camera, &defaults.camera),
            directory: pick(&self.directory, &defaults.directory),
            extensions: pick(&self.extensions, &defaults.extensions),
            max_files: pick(&self.max_files, &defaults.max_files),
            max_size: pick(&self.max_size, &defaults.max_size),
            min_size: pick(&self.min_size, &defaults.min_size),
            required: pick(&self.required, &defaults.required),
        }
    }
}

/// Typed configuration of a file input control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInputConfig {
    /// Value forwarded to the native `accept` attribute
    pub accept: String,

    /// Request camera capture on platforms that support it
    pub camera: bool,

    /// Request directory selection
    pub directory: bool,

    /// Extension filter
    pub extensions: Option<ExtensionFilter>,

    /// Maximum accepted files (0 = unlimited)
    pub max_files: usize,

    /// Maximum size in bytes (0 = unbounded)
    pub max_size: u64,

    /// Minimum size in bytes (0 = unbounded)
    pub min_size: u64,

    /// Whether an empty selection is invalid
    pub required: bool,

    /// Message reported while a required control has no valid files
    pub invalid_text: String,
}

impl Default for FileInputConfig {
    fn default() -> Self {
        Self {
            accept: String::new(),
            camera: false,
            directory: false,
            extensions: None,
            max_files: 0,
            max_size: 0,
            min_size: 0,
            required: false,
            invalid_text: DEFAULT_INVALID_TEXT.to_string(),
        }
    }
}

impl FileInputConfig {
    /// The validation rules carried by this configuration.
    pub fn policy(&self) -> ValidationPolicy {
        ValidationPolicy {
            min_size: self.min_size,
            max_size: self.max_size,
            extensions: self.extensions.clone(),
            max_count: self.max_files,
        }
    }

    /// Set the invalid message.
    pub fn with_invalid_text(mut self, text: impl Into<String>) -> Self {
        self.invalid_text = text.into();
        self
    }
}

impl TryFrom<&FileInputAttributes> for FileInputConfig {
    type Error = ConfigError;

    fn try_from(attrs: &FileInputAttributes) -> Result<Self, Self::Error> {
        Ok(Self {
            accept: attrs.accept.clone().unwrap_or_default(),
            camera: decode_flag(attrs.camera.as_deref()),
            directory: decode_flag(attrs.directory.as_deref()),
            extensions: decode_extensions("extensions", attrs.extensions.as_deref())?,
            max_files: decode_count("max-files", attrs.max_files.as_deref())?,
            max_size: decode_byte_count("max-size", attrs.max_size.as_deref())?,
            min_size: decode_byte_count("min-size", attrs.min_size.as_deref())?,
            required: decode_flag(attrs.required.as_deref()),
            invalid_text: DEFAULT_INVALID_TEXT.to_string(),
        })
    }
}

/// Decode a boolean attribute. Presence means `true`.
pub fn decode_flag(raw: Option<&str>) -> bool {
    raw.is_some()
}

/// Decode a byte count. Absent or blank means 0 (no bound).
pub fn decode_byte_count(field: &'static str, raw: Option<&str>) -> Result<u64, ConfigError> {
    let value = match raw.map(str::trim) {
        None | Some("") => return Ok(0),
        Some(value) => value,
    };

    if let Ok(n) = value.parse::<u64>() {
        return Ok(n);
    }

    // Accept "1e3" or "2000.0", but only if the value is a whole number.
    let number: f64 = value.parse().map_err(|_| ConfigError::InvalidNumber {
        field,
        value: value.to_string(),
    })?;

    if !number.is_finite() || number >= u64::MAX as f64 {
        return Err(ConfigError::InvalidNumber {
            field,
            value: value.to_string(),
        });
    }
    if number < 0.0 {
        return Err(ConfigError::Negative {
            field,
            value: value.to_string(),
        });
    }
    if number.fract() != 0.0 {
        return Err(ConfigError::NotWholeNumber {
            field,
            value: value.to_string(),
        });
    }

    Ok(number as u64)
}

/// Decode a file count. Absent or blank means 0 (no limit).
pub fn decode_count(field: &'static str, raw: Option<&str>) -> Result<usize, ConfigError> {
    let n = decode_byte_count(field, raw)?;
    usize::try_from(n).map_err(|_| ConfigError::InvalidNumber {
        field,
        value: n.to_string(),
    })
}

/// Decode an extension list such as `["jpg","png"]` or `!["exe"]`.
///
/// The whole value is lower-cased before parsing. Absent or blank means no
/// filter.
pub fn decode_extensions(
    field: &'static str,
    raw: Option<&str>,
) -> Result<Option<ExtensionFilter>, ConfigError> {
    let value = match raw.map(str::trim) {
        None | Some("") => return Ok(None),
        Some(value) => value,
    };

    let lowered = value.to_lowercase();
    let (negate, list) = match lowered.strip_prefix('!') {
        Some(rest) => (true, rest),
        None => (false, lowered.as_str()),
    };

    let extensions: Vec<String> =
        serde_json::from_str(list).map_err(|e| ConfigError::InvalidExtensions {
            field,
            value: value.to_string(),
            reason: e.to_string(),
        })?;

    Ok(Some(ExtensionFilter {
        extensions: extensions.into_iter().collect(),
        negate,
    }))
}

/// Decode an idle timeout in seconds. Absent or blank means the default.
///
/// Must lie in `1..=MAX_CONTROL_IDLE_SECS` so the sweep cutoff stays a
/// sane date.
pub fn decode_idle_timeout(
    field: &'static str,
    raw: Option<&str>,
) -> Result<chrono::Duration, ConfigError> {
    let secs = match decode_byte_count(field, raw)? {
        0 if raw.map_or(true, |v| v.trim().is_empty()) => DEFAULT_CONTROL_IDLE_SECS,
        secs => secs,
    };

    let out_of_range = || ConfigError::OutOfRange {
        field,
        value: secs.to_string(),
        min: 1,
        max: MAX_CONTROL_IDLE_SECS,
    };

    if !(1..=MAX_CONTROL_IDLE_SECS).contains(&secs) {
        return Err(out_of_range());
    }
    let secs = i64::try_from(secs).map_err(|_| out_of_range())?;
    chrono::Duration::try_seconds(secs).ok_or_else(out_of_range)
}

/// Service configuration.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Port the HTTP service listens on
    pub port: u16,

    /// Message used by required controls with no valid files
    pub invalid_text: String,

    /// Attributes applied when a request leaves them out
    pub default_attributes: FileInputAttributes,

    /// How long a hosted control may sit unused before it is dropped
    pub control_idle: chrono::Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            invalid_text: DEFAULT_INVALID_TEXT.to_string(),
            default_attributes: FileInputAttributes::default(),
            control_idle: chrono::Duration::seconds(DEFAULT_CONTROL_IDLE_SECS as i64),
        }
    }
}

impl ServiceConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// The default attributes are decoded once here so a bad value fails
    /// at startup rather than on the first request.
    pub fn from_lookup<L>(lookup: L) -> Result<Self, ConfigError>
    where
        L: Fn(&str) -> Option<String>,
    {
        let default_attributes = FileInputAttributes {
            extensions: lookup("DEFAULT_EXTENSIONS"),
            max_files: lookup("DEFAULT_MAX_FILES"),
            max_size: lookup("DEFAULT_MAX_SIZE"),
            min_size: lookup("DEFAULT_MIN_SIZE"),
            ..Default::default()
        };
        FileInputConfig::try_from(&default_attributes)?;

        let invalid_text = match lookup("INVALID_TEXT") {
            Some(text) if text.trim().is_empty() => {
                return Err(ConfigError::Blank {
                    field: "INVALID_TEXT",
                })
            }
            Some(text) => text,
            None => DEFAULT_INVALID_TEXT.to_string(),
        };

        Ok(Self {
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            invalid_text,
            default_attributes,
            control_idle: decode_idle_timeout(
                "CONTROL_IDLE_SECS",
                lookup("CONTROL_IDLE_SECS").as_deref(),
            )?,
        })
    }

    /// Decode request attributes on top of the configured defaults.
    pub fn resolve(&self, attrs: &FileInputAttributes) -> Result<FileInputConfig, ConfigError> {
        let merged = attrs.merged_with(&self.default_attributes);
        let config = FileInputConfig::try_from(&merged)?;
        Ok(config.with_invalid_text(self.invalid_text.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    #[test]
    fn test_decode_byte_count() {
        assert_eq!(decode_byte_count("max-size", None), Ok(0));
        assert_eq!(decode_byte_count("max-size", Some("  ")), Ok(0));
        assert_eq!(decode_byte_count("max-size", Some("2500")), Ok(2500));
        assert_eq!(decode_byte_count("max-size", Some("1e3")), Ok(1000));
        assert_eq!(decode_byte_count("max-size", Some("2000.0")), Ok(2000));

        assert!(matches!(
            decode_byte_count("max-size", Some("big")),
            Err(ConfigError::InvalidNumber { .. })
        ));
        assert!(matches!(
            decode_byte_count("max-size", Some("-5")),
            Err(ConfigError::Negative { .. })
        ));
        assert!(matches!(
            decode_byte_count("max-size", Some("1.5")),
            Err(ConfigError::NotWholeNumber { .. })
        ));
    }

    #[test]
    fn test_decode_extensions() {
        let filter = decode_extensions("extensions", Some(r#"["JPG", "png"]"#))
            .unwrap()
            .unwrap();
        assert_eq!(filter, ExtensionFilter::allow(["jpg", "png"]));

        let filter = decode_extensions("extensions", Some(r#"!["jpg"]"#))
            .unwrap()
            .unwrap();
        assert_eq!(filter, ExtensionFilter::deny(["jpg"]));

        assert_eq!(decode_extensions("extensions", None), Ok(None));
        assert_eq!(decode_extensions("extensions", Some("")), Ok(None));
    }

    #[test]
    fn test_malformed_extensions_are_config_errors() {
        for raw in ["jpg", "[\"jpg\"", "!jpg", "[1, 2]"] {
            let err = decode_extensions("extensions", Some(raw)).unwrap_err();
            assert_eq!(err.field(), "extensions");
            assert!(matches!(err, ConfigError::InvalidExtensions { .. }));
        }
    }

    #[test]
    fn test_config_from_attributes() {
        let attrs = FileInputAttributes {
            accept: Some("image/*".to_string()),
            camera: Some(String::new()),
            extensions: Some(r#"["jpg"]"#.to_string()),
            max_files: Some("3".to_string()),
            max_size: Some("8000".to_string()),
            ..Default::default()
        };

        let config = FileInputConfig::try_from(&attrs).unwrap();

        assert_eq!(config.accept, "image/*");
        assert!(config.camera);
        assert!(!config.directory);
        assert!(!config.required);
        assert_eq!(
            config.policy(),
            ValidationPolicy::default()
                .with_extensions(ExtensionFilter::allow(["jpg"]))
                .with_max_count(3)
                .with_max_size(8000)
        );
    }

    #[test]
    fn test_attributes_deserialize_kebab_case() {
        let attrs: FileInputAttributes =
            serde_json::from_str(r#"{"max-files": "2", "min-size": "10"}"#).unwrap();
        assert_eq!(attrs.max_files.as_deref(), Some("2"));
        assert_eq!(attrs.min_size.as_deref(), Some("10"));
        assert_eq!(attrs.max_size, None);
    }

    #[test]
    fn test_service_config_from_lookup() {
        let vars: HashMap<&str, &str> = [
            ("PORT", "8080"),
            ("DEFAULT_MAX_SIZE", "5000"),
            ("DEFAULT_EXTENSIONS", r#"["pdf"]"#),
        ]
        .into_iter()
        .collect();

        let config =
            ServiceConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(
            config.control_idle,
            chrono::Duration::seconds(crate::DEFAULT_CONTROL_IDLE_SECS as i64)
        );
        assert_eq!(config.invalid_text, DEFAULT_INVALID_TEXT);

        // Request attributes win over defaults.
        let resolved = config
            .resolve(&FileInputAttributes {
                max_size: Some("100".to_string()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(resolved.max_size, 100);
        assert_eq!(resolved.extensions, Some(ExtensionFilter::allow(["pdf"])));
    }

    #[test]
    fn test_service_config_rejects_bad_defaults() {
        let result = ServiceConfig::from_lookup(|k| {
            (k == "DEFAULT_MAX_FILES").then(|| "many".to_string())
        });
        assert!(matches!(result, Err(ConfigError::InvalidNumber { field: "max-files", .. })));
    }

    #[test]
    fn test_byte_count_at_u64_overflow_is_rejected() {
        assert!(matches!(
            decode_byte_count("max-size", Some("18446744073709551616")),
            Err(ConfigError::InvalidNumber { .. })
        ));
        assert!(matches!(
            decode_byte_count("max-size", Some("1e30")),
            Err(ConfigError::InvalidNumber { .. })
        ));
        assert_eq!(
            decode_byte_count("max-size", Some("18446744073709551615")),
            Ok(u64::MAX)
        );
    }

    #[test]
    fn test_idle_timeout() {
        assert_eq!(
            decode_idle_timeout("CONTROL_IDLE_SECS", Some("90")),
            Ok(chrono::Duration::seconds(90))
        );
        assert_eq!(
            decode_idle_timeout("CONTROL_IDLE_SECS", None),
            Ok(chrono::Duration::seconds(crate::DEFAULT_CONTROL_IDLE_SECS as i64))
        );

        for raw in ["0", "18446744073709551615", "9000000000000000"] {
            assert!(
                matches!(
                    decode_idle_timeout("CONTROL_IDLE_SECS", Some(raw)),
                    Err(ConfigError::OutOfRange { .. })
                ),
                "accepted {}",
                raw
            );
        }
    }

    #[test]
    fn test_service_config_rejects_huge_idle_timeout() {
        let result = ServiceConfig::from_lookup(|k| {
            (k == "CONTROL_IDLE_SECS").then(|| u64::MAX.to_string())
        });
        assert!(matches!(
            result,
            Err(ConfigError::OutOfRange { field: "CONTROL_IDLE_SECS", .. })
        ));
    }

    #[test]
    fn test_service_config_rejects_blank_invalid_text() {
        for blank in ["", "   "] {
            let result = ServiceConfig::from_lookup(|k| {
                (k == "INVALID_TEXT").then(|| blank.to_string())
            });
            assert_eq!(
                result.map(|c| c.invalid_text),
                Err(ConfigError::Blank {
                    field: "INVALID_TEXT"
                })
            );
        }

        let config = ServiceConfig::from_lookup(|k| {
            (k == "INVALID_TEXT").then(|| "Pick a file".to_string())
        })
        .unwrap();
        assert_eq!(config.invalid_text, "Pick a file");
    }
}
