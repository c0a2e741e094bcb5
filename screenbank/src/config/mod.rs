//! Rotation configuration loading and validation.
//!
//! The expected YAML structure is:
//! ```yaml
//! config:
//!   image_dir: /srv/screenbank/images
//!   tick_time: 1.0
//!   random_start: true
//!   debug: false
//!   log_device: STDOUT        # STDOUT | STDERR | path to a log file
//!   driver: /usr/local/bin/artistactrl
//! screens:
//!   lobby_left: ~
//!   lobby_right: ~
//! images:
//!   welcome:
//!     duration: 5.0
//!     file: welcome.png
//!   menu:
//!     duration: 12
//!     file: menu.png
//! ```
//!
//! `screens` may also be a plain list of ids.  The order of `screens` and
//! `images` in the file is kept: it is the scan order of the screens and the
//! initial queue order of the images.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use serde_yaml::{Mapping, Value};
use thiserror::Error;

use crate::content::Content;
use crate::driver::command::DEFAULT_PROGRAM;

// ── Error type ────────────────────────────────────────────────────────────────

/// Startup configuration is missing or malformed.  Always fatal.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot open configuration file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// A `screens` / `images` key is not a scalar.
    #[error("{section} key {key} must be a string or a number")]
    InvalidKey { section: &'static str, key: String },

    /// An `images` entry is missing `duration` / `file` or has the wrong type.
    #[error("image '{image}': {source}")]
    InvalidImage {
        image: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("image '{image}' has invalid duration {value} (must be a finite number >= 0)")]
    InvalidDuration { image: String, value: f64 },

    #[error("tick_time must be a finite number of seconds > 0, got {0}")]
    InvalidTickTime(f64),

    #[error("screen ids must not be empty (an empty id marks an unlabeled screen)")]
    EmptyScreenId,

    #[error("screen '{0}' is listed more than once")]
    DuplicateScreen(String),
}

// ── Private YAML deserialization types ────────────────────────────────────────

/// Top-level wrapper that maps directly onto the YAML file layout.
#[derive(Debug, Deserialize)]
struct ConfigFile {
    config: GeneralEntry,
    #[serde(default)]
    screens: ScreensEntry,
    #[serde(default)]
    images: Mapping,
}

#[derive(Debug, Deserialize)]
struct GeneralEntry {
    image_dir: PathBuf,
    tick_time: f64,
    #[serde(default)]
    random_start: bool,
    #[serde(default)]
    debug: bool,
    log_device: Option<String>,
    driver: Option<PathBuf>,
    #[serde(default)]
    forked: bool,
}

/// Screens as a mapping (values ignored) or as a list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ScreensEntry {
    List(Vec<Value>),
    Keyed(Mapping),
}

impl Default for ScreensEntry {
    fn default() -> Self {
        ScreensEntry::List(Vec::new())
    }
}

#[derive(Debug, Deserialize)]
struct ImageEntry {
    duration: f64,
    file: PathBuf,
}

// ── Public data structures ────────────────────────────────────────────────────

/// Settings the [`Manager`](crate::manager::Manager) consults while running.
#[derive(Debug, Clone)]
pub struct RotationSettings {
    /// Directory image files are resolved against.
    pub image_dir: PathBuf,
    /// Shuffle the queue once before the first fill.
    pub random_start: bool,
    /// Snapshot-only loop: no discovery, no swaps.
    pub debug: bool,
    /// Sleep between ticks.
    pub tick_interval: Duration,
}

/// Where log output goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogDevice {
    Stdout,
    Stderr,
    /// Appended to; created if missing.
    File(PathBuf),
}

impl LogDevice {
    fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") => LogDevice::Stdout,
            Some(s) if s.eq_ignore_ascii_case("stdout") => LogDevice::Stdout,
            Some(s) if s.eq_ignore_ascii_case("stderr") => LogDevice::Stderr,
            Some(path) => LogDevice::File(PathBuf::from(path)),
        }
    }
}

/// One entry of the `images` section.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageSpec {
    pub id: String,
    pub duration_s: f64,
    pub file: PathBuf,
}

impl ImageSpec {
    pub fn to_content(&self) -> Content {
        Content::new(self.id.clone(), self.duration_s, self.file.clone())
    }
}

/// The complete, validated configuration.
#[derive(Debug, Clone)]
pub struct RotationConfig {
    pub settings: RotationSettings,
    /// Screen ids in scan order.
    pub screens: Vec<String>,
    /// Images in initial queue order.
    pub images: Vec<ImageSpec>,
    pub log_device: LogDevice,
    /// Device-control program.
    pub driver: PathBuf,
    /// Legacy fork-into-background flag.  Parsed but not acted on.
    pub forked: bool,
}

impl RotationConfig {
    /// Read and validate the configuration at `path`.
    ///
    /// # Errors
    /// [`ConfigError::Io`] if the file cannot be read, any other variant if
    /// its content is invalid.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_yaml(&content)
    }

    /// Parse and validate a configuration held in memory.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = serde_yaml::from_str(yaml)?;
        let general = file.config;

        if !general.tick_time.is_finite() || general.tick_time <= 0.0 {
            return Err(ConfigError::InvalidTickTime(general.tick_time));
        }
        let tick_interval = Duration::try_from_secs_f64(general.tick_time)
            .map_err(|_| ConfigError::InvalidTickTime(general.tick_time))?;

        let screens = parse_screens(file.screens)?;
        let images = parse_images(file.images)?;

        let config = RotationConfig {
            settings: RotationSettings {
                image_dir: general.image_dir,
                random_start: general.random_start,
                debug: general.debug,
                tick_interval,
            },
            screens,
            images,
            log_device: LogDevice::parse(general.log_device.as_deref()),
            driver: general.driver.unwrap_or_else(|| PathBuf::from(DEFAULT_PROGRAM)),
            forked: general.forked,
        };

        Ok(config)
    }

    /// Operator-facing problems that do not stop the rotation from starting.
    ///
    /// Loading happens before the log device is known, so the caller logs
    /// these once its subscriber is installed.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.forked {
            warnings.push(
                "'forked' is not supported; run screenbank under a service manager to daemonize it"
                    .to_string(),
            );
        }
        if self.screens.is_empty() {
            warnings.push("No screens configured".to_string());
        }
        if self.images.len() <= self.screens.len() {
            warnings.push(format!(
                "Not more images ({}) than screens ({}): the rotation queue will be empty after the initial fill",
                self.images.len(),
                self.screens.len()
            ));
        }
        warnings
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// String form of a scalar mapping key or list entry.
fn scalar_to_string(value: &Value, section: &'static str) -> Result<String, ConfigError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(ConfigError::InvalidKey {
            section,
            key: format!("{:?}", other),
        }),
    }
}

fn parse_screens(entry: ScreensEntry) -> Result<Vec<String>, ConfigError> {
    let raw: Vec<Value> = match entry {
        ScreensEntry::List(list) => list,
        ScreensEntry::Keyed(map) => map.into_iter().map(|(k, _)| k).collect(),
    };

    let mut screens: Vec<String> = Vec::with_capacity(raw.len());
    for value in &raw {
        let id = scalar_to_string(value, "screens")?;
        if id.is_empty() {
            return Err(ConfigError::EmptyScreenId);
        }
        if screens.contains(&id) {
            return Err(ConfigError::DuplicateScreen(id));
        }
        screens.push(id);
    }
    Ok(screens)
}

fn parse_images(map: Mapping) -> Result<Vec<ImageSpec>, ConfigError> {
    let mut images = Vec::with_capacity(map.len());
    for (key, value) in map {
        let id = scalar_to_string(&key, "images")?;
        let entry: ImageEntry =
            serde_yaml::from_value(value).map_err(|source| ConfigError::InvalidImage {
                image: id.clone(),
                source,
            })?;

        if !entry.duration.is_finite() || entry.duration < 0.0 {
            return Err(ConfigError::InvalidDuration {
                image: id,
                value: entry.duration,
            });
        }

        images.push(ImageSpec {
            id,
            duration_s: entry.duration,
            file: entry.file,
        });
    }
    Ok(images)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Helper: write a YAML string to a temp file and return it.
    fn yaml_tempfile(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f
    }

    const EXAMPLE: &str = r#"
config:
  image_dir: /srv/images
  tick_time: 0.5
  random_start: true
  debug: false
  log_device: STDOUT
screens:
  C: ~
  A: ~
  B: ~
images:
  welcome:
    duration: 5.0
    file: welcome.png
  menu:
    duration: 12
    file: menu.png
  specials:
    duration: 7.5
    file: specials.png
  hours:
    duration: 3
    file: hours.png
"#;

    // ── load_from_file ────────────────────────────────────────────────────────

    #[test]
    fn load_example_yaml() {
        let f = yaml_tempfile(EXAMPLE);
        let cfg = RotationConfig::load_from_file(f.path()).unwrap();

        assert_eq!(cfg.settings.image_dir, PathBuf::from("/srv/images"));
        assert_eq!(cfg.settings.tick_interval, Duration::from_millis(500));
        assert!(cfg.settings.random_start);
        assert!(!cfg.settings.debug);
        assert_eq!(cfg.log_device, LogDevice::Stdout);
        assert_eq!(cfg.driver, PathBuf::from(DEFAULT_PROGRAM));
        assert!(!cfg.forked);

        let menu = &cfg.images[1];
        assert_eq!(menu.id, "menu");
        assert_eq!(menu.duration_s, 12.0);
        assert_eq!(menu.file, PathBuf::from("menu.png"));
    }

    #[test]
    fn file_order_of_screens_and_images_is_kept() {
        let cfg = RotationConfig::from_yaml(EXAMPLE).unwrap();
        assert_eq!(cfg.screens, ["C", "A", "B"]);
        let ids: Vec<_> = cfg.images.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["welcome", "menu", "specials", "hours"]);
    }

    #[test]
    fn missing_file_returns_io_error() {
        let err = RotationConfig::load_from_file(Path::new("/nonexistent/screens.yaml"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn malformed_yaml_returns_parse_error() {
        let err = RotationConfig::from_yaml("this is: not: valid: yaml: content:::").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_config_section_is_an_error() {
        let err = RotationConfig::from_yaml("screens: [A]\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    // ── Optional fields and alternative layouts ───────────────────────────────

    #[test]
    fn optional_fields_use_defaults_when_absent() {
        let yaml = "config:\n  image_dir: img\n  tick_time: 2\n";
        let cfg = RotationConfig::from_yaml(yaml).unwrap();
        assert!(!cfg.settings.random_start);
        assert!(!cfg.settings.debug);
        assert_eq!(cfg.settings.tick_interval, Duration::from_secs(2));
        assert_eq!(cfg.log_device, LogDevice::Stdout);
        assert!(cfg.screens.is_empty());
        assert!(cfg.images.is_empty());
    }

    #[test]
    fn screens_may_be_a_list_with_numeric_ids() {
        let yaml = "config:\n  image_dir: img\n  tick_time: 1\nscreens: [1, 2, lobby]\n";
        let cfg = RotationConfig::from_yaml(yaml).unwrap();
        assert_eq!(cfg.screens, ["1", "2", "lobby"]);
    }

    #[test]
    fn log_device_and_driver_are_read() {
        let yaml = r#"
config:
  image_dir: img
  tick_time: 1
  log_device: /var/log/screenbank.log
  driver: /opt/artista/artistactrl
  forked: true
"#;
        let cfg = RotationConfig::from_yaml(yaml).unwrap();
        assert_eq!(
            cfg.log_device,
            LogDevice::File(PathBuf::from("/var/log/screenbank.log"))
        );
        assert_eq!(cfg.driver, PathBuf::from("/opt/artista/artistactrl"));
        assert!(cfg.forked);
    }

    // ── warnings ──────────────────────────────────────────────────────────────

    #[test]
    fn valid_example_has_no_warnings() {
        let cfg = RotationConfig::from_yaml(EXAMPLE).unwrap();
        assert!(cfg.warnings().is_empty());
    }

    #[test]
    fn forked_and_short_image_list_are_reported() {
        let yaml = r#"
config:
  image_dir: img
  tick_time: 1
  forked: true
screens: [A, B]
images:
  only:
    duration: 1
    file: only.png
"#;
        let warnings = RotationConfig::from_yaml(yaml).unwrap().warnings();
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("'forked' is not supported"));
        assert!(warnings[1].starts_with("Not more images (1) than screens (2)"));
    }

    #[test]
    fn empty_screen_list_is_reported() {
        let yaml = "config:\n  image_dir: img\n  tick_time: 1\n";
        let warnings = RotationConfig::from_yaml(yaml).unwrap().warnings();
        assert!(warnings.iter().any(|w| w == "No screens configured"));
    }

    #[test]
    fn log_device_names_are_case_insensitive() {
        assert_eq!(LogDevice::parse(Some("stderr")), LogDevice::Stderr);
        assert_eq!(LogDevice::parse(Some("Stdout")), LogDevice::Stdout);
        assert_eq!(LogDevice::parse(None), LogDevice::Stdout);
    }

    // ── Validation ────────────────────────────────────────────────────────────

    #[test]
    fn non_positive_tick_time_is_rejected() {
        for tick in ["0", "-1", ".nan"] {
            let yaml = format!("config:\n  image_dir: img\n  tick_time: {tick}\n");
            let err = RotationConfig::from_yaml(&yaml).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidTickTime(_)), "tick_time {tick}");
        }
    }

    #[test]
    fn negative_duration_is_rejected() {
        let yaml = r#"
config: { image_dir: img, tick_time: 1 }
images:
  bad: { duration: -2, file: bad.png }
"#;
        let err = RotationConfig::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidDuration { ref image, .. } if image == "bad"));
    }

    #[test]
    fn image_without_file_is_rejected() {
        let yaml = r#"
config: { image_dir: img, tick_time: 1 }
images:
  nofile: { duration: 2 }
"#;
        let err = RotationConfig::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidImage { ref image, .. } if image == "nofile"));
    }

    #[test]
    fn duplicate_screen_in_list_is_rejected() {
        let yaml = "config: { image_dir: img, tick_time: 1 }\nscreens: [A, B, A]\n";
        let err = RotationConfig::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateScreen(ref id) if id == "A"));
    }

    #[test]
    fn empty_screen_id_is_rejected() {
        let yaml = "config: { image_dir: img, tick_time: 1 }\nscreens: [\"\"]\n";
        let err = RotationConfig::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyScreenId));
    }

    #[test]
    fn nested_screen_key_is_rejected() {
        let yaml = "config: { image_dir: img, tick_time: 1 }\nscreens: [[A, B]]\n";
        let err = RotationConfig::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidKey { section: "screens", .. }));
    }

    #[test]
    fn image_spec_converts_to_unshown_content() {
        let spec = ImageSpec {
            id: "welcome".to_string(),
            duration_s: 5.0,
            file: PathBuf::from("welcome.png"),
        };
        let content = spec.to_content();
        assert_eq!(content.id, "welcome");
        assert_eq!(content.duration_s, 5.0);
        assert!(content.display_start.is_none());
    }
}
