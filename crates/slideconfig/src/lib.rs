use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

pub const DEFAULT_DISPLACEMENT_URL: &str =
    "https://s3-us-west-2.amazonaws.com/s.cdpn.io/58281/rock-_disp.png";

pub const DEFAULT_IMAGES: [&str; 3] = ["images/bg1.jpg", "images/bg2.jpg", "images/bg3.jpg"];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("failed to read configuration at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Where the slider draws.
///
/// `Window` opens a regular decorated window; `Fullscreen` takes over a
/// monitor, optionally selected by name.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ContainerTarget {
    #[default]
    Window,
    Fullscreen {
        monitor: Option<String>,
    },
}

impl FromStr for ContainerTarget {
    type Err = ConfigError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        let (mode, rest) = match trimmed.split_once(':') {
            Some((mode, rest)) => (mode.trim().to_ascii_lowercase(), Some(rest.trim())),
            None => (trimmed.to_ascii_lowercase(), None),
        };
        match (mode.as_str(), rest) {
            ("window", None) => Ok(ContainerTarget::Window),
            ("fullscreen", None) => Ok(ContainerTarget::Fullscreen { monitor: None }),
            ("fullscreen", Some(name)) if !name.is_empty() => Ok(ContainerTarget::Fullscreen {
                monitor: Some(name.to_string()),
            }),
            ("fullscreen", Some(_)) => Err(ConfigError::Invalid(
                "fullscreen container must name a monitor after ':'".into(),
            )),
            _ => Err(ConfigError::Invalid(format!(
                "unknown container '{trimmed}'; expected window or fullscreen[:<monitor>]"
            ))),
        }
    }
}

impl TryFrom<String> for ContainerTarget {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ContainerTarget> for String {
    fn from(value: ContainerTarget) -> Self {
        value.to_string()
    }
}

impl fmt::Display for ContainerTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContainerTarget::Window => f.write_str("window"),
            ContainerTarget::Fullscreen { monitor: None } => f.write_str("fullscreen"),
            ContainerTarget::Fullscreen {
                monitor: Some(name),
            } => write!(f, "fullscreen:{name}"),
        }
    }
}

/// How the slide indicator is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BulletStyle {
    #[default]
    Title,
    Log,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EasingName {
    Linear,
    Smoothstep,
    EaseInOut,
    #[default]
    ExpoInOut,
    Power2Out,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WheelConfig {
    #[serde(
        deserialize_with = "deserialize_duration",
        serialize_with = "serialize_duration"
    )]
    pub threshold: Duration,
    pub min_delta: f64,
}

impl Default for WheelConfig {
    fn default() -> Self {
        Self {
            threshold: Duration::from_millis(800),
            min_delta: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            title: "dispslide".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SliderConfig {
    pub container: ContainerTarget,
    pub bullets: BulletStyle,
    pub intensity: f32,
    #[serde(
        deserialize_with = "deserialize_duration",
        serialize_with = "serialize_duration"
    )]
    pub duration: Duration,
    pub easing: EasingName,
    pub auto_transition: bool,
    pub displacement: String,
    pub images: Vec<String>,
    pub cache_bust: bool,
    pub wheel: WheelConfig,
    pub window: WindowConfig,
}

impl Default for SliderConfig {
    fn default() -> Self {
        Self {
            container: ContainerTarget::default(),
            bullets: BulletStyle::default(),
            intensity: 0.5,
            duration: Duration::from_millis(2500),
            easing: EasingName::default(),
            auto_transition: true,
            displacement: DEFAULT_DISPLACEMENT_URL.to_string(),
            images: DEFAULT_IMAGES.iter().map(|path| path.to_string()).collect(),
            cache_bust: true,
            wheel: WheelConfig::default(),
            window: WindowConfig::default(),
        }
    }
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    struct Visitor;
    impl<'de> de::Visitor<'de> for Visitor {
        type Value = Duration;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("a duration as number of seconds or human-readable string")
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            humantime::parse_duration(v.trim())
                .map_err(|err| E::custom(format!("invalid duration '{v}': {err}")))
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Duration::from_secs(v))
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            if v < 0 {
                return Err(E::custom("duration must be non-negative"));
            }
            Ok(Duration::from_secs(v as u64))
        }

        fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            if !v.is_finite() || v.is_sign_negative() {
                return Err(E::custom("duration must be a finite, non-negative number"));
            }
            Duration::try_from_secs_f64(v)
                .map_err(|err| E::custom(format!("duration {v} is out of range: {err}")))
        }
    }

    deserializer.deserialize_any(Visitor)
}

fn serialize_duration<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&humantime::format_duration(*value).to_string())
}

/// Returns true when the asset string names an HTTP(S) resource rather than a file.
pub fn is_remote(source: &str) -> bool {
    let lowered = source.trim_start().to_ascii_lowercase();
    lowered.starts_with("http://") || lowered.starts_with("https://")
}

impl SliderConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let raw: SliderConfig = toml::from_str(input)?;
        raw.validate()?;
        Ok(raw)
    }

    /// Reads and validates a config file, resolving relative asset paths
    /// against the file's directory.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml_str(&contents)?;
        if let Some(base) = path.parent() {
            config.resolve_relative_to(base);
        }
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn resolve_relative_to(&mut self, base: &Path) {
        self.displacement = resolve_asset(&self.displacement, base);
        for image in &mut self.images {
            *image = resolve_asset(image, base);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.intensity.is_finite() || self.intensity < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "intensity must be a finite value >= 0, got {}",
                self.intensity
            )));
        }

        if self.duration.is_zero() {
            return Err(ConfigError::Invalid(
                "duration must be greater than zero".into(),
            ));
        }

        if self.images.len() < 2 {
            return Err(ConfigError::Invalid(format!(
                "slider needs at least two images, found {}",
                self.images.len()
            )));
        }

        if let Some(index) = self.images.iter().position(|image| image.trim().is_empty()) {
            return Err(ConfigError::Invalid(format!(
                "image #{index} must not be empty"
            )));
        }

        if self.displacement.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "displacement map location must not be empty".into(),
            ));
        }

        if !self.wheel.min_delta.is_finite() || self.wheel.min_delta < 0.0 {
            return Err(ConfigError::Invalid(
                "wheel.min_delta must be a finite value >= 0".into(),
            ));
        }

        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "window size must be non-zero, got {}x{}",
                self.window.width, self.window.height
            )));
        }

        Ok(())
    }
}

fn resolve_asset(source: &str, base: &Path) -> String {
    if is_remote(source) || source.starts_with('~') {
        return source.to_string();
    }
    let path = Path::new(source);
    if path.is_absolute() {
        source.to_string()
    } else {
        base.join(path).to_string_lossy().into_owned()
    }
}
