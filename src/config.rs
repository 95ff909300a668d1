//! Chapter rendering configuration.
//!
//! YAML file with precedence: CLI > file > defaults. Every field is optional.
//!
//! ```yaml
//! out_dir: build/chapter
//! format: svg
//! width: 900
//! height: 600
//! video_url: https://www.youtube.com/embed/abc123
//! data_dir: data/real
//! chat_log: |
//!   00:05:12  Are facets always shared-scale?
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::datasets::Source;
use crate::error::{Error, Result};

/// Image encoding for chapter figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// Raster PNG through the built-in rasterizer.
    #[default]
    Png,
    /// Vector SVG.
    Svg,
}

impl ImageFormat {
    /// File extension without the dot.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Svg => "svg",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ImageFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "svg" => Ok(Self::Svg),
            other => Err(Error::Config {
                line: 0,
                message: format!("unknown image format '{other}'"),
            }),
        }
    }
}

/// Settings for one chapter render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChapterConfig {
    /// Directory receiving `chapter.md` and the figures.
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,

    /// Figure encoding.
    #[serde(default)]
    pub format: ImageFormat,

    /// Figure width in pixels.
    #[serde(default = "default_width")]
    pub width: u32,

    /// Figure height in pixels.
    #[serde(default = "default_height")]
    pub height: u32,

    /// Embedded meeting recording.
    #[serde(default)]
    pub video_url: Option<String>,

    /// Meeting chat transcript.
    #[serde(default)]
    pub chat_log: Option<String>,

    /// Directory holding `Salaries.csv` and `gapminder.csv`; the bundled
    /// samples are used when unset.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

fn default_out_dir() -> PathBuf {
    PathBuf::from("chapter")
}
fn default_width() -> u32 {
    700
}
fn default_height() -> u32 {
    500
}

impl Default for ChapterConfig {
    fn default() -> Self {
        Self {
            out_dir: default_out_dir(),
            format: ImageFormat::default(),
            width: default_width(),
            height: default_height(),
            video_url: None,
            chat_log: None,
            data_dir: None,
        }
    }
}

impl ChapterConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Default file location: `<config dir>/trueno-multivar/config.yaml`.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("trueno-multivar").join("config.yaml"))
    }

    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Parses configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] with the line number if parsing fails, or
    /// [`Error::InvalidDimensions`] for a zero width or height.
    pub fn parse(yaml: &str) -> Result<Self> {
        // An empty document deserializes as unit, not as a map.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml_ng::from_str(yaml).map_err(|e| {
            let line = e.location().map_or(0, |l| l.line());
            Error::Config { line, message: e.to_string() }
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration if the file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be read, parsed or
    /// validated.
    pub fn load_optional(path: impl AsRef<Path>) -> Result<Option<Self>> {
        match Self::load(path) {
            Ok(config) => Ok(Some(config)),
            Err(Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Loads configuration with fallback to defaults.
    ///
    /// A missing file is expected; any other failure is logged before the
    /// defaults are used.
    #[must_use]
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load_optional(path) {
            Ok(Some(config)) => config,
            Ok(None) => {
                debug!("no config at {}, using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                warn!("ignoring config {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Where the chapter's datasets are read from.
    #[must_use]
    pub fn source(&self) -> Source {
        Source::from_dir(self.data_dir.as_deref())
    }

    fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidDimensions { width: self.width, height: self.height });
        }
        Ok(())
    }
}
