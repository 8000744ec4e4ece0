use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::ball::BallPhysics;

#[derive(clap::Parser, Debug)]
#[clap(name = "soundball", about = "Drag a ball to bend a pitch, scroll up a piano roll")]
pub struct Cli {
    /// YAML file with settings; missing keys keep their defaults
    #[clap(long, env = "SOUNDBALL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Reference pitch of A4 in Hz
    #[clap(long)]
    pub a4: Option<f32>,

    /// Level of the continuous tone in dB
    #[clap(long, allow_hyphen_values = true)]
    pub volume_db: Option<f32>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub canvas_width: f32,
    pub canvas_height: f32,
    pub a4: f32,
    pub min_radius: f32,
    pub max_radius: f32,
    pub note_height: f32,
    pub note_width: f32,
    /// Half-steps from A4 of the piano roll's bottom edge.
    pub note_start: i32,
    pub note_count: u32,
    /// Half-steps from A4 sounded at the top of the linear area.
    pub frequency_end_note: i32,
    pub volume_db: f32,
    pub tick_hz: f32,
    pub gravity: f32,
    pub slip_bias: f32,
    pub heaviness_radius: f32,
    pub slip_release_offset: f32,
    pub grip_tighten_rate: f32,
    /// Shortest the linear area may get from note shifts. Defaults to the
    /// ball's largest diameter.
    pub min_linear_height: Option<f32>,
}

impl Default for Settings {
    fn default() -> Self {
        let physics = BallPhysics::default();
        Settings {
            canvas_width: 360.0,
            canvas_height: physics.canvas_height,
            a4: crate::scale::A4_FREQUENCY,
            min_radius: physics.min_radius,
            max_radius: physics.max_radius,
            note_height: 20.0,
            note_width: 40.0,
            note_start: 4 - 12 * 2,
            note_count: 2,
            frequency_end_note: 4 - 12,
            volume_db: -20.0,
            tick_hz: 60.0,
            gravity: physics.gravity,
            slip_bias: physics.slip_bias,
            heaviness_radius: physics.heaviness_radius,
            slip_release_offset: physics.slip_release_offset,
            grip_tighten_rate: physics.grip_tighten_rate,
            min_linear_height: None,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(PathBuf, std::io::Error),
    Yaml(serde_yaml::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(path, e) => write!(f, "cannot read {}: {}", path.display(), e),
            ConfigError::Yaml(e) => write!(f, "bad settings file: {}", e),
            ConfigError::Invalid(reason) => write!(f, "invalid settings: {}", reason),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<serde_yaml::Error> for ConfigError {
    fn from(e: serde_yaml::Error) -> Self {
        ConfigError::Yaml(e)
    }
}

impl Settings {
    pub fn from_yaml(text: &str) -> Result<Settings, ConfigError> {
        let settings: Settings = serde_yaml::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: &Path) -> Result<Settings, ConfigError> {
        let text =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Settings::from_yaml(&text)
    }

    /// Settings file (if any) overlaid with command line flags.
    pub fn from_cli(cli: &Cli) -> Result<Settings, ConfigError> {
        let mut settings = match &cli.config {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };
        if let Some(a4) = cli.a4 {
            settings.a4 = a4;
        }
        if let Some(volume_db) = cli.volume_db {
            settings.volume_db = volume_db;
        }
        settings.validate()?;
        Ok(settings)
    }

    pub fn physics(&self) -> BallPhysics {
        BallPhysics {
            min_radius: self.min_radius,
            max_radius: self.max_radius,
            canvas_height: self.canvas_height,
            gravity: self.gravity,
            slip_bias: self.slip_bias,
            heaviness_radius: self.heaviness_radius,
            slip_release_offset: self.slip_release_offset,
            grip_tighten_rate: self.grip_tighten_rate,
        }
    }

    pub fn min_linear_height(&self) -> f32 {
        self.min_linear_height.unwrap_or(self.max_radius * 2.0)
    }

    /// Height of the linear area before any note shift.
    pub fn initial_linear_height(&self) -> f32 {
        self.canvas_height - self.note_count as f32 * self.note_height - self.note_height / 2.0
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("canvas_width", self.canvas_width),
            ("canvas_height", self.canvas_height),
            ("a4", self.a4),
            ("min_radius", self.min_radius),
            ("note_height", self.note_height),
            ("note_width", self.note_width),
            ("tick_hz", self.tick_hz),
        ];
        if let Some((name, value)) = positive.iter().find(|(_, value)| !(*value > 0.0)) {
            return Err(ConfigError::Invalid(format!(
                "{} must be positive, got {}",
                name, value
            )));
        }
        if self.min_radius >= self.max_radius {
            return Err(ConfigError::Invalid(format!(
                "min_radius {} must be below max_radius {}",
                self.min_radius, self.max_radius
            )));
        }
        if self.max_radius * 2.0 > self.canvas_width {
            return Err(ConfigError::Invalid(format!(
                "a ball of radius {} does not fit a canvas {} wide",
                self.max_radius, self.canvas_width
            )));
        }
        if self.initial_linear_height() < self.min_linear_height() {
            return Err(ConfigError::Invalid(format!(
                "{} piano lanes leave only {} px for the linear area",
                self.note_count,
                self.initial_linear_height()
            )));
        }
        let top_note = self.note_start + self.note_count as i32;
        if self.frequency_end_note <= top_note {
            return Err(ConfigError::Invalid(format!(
                "frequency_end_note {} must be above the top lane {}",
                self.frequency_end_note, top_note
            )));
        }
        Ok(())
    }
}

/// Page URL overrides, e.g. `?a4=432&volume_db=-12`.
#[cfg(target_family = "wasm")]
pub fn from_url(mut settings: Settings) -> Settings {
    let search = web_sys::window().and_then(|window| window.location().search().ok());
    let params = search.and_then(|search| web_sys::UrlSearchParams::new_with_str(&search).ok());
    if let Some(params) = params {
        let read = |key: &str| params.get(key).and_then(|value| value.parse::<f32>().ok());
        if let Some(a4) = read("a4") {
            settings.a4 = a4;
        }
        if let Some(volume_db) = read("volume_db") {
            settings.volume_db = volume_db;
        }
    }
    if let Err(e) = settings.validate() {
        crate::console::console_log!("ignoring url settings: {}", e);
        return Settings::default();
    }
    settings
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_are_valid() {
        assert!(Settings::default().validate().is_ok());
        assert_eq!(Settings::default().initial_linear_height(), 590.0);
    }

    #[test]
    fn yaml_overrides_only_the_given_keys() {
        let settings = Settings::from_yaml("a4: 432\nnote_count: 4\n").unwrap();
        assert_eq!(settings.a4, 432.0);
        assert_eq!(settings.note_count, 4);
        assert_eq!(settings.max_radius, Settings::default().max_radius);
    }

    #[test]
    fn yaml_type_errors_are_reported() {
        let err = Settings::from_yaml("a4: loud\n").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn inverted_radii_are_rejected() {
        let err = Settings::from_yaml("min_radius: 90\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn too_many_lanes_are_rejected() {
        let err = Settings::from_yaml("note_count: 30\n").unwrap_err();
        assert!(err.to_string().contains("linear area"));
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = Settings::load(Path::new("/nonexistent/soundball.yaml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/soundball.yaml"));
    }

    #[test]
    fn cli_flags_override_defaults() {
        let cli = Cli::parse_from(["soundball", "--a4", "415", "--volume-db", "-6"]);
        let settings = Settings::from_cli(&cli).unwrap();
        assert_eq!(settings.a4, 415.0);
        assert_eq!(settings.volume_db, -6.0);
    }
}
