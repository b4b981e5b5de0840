//! Load configuration from .impactmap.toml if it exists.

use std::fs;
use std::io::{BufReader, Read};
use std::path::Path;

use super::{ImpactmapConfig, WeightsConfig};

pub const CONFIG_FILE_NAME: &str = ".impactmap.toml";

/// Pure function to read config file contents
pub(crate) fn read_config_file(path: &Path) -> Result<String, std::io::Error> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Pure function to parse and validate config from TOML string
pub fn parse_and_validate_config(contents: &str) -> Result<ImpactmapConfig, String> {
    let mut config = toml::from_str::<ImpactmapConfig>(contents)
        .map_err(|e| format!("Failed to parse {CONFIG_FILE_NAME}: {e}"))?;

    if let Err(e) = config.weights.validate() {
        log::warn!("Invalid scoring weights: {e}. Using defaults.");
        config.weights = WeightsConfig::default();
    } else {
        config.weights.normalize(); // Ensure exact sum of 1.0
    }

    if config.sprint.duration_days <= 0 {
        log::warn!(
            "Sprint duration must be positive, got {}. Using default.",
            config.sprint.duration_days
        );
        config.sprint = super::SprintConfig::default();
    }

    Ok(config)
}

fn try_load_config_from_path(config_path: &Path) -> Option<ImpactmapConfig> {
    let contents = match read_config_file(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            // Only log actual errors, not "file not found"
            if e.kind() != std::io::ErrorKind::NotFound {
                log::warn!(
                    "Failed to read config file {}: {e}",
                    config_path.display()
                );
            }
            return None;
        }
    };

    match parse_and_validate_config(&contents) {
        Ok(config) => {
            log::debug!("Loaded config from {}", config_path.display());
            Some(config)
        }
        Err(e) => {
            log::warn!("{e}. Using defaults.");
            None
        }
    }
}

/// Load configuration from an explicit path, or from `.impactmap.toml`
/// in the working directory, falling back to defaults.
pub fn load_config(path: Option<&Path>) -> ImpactmapConfig {
    let default_path = Path::new(CONFIG_FILE_NAME);
    let path = path.unwrap_or(default_path);
    try_load_config_from_path(path).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let config = parse_and_validate_config("").unwrap();
        assert_eq!(config.weights.velocity, 0.60);
        assert_eq!(config.curve.median_baseline, 70.0);
        assert_eq!(config.sprint.duration_days, 7);
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let config = parse_and_validate_config(
            r#"
[sprint]
duration_days = 14
"#,
        )
        .unwrap();
        assert_eq!(config.sprint.duration_days, 14);
        assert!(config.sprint.exclude_active);
        assert_eq!(config.tracker.project_key, "PROJ");
    }

    #[test]
    fn invalid_weights_fall_back_to_defaults() {
        let config = parse_and_validate_config(
            r#"
[weights]
velocity = 0.9
flow = 0.9
quality = 0.9
"#,
        )
        .unwrap();
        assert_eq!(config.weights.velocity, 0.60);
        assert_eq!(config.weights.flow, 0.25);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(parse_and_validate_config("[scornig]\nx = 1\n").is_err());
    }
}
