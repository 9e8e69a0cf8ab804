use std::path::PathBuf;

use serde::Deserialize;

const DEFAULT_CONFIG: &str = include_str!("../config.toml");

const FALLBACK_SUFFIX: &str = "-modified";
const FALLBACK_COMPRESSION: u32 = 6;

#[derive(Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    output: OutputConfig,
    #[serde(default)]
    logging: LoggingConfig,
}

#[derive(Deserialize, Default)]
struct OutputConfig {
    suffix: Option<String>,
    compression: Option<u32>,
}

#[derive(Deserialize, Default)]
struct LoggingConfig {
    verbose: Option<bool>,
}

pub struct Config {
    output: OutputConfig,
    logging: LoggingConfig,
}

impl Config {
    pub fn load() -> Self {
        let mut base: ConfigFile = toml::from_str(DEFAULT_CONFIG).unwrap_or_else(|e| {
            log::error!(target: "config", "embedded config.toml is invalid: {}", e);
            ConfigFile::default()
        });

        if let Some(path) = user_config_path() {
            if path.exists() {
                match std::fs::read_to_string(&path) {
                    Ok(contents) => match toml::from_str::<ConfigFile>(&contents) {
                        Ok(user) => base.merge(user),
                        Err(e) => {
                            log::warn!(target: "config", "ignoring malformed config {}: {}", path.display(), e)
                        }
                    },
                    Err(e) => {
                        log::warn!(target: "config", "could not read config {}: {}", path.display(), e)
                    }
                }
            }
        }

        Config {
            output: base.output,
            logging: base.logging,
        }
    }

    /// Suffix appended to the input stem for derived output paths.
    pub fn output_suffix(&self) -> &str {
        self.output.suffix.as_deref().unwrap_or(FALLBACK_SUFFIX)
    }

    /// gzip level for written sets (clamped to 0..=9).
    pub fn compression_level(&self) -> u32 {
        self.output
            .compression
            .unwrap_or(FALLBACK_COMPRESSION)
            .min(9)
    }

    pub fn verbose(&self) -> bool {
        self.logging.verbose.unwrap_or(false)
    }
}

impl ConfigFile {
    fn merge(&mut self, user: ConfigFile) {
        merge_output(&mut self.output, user.output);
        merge_logging(&mut self.logging, user.logging);
    }
}

pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("alsmix").join("config.toml"))
}

fn merge_output(base: &mut OutputConfig, user: OutputConfig) {
    if user.suffix.is_some() {
        base.suffix = user.suffix;
    }
    if user.compression.is_some() {
        base.compression = user.compression;
    }
}

fn merge_logging(base: &mut LoggingConfig, user: LoggingConfig) {
    if user.verbose.is_some() {
        base.verbose = user.verbose;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_str(text: &str) -> Config {
        let file: ConfigFile = toml::from_str(text).unwrap();
        Config {
            output: file.output,
            logging: file.logging,
        }
    }

    #[test]
    fn test_load_embedded_config() {
        let file: ConfigFile = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(file.output.suffix.as_deref(), Some("-modified"));
        assert_eq!(file.output.compression, Some(6));
        assert_eq!(file.logging.verbose, Some(false));
    }

    #[test]
    fn test_missing_sections_fall_back() {
        let config = from_str("");
        assert_eq!(config.output_suffix(), "-modified");
        assert_eq!(config.compression_level(), 6);
        assert!(!config.verbose());
    }

    #[test]
    fn test_compression_is_clamped() {
        let config = from_str("[output]\ncompression = 42\n");
        assert_eq!(config.compression_level(), 9);
    }

    #[test]
    fn test_user_values_override_only_what_they_set() {
        let mut base: ConfigFile = toml::from_str(DEFAULT_CONFIG).unwrap();
        let user: ConfigFile = toml::from_str("[output]\nsuffix = \"-mix\"\n[logging]\nverbose = true\n").unwrap();
        base.merge(user);
        let config = Config {
            output: base.output,
            logging: base.logging,
        };
        assert_eq!(config.output_suffix(), "-mix");
        assert_eq!(config.compression_level(), 6);
        assert!(config.verbose());
    }

    #[test]
    fn test_malformed_user_config_is_an_error() {
        assert!(toml::from_str::<ConfigFile>("[output]\ncompression = \"high\"\n").is_err());
    }
}
