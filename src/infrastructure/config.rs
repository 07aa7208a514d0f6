use crate::domain::battery::TimeMode;
use serde::Deserialize;

pub const DEFAULT_CONFIG_PATH: &str = "config/analyzer";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AnalyzerConfig {
    #[serde(default)]
    pub inputs: InputsConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct InputsConfig {
    #[serde(default = "default_scheduler_path")]
    pub scheduler: String,
    #[serde(default = "default_non_scheduler_path")]
    pub non_scheduler: String,
    #[serde(default = "default_time_mode")]
    pub time_mode: TimeMode,
}

impl Default for InputsConfig {
    fn default() -> Self {
        Self {
            scheduler: default_scheduler_path(),
            non_scheduler: default_non_scheduler_path(),
            time_mode: default_time_mode(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DisplayConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            width: default_width(),
            height: default_height(),
        }
    }
}

fn default_scheduler_path() -> String {
    "scheduler_mode.csv".to_string()
}

fn default_non_scheduler_path() -> String {
    "non_scheduler_mode.csv".to_string()
}

fn default_time_mode() -> TimeMode {
    TimeMode::Absolute
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_width() -> u32 {
    1000
}

fn default_height() -> u32 {
    600
}

/// Load analyzer settings from `config/analyzer.{toml,json,...}`. A missing file means defaults.
pub fn load_analyzer_config() -> anyhow::Result<AnalyzerConfig> {
    load_analyzer_config_from(DEFAULT_CONFIG_PATH)
}

pub fn load_analyzer_config_from(name: &str) -> anyhow::Result<AnalyzerConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name(name).required(false))
        .build()?;

    Ok(settings.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_toml(toml: &str) -> AnalyzerConfig {
        config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_defaults_when_file_missing() {
        let config = load_analyzer_config_from("config/does-not-exist").unwrap();
        assert_eq!(config.inputs.scheduler, "scheduler_mode.csv");
        assert_eq!(config.inputs.non_scheduler, "non_scheduler_mode.csv");
        assert_eq!(config.inputs.time_mode, TimeMode::Absolute);
        assert_eq!(config.display.bind, "127.0.0.1:8080");
        assert_eq!(config.display.width, 1000);
        assert_eq!(config.display.height, 600);
    }

    #[test]
    fn test_parse_synthetic_index() {
        let config = parse_toml(
            r#"
[inputs]
scheduler = "runs/a.csv"
time_mode = "synthetic-index"

[display]
bind = "0.0.0.0:9000"
"#,
        );
        assert_eq!(config.inputs.scheduler, "runs/a.csv");
        assert_eq!(config.inputs.non_scheduler, "non_scheduler_mode.csv");
        assert_eq!(config.inputs.time_mode, TimeMode::SyntheticIndex);
        assert_eq!(config.display.bind, "0.0.0.0:9000");
        assert_eq!(config.display.height, 600);
    }

    #[test]
    fn test_rejects_unknown_time_mode() {
        let result = config::Config::builder()
            .add_source(config::File::from_str(
                "[inputs]\ntime_mode = \"relative\"\n",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize::<AnalyzerConfig>();
        assert!(result.is_err());
    }
}
