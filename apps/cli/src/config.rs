// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CLI configuration from environment variables and arguments.

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context};
use mep_systems::SystemsConfig;

/// How the tree is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Indented labels with element counts.
    Outline,
    /// The full tree as pretty-printed JSON.
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "outline" => Ok(OutputFormat::Outline),
            "json" => Ok(OutputFormat::Json),
            other => bail!("unknown output format '{}' (expected outline or json)", other),
        }
    }
}

/// CLI configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Model snapshot (JSON) to load.
    pub model_path: Option<PathBuf>,
    /// Optional JSON file overriding attribute names and categories.
    pub systems_config_path: Option<PathBuf>,
    pub format: OutputFormat,
    /// Node path to isolate after printing.
    pub isolate: Option<String>,
}

impl Config {
    /// Load defaults from environment variables.
    pub fn from_env() -> Self {
        Self {
            model_path: std::env::var("SYSTEMS_MODEL").ok().map(PathBuf::from),
            systems_config_path: std::env::var("SYSTEMS_CONFIG").ok().map(PathBuf::from),
            format: std::env::var("SYSTEMS_FORMAT")
                .ok()
                .and_then(|f| f.parse().ok())
                .unwrap_or(OutputFormat::Outline),
            isolate: None,
        }
    }

    /// Applies command-line arguments (without the program name) on top of
    /// this configuration. Returns `None` when help was requested.
    pub fn with_args<I>(mut self, args: I) -> anyhow::Result<Option<Self>>
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--help" | "-h" => return Ok(None),
                "--config" => {
                    let path = args.next().context("--config needs a path")?;
                    self.systems_config_path = Some(PathBuf::from(path));
                }
                "--format" => {
                    let format = args.next().context("--format needs a value")?;
                    self.format = format.parse()?;
                }
                "--isolate" => {
                    self.isolate = Some(args.next().context("--isolate needs a node path")?);
                }
                other if other.starts_with("--") => bail!("unknown option: {}", other),
                path => self.model_path = Some(PathBuf::from(path)),
            }
        }
        Ok(Some(self))
    }

    /// Loads the pipeline configuration, falling back to the defaults.
    pub async fn systems_config(&self) -> anyhow::Result<SystemsConfig> {
        let Some(path) = &self.systems_config_path else {
            return Ok(SystemsConfig::default());
        };
        let json = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("cannot read config '{}'", path.display()))?;
        let config = SystemsConfig::from_json(&json)
            .with_context(|| format!("invalid config '{}'", path.display()))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Config {
        Config {
            model_path: None,
            systems_config_path: None,
            format: OutputFormat::Outline,
            isolate: None,
        }
    }

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn arguments_override_defaults() {
        let config = base()
            .with_args(args(&[
                "office.json",
                "--format",
                "JSON",
                "--isolate",
                "systems/Mechanical",
                "--config",
                "de.json",
            ]))
            .unwrap()
            .unwrap();
        assert_eq!(config.model_path, Some(PathBuf::from("office.json")));
        assert_eq!(config.format, OutputFormat::Json);
        assert_eq!(config.isolate.as_deref(), Some("systems/Mechanical"));
        assert_eq!(config.systems_config_path, Some(PathBuf::from("de.json")));
    }

    #[test]
    fn help_short_circuits() {
        assert_eq!(base().with_args(args(&["model.json", "-h"])).unwrap(), None);
    }

    #[test]
    fn bad_arguments_are_rejected() {
        assert!(base().with_args(args(&["--format", "xml"])).is_err());
        assert!(base().with_args(args(&["--isolate"])).is_err());
        assert!(base().with_args(args(&["--verbose"])).is_err());
    }

    #[tokio::test]
    async fn missing_config_file_uses_defaults() {
        let config = base().systems_config().await.unwrap();
        assert_eq!(config, SystemsConfig::default());
    }
}
