use crate::amalgamate::Params;
use crate::error::{AppError, Result};
use crate::merge::MergeOptions;
use log;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILENAME: &str = "xamalgam.toml";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub merge: MergeConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct GeneralConfig {
    /// Folder holding the sources to amalgamate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,
    /// Path of the generated single-file header.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
    /// Whitespace-separated file names to leave out.
    #[serde(default)]
    pub excluded: String,
    #[serde(default = "default_false")]
    pub recursive: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct MergeConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub define: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_macro: Option<String>,
}

fn default_false() -> bool {
    false
}

fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    PathBuf::from(shellexpand::tilde(raw.as_ref()).as_ref())
}

impl Config {
    /// A filled-in example, used by `xamalgam config`.
    pub fn template() -> Self {
        Self {
            general: GeneralConfig {
                source: Some(PathBuf::from("src")),
                output: Some(PathBuf::from("include/amalgamated.hpp")),
                excluded: "main.cpp".to_string(),
                recursive: true,
            },
            merge: MergeConfig {
                define: Some("AMALGAMATED_HEADER_ONLY".to_string()),
                inline_macro: Some("inline_t".to_string()),
            },
        }
    }

    pub fn resolve_config_path(
        base_dir: &Path,
        cli_config_file: Option<&String>,
        cli_disable_config: bool,
    ) -> Result<Option<PathBuf>> {
        if cli_disable_config {
            log::debug!("Config file loading disabled via CLI flag.");
            return Ok(None);
        }

        match cli_config_file {
            Some(p_str) => {
                let mut path = PathBuf::from(shellexpand::tilde(p_str).as_ref());
                if path.is_relative() {
                    path = base_dir.join(path);
                }
                if !path.exists() && path.extension().is_none() {
                    path.set_extension("toml");
                }
                if !path.exists() {
                    return Err(AppError::Config(format!(
                        "Specified config file not found at path: {}",
                        path.display()
                    )));
                }
                log::debug!("Using specified config file path: {}", path.display());
                Ok(Some(path))
            }
            None => {
                let default_path = base_dir.join(DEFAULT_CONFIG_FILENAME);
                if default_path.exists() {
                    log::debug!("Using default config file path: {}", default_path.display());
                    Ok(Some(default_path))
                } else {
                    log::debug!(
                        "No config file specified and default not found at: {}",
                        default_path.display()
                    );
                    Ok(None)
                }
            }
        }
    }

    pub fn load_from_path(config_path: &Path) -> Result<Self> {
        log::info!("Loading configuration from: {}", config_path.display());
        let toml_content = fs::read_to_string(config_path).map_err(|e| AppError::FileRead {
            path: config_path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml_str(&toml_content).map_err(|e| match e {
            AppError::TomlParse(msg) => AppError::TomlParse(format!(
                "Error parsing config file '{}': {}",
                config_path.display(),
                msg
            )),
            other => other,
        })
    }

    pub fn from_toml_str(toml_content: &str) -> Result<Self> {
        toml::from_str::<Config>(toml_content).map_err(|e| {
            AppError::TomlParse(format!("{}. Check TOML syntax and structure.", e))
        })
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Turns the merged configuration into run parameters, rejecting unusable values before
    /// any file is touched.
    pub fn to_params(&self) -> Result<Params> {
        let output = match &self.general.output {
            Some(p) if !p.as_os_str().is_empty() => expand_path(p),
            _ => {
                return Err(AppError::InvalidArgument(
                    "Requires a valid output path (-o/--output or [general].output)".to_string(),
                ));
            }
        };
        let source_folder = match &self.general.source {
            Some(p) if !p.as_os_str().is_empty() => expand_path(p),
            _ => {
                return Err(AppError::InvalidArgument(
                    "Requires a valid source folder (-s/--source or [general].source)".to_string(),
                ));
            }
        };

        Ok(Params {
            source_folder,
            output,
            excluded: self.general.excluded.clone(),
            recursive: self.general.recursive,
            merge: MergeOptions {
                define: self.merge.define.clone().filter(|d| !d.trim().is_empty()),
                inline_macro: self.merge.inline_macro.clone().filter(|m| !m.trim().is_empty()),
            },
        })
    }

    pub fn current_dir() -> Result<PathBuf> {
        env::current_dir().map_err(AppError::Io)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn parses_full_config() {
        let cfg = Config::from_toml_str(
            r#"
            [general]
            source = "Source"
            output = "Include/Lib.hpp"
            excluded = "Main.cpp clara.hpp"
            recursive = true

            [merge]
            define = "LIB_HEADER_ONLY"
            inline_macro = "inline_t"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.general.source, Some(PathBuf::from("Source")));
        assert_eq!(cfg.general.excluded, "Main.cpp clara.hpp");
        assert!(cfg.general.recursive);
        assert_eq!(cfg.merge.inline_macro.as_deref(), Some("inline_t"));
    }

    #[test]
    fn empty_config_uses_defaults() {
        let cfg = Config::from_toml_str("").unwrap();
        assert_eq!(cfg, Config::default());
        assert!(!cfg.general.recursive);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = Config::from_toml_str("[general]\nsauce = \"x\"\n").unwrap_err();
        assert!(matches!(err, AppError::TomlParse(_)));
    }

    #[test]
    fn template_round_trips_through_toml() {
        let text = Config::template().to_toml_string().unwrap();
        assert_eq!(Config::from_toml_str(&text).unwrap(), Config::template());
    }

    #[test]
    fn missing_output_is_invalid_argument() {
        let mut cfg = Config::template();
        cfg.general.output = Some(PathBuf::new());
        assert!(matches!(cfg.to_params(), Err(AppError::InvalidArgument(_))));
        cfg.general.output = None;
        assert!(matches!(cfg.to_params(), Err(AppError::InvalidArgument(_))));
    }

    #[test]
    fn blank_merge_options_become_none() {
        let mut cfg = Config::template();
        cfg.merge.define = Some(" ".to_string());
        cfg.merge.inline_macro = Some(String::new());
        let params = cfg.to_params().unwrap();
        assert_eq!(params.merge, MergeOptions::default());
    }

    #[test]
    fn resolves_default_and_explicit_config_files() {
        let dir = tempdir().unwrap();
        assert_eq!(Config::resolve_config_path(dir.path(), None, false).unwrap(), None);

        fs::write(dir.path().join(DEFAULT_CONFIG_FILENAME), "").unwrap();
        assert_eq!(
            Config::resolve_config_path(dir.path(), None, false).unwrap(),
            Some(dir.path().join(DEFAULT_CONFIG_FILENAME))
        );
        assert_eq!(Config::resolve_config_path(dir.path(), None, true).unwrap(), None);

        fs::write(dir.path().join("release.toml"), "").unwrap();
        let explicit = "release".to_string();
        assert_eq!(
            Config::resolve_config_path(dir.path(), Some(&explicit), false).unwrap(),
            Some(dir.path().join("release.toml"))
        );

        let missing = "nothing-here.toml".to_string();
        assert!(Config::resolve_config_path(dir.path(), Some(&missing), false).is_err());
    }
}
