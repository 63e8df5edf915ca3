//! Coordinator configuration.
//!
//! Defaults match the classic screen behaviour: an unbounded action queue and
//! a forced refresh on construction. File loading is available behind the
//! `config` feature.

#[cfg(feature = "config")]
use crate::error::{EpisodeDetailsError, Result};
#[cfg(feature = "config")]
use std::path::{Path, PathBuf};

/// How the pending action queue behaves when the consumer falls behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "config", derive(serde::Deserialize))]
#[cfg_attr(feature = "config", serde(tag = "kind", rename_all = "snake_case"))]
pub enum QueuePolicy {
    /// Submissions never block and never fail while the coordinator is alive
    #[default]
    Unbounded,
    /// At most `capacity` queued actions; further submissions are rejected
    /// with `QueueFull` (the newest action is dropped, queued ones are kept)
    Bounded { capacity: usize },
}

/// Settings for a `DetailsCoordinator`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(serde::Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct CoordinatorConfig {
    pub queue: QueuePolicy,
    /// Enqueue a forced refresh as soon as the coordinator starts
    pub refresh_on_start: bool,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            queue: QueuePolicy::Unbounded,
            refresh_on_start: true,
        }
    }
}

#[cfg(feature = "config")]
impl CoordinatorConfig {
    /// `<config dir>/episode-details/config.toml`, when a config dir exists.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("episode-details").join("config.toml"))
    }

    /// Parse a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(contents).map_err(|e| EpisodeDetailsError::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            EpisodeDetailsError::config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&contents)
    }

    fn validate(&self) -> Result<()> {
        if let QueuePolicy::Bounded { capacity: 0 } = self.queue {
            return Err(EpisodeDetailsError::config(
                "bounded queue capacity must be at least 1",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_unbounded_with_refresh() {
        let config = CoordinatorConfig::default();
        assert_eq!(config.queue, QueuePolicy::Unbounded);
        assert!(config.refresh_on_start);
    }

    #[cfg(feature = "config")]
    mod file {
        use super::super::*;
        use std::io::Write;

        #[test]
        fn parses_bounded_queue() {
            let config = CoordinatorConfig::from_toml_str(
                r#"
                refresh_on_start = false

                [queue]
                kind = "bounded"
                capacity = 16
                "#,
            )
            .unwrap();
            assert_eq!(config.queue, QueuePolicy::Bounded { capacity: 16 });
            assert!(!config.refresh_on_start);
        }

        #[test]
        fn missing_fields_fall_back_to_defaults() {
            let config = CoordinatorConfig::from_toml_str("").unwrap();
            assert_eq!(config, CoordinatorConfig::default());
        }

        #[test]
        fn rejects_zero_capacity() {
            let err = CoordinatorConfig::from_toml_str(
                "[queue]\nkind = \"bounded\"\ncapacity = 0\n",
            )
            .unwrap_err();
            assert!(matches!(err, EpisodeDetailsError::ConfigError { .. }));
        }

        #[test]
        fn loads_from_file() {
            let mut file = tempfile::NamedTempFile::new().expect("create temp file");
            writeln!(file, "[queue]\nkind = \"unbounded\"").expect("write config");

            let config = CoordinatorConfig::load_from_file(file.path()).unwrap();
            assert_eq!(config.queue, QueuePolicy::Unbounded);
            assert!(config.refresh_on_start);
        }

        #[test]
        fn missing_file_is_config_error() {
            let err = CoordinatorConfig::load_from_file(Path::new("/nonexistent/config.toml"))
                .unwrap_err();
            assert!(matches!(err, EpisodeDetailsError::ConfigError { .. }));
        }
    }
}
