//! Runtime settings resolved from flags and environment.
//!
//! clap merges flags, `MEETMASTER_*` variables and defaults; this module
//! applies the remaining rules and builds the core service.

use anyhow::{bail, Context, Result};
use meetmaster_core::{default_log_level, init_logging, ProtocolService, SystemClock};
use std::path::PathBuf;

/// Protocol file used when neither `--file` nor `MEETMASTER_FILE` is set.
pub const DEFAULT_PROTOCOL_FILE: &str = "meeting_protocol.txt";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub protocol_file: PathBuf,
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
}

impl Settings {
    pub fn resolve(
        protocol_file: PathBuf,
        log_level: Option<String>,
        log_dir: Option<PathBuf>,
    ) -> Result<Self> {
        if protocol_file.as_os_str().is_empty() {
            bail!("protocol file path must not be empty");
        }
        if let Some(dir) = &log_dir {
            if !dir.is_absolute() {
                bail!("log dir must be an absolute path, got `{}`", dir.display());
            }
        }

        Ok(Self {
            protocol_file,
            log_level: log_level.unwrap_or_else(|| default_log_level().to_string()),
            log_dir,
        })
    }

    /// Starts file logging when a log directory is configured.
    pub fn init_logging(&self) -> Result<()> {
        if let Some(dir) = &self.log_dir {
            init_logging(&self.log_level, dir).context("failed to initialize logging")?;
        }
        Ok(())
    }

    pub fn service(&self) -> ProtocolService<SystemClock> {
        ProtocolService::new(self.protocol_file.clone(), SystemClock)
    }
}

#[cfg(test)]
mod tests {
    use super::Settings;
    use std::path::PathBuf;

    #[test]
    fn log_level_falls_back_to_build_default() {
        let settings = Settings::resolve(PathBuf::from("p.txt"), None, None).unwrap();
        assert_eq!(settings.log_level, meetmaster_core::default_log_level());
        assert_eq!(settings.log_dir, None);
    }

    #[test]
    fn relative_log_dir_is_rejected() {
        let err = Settings::resolve(
            PathBuf::from("p.txt"),
            None,
            Some(PathBuf::from("logs")),
        )
        .unwrap_err();
        assert!(err.to_string().contains("absolute"));
    }

    #[test]
    fn empty_protocol_path_is_rejected() {
        assert!(Settings::resolve(PathBuf::new(), None, None).is_err());
    }
}
