use std::fs;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not determine a home directory for the config file")]
    NoHome,
    #[error("Config IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Absolute path of the directory holding list files. Empty until the
    /// user runs `set-dir`.
    #[serde(default)]
    pub task_folder: String,
}

pub fn resolve_user_home_dir() -> Option<PathBuf> {
    if let Ok(home) = std::env::var("HOME") {
        let trimmed = home.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }
    if let Ok(profile) = std::env::var("USERPROFILE") {
        let trimmed = profile.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }
    None
}

pub fn resolve_tempo_home_dir() -> Option<PathBuf> {
    if let Ok(value) = std::env::var("TEMPO_HOME") {
        let trimmed = value.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }
    resolve_user_home_dir().map(|home| home.join(".tempo"))
}

pub fn config_path() -> Option<PathBuf> {
    resolve_tempo_home_dir().map(|home| home.join("config.json"))
}

/// Reads the config from its well-known location. A missing file is not an
/// error: a default (empty) config is persisted and returned instead.
pub fn load_config() -> Result<Config, ConfigError> {
    let path = config_path().ok_or(ConfigError::NoHome)?;
    let raw = match fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            let config = Config::default();
            save_config(&config)?;
            return Ok(config);
        }
        Err(err) => return Err(ConfigError::Io(err)),
    };
    Ok(serde_json::from_str(&raw)?)
}

pub fn save_config(config: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path().ok_or(ConfigError::NoHome)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, serde_json::to_string_pretty(config)?)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::ffi::OsString;
    use std::sync::Mutex;
    use tempfile::TempDir;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    struct EnvGuard {
        tempo_home: Option<OsString>,
        home: Option<OsString>,
        userprofile: Option<OsString>,
    }

    impl EnvGuard {
        fn capture() -> Self {
            Self {
                tempo_home: std::env::var_os("TEMPO_HOME"),
                home: std::env::var_os("HOME"),
                userprofile: std::env::var_os("USERPROFILE"),
            }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            match self.tempo_home.as_ref() {
                Some(value) => std::env::set_var("TEMPO_HOME", value),
                None => std::env::remove_var("TEMPO_HOME"),
            }
            match self.home.as_ref() {
                Some(value) => std::env::set_var("HOME", value),
                None => std::env::remove_var("HOME"),
            }
            match self.userprofile.as_ref() {
                Some(value) => std::env::set_var("USERPROFILE", value),
                None => std::env::remove_var("USERPROFILE"),
            }
        }
    }

    #[test]
    fn load_creates_default_config_on_first_run() {
        let _lock = ENV_LOCK.lock().expect("env lock");
        let _env = EnvGuard::capture();
        let home = TempDir::new().expect("tempdir");
        std::env::set_var("TEMPO_HOME", home.path());

        let config = load_config().expect("load");
        assert_eq!(config, Config::default());
        assert!(home.path().join("config.json").is_file());

        // A second load reads the file it just wrote.
        let again = load_config().expect("reload");
        assert_eq!(again, config);
    }

    #[test]
    fn save_then_load_round_trips() {
        let _lock = ENV_LOCK.lock().expect("env lock");
        let _env = EnvGuard::capture();
        let home = TempDir::new().expect("tempdir");
        std::env::set_var("TEMPO_HOME", home.path());

        let config = Config {
            task_folder: "/tmp/tasks".to_string(),
        };
        save_config(&config).expect("save");
        assert_eq!(load_config().expect("load"), config);
    }

    #[test]
    fn load_rejects_malformed_config() {
        let _lock = ENV_LOCK.lock().expect("env lock");
        let _env = EnvGuard::capture();
        let home = TempDir::new().expect("tempdir");
        std::env::set_var("TEMPO_HOME", home.path());

        fs::write(home.path().join("config.json"), "not json").expect("write");
        assert!(matches!(load_config(), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn tempo_home_overrides_user_home() {
        let _lock = ENV_LOCK.lock().expect("env lock");
        let _env = EnvGuard::capture();
        std::env::set_var("HOME", "/home/someone");
        std::env::set_var("TEMPO_HOME", "/opt/tempo");
        assert_eq!(
            config_path(),
            Some(PathBuf::from("/opt/tempo/config.json"))
        );

        std::env::remove_var("TEMPO_HOME");
        assert_eq!(
            config_path(),
            Some(PathBuf::from("/home/someone/.tempo/config.json"))
        );
    }
}
