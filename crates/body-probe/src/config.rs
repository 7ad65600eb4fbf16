use std::{fs::OpenOptions, io::Read, path::PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::cmd::Args;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Address the dump listener binds to.
    pub ip: String,
    /// Listener port, 0 picks an ephemeral one.
    pub port: u16,
    /// File whose bytes become the upload body.
    pub file: String,
    /// How many received bytes get dumped per request.
    pub dump_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ip: "127.0.0.1".into(),
            port: 0,
            file: "photo.jpg".into(),
            dump_limit: 1024,
        }
    }
}

impl Config {
    pub fn load(file: impl Into<PathBuf>) -> Result<Config> {
        let path = file.into();
        let mut file = OpenOptions::new()
            .read(true)
            .open(&path)
            .with_context(|| format!("failed to open config {}", path.display()))?;
        let mut s = String::new();
        file.read_to_string(&mut s)?;
        let config = serde_json::from_str(&s)
            .with_context(|| format!("invalid config {}", path.display()))?;
        Ok(config)
    }

    /// Flags beat the config file.
    pub(crate) fn apply_cli(mut self, args: Args) -> Self {
        if let Some(file) = args.file {
            self.file = file;
        }
        if let Some(port) = args.port {
            self.port = port;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn default_matches_the_original_tool() {
        let config = Config::default();
        assert_eq!(config.ip, "127.0.0.1");
        assert_eq!(config.port, 0);
        assert_eq!(config.file, "photo.jpg");
        assert_eq!(config.dump_limit, 1024);
    }

    #[test]
    fn load_fills_missing_fields_from_defaults() {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(br#"{ "file": "upload.bin", "port": 8080 }"#)
            .unwrap();
        f.flush().unwrap();

        let config = Config::load(f.path()).unwrap();
        assert_eq!(config.file, "upload.bin");
        assert_eq!(config.port, 8080);
        assert_eq!(config.ip, "127.0.0.1");
        assert_eq!(config.dump_limit, 1024);
    }

    #[test]
    fn load_rejects_garbage() {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(b"not json").unwrap();
        f.flush().unwrap();

        assert!(Config::load(f.path()).is_err());
    }
}
