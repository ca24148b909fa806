use std::{net::SocketAddr, path::PathBuf};

use config::{Config, ConfigBuilder, ConfigError, Environment, File, builder::DefaultState};
use serde::Deserialize;

#[derive(Deserialize, Debug, Clone)]
pub struct Settings {
    pub bind_addr: SocketAddr,
    pub data_dir: PathBuf, // where the alarm file lives
}

impl Settings {
    // defaults < appsettings < appsettings.local < DEEPREST_* env vars
    pub fn load() -> Result<Self, ConfigError> {
        Self::defaults()?
            .add_source(File::with_name("appsettings").required(false))
            .add_source(File::with_name("appsettings.local").required(false))
            .add_source(Environment::with_prefix("DEEPREST"))
            .build()?
            .try_deserialize()
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("bind_addr", "127.0.0.1:3000")?
            .set_default("data_dir", "data")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_sources() {
        let settings: Settings = Settings::defaults()
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(settings.bind_addr, "127.0.0.1:3000".parse::<SocketAddr>().unwrap());
        assert_eq!(settings.data_dir, PathBuf::from("data"));
    }

    #[test]
    fn local_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("appsettings.toml");
        std::fs::write(&path, "bind_addr = \"0.0.0.0:8080\"\n").unwrap();

        let settings: Settings = Settings::defaults()
            .unwrap()
            .add_source(File::from(path))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(settings.bind_addr.port(), 8080);
        assert_eq!(settings.data_dir, PathBuf::from("data"));
    }
}
