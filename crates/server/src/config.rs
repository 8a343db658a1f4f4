use std::fs;

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_bind: String,
    pub seed_demo_data: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:8080".into(),
            seed_demo_data: false,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    bind_addr: Option<String>,
    seed_demo_data: Option<bool>,
}

/// Defaults, then `server.toml` in the working directory, then environment.
pub fn load_settings() -> Settings {
    let file = fs::read_to_string("server.toml").ok();
    settings_from(file.as_deref(), |key| std::env::var(key).ok())
}

fn settings_from(file: Option<&str>, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Some(raw) = file {
        match toml::from_str::<FileSettings>(raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.bind_addr {
                    settings.server_bind = v;
                }
                if let Some(v) = file_cfg.seed_demo_data {
                    settings.seed_demo_data = v;
                }
            }
            Err(error) => tracing::warn!(%error, "ignoring malformed server.toml"),
        }
    }

    if let Some(v) = env("SERVER_BIND") {
        settings.server_bind = v;
    }
    if let Some(v) = env("APP__BIND_ADDR") {
        settings.server_bind = v;
    }

    if let Some(v) = env("APP__SEED_DEMO_DATA") {
        settings.seed_demo_data = matches!(v.trim(), "1" | "true" | "yes");
    }

    settings
}
