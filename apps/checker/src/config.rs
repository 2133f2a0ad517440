use std::{fs, io, path::Path, time::Duration};

use anyhow::{bail, Context};
use serde::Deserialize;
use url::Url;

pub const DEFAULT_CONFIG_PATH: &str = "checker.toml";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub service_url: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            service_url: "http://127.0.0.1:54321/functions/v1/analyze-news".into(),
            api_key: None,
            timeout_secs: 30,
        }
    }
}

impl Settings {
    pub fn endpoint(&self) -> anyhow::Result<Url> {
        let url = Url::parse(self.service_url.trim())
            .with_context(|| format!("invalid service url '{}'", self.service_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            bail!(
                "service url '{}' must use http or https",
                self.service_url
            );
        }
        Ok(url)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    service_url: Option<String>,
    api_key: Option<String>,
    timeout_secs: Option<u64>,
}

/// Loads settings from defaults, then the TOML file, then the process environment.
///
/// A missing file is only an error when `explicit` is set (the user named it).
pub fn load_settings(path: &Path, explicit: bool) -> anyhow::Result<Settings> {
    load_settings_with_env(path, explicit, |key| std::env::var(key).ok())
}

pub fn load_settings_with_env(
    path: &Path,
    explicit: bool,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    match fs::read_to_string(path) {
        Ok(raw) => {
            let file_cfg: FileSettings = toml::from_str(&raw)
                .with_context(|| format!("failed to parse config file '{}'", path.display()))?;
            if let Some(v) = file_cfg.service_url {
                settings.service_url = v;
            }
            if let Some(v) = file_cfg.api_key {
                settings.api_key = Some(v);
            }
            if let Some(v) = file_cfg.timeout_secs {
                settings.timeout_secs = v;
            }
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound && !explicit => {}
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read config file '{}'", path.display()));
        }
    }

    if let Some(v) = env("CHECKER_SERVICE_URL") {
        settings.service_url = v;
    }
    if let Some(v) = env("CHECKER_API_KEY") {
        settings.api_key = Some(v);
    }
    if let Some(v) = env("CHECKER_TIMEOUT_SECS") {
        settings.timeout_secs = v
            .trim()
            .parse()
            .with_context(|| format!("CHECKER_TIMEOUT_SECS must be a whole number, got '{v}'"))?;
    }

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashMap,
        env,
        time::{SystemTime, UNIX_EPOCH},
    };

    use super::*;

    fn temp_config(contents: &str) -> std::path::PathBuf {
        let suffix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos();
        let path = env::temp_dir().join(format!("checker_config_test_{suffix}.toml"));
        fs::write(&path, contents).expect("write config");
        path
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn missing_default_file_yields_defaults() {
        let path = env::temp_dir().join("checker_config_test_absent.toml");
        let settings = load_settings_with_env(&path, false, no_env).expect("settings");
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let path = env::temp_dir().join("checker_config_test_absent_explicit.toml");
        assert!(load_settings_with_env(&path, true, no_env).is_err());
    }

    #[test]
    fn environment_overrides_file_values() {
        let path = temp_config(
            "service_url = \"https://file.example/analyze\"\ntimeout_secs = 12\napi_key = \"file-key\"\n",
        );
        let env: HashMap<&str, &str> = HashMap::from([
            ("CHECKER_SERVICE_URL", "https://env.example/analyze"),
            ("CHECKER_TIMEOUT_SECS", "7"),
        ]);

        let settings = load_settings_with_env(&path, true, |key| {
            env.get(key).map(|v| v.to_string())
        })
        .expect("settings");

        assert_eq!(settings.service_url, "https://env.example/analyze");
        assert_eq!(settings.timeout_secs, 7);
        assert_eq!(settings.api_key.as_deref(), Some("file-key"));
        fs::remove_file(path).expect("cleanup");
    }

    #[test]
    fn invalid_timeout_in_environment_is_rejected() {
        let path = env::temp_dir().join("checker_config_test_absent_timeout.toml");
        let result = load_settings_with_env(&path, false, |key| {
            (key == "CHECKER_TIMEOUT_SECS").then(|| "soon".to_string())
        });
        assert!(result.is_err());
    }

    #[test]
    fn endpoint_requires_http_scheme() {
        let mut settings = Settings::default();
        assert_eq!(settings.endpoint().expect("default url").scheme(), "http");

        settings.service_url = "file:///tmp/analyze".into();
        assert!(settings.endpoint().is_err());

        settings.service_url = "not a url".into();
        assert!(settings.endpoint().is_err());
    }
}
