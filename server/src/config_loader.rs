use banstore_application::error::{AppError, AppResult};
use banstore_application::infrastructure_config::Config;
use figment::{
    Figment,
    providers::{Env, Format, Json, Serialized, Toml},
};
use std::fs;
use std::path::Path;
use tracing::info;

const ENV_PREFIX: &str = "BANSTORE_";

pub fn load_config() -> AppResult<Config> {
    generate_env_template_if_missing()?;
    load_config_from(Path::new("."))
}

/// Defaults, then `config.toml` and `config.json` from `dir` when present, then `BANSTORE_*` variables.
pub fn load_config_from(dir: &Path) -> AppResult<Config> {
    let mut figment = Figment::from(Serialized::defaults(Config::default()));

    let toml_path = dir.join("config.toml");
    if toml_path.exists() {
        figment = figment.merge(Toml::file(toml_path));
    }

    let json_path = dir.join("config.json");
    if json_path.exists() {
        figment = figment.merge(Json::file(json_path));
    }

    let config: Config = figment
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .map_err(|e| AppError::ConfigError {
            message: format!("Failed to load configuration: {e}"),
        })?;

    config.validate()?;
    Ok(config)
}

fn generate_env_template_if_missing() -> AppResult<()> {
    let env_file = ".env";
    let template_file = ".env.example";

    if Path::new(env_file).exists() {
        return Ok(());
    }

    if !Path::new(template_file).exists() {
        return Ok(());
    }

    fs::copy(template_file, env_file).map_err(|e| AppError::ConfigError {
        message: format!("Failed to generate .env file from template: {e}"),
    })?;

    info!("Generated .env from template. Set BANSTORE_ADMIN__API_TOKEN before starting.");

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn toml_file_overrides_defaults() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("config.toml"),
            r#"
[server]
port = 8088

[storage]
base_dir = "/srv/bans"
enable_expired_export = true

[admin]
api_token = "from-file"
"#,
        )
        .unwrap();

        let config = load_config_from(dir.path()).unwrap();

        assert_eq!(config.server.port, 8088);
        assert_eq!(config.storage.data_path(), Path::new("/srv/bans/BansData.txt"));
        assert!(config.storage.enable_expired_export);
        assert_eq!(config.admin.api_token(), "from-file");
        assert_eq!(config.listing.default_page_size, 5);
    }

    #[test]
    fn missing_token_fails_validation() {
        let dir = TempDir::new().unwrap();

        let result = load_config_from(dir.path());

        assert!(matches!(result, Err(AppError::ConfigError { .. })));
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("config.json"),
            r#"{ "server": { "port": "not a port" } }"#,
        )
        .unwrap();

        let result = load_config_from(dir.path());

        assert!(matches!(result, Err(AppError::ConfigError { .. })));
    }
}
