use crate::model::configuration::Configuration;
use crate::shared::constants::{
    CONFIG_DIRECTORY, DEFAULT_DRAW_API_URL, MAX_COUPON_CODE_LENGTH, MIN_COUPON_CODE_LENGTH,
};
use once_cell::sync::Lazy;

pub static CONFIGURATION: Lazy<Configuration> =
    Lazy::new(|| initialize().expect("Failed to initialize configuration."));

const CONFIGURATION_FILE_NAME: &str = "/config.toml";

fn initialize() -> anyhow::Result<Configuration> {
    let configuration = load()?;
    validate(&configuration)?;
    Ok(configuration)
}

fn load() -> anyhow::Result<Configuration> {
    if !std::path::Path::new(CONFIG_DIRECTORY).exists() {
        std::fs::create_dir(CONFIG_DIRECTORY)?;
    }

    let configuration_path = String::from(CONFIG_DIRECTORY) + CONFIGURATION_FILE_NAME;
    if !std::path::Path::new(&configuration_path).exists() {
        // Read from environment variables
        let configuration = Configuration {
            database_url: std::env::var("DATABASE_URL")?,
            jwt_secret: std::env::var("JWT_SECRET")?,
            admin_user_name: std::env::var("ADMIN_USERNAME")?,
            admin_password: std::env::var("ADMIN_PASSWORD")?,
            server_bind_point: std::env::var("SERVER_BIND_POINT")?,
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "INFO".to_string()),
            draw_api_url: std::env::var("DRAW_API_URL")
                .unwrap_or_else(|_| DEFAULT_DRAW_API_URL.to_string()),
            latest_draw_ttl_hours: 24,
            coupon_code_prefix: std::env::var("COUPON_CODE_PREFIX").ok(),
            coupon_code_length: 12,
            token_lifetime_hours: 1,
        };
        let serialized_toml = toml::to_string_pretty(&configuration)?;
        std::fs::write(&configuration_path, serialized_toml)?;
        Ok(configuration)
    } else {
        let toml = std::fs::read_to_string(&configuration_path)?;
        let deserialized_toml = toml::from_str::<Configuration>(&toml)?;
        Ok(deserialized_toml)
    }
}

fn validate(configuration: &Configuration) -> anyhow::Result<()> {
    let length = configuration.coupon_code_length;
    if !(MIN_COUPON_CODE_LENGTH..=MAX_COUPON_CODE_LENGTH).contains(&length) {
        anyhow::bail!(
            "coupon_code_length must be between {} and {}, got {}.",
            MIN_COUPON_CODE_LENGTH,
            MAX_COUPON_CODE_LENGTH,
            length
        );
    }
    Ok(())
}
