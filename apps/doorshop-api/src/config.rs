use axum_helpers::JwtConfig;
use core_config::{app_info, assets::AssetConfig, server::ServerConfig, AppInfo, FromEnv};
use database::postgres::PostgresConfig;
use domain_notifications::FeedbackConfig;
use email::SmtpConfig;

pub use core_config::Environment;

/// Application configuration composed from the shared config components.
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: PostgresConfig,
    pub jwt: JwtConfig,
    pub assets: AssetConfig,
    pub feedback: FeedbackConfig,
    pub smtp: SmtpConfig,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let database = PostgresConfig::from_env()?; // DATABASE_URL is required
        let server = ServerConfig::from_env()?;
        let jwt = JwtConfig::from_env()?;
        let assets = AssetConfig::from_env()?;
        let feedback = FeedbackConfig::from_env()?;
        let smtp = smtp_from_env(&environment)?;

        Ok(Self {
            app: app_info!(),
            environment,
            server,
            database,
            jwt,
            assets,
            feedback,
            smtp,
        })
    }
}

/// Development falls back to a local catcher (Mailpit on :1025) when
/// `SMTP_HOST` is unset; production requires the full SMTP settings.
fn smtp_from_env(environment: &Environment) -> eyre::Result<SmtpConfig> {
    if environment.is_development() && std::env::var("SMTP_HOST").is_err() {
        tracing::warn!("SMTP_HOST not set, feedback mail goes to localhost:1025");
        return Ok(SmtpConfig::local());
    }

    Ok(SmtpConfig::from_env()?)
}
