use std::env;

/// Environment configuration
/// Loads and validates environment variables
pub struct Config {
    pub database_url: String,
    /// Email delivery is disabled (logged only) when no API key is set.
    pub resend_api_key: Option<String>,
    pub from_email: String,
    pub app_url: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| "DATABASE_URL must be set".to_string())?;

        let resend_api_key = env::var("RESEND_API_KEY").ok().filter(|k| !k.is_empty());

        let from_email =
            env::var("FROM_EMAIL").unwrap_or_else(|_| "noreply@nutritrack.app".to_string());

        let app_url = env::var("APP_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());

        let port = match env::var("PORT") {
            Ok(value) => value
                .parse::<u16>()
                .map_err(|_| "PORT must be a valid port number".to_string())?,
            Err(_) => 3000,
        };

        Ok(Self {
            database_url,
            resend_api_key,
            from_email,
            app_url,
            port,
        })
    }
}
