use anyhow::Context;
pub use catalog_env::Environment;
use catalog_env_var::env_var;

env_var! {
    #[derive(Clone, Debug)]
    pub struct DatabaseUrl;
}

env_var! {
    pub struct Port;
}

env_var! {
    pub struct CorsAllowedOrigins;
}

env_var! {
    pub struct RunMigrations;
}

const DEFAULT_PORT: &str = "8080";
const DEFAULT_CORS_ALLOWED_ORIGINS: &str = "http://localhost:3000,http://127.0.0.1:3000";

/// Configuration parameters for the application.
#[derive(Debug)]
pub struct Config {
    /// The connection URL for the catalog Postgres database
    pub database_url: DatabaseUrl,
    /// The port to listen for HTTP requests on.
    pub port: u16,
    /// The environment we are in
    pub environment: Environment,
    /// Origins allowed to call the api outside of local development
    pub cors_allowed_origins: Vec<String>,
    /// Apply the embedded migrations before serving
    pub run_migrations: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = DatabaseUrl::new().context("DATABASE_URL must be provided")?;
        let port = Port::new_or(DEFAULT_PORT).parse::<u16>()?;
        let environment = Environment::new_or_prod();
        let cors_allowed_origins =
            parse_origins(&CorsAllowedOrigins::new_or(DEFAULT_CORS_ALLOWED_ORIGINS));
        let run_migrations = RunMigrations::new_or("true").parse::<bool>()?;

        Ok(Config {
            database_url,
            port,
            environment,
            cors_allowed_origins,
            run_migrations,
        })
    }
}

/// comma separated, blanks are dropped
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_splits_origins() {
        assert_eq!(
            parse_origins(" https://shop.example.com, ,http://localhost:3000,"),
            vec!["https://shop.example.com", "http://localhost:3000"]
        );
        assert_eq!(
            parse_origins(DEFAULT_CORS_ALLOWED_ORIGINS),
            vec!["http://localhost:3000", "http://127.0.0.1:3000"]
        );
    }

    #[test]
    fn it_parses_the_defaults() {
        assert_eq!(Port::new_testing(DEFAULT_PORT).parse::<u16>().unwrap(), 8080);
        assert!(RunMigrations::new_testing("true").parse::<bool>().unwrap());
        assert!(RunMigrations::new_testing("yes").parse::<bool>().is_err());
    }
}
