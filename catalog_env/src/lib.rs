#![deny(missing_docs)]
//! Which deployment the catalog is running in, read once from `ENVIRONMENT`.
//! The value picks the database pool size and the log format.

use catalog_env_var::VarNameErr;
use std::{fmt::Display, str::FromStr};
use thiserror::Error;

mod var {
    catalog_env_var::env_var!(
        #[derive(Clone)]
        pub struct Environment;
    );
}

/// A catalog deployment
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// `prod`: json logs, the largest pool
    Production,
    /// `dev`: the shared staging deployment
    Develop,
    /// `local`: a developer machine, pretty logs and permissive cors
    Local,
}

/// Why `ENVIRONMENT` could not be turned into an [Environment]
#[derive(Debug, Error)]
pub enum EnvironmentErr {
    /// the variable was absent or not unicode
    #[error("{0}")]
    VarErr(#[from] VarNameErr),
    /// the variable held something other than `prod`, `dev` or `local`
    #[error("{0}")]
    InvalidValue(#[from] UnknownEnvironment),
}

impl Environment {
    /// Read `ENVIRONMENT`, failing when it is unset or unrecognised
    #[tracing::instrument(err, level = tracing::Level::TRACE)]
    pub fn new_from_env() -> Result<Self, EnvironmentErr> {
        let v = var::Environment::new()?;
        Ok(Self::from_str(&v)?)
    }

    /// Read `ENVIRONMENT`, treating an unset or unrecognised value as `prod`
    pub fn new_or_prod() -> Self {
        Self::new_from_env().unwrap_or(Environment::Production)
    }

    /// The (min, max) database connections a service should hold in this environment
    pub fn pool_size(&self) -> (u32, u32) {
        match self {
            Environment::Production => (5, 30),
            Environment::Develop => (3, 20),
            Environment::Local => (3, 10),
        }
    }
}

impl Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Production => write!(f, "prod"),
            Environment::Develop => write!(f, "dev"),
            Environment::Local => write!(f, "local"),
        }
    }
}

/// The unrecognised value of `ENVIRONMENT`
#[derive(Debug, Error)]
#[error("ENVIRONMENT must be one of prod, dev or local, got {0:?}")]
pub struct UnknownEnvironment(String);

impl FromStr for Environment {
    type Err = UnknownEnvironment;

    fn from_str(environment: &str) -> Result<Self, UnknownEnvironment> {
        match environment {
            "prod" => Ok(Environment::Production),
            "dev" => Ok(Environment::Develop),
            "local" => Ok(Environment::Local),
            s => Err(UnknownEnvironment(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_round_trips_through_display() {
        for env in [
            Environment::Production,
            Environment::Develop,
            Environment::Local,
        ] {
            assert_eq!(Environment::from_str(&env.to_string()).unwrap(), env);
        }
    }

    #[test]
    fn it_rejects_unknown_values() {
        let err = Environment::from_str("staging").unwrap_err();
        assert!(err.to_string().contains("staging"));
    }

    #[test]
    fn it_sizes_pools_by_environment() {
        assert_eq!(Environment::Production.pool_size(), (5, 30));
        assert_eq!(Environment::Develop.pool_size(), (3, 20));
        assert_eq!(Environment::Local.pool_size(), (3, 10));
    }
}
