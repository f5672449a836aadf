#![deny(missing_docs)]
//! Standardized process initialization for binaries in this workspace.
//! This keeps tracing output consistent between environments.

use catalog_env::Environment;
use tracing_subscriber::EnvFilter;

/// unit struct which defines the behaviour for instantiation
#[derive(Debug)]
pub struct CatalogEntrypoint {
    env: Environment,
    /// whether to load a `.env` file before reading anything else
    load_dotenv: bool,
}

impl Default for CatalogEntrypoint {
    fn default() -> Self {
        // the .env file may be what sets ENVIRONMENT, so it is loaded before we look
        dotenv::dotenv().ok();
        CatalogEntrypoint {
            env: Environment::new_or_prod(),
            load_dotenv: false,
        }
    }
}

/// sentinel struct which guarantees that we called [CatalogEntrypoint::init]
#[derive(Debug)]
pub struct InitializedEntrypoint {
    env: Environment,
}

impl InitializedEntrypoint {
    /// the environment the process was initialized for
    pub fn environment(&self) -> Environment {
        self.env
    }
}

impl CatalogEntrypoint {
    /// create a new instance of [Self] from an input [Environment]
    pub fn new(env: Environment) -> Self {
        Self {
            env,
            load_dotenv: true,
        }
    }

    /// consume self, initialize this binary, and return a proof that it was initialized [InitializedEntrypoint]
    pub fn init(self) -> InitializedEntrypoint {
        if self.load_dotenv {
            dotenv::dotenv().ok();
        }
        std::panic::set_hook(Box::new(tracing_panic::panic_hook));

        let installed = match self.env {
            Environment::Local => tracing_subscriber::fmt()
                .with_ansi(true)
                .with_env_filter(EnvFilter::from_default_env())
                .with_file(true)
                .with_line_number(true)
                .pretty()
                .try_init(),
            Environment::Production | Environment::Develop => tracing_subscriber::fmt()
                .with_ansi(false)
                .with_env_filter(EnvFilter::from_default_env())
                .with_file(true)
                .with_line_number(true)
                .json()
                .with_current_span(true)
                .with_span_list(false)
                .flatten_event(true)
                .try_init(),
        };

        if installed.is_err() {
            tracing::warn!("a global tracing subscriber was already installed");
        }

        tracing::debug!(environment = %self.env, "initialized entrypoint");

        InitializedEntrypoint { env: self.env }
    }
}
