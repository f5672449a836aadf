//! Typed sentinels for environment variables.
//!
//! `env_var!` declares a type whose existence proves the variable was read. The variable
//! name is the type name in SCREAMING_SNAKE_CASE, so `struct DatabaseUrl;` reads `DATABASE_URL`.

// Re-export paste so users don't need to depend on it directly
pub use paste;
use thiserror::Error;



#[cfg(test)]
pub use testing_harness::read_env;

#[cfg(not(test))]
pub fn read_env(s: &'static str) -> Result<String, VarNameErr> {
    std::env::var(s).map_err(|err| VarNameErr { var_name: s, err })
}

/// The type of error that is produced when a variable cannot be read
#[derive(Debug, Error)]
#[error("An error occurred while reading envvar: {var_name}. Err: {err}")]
pub struct VarNameErr {
    var_name: &'static str,
    err: std::env::VarError,
}

impl VarNameErr {
    /// The name of the variable which failed to read
    pub fn var_name(&self) -> &'static str {
        self.var_name
    }

    /// True when the variable was simply absent
    pub fn is_missing(&self) -> bool {
        matches!(self.err, std::env::VarError::NotPresent)
    }
}

/// The value of a variable was present but could not be parsed into the requested type
#[derive(Debug, Error)]
#[error("Could not parse envvar {var_name} from {value:?}: {err}")]
pub struct ParseVarErr<E: std::fmt::Display + std::fmt::Debug> {
    /// the name of the variable
    pub var_name: &'static str,
    /// the raw value that failed to parse
    pub value: String,
    /// the underlying parse error
    pub err: E,
}

#[macro_export]
macro_rules! env_var {
    (
        $(#[$attr:meta])*
        $v:vis struct $n:ident;
    ) => {
        $crate::paste::paste! {
            #[doc = "struct which represents the existence of the `" $n:snake:upper "` environment variable.
            See [`" $n "`::new] and [`" $n "`::new_or] for usage methods"]
            $(#[$attr])*
            $v enum $n {
                #[doc = "This environment var was read at runtime"]
                Runtime(std::sync::Arc<str>),
                #[doc = "This environment var was absent and a fallback value is in use"]
                Fallback(&'static str),
            }

            impl $n {
                #[doc = "The name of the environment variable this type reads"]
                #[allow(dead_code)]
                $v const NAME: &'static str = stringify!([<$n:snake:upper>]);

                #[doc = "Attempt to create a new instance of [Self] by reading `" $n:snake:upper "` from the environment variables."]
                #[allow(dead_code)]
                #[tracing::instrument(err)]
                $v fn new() -> Result<Self, $crate::VarNameErr> {
                    let res = $crate::read_env(Self::NAME)?;
                    Ok(Self::Runtime(std::sync::Arc::from(res)))
                }

                #[doc = "Read `" $n:snake:upper "` from the environment, using `fallback` when it is absent or unreadable"]
                #[allow(dead_code)]
                $v fn new_or(fallback: &'static str) -> Self {
                    Self::new().unwrap_or(Self::Fallback(fallback))
                }

                #[doc = "Function used for testing purposes. Allows the caller to create a new Self via a static str"]
                #[allow(dead_code)]
                $v const fn new_testing(s: &'static str) -> Self {
                    Self::Fallback(s)
                }

                #[doc = "True when the value came from the fallback rather than the environment"]
                #[allow(dead_code)]
                $v fn is_fallback(&self) -> bool {
                    matches!(self, Self::Fallback(_))
                }

                #[doc = "Parse the contained value into `T`"]
                #[allow(dead_code)]
                $v fn parse<T>(&self) -> Result<T, $crate::ParseVarErr<<T as std::str::FromStr>::Err>>
                where
                    T: std::str::FromStr,
                    <T as std::str::FromStr>::Err: std::fmt::Display + std::fmt::Debug,
                {
                    let value: &str = self.as_ref();
                    value.trim().parse::<T>().map_err(|err| $crate::ParseVarErr {
                        var_name: Self::NAME,
                        value: value.to_string(),
                        err,
                    })
                }

                #[allow(dead_code)]
                #[doc = "Returns an Arc<str> of the contained value"]
                $v fn as_arc(&self) -> std::sync::Arc<str> {
                    match self {
                        Self::Fallback(i) => std::sync::Arc::from(*i),
                        Self::Runtime(i) => i.clone()
                    }
                }
            }

            impl std::ops::Deref for $n {
                type Target = str;

                fn deref(&self) -> &Self::Target {
                    match self {
                        Self::Runtime(i) => &*i,
                        Self::Fallback(i) => i
                    }
                }
            }

            impl std::convert::AsRef<str> for $n {
                fn as_ref(&self) -> &str {
                    match self {
                        Self::Runtime(i) => &*i,
                        Self::Fallback(i) => i
                    }
                }
            }
        }
    };
}
