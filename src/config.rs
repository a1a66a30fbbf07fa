//! Deployment configuration
//!
//! All inputs arrive through environment variables. They are read exactly
//! once, at startup, into a [`Config`] that the rest of the pipeline receives
//! by reference. The lookup is injectable so tests never mutate process
//! environment.

use crate::error::{FerryError, FerryResult};

/// Bucket name environment variable
pub const ENV_BUCKET: &str = "AWS_BUCKET";
/// Access key id environment variable
pub const ENV_ACCESS_KEY: &str = "AWS_ACCESS_KEY";
/// Secret access key environment variable
pub const ENV_SECRET_KEY: &str = "AWS_SECRET_KEY";
/// Region environment variable (optional)
pub const ENV_REGION: &str = "AWS_REGION";
/// Tracking code environment variable (required only when the entry page
/// contains the placeholder)
pub const ENV_TRACKING_CODE: &str = "GA_TRACKING_CODE";
/// Site hostname environment variable (optional, enables the URL report line)
pub const ENV_SITE_HOST: &str = "SITE_HOST";

/// Region used when `AWS_REGION` is unset. Matches the endpoint the original
/// deploy tooling was hardwired to.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Deployment configuration, populated once from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Destination bucket name
    pub bucket: String,
    /// Access key id for the object store
    pub access_key: String,
    /// Secret access key for the object store
    pub secret_key: String,
    /// Bucket region
    pub region: String,
    /// Analytics tracking code substituted into the entry page
    pub tracking_code: Option<String>,
    /// Site hostname; when present, a deploy URL is printed
    pub site_host: Option<String>,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> FerryResult<Self> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Empty values are treated the same as unset ones: an empty bucket name
    /// or key id is never what the caller meant.
    pub fn from_lookup<F>(lookup: F) -> FerryResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var| lookup(var).filter(|v: &String| !v.is_empty());
        let require = |var: &'static str| get(var).ok_or(FerryError::MissingEnv { var });

        Ok(Config {
            bucket: require(ENV_BUCKET)?,
            access_key: require(ENV_ACCESS_KEY)?,
            secret_key: require(ENV_SECRET_KEY)?,
            region: get(ENV_REGION).unwrap_or_else(|| DEFAULT_REGION.to_string()),
            tracking_code: get(ENV_TRACKING_CODE),
            site_host: get(ENV_SITE_HOST),
        })
    }
}
