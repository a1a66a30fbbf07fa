//! Ferry - versioned static-site deploys to S3
//!
//! Ferry takes a site's built assets (the immediate children of
//! `resources/public/`), substitutes the analytics tracking code into the
//! entry page, and uploads everything to an S3 bucket under a key prefix
//! derived from the latest commit.

pub mod assets;
pub mod config;
pub mod deploy;
pub mod error;
pub mod store;
pub mod ui;
pub mod version;

// Re-exports for convenience
pub use assets::{enumerate, Asset, DEFAULT_ASSETS_DIR, ENTRY_PAGE, PLACEHOLDER};
pub use config::Config;
pub use deploy::{DeployOptions, DeployReport, Deployer};
pub use error::{FerryError, FerryResult};
pub use store::{MemoryStore, ObjectStore, S3Store};
pub use version::{GitLog, VersionSource};
