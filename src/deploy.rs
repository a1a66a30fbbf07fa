//! The deploy pipeline
//!
//! [`Deployer`] wires the ports together and runs the whole sequence:
//! resolve version, enumerate assets, transform the entry page, upload each
//! asset in turn, and assemble the [`DeployReport`]. Every step is fail-fast;
//! a mid-run upload error leaves earlier objects in the store (uploads are
//! idempotent per key, so a rerun overwrites them).

use std::path::Path;

use crate::assets::{enumerate, transform};
use crate::error::FerryResult;
use crate::store::ObjectStore;
use crate::version::VersionSource;

/// Options for a single deploy run.
#[derive(Debug, Clone, Default)]
pub struct DeployOptions {
    /// Key assets under `<version>/` (the default); `false` reproduces the
    /// flat layout with bare-basename keys.
    pub version_prefix: bool,
    /// Resolve, transform and plan, but upload nothing.
    pub dry_run: bool,
}

/// Result of a deploy run.
#[derive(Debug, Clone)]
pub struct DeployReport {
    /// Version token the deploy was keyed under
    pub version: String,
    /// Destination keys, in upload order
    pub uploaded: Vec<String>,
    /// Derived site URL, when a hostname is configured
    pub url: Option<String>,
}

/// Orchestrates one deploy against an object store.
pub struct Deployer<'a> {
    store: &'a dyn ObjectStore,
    versions: &'a dyn VersionSource,
    tracking_code: Option<&'a str>,
    site_host: Option<&'a str>,
}

/// Progress callback, invoked after each successful upload.
pub type UploadCallback<'a> = dyn FnMut(&str) + 'a;

impl<'a> Deployer<'a> {
    pub fn new(
        store: &'a dyn ObjectStore,
        versions: &'a dyn VersionSource,
        tracking_code: Option<&'a str>,
        site_host: Option<&'a str>,
    ) -> Self {
        Self {
            store,
            versions,
            tracking_code,
            site_host,
        }
    }

    /// Run the full pipeline over the assets in `dir`.
    pub async fn deploy(&self, dir: &Path, options: &DeployOptions) -> FerryResult<DeployReport> {
        self.deploy_with_callback(dir, options, &mut |_| {}).await
    }

    /// Like [`deploy`](Self::deploy), reporting each uploaded key as it lands.
    pub async fn deploy_with_callback(
        &self,
        dir: &Path,
        options: &DeployOptions,
        on_upload: &mut UploadCallback<'_>,
    ) -> FerryResult<DeployReport> {
        let version = self.versions.resolve_latest()?;
        let prefix = options.version_prefix.then_some(version.as_str());

        let assets = enumerate(dir)?;

        let mut uploaded = Vec::with_capacity(assets.len());
        for asset in assets {
            let asset = transform(asset, self.tracking_code)?;
            let key = asset.key(prefix);
            if !options.dry_run {
                self.store.put(&key, asset.content).await?;
            }
            on_upload(&key);
            uploaded.push(key);
        }

        Ok(DeployReport {
            url: self.site_url(&version),
            version,
            uploaded,
        })
    }

    fn site_url(&self, version: &str) -> Option<String> {
        self.site_host
            .map(|host| format!("http://{}/{}/index.html", host, version))
    }
}
