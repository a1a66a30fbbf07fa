//! Asset enumeration and the entry-page transform
//!
//! An [`Asset`] is one built file destined for the bucket: its basename, its
//! bytes, and nothing else. Assets are collected from the immediate children
//! of the assets directory (non-recursive, unsorted - uploads are independent
//! and idempotent per key, so order does not matter), optionally rewritten by
//! [`transform`], uploaded once, and discarded.

use std::path::Path;

use crate::error::{FerryError, FerryResult};

/// Directory the site build writes its public assets into.
pub const DEFAULT_ASSETS_DIR: &str = "resources/public";

/// Basename of the entry page that receives the tracking-code substitution.
pub const ENTRY_PAGE: &str = "index.html";

/// Literal placeholder the site build leaves in the entry page.
pub const PLACEHOLDER: &str = "GOOGLE_ANALYTICS_TRACKING_CODE";

/// One static file destined for the remote store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    /// Basename of the file within the assets directory
    pub name: String,
    /// Raw file content
    pub content: Vec<u8>,
}

impl Asset {
    /// Destination key for this asset: `<version>/<name>` when a version
    /// prefix is in use, else the bare name.
    pub fn key(&self, version: Option<&str>) -> String {
        match version {
            Some(v) => format!("{}/{}", v, self.name),
            None => self.name.clone(),
        }
    }

    /// Whether this asset is the entry page.
    pub fn is_entry_page(&self) -> bool {
        self.name == ENTRY_PAGE
    }
}

/// Enumerate the immediate children of `dir` as assets.
///
/// Subdirectories are skipped; entries with non-UTF-8 names are skipped too,
/// since they cannot become object keys. Returns `AssetsDirNotFound` if the
/// directory is missing - that means the site was never built.
pub fn enumerate(dir: &Path) -> FerryResult<Vec<Asset>> {
    if !dir.is_dir() {
        return Err(FerryError::AssetsDirNotFound {
            path: dir.to_path_buf(),
        });
    }

    let mut assets = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = match entry.file_name().into_string() {
            Ok(name) => name,
            Err(_) => continue,
        };
        let content = std::fs::read(entry.path())?;
        assets.push(Asset { name, content });
    }
    Ok(assets)
}

/// Apply the entry-page transform to a single asset.
///
/// The entry page has every literal occurrence of [`PLACEHOLDER`] replaced by
/// the tracking code; every other asset passes through untouched. The
/// replacement works on bytes, so nothing outside the placeholder is altered.
/// An entry page that contains the placeholder while no tracking code is
/// configured is an error - the original tooling crashed here, ferry names
/// the variable.
pub fn transform(asset: Asset, tracking_code: Option<&str>) -> FerryResult<Asset> {
    if !asset.is_entry_page() {
        return Ok(asset);
    }

    let needle = PLACEHOLDER.as_bytes();
    if find(&asset.content, needle, 0).is_none() {
        return Ok(asset);
    }

    let code = tracking_code.ok_or(FerryError::MissingTrackingCode {
        file: asset.name.clone(),
        placeholder: PLACEHOLDER,
    })?;

    let content = replace_all(&asset.content, needle, code.as_bytes());
    Ok(Asset {
        name: asset.name,
        content,
    })
}

fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if haystack.len() < from + needle.len() {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|i| i + from)
}

fn replace_all(haystack: &[u8], needle: &[u8], replacement: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(haystack.len());
    let mut i = 0;
    while let Some(pos) = find(haystack, needle, i) {
        out.extend_from_slice(&haystack[i..pos]);
        out.extend_from_slice(replacement);
        i = pos + needle.len();
    }
    out.extend_from_slice(&haystack[i..]);
    out
}
