//! Configuration loading for report defaults

mod schema;

pub use schema::Config;

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = ".testlogrc.json";

/// Report defaults for a run started in `work_dir`.
///
/// An explicit `custom_path` must exist. Without one, the nearest
/// `.testlogrc.json` walking up from `work_dir` is used, and a tree with no
/// such file yields `Config::default()`.
pub fn load_config(work_dir: &Path, custom_path: Option<&Path>) -> Result<Config> {
    let path = match custom_path {
        Some(p) => {
            let path = anchored(work_dir, p);
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            Some(path)
        }
        None => nearest_config(work_dir),
    };

    match path {
        Some(path) => {
            log::debug!("loading config from {}", path.display());
            load_layered(&path, &mut HashSet::new())
        }
        None => Ok(Config::default()),
    }
}

/// `path` unchanged when absolute, otherwise joined onto `base`.
fn anchored(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

fn parent_dir(path: &Path) -> &Path {
    path.parent().unwrap_or(Path::new("."))
}

/// Parse one file, then fold in whatever it `extends` underneath it.
/// `seen` holds every file already on the chain.
fn load_layered(path: &Path, seen: &mut HashSet<PathBuf>) -> Result<Config> {
    let key = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    if !seen.insert(key) {
        anyhow::bail!("Circular extends detected in config: {}", path.display());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    let mut config: Config = serde_json::from_str(&content)
        .with_context(|| format!("Invalid JSON in config: {}", path.display()))?;

    // Anchor before merging so an inherited outputDir keeps its own base.
    if let Some(dir) = config.output_dir.take() {
        config.output_dir = Some(anchored(parent_dir(path), &dir));
    }

    if let Some(extends) = config.extends.take() {
        let base = parent_layer(path, &extends)?;
        config.merge_from(load_layered(&base, seen)?);
    }

    Ok(config)
}

/// Locate the file named by an `extends` entry in `child`. A bare name
/// such as `"station"` means `station.json` beside the child.
fn parent_layer(child: &Path, extends: &str) -> Result<PathBuf> {
    let mut base = anchored(parent_dir(child), Path::new(extends));
    if base.extension().is_none() {
        base.set_extension("json");
    }
    if !base.exists() {
        anyhow::bail!(
            "Extended config not found: {} (referenced from {})",
            base.display(),
            child.display()
        );
    }
    Ok(base)
}

fn nearest_config(mut dir: &Path) -> Option<PathBuf> {
    loop {
        let candidate = dir.join(CONFIG_FILENAME);
        if candidate.exists() {
            return Some(candidate);
        }
        dir = dir.parent()?;
    }
}
