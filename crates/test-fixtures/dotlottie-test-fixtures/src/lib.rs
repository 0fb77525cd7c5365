use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::Deserialize;

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).expect("fixtures manifest should parse")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    animations: HashMap<String, String>,
    bundles: HashMap<String, String>,
    archives: HashMap<String, String>,
    themes: HashMap<String, String>,
    #[serde(rename = "state-machines")]
    state_machines: HashMap<String, String>,
}

fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures")
}

fn resolve_path(rel: &str) -> PathBuf {
    fixtures_root().join(rel)
}

fn read_to_string(rel: &str) -> Result<String> {
    let path = resolve_path(rel);
    fs::read_to_string(&path)
        .with_context(|| format!("failed to read fixture at {}", path.display()))
}

fn lookup<'a>(map: &'a HashMap<String, String>, kind: &str, name: &str) -> Result<&'a str> {
    map.get(name)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("unknown {kind} fixture '{name}'"))
}

/// Plain Lottie JSON documents.
pub mod animations {
    use super::*;

    pub fn json(name: &str) -> Result<String> {
        read_to_string(lookup(&MANIFEST.animations, "animation", name)?)
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        Ok(resolve_path(lookup(&MANIFEST.animations, "animation", name)?))
    }
}

/// dotLottie bundles, unpacked directories and packed `.lottie` archives.
pub mod bundles {
    use super::*;

    pub fn path(name: &str) -> Result<PathBuf> {
        let dir = resolve_path(lookup(&MANIFEST.bundles, "bundle", name)?);
        if !dir.join("manifest.json").is_file() {
            return Err(anyhow!("bundle fixture '{name}' has no manifest.json"));
        }
        Ok(dir)
    }

    pub fn manifest_json(name: &str) -> Result<String> {
        let rel = lookup(&MANIFEST.bundles, "bundle", name)?;
        read_to_string(&format!("{rel}/manifest.json"))
    }

    pub fn archive_path(name: &str) -> Result<PathBuf> {
        Ok(resolve_path(lookup(&MANIFEST.archives, "archive", name)?))
    }

    /// Raw bytes of a packed `.lottie` file.
    pub fn archive(name: &str) -> Result<Vec<u8>> {
        let path = archive_path(name)?;
        fs::read(&path).with_context(|| format!("failed to read archive at {}", path.display()))
    }
}

pub mod themes {
    use super::*;

    pub fn json(name: &str) -> Result<String> {
        read_to_string(lookup(&MANIFEST.themes, "theme", name)?)
    }
}

pub mod state_machines {
    use super::*;

    pub fn json(name: &str) -> Result<String> {
        read_to_string(lookup(&MANIFEST.state_machines, "state machine", name)?)
    }
}
