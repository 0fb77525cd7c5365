//! dotLottie bundles, packed (`.lottie` zip archives) or unpacked on disk.
//!
//! Both share one layout:
//! `manifest.json`, `animations/<id>.json`, `themes/<id>.json`, `states/<id>.json`.

use std::collections::HashMap;
use std::fs;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};

use crate::error::PlayerError;
use crate::manifest::Manifest;

#[derive(Clone, Debug)]
enum Source {
    Dir(PathBuf),
    Memory {
        animations: HashMap<String, String>,
        themes: HashMap<String, String>,
        states: HashMap<String, String>,
    },
}

/// A manifest plus access to the documents it names.
#[derive(Clone, Debug)]
pub struct Bundle {
    manifest: Manifest,
    manifest_json: String,
    source: Source,
}

impl Bundle {
    /// Open an unpacked bundle directory.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, PlayerError> {
        let dir = dir.as_ref();
        let manifest_json = fs::read_to_string(dir.join("manifest.json"))?;
        let manifest = Manifest::from_json(&manifest_json)?;
        log::debug!(
            "opened bundle at {} ({} animations)",
            dir.display(),
            manifest.animations.len()
        );
        Ok(Self {
            manifest,
            manifest_json,
            source: Source::Dir(dir.to_path_buf()),
        })
    }

    /// Build a bundle from in-memory documents keyed by id.
    pub fn from_parts(
        manifest: Manifest,
        animations: HashMap<String, String>,
        themes: HashMap<String, String>,
        states: HashMap<String, String>,
    ) -> Result<Self, PlayerError> {
        let manifest_json = manifest.to_json_string()?;
        Ok(Self {
            manifest,
            manifest_json,
            source: Source::Memory {
                animations,
                themes,
                states,
            },
        })
    }

    /// Unpack a `.lottie` archive held in memory. Entries outside the known
    /// folders (images, audio) are skipped.
    pub fn from_archive(data: &[u8]) -> Result<Self, PlayerError> {
        let mut archive = zip::ZipArchive::new(Cursor::new(data))?;
        let mut manifest_json = None;
        let mut animations = HashMap::new();
        let mut themes = HashMap::new();
        let mut states = HashMap::new();

        for index in 0..archive.len() {
            let mut entry = archive.by_index(index)?;
            if entry.is_dir() {
                continue;
            }
            let name = entry.name().to_string();
            let target = if name == "manifest.json" {
                None
            } else {
                let Some((folder, file)) = name.split_once('/') else {
                    continue;
                };
                let map = match folder {
                    "animations" => &mut animations,
                    "themes" => &mut themes,
                    "states" => &mut states,
                    _ => continue,
                };
                let Some(id) = Path::new(file).file_stem().and_then(|s| s.to_str()) else {
                    continue;
                };
                if file.contains('/') {
                    continue;
                }
                Some((map, id.to_string()))
            };

            let mut text = String::new();
            entry.read_to_string(&mut text)?;
            match target {
                Some((map, id)) => {
                    map.insert(id, text);
                }
                None => manifest_json = Some(text),
            }
        }

        let manifest_json = manifest_json.ok_or_else(|| PlayerError::InvalidBundle {
            reason: "archive has no manifest.json".into(),
        })?;
        let manifest = Manifest::from_json(&manifest_json)?;
        log::debug!(
            "unpacked archive ({} animations, {} themes, {} state machines)",
            animations.len(),
            themes.len(),
            states.len()
        );
        Ok(Self {
            manifest,
            manifest_json,
            source: Source::Memory {
                animations,
                themes,
                states,
            },
        })
    }

    /// Open `path` as a packed archive when it is a file, else as a directory.
    pub fn open_path(path: impl AsRef<Path>) -> Result<Self, PlayerError> {
        let path = path.as_ref();
        if path.is_file() {
            Self::from_archive(&fs::read(path)?)
        } else {
            Self::open(path)
        }
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// The manifest as it was read.
    pub fn manifest_json(&self) -> &str {
        &self.manifest_json
    }

    pub fn initial_animation_id(&self) -> Option<&str> {
        self.manifest.initial_animation_id()
    }

    pub fn animation(&self, id: &str) -> Result<String, PlayerError> {
        if self.manifest.animation(id).is_none() {
            return Err(PlayerError::AnimationNotFound { id: id.to_string() });
        }
        self.read("animations", id)
            .ok_or_else(|| PlayerError::AnimationNotFound { id: id.to_string() })
    }

    pub fn theme(&self, id: &str) -> Result<String, PlayerError> {
        self.read("themes", id)
            .ok_or_else(|| PlayerError::ThemeNotFound { id: id.to_string() })
    }

    pub fn state_machine(&self, id: &str) -> Result<String, PlayerError> {
        self.read("states", id)
            .ok_or_else(|| PlayerError::StateMachineNotFound { id: id.to_string() })
    }

    fn read(&self, kind: &str, id: &str) -> Option<String> {
        if id.is_empty() || id.contains(['/', '\\']) || id.contains("..") {
            log::warn!("rejecting {kind} id {id:?}");
            return None;
        }
        match &self.source {
            Source::Dir(dir) => {
                let path = dir.join(kind).join(format!("{id}.json"));
                match fs::read_to_string(&path) {
                    Ok(s) => Some(s),
                    Err(e) => {
                        log::warn!("cannot read {}: {e}", path.display());
                        None
                    }
                }
            }
            Source::Memory {
                animations,
                themes,
                states,
            } => {
                let map = match kind {
                    "animations" => animations,
                    "themes" => themes,
                    _ => states,
                };
                map.get(id).cloned()
            }
        }
    }
}
