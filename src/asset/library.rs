//! Asset Table - animation prototypes keyed by `{tag}/{clip}`
//!
//! Loaded once at startup from a RON manifest:
//!
//! ```text
//! (
//!     animations: {
//!         "player/run_left": (
//!             frames: ["player/run_left_0.png", "player/run_left_1.png"],
//!             frame_duration: 0.1,
//!             looping: true,
//!         ),
//!     },
//! )
//! ```
//!
//! Frame paths are relative to the manifest's directory. Frames that appear
//! under several keys are decoded once and shared.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::animation::Animation;
use super::key::{AnimationKey, Clip, Tag};
use crate::error::{Error, Result};
use crate::rasterizer::{Color, Image};

/// Default manifest location
pub const MANIFEST_PATH: &str = "assets/animations.ron";

/// One manifest entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClipDef {
    pub frames: Vec<PathBuf>,
    pub frame_duration: f32,
    #[serde(default = "default_looping")]
    pub looping: bool,
}

fn default_looping() -> bool {
    true
}

/// On-disk manifest
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    pub animations: BTreeMap<String, ClipDef>,
}

impl Manifest {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        ron::from_str(&contents).map_err(|source| Error::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Shared animation prototypes. Entities clone entries out of the table.
#[derive(Debug, Default)]
pub struct AssetTable {
    animations: HashMap<AnimationKey, Animation>,
}

impl AssetTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode every frame named by a manifest
    pub fn load_manifest(path: &Path) -> Result<Self> {
        let manifest = Manifest::load(path)?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));

        let mut decoded: HashMap<PathBuf, Arc<Image>> = HashMap::new();
        let mut table = AssetTable::new();

        for (name, def) in &manifest.animations {
            let key: AnimationKey = name.parse()?;
            let mut frames = Vec::with_capacity(def.frames.len());
            for frame in &def.frames {
                let full = base.join(frame);
                let image = match decoded.get(&full) {
                    Some(image) => image.clone(),
                    None => {
                        let image = Arc::new(Image::from_file(&full)?);
                        decoded.insert(full, image.clone());
                        image
                    }
                };
                frames.push(image);
            }
            let animation = Animation::new(frames, def.frame_duration, def.looping)
                .map_err(|e| Error::config(format!("{}: {}", key, e)))?;
            table.insert(key, animation);
        }

        tracing::info!(
            path = %path.display(),
            animations = table.len(),
            images = decoded.len(),
            "loaded animation manifest"
        );
        Ok(table)
    }

    /// Flat-coloured stand-ins for every required key
    pub fn placeholder() -> Self {
        let mut table = AssetTable::new();
        for key in AnimationKey::all_required() {
            let (w, h, color) = match key.tag {
                Tag::Player => (16, 16, Color::new(80, 160, 220)),
                Tag::Weapon => (12, 6, Color::new(200, 200, 200)),
                Tag::Bullet => (4, 4, Color::new(250, 220, 80)),
                Tag::Cursor => (7, 7, Color::WHITE),
            };
            let animation = match key.clip {
                // Two-frame flicker so running reads as motion
                Clip::Run(_) => {
                    let a = Arc::new(Image::new_filled(w, h, color));
                    let b = Arc::new(Image::new_filled(w, h, color.shade(0.8)));
                    Animation::new(vec![a, b], 0.15, true)
                }
                _ => Ok(Animation::still(Arc::new(Image::new_filled(w, h, color)))),
            };
            if let Ok(animation) = animation {
                table.insert(key, animation);
            }
        }
        table
    }

    pub fn insert(&mut self, key: AnimationKey, animation: Animation) {
        self.animations.insert(key, animation);
    }

    pub fn get(&self, key: AnimationKey) -> Result<&Animation> {
        self.animations.get(&key).ok_or(Error::MissingAnimation(key))
    }

    /// Fresh playback copy of a prototype
    pub fn instance(&self, key: AnimationKey) -> Result<Animation> {
        let mut animation = self.get(key)?.clone();
        animation.restart();
        Ok(animation)
    }

    pub fn contains(&self, key: AnimationKey) -> bool {
        self.animations.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.animations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.animations.is_empty()
    }

    /// Fail on the first required key that is missing
    pub fn validate(&self) -> Result<()> {
        let mut missing: Vec<AnimationKey> = AnimationKey::all_required()
            .into_iter()
            .filter(|key| !self.contains(*key))
            .collect();
        missing.sort();
        match missing.first() {
            Some(&key) => {
                tracing::error!(missing = missing.len(), first = %key, "asset table incomplete");
                Err(Error::MissingAnimation(key))
            }
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::key::Facing;
    use std::fs;
    use tempfile::TempDir;

    fn write_png(dir: &Path, name: &str) {
        let mut img = image::RgbaImage::new(2, 3);
        img.put_pixel(1, 2, image::Rgba([255, 0, 0, 255]));
        img.save(dir.join(name)).unwrap();
    }

    #[test]
    fn test_placeholder_is_complete() {
        let table = AssetTable::placeholder();
        assert!(table.validate().is_ok());
        assert_eq!(table.len(), AnimationKey::all_required().len());
    }

    #[test]
    fn test_missing_key_is_reported() {
        let table = AssetTable::new();
        let key = AnimationKey::new(Tag::Weapon, Clip::Idle);
        assert!(matches!(table.get(key), Err(Error::MissingAnimation(k)) if k == key));
        assert!(matches!(table.validate(), Err(Error::MissingAnimation(_))));
    }

    #[test]
    fn test_load_manifest_shares_frames() {
        let dir = TempDir::new().unwrap();
        write_png(dir.path(), "a.png");
        write_png(dir.path(), "b.png");
        fs::write(
            dir.path().join("animations.ron"),
            r#"(
                animations: {
                    "player/run_left": (frames: ["a.png", "b.png"], frame_duration: 0.1),
                    "player/idle_left": (frames: ["a.png"], frame_duration: 0.5, looping: false),
                },
            )"#,
        )
        .unwrap();

        let table = AssetTable::load_manifest(&dir.path().join("animations.ron")).unwrap();
        assert_eq!(table.len(), 2);

        let run = table.get(AnimationKey::new(Tag::Player, Clip::Run(Facing::Left))).unwrap();
        let idle = table.get(AnimationKey::new(Tag::Player, Clip::Face(Facing::Left))).unwrap();
        assert_eq!(run.len(), 2);
        assert!(run.is_looping());
        assert!(!idle.is_looping());
        assert!(Arc::ptr_eq(run.current_frame(), idle.current_frame()));
        assert_eq!(run.frame_size(), (2, 3));
        assert_eq!(run.current_frame().get_pixel(1, 2), Color::RED);
    }

    #[test]
    fn test_load_manifest_rejects_unknown_key() {
        let dir = TempDir::new().unwrap();
        write_png(dir.path(), "a.png");
        let path = dir.path().join("animations.ron");
        fs::write(&path, r#"(animations: { "enemy/idle": (frames: ["a.png"], frame_duration: 0.1) })"#).unwrap();
        assert!(matches!(AssetTable::load_manifest(&path), Err(Error::Configuration(_))));
    }

    #[test]
    fn test_load_manifest_errors_carry_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("animations.ron");
        assert!(matches!(AssetTable::load_manifest(&path), Err(Error::Io { .. })));

        fs::write(&path, "(animations: {").unwrap();
        assert!(matches!(AssetTable::load_manifest(&path), Err(Error::Parse { .. })));

        fs::write(&path, r#"(animations: { "bullet/idle": (frames: ["gone.png"], frame_duration: 0.1) })"#)
            .unwrap();
        assert!(matches!(AssetTable::load_manifest(&path), Err(Error::Image { .. })));
    }
}
