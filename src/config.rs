//! Game configuration
//!
//! One RON file (`config/game.ron` by default) holds display, camera,
//! gameplay tuning, control bindings and the arena layout. Every section and
//! field has a default, so a partial file only overrides what it names and a
//! missing file runs the built-in defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::asset::MANIFEST_PATH;
use crate::error::{Error, Result};
use crate::input::Controls;
use crate::rasterizer::constants::{HEIGHT, WIDTH};
use crate::rasterizer::{CameraSettings, Color, Rect, Vec2};

pub const DEFAULT_CONFIG_PATH: &str = "config/game.ron";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub title: String,
    /// Physical resolution
    pub width: usize,
    pub height: usize,
    pub target_fps: u32,
    pub fullscreen: bool,
    /// World background
    pub clear_color: Color,
    /// Overlay a line from each weapon's pivot to its muzzle
    pub aim_lines: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            title: "Scrollshot".to_string(),
            width: WIDTH,
            height: HEIGHT,
            target_fps: 120,
            fullscreen: false,
            clear_color: Color::new(24, 20, 37),
            aim_lines: false,
        }
    }
}

/// Player movement tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    /// World units per second
    pub speed: f32,
    /// Speed factor while dashing
    pub dash_multiplier: f32,
    /// Seconds
    pub dash_time: f32,
    /// Seconds after a dash ends before the next one
    pub dash_cooldown: f32,
    /// One player per input device, up to this many
    pub max_players: usize,
    pub layer: i32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            speed: 120.0,
            dash_multiplier: 3.0,
            dash_time: 0.15,
            dash_cooldown: 0.6,
            max_players: 4,
            layer: 1,
        }
    }
}

/// Weapon handling. Pivot and muzzle are in frame pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponTuning {
    /// Grip point placed on the holder's center
    pub pivot: Vec2,
    /// Barrel tip, bullets spawn here
    pub muzzle: Vec2,
    pub magazine: u32,
    /// Seconds
    pub reload_time: f32,
    /// Seconds between shots
    pub cooldown: f32,
    /// Fire while held (true) or once per press (false)
    pub automatic: bool,
    /// Degrees added to the aim angle
    pub aim_offset: f32,
    pub layer: i32,
}

impl Default for WeaponTuning {
    fn default() -> Self {
        Self {
            pivot: Vec2::new(2.0, 3.0),
            muzzle: Vec2::new(12.0, 2.0),
            magazine: 12,
            reload_time: 1.2,
            cooldown: 0.15,
            automatic: false,
            aim_offset: 0.0,
            layer: 2,
        }
    }
}

/// Projectile tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BulletTuning {
    /// World units per second
    pub speed: f32,
    /// Seconds before the bullet is removed
    pub lifetime: f32,
    /// Remove on the first solid hit
    pub despawn_on_contact: bool,
    pub layer: i32,
}

impl Default for BulletTuning {
    fn default() -> Self {
        Self {
            speed: 300.0,
            lifetime: 1.5,
            despawn_on_contact: true,
            layer: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Per-axis stick deadzone
    pub deadzone: f32,
    /// Physical pixels per second at full right-stick deflection
    pub cursor_speed: f32,
    pub keyboard: Controls,
    pub controller: Controls,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            deadzone: 0.1,
            cursor_speed: 900.0,
            keyboard: Controls::keyboard(),
            controller: Controls::controller(),
        }
    }
}

/// Level geometry: solid rectangles and player spawn points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    pub solids: Vec<Rect>,
    pub spawn_points: Vec<Vec2>,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            solids: vec![
                // Outer walls of a 480x320 room
                Rect::new(0.0, 0.0, 480.0, 16.0),
                Rect::new(0.0, 304.0, 480.0, 16.0),
                Rect::new(0.0, 16.0, 16.0, 288.0),
                Rect::new(464.0, 16.0, 16.0, 288.0),
                // Cover
                Rect::new(120.0, 100.0, 32.0, 32.0),
                Rect::new(328.0, 188.0, 32.0, 32.0),
                Rect::new(224.0, 60.0, 32.0, 64.0),
            ],
            spawn_points: vec![
                Vec2::new(64.0, 64.0),
                Vec2::new(400.0, 240.0),
                Vec2::new(400.0, 64.0),
                Vec2::new(64.0, 240.0),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    pub manifest: PathBuf,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self { manifest: PathBuf::from(MANIFEST_PATH) }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub display: DisplayConfig,
    pub camera: CameraSettings,
    pub player: PlayerTuning,
    pub weapon: WeaponTuning,
    pub bullet: BulletTuning,
    pub input: InputConfig,
    pub arena: ArenaConfig,
    pub assets: AssetConfig,
}

fn require(ok: bool, msg: impl FnOnce() -> String) -> Result<()> {
    if ok {
        Ok(())
    } else {
        Err(Error::Configuration(msg()))
    }
}

impl GameConfig {
    /// Load and validate. A missing file yields the defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::info!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_ron(&contents).map_err(|e| match e {
            Error::Parse { source, .. } => Error::Parse { path: path.to_path_buf(), source },
            other => other,
        })?;
        tracing::info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn from_ron(s: &str) -> Result<Self> {
        let config: GameConfig = ron::from_str(s).map_err(|source| Error::Parse {
            path: PathBuf::new(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Write as pretty RON, creating parent directories
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(4)
            .indentor("    ".to_string());
        let text = ron::ser::to_string_pretty(self, pretty)?;
        let io_err = |source| Error::Io { path: path.to_path_buf(), source };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        fs::write(path, text).map_err(io_err)?;
        tracing::info!(path = %path.display(), "saved config");
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let d = &self.display;
        require(d.width > 0 && d.height > 0, || {
            format!("display resolution must be non-zero, got {}x{}", d.width, d.height)
        })?;
        require(d.target_fps > 0, || "display target_fps must be positive".into())?;

        self.camera.validate()?;

        let p = &self.player;
        require(p.speed > 0.0, || format!("player speed must be positive, got {}", p.speed))?;
        require(p.dash_multiplier >= 1.0, || {
            format!("player dash_multiplier must be at least 1, got {}", p.dash_multiplier)
        })?;
        require(p.dash_time >= 0.0 && p.dash_cooldown >= 0.0, || {
            "player dash timings must not be negative".into()
        })?;
        require(p.max_players >= 1, || "player max_players must be at least 1".into())?;

        let w = &self.weapon;
        require(w.magazine > 0, || "weapon magazine must hold at least one round".into())?;
        require(w.reload_time > 0.0, || {
            format!("weapon reload_time must be positive, got {}", w.reload_time)
        })?;
        require(w.cooldown >= 0.0, || "weapon cooldown must not be negative".into())?;

        let b = &self.bullet;
        require(b.speed >= 0.0, || "bullet speed must not be negative".into())?;
        require(b.lifetime > 0.0, || format!("bullet lifetime must be positive, got {}", b.lifetime))?;

        let i = &self.input;
        require((0.0..1.0).contains(&i.deadzone), || {
            format!("input deadzone must be in [0, 1), got {}", i.deadzone)
        })?;
        require(i.cursor_speed >= 0.0, || "input cursor_speed must not be negative".into())?;

        require(!self.arena.spawn_points.is_empty(), || {
            "arena needs at least one spawn point".into()
        })?;
        require(self.arena.solids.iter().all(|r| r.w >= 0.0 && r.h >= 0.0), || {
            "arena solids must have non-negative size".into()
        })?;
        Ok(())
    }
}
