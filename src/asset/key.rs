//! Animation keys
//!
//! Every animation the game can request is named by a `{tag}/{clip}` pair
//! drawn from a closed set, so a manifest can be checked for completeness
//! once at load time.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::rasterizer::Vec2;

/// Kind of sprite an animation belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tag {
    Player,
    Weapon,
    Bullet,
    Cursor,
}

impl Tag {
    pub const ALL: [Tag; 4] = [Tag::Player, Tag::Weapon, Tag::Bullet, Tag::Cursor];

    pub fn name(&self) -> &'static str {
        match self {
            Tag::Player => "player",
            Tag::Weapon => "weapon",
            Tag::Bullet => "bullet",
            Tag::Cursor => "cursor",
        }
    }

    /// Clips that must exist for this tag
    pub fn required_clips(&self) -> Vec<Clip> {
        match self {
            Tag::Player => Facing::ALL
                .iter()
                .flat_map(|&f| [Clip::Face(f), Clip::Run(f)])
                .collect(),
            Tag::Weapon | Tag::Bullet | Tag::Cursor => vec![Clip::Idle],
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Tag {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tag::ALL
            .into_iter()
            .find(|t| t.name() == s)
            .ok_or_else(|| Error::config(format!("unknown animation tag `{}`", s)))
    }
}

/// One of eight facing directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Facing {
    Right,
    UpRight,
    Up,
    UpLeft,
    Left,
    DownLeft,
    Down,
    DownRight,
}

impl Facing {
    /// Counter-clockwise from +x, matching the 45 degree sectors
    pub const ALL: [Facing; 8] = [
        Facing::Right,
        Facing::UpRight,
        Facing::Up,
        Facing::UpLeft,
        Facing::Left,
        Facing::DownLeft,
        Facing::Down,
        Facing::DownRight,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Facing::Right => "right",
            Facing::UpRight => "up_right",
            Facing::Up => "up",
            Facing::UpLeft => "up_left",
            Facing::Left => "left",
            Facing::DownLeft => "down_left",
            Facing::Down => "down",
            Facing::DownRight => "down_right",
        }
    }

    /// Nearest direction to a screen-space vector. `None` for the zero vector.
    pub fn from_vector(v: Vec2) -> Option<Facing> {
        if v.is_zero() {
            return None;
        }
        let degrees = (-v.y).atan2(v.x).to_degrees();
        let sector = (degrees / 45.0).round() as i32;
        Some(Facing::ALL[sector.rem_euclid(8) as usize])
    }
}

impl FromStr for Facing {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Facing::ALL
            .into_iter()
            .find(|f| f.name() == s)
            .ok_or_else(|| Error::config(format!("unknown facing `{}`", s)))
    }
}

/// What a sprite is doing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Clip {
    /// Non-directional idle (weapons, bullets, cursor)
    Idle,
    /// Standing still, facing a direction
    Face(Facing),
    /// Moving in a direction
    Run(Facing),
}

impl fmt::Display for Clip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Clip::Idle => f.write_str("idle"),
            Clip::Face(facing) => write!(f, "idle_{}", facing.name()),
            Clip::Run(facing) => write!(f, "run_{}", facing.name()),
        }
    }
}

impl FromStr for Clip {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "idle" {
            Ok(Clip::Idle)
        } else if let Some(rest) = s.strip_prefix("idle_") {
            Ok(Clip::Face(rest.parse()?))
        } else if let Some(rest) = s.strip_prefix("run_") {
            Ok(Clip::Run(rest.parse()?))
        } else {
            Err(Error::config(format!("unknown animation clip `{}`", s)))
        }
    }
}

/// `{tag}/{clip}` lookup key into the asset table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnimationKey {
    pub tag: Tag,
    pub clip: Clip,
}

impl AnimationKey {
    pub const fn new(tag: Tag, clip: Clip) -> Self {
        Self { tag, clip }
    }

    /// Every key the game can ask for
    pub fn all_required() -> Vec<AnimationKey> {
        Tag::ALL
            .iter()
            .flat_map(|&tag| tag.required_clips().into_iter().map(move |clip| AnimationKey::new(tag, clip)))
            .collect()
    }
}

impl fmt::Display for AnimationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.tag, self.clip)
    }
}

impl FromStr for AnimationKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (tag, clip) = s
            .split_once('/')
            .ok_or_else(|| Error::config(format!("animation key `{}` is not `tag/clip`", s)))?;
        Ok(AnimationKey::new(tag.parse()?, clip.parse()?))
    }
}
