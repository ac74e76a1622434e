//! Animation assets
//!
//! ```text
//! assets/
//! ├── animations.ron    # AnimationKey -> frames + timing
//! └── <tag>/*.png       # Frame images
//! ```
//!
//! The table is built once at startup and validated against the closed set
//! of keys in `AnimationKey::all_required`. Entities then clone prototypes
//! out of it whenever their clip changes.

mod animation;
mod key;
mod library;

pub use animation::Animation;
pub use key::{AnimationKey, Clip, Facing, Tag};
pub use library::{AssetTable, MANIFEST_PATH};
