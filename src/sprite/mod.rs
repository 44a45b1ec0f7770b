// sprite/
// ├── mod.rs    : clip tables shared by every animated actor
// ├── entity.rs : generic actor, facing + stand/walk + movement tween
// ├── sven.rs   : the player, entity + hump
// └── sheep.rs  : herd member, entity + hit count + removal pipeline
//
// Clip names are frame keys of the sprite sheet atlas, see `engine::Sheet`.
pub mod entity;
pub mod sheep;
pub mod sven;

use crate::engine::animation::Clip;
use crate::map::Direction;
use serde::{Deserialize, Serialize};

pub use self::entity::{Entity, Motion};
pub use self::sheep::{Sheep, SheepEvent, SheepId};
pub use self::sven::{Sven, SvenEvent};

/// One clip per facing, replaces string keys like "stand" + "Up"
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DirectionalClips {
    pub up: Clip,
    pub down: Clip,
    pub left: Clip,
    pub right: Clip,
}

impl DirectionalClips {
    pub fn from_fn(mut clip: impl FnMut(Direction) -> Clip) -> Self {
        DirectionalClips {
            up: clip(Direction::Up),
            down: clip(Direction::Down),
            left: clip(Direction::Left),
            right: clip(Direction::Right),
        }
    }

    pub fn get(&self, direction: Direction) -> &Clip {
        match direction {
            Direction::Up => &self.up,
            Direction::Down => &self.down,
            Direction::Left => &self.left,
            Direction::Right => &self.right,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EntityClips {
    pub stand: DirectionalClips,
    pub walk: DirectionalClips,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SvenClips {
    #[serde(flatten)]
    pub entity: EntityClips,
    pub hump: DirectionalClips,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SheepClips {
    #[serde(flatten)]
    pub entity: EntityClips,
    pub disappear: Clip,
}

/// `"svenWalkUp (1).png"`, `"svenWalkUp (2).png"` ...
pub fn frame_names(name: &str, frame_count: usize) -> Clip {
    (1..=frame_count)
        .map(|frame| format!("{} ({}).png", name, frame))
        .collect()
}

fn directional(actor: &str, action: &str, frame_count: usize) -> DirectionalClips {
    DirectionalClips::from_fn(|direction| {
        frame_names(&format!("{}{}{}", actor, action, direction), frame_count)
    })
}

impl Default for SvenClips {
    fn default() -> Self {
        SvenClips {
            entity: EntityClips {
                stand: directional("sven", "Stand", 1),
                walk: directional("sven", "Walk", 8),
            },
            hump: directional("sven", "Hump", 8),
        }
    }
}

impl Default for SheepClips {
    fn default() -> Self {
        SheepClips {
            entity: EntityClips {
                stand: directional("sheep", "Stand", 1),
                walk: directional("sheep", "Walk", 8),
            },
            disappear: frame_names("sheepDisappear", 6),
        }
    }
}
