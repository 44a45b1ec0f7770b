use crate::engine::animation::{AnimatedSprite, Playback};
use crate::engine::Point;
use crate::level::Rules;
use crate::map::Direction;
use crate::sprite::{DirectionalClips, Entity, Motion, SvenClips};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SvenEvent {
    Arrived,
    HumpFinished,
}

pub struct Sven {
    entity: Entity,
    hump: DirectionalClips,
    humping: bool,
}

impl Sven {
    pub fn new(clips: SvenClips, position: Point, direction: Direction, rules: &Rules) -> Self {
        Sven {
            entity: Entity::new(clips.entity, position, direction, rules),
            hump: clips.hump,
            humping: false,
        }
    }

    pub fn direction(&self) -> Direction {
        self.entity.direction()
    }

    pub fn is_moving(&self) -> bool {
        self.entity.is_moving()
    }

    pub fn is_humping(&self) -> bool {
        self.humping
    }

    pub fn sprite(&self) -> &AnimatedSprite {
        self.entity.sprite()
    }

    /// No-op while a hump plays, the hump always runs to completion
    pub fn stand_still(&mut self) {
        if !self.humping {
            self.entity.stand_still();
        }
    }

    pub fn stand_facing(&mut self, direction: Direction) {
        if !self.humping {
            self.entity.stand_facing(direction);
        }
    }

    pub fn begin_move(&mut self, target: Point, direction: Direction) -> bool {
        !self.humping && self.entity.begin_move(target, direction)
    }

    /// Play the hump clip for the current facing once.
    /// Returns false if Sven is busy moving or already humping.
    pub fn hump(&mut self) -> bool {
        if self.humping || self.entity.is_moving() {
            return false;
        }
        self.humping = true;
        let clip = self.hump.get(self.entity.direction()).clone();
        self.entity.play(clip);
        true
    }

    pub fn update(&mut self) -> Option<SvenEvent> {
        let playback = self.entity.animate();
        if self.entity.step_movement() == Motion::Arrived {
            return Some(SvenEvent::Arrived);
        }
        if self.humping && playback == Playback::Complete {
            self.humping = false;
            return Some(SvenEvent::HumpFinished);
        }
        None
    }
}
