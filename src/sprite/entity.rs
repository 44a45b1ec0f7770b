use crate::engine::animation::{AnimatedSprite, Clip, Playback};
use crate::engine::tween::{Ease, Tween, TweenState};
use crate::engine::{Point, FRAME_SIZE};
use crate::level::Rules;
use crate::map::Direction;
use crate::sprite::EntityClips;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Motion {
    Still,
    Moving,
    /// the movement tween finished during this update
    Arrived,
}

/// Animated actor on the grid : facing, stand/walk clips and at most one
/// movement tween in flight
#[derive(Debug, Clone)]
pub struct Entity {
    clips: EntityClips,
    direction: Direction,
    sprite: AnimatedSprite,
    movement: Option<Tween<Point>>,
    move_duration: f32,
}

impl Entity {
    pub fn new(clips: EntityClips, position: Point, direction: Direction, rules: &Rules) -> Self {
        let sprite = AnimatedSprite::new(
            clips.stand.get(direction).clone(),
            position,
            rules.animation_speed,
        );
        Entity {
            clips,
            direction,
            sprite,
            movement: None,
            move_duration: rules.move_duration_ms,
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn is_moving(&self) -> bool {
        self.movement.is_some()
    }

    pub fn position(&self) -> Point {
        self.sprite.position
    }

    pub fn sprite(&self) -> &AnimatedSprite {
        &self.sprite
    }

    pub fn sprite_mut(&mut self) -> &mut AnimatedSprite {
        &mut self.sprite
    }

    pub fn stand_still(&mut self) {
        self.stand_facing(self.direction);
    }

    /// Freeze on the first stand frame. A move in flight is never interrupted.
    pub fn stand_facing(&mut self, direction: Direction) {
        if self.is_moving() {
            return;
        }
        self.direction = direction;
        self.sprite.set_textures(self.clips.stand.get(direction).clone());
        self.sprite.goto_and_stop(0);
    }

    /// Walk towards `target`. Refused while another move is in flight.
    pub fn begin_move(&mut self, target: Point, direction: Direction) -> bool {
        if self.is_moving() {
            return false;
        }
        self.direction = direction;
        self.play(self.clips.walk.get(direction).clone());
        self.movement = Some(Tween::new(
            self.sprite.position,
            target,
            self.move_duration,
            Ease::Linear,
        ));
        true
    }

    pub fn play(&mut self, clip: Clip) {
        self.sprite.set_textures(clip);
        self.sprite.goto_and_play(0);
    }

    pub fn animate(&mut self) -> Playback {
        self.sprite.update()
    }

    pub fn step_movement(&mut self) -> Motion {
        let Some(tween) = self.movement.as_mut() else {
            return Motion::Still;
        };
        match tween.update(FRAME_SIZE) {
            TweenState::InProgress(position) => {
                self.sprite.position = position;
                Motion::Moving
            }
            TweenState::Done(position) => {
                self.sprite.position = position;
                self.movement = None;
                Motion::Arrived
            }
        }
    }
}
