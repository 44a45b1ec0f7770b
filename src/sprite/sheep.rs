use crate::engine::animation::{AnimatedSprite, Clip, Playback};
use crate::engine::tween::{Ease, Tween, TweenState};
use crate::engine::{Point, FRAME_SIZE};
use crate::level::Rules;
use crate::map::{Direction, TilePos};
use crate::sprite::{Entity, SheepClips};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct SheepId(pub u32);

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SheepEvent {
    /// blinking is over, the disappear clip started
    Blinked,
    /// disappear clip finished, the sheep can leave the herd
    Vanished,
}

/// Removal pipeline : Grazing -> Blinking -> Vanishing -> Gone
#[derive(Debug, Clone)]
enum Removal {
    Grazing,
    Blinking(Tween<f32>),
    Vanishing,
    Gone,
}

pub struct Sheep {
    id: SheepId,
    // grid cell, the sprite may lag behind it during a tween
    pos: TilePos,
    entity: Entity,
    humped_count: u8,
    disappear: Clip,
    removal: Removal,
}

impl Sheep {
    pub fn new(
        id: SheepId,
        clips: SheepClips,
        pos: TilePos,
        position: Point,
        direction: Direction,
        rules: &Rules,
    ) -> Self {
        Sheep {
            id,
            pos,
            entity: Entity::new(clips.entity, position, direction, rules),
            humped_count: 0,
            disappear: clips.disappear,
            removal: Removal::Grazing,
        }
    }

    pub fn id(&self) -> SheepId {
        self.id
    }

    pub fn pos(&self) -> TilePos {
        self.pos
    }

    pub fn direction(&self) -> Direction {
        self.entity.direction()
    }

    pub fn humped_count(&self) -> u8 {
        self.humped_count
    }

    pub fn sprite(&self) -> &AnimatedSprite {
        self.entity.sprite()
    }

    pub fn is_visible(&self) -> bool {
        self.entity.sprite().visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.entity.sprite_mut().visible = visible;
    }

    /// Count one hump, returns the new total
    pub fn humped(&mut self) -> u8 {
        self.humped_count = self.humped_count.saturating_add(1);
        self.humped_count
    }

    pub fn is_removing(&self) -> bool {
        !matches!(self.removal, Removal::Grazing)
    }

    /// Start blinking. Only the first call has an effect.
    pub fn start_removal(&mut self, rules: &Rules) -> bool {
        if self.is_removing() {
            return false;
        }
        let blink = Tween::new(
            self.entity.sprite().alpha,
            rules.blink_alpha,
            rules.blink_leg_ms,
            Ease::QuadOut,
        )
        .with_repeat(rules.blink_repeat)
        .with_yoyo(true);
        self.removal = Removal::Blinking(blink);
        true
    }

    pub fn update(&mut self) -> Option<SheepEvent> {
        let playback = self.entity.animate();
        match &mut self.removal {
            Removal::Grazing | Removal::Gone => None,
            Removal::Blinking(blink) => {
                let state = blink.update(FRAME_SIZE);
                self.entity.sprite_mut().alpha = state.value();
                if let TweenState::InProgress(_) = state {
                    return None;
                }
                self.removal = Removal::Vanishing;
                self.entity.play(self.disappear.clone());
                Some(SheepEvent::Blinked)
            }
            Removal::Vanishing => {
                if playback != Playback::Complete {
                    return None;
                }
                self.removal = Removal::Gone;
                Some(SheepEvent::Vanished)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sheep() -> Sheep {
        Sheep::new(
            SheepId(7),
            SheepClips::default(),
            TilePos::new(1, 2),
            Point { x: 120.0, y: 60.0 },
            Direction::Down,
            &Rules::default(),
        )
    }

    #[test]
    fn grazing_sheep_reports_nothing() {
        let mut sheep = sheep();
        assert!((0..500).all(|_| sheep.update().is_none()));
        assert!(!sheep.is_removing());
    }

    #[test]
    fn removal_runs_blink_then_disappear_in_order() {
        let rules = Rules::default();
        let mut sheep = sheep();
        assert!(sheep.start_removal(&rules));
        assert!(!sheep.start_removal(&rules));

        let events: Vec<(usize, SheepEvent)> = (0..1000)
            .filter_map(|tick| sheep.update().map(|event| (tick, event)))
            .collect();
        let kinds: Vec<SheepEvent> = events.iter().map(|(_, event)| *event).collect();
        assert_eq!(kinds, vec![SheepEvent::Blinked, SheepEvent::Vanished]);

        // four 500ms legs of blinking, then six frames at 0.2 per update
        let (blinked_at, _) = events[0];
        let (vanished_at, _) = events[1];
        assert!((119..=121).contains(&blinked_at), "blinked at {}", blinked_at);
        assert!((30..=31).contains(&(vanished_at - blinked_at)));
        assert_relative_eq!(sheep.sprite().alpha, 1.0);
        assert_eq!(sheep.sprite().frame_name(), Some("sheepDisappear (6).png"));
    }

    #[test]
    fn blinking_dims_the_sprite() {
        let mut sheep = sheep();
        sheep.start_removal(&Rules::default());
        for _ in 0..30 {
            sheep.update();
        }
        assert!(sheep.sprite().alpha < 0.5);
    }

    #[test]
    fn humped_counts_up() {
        let mut sheep = sheep();
        assert_eq!(sheep.humped(), 1);
        assert_eq!(sheep.humped(), 2);
        assert_eq!(sheep.humped_count(), 2);
    }
}
