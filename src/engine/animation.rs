use crate::engine::Point;
use std::rc::Rc;

/// Ordered frame names inside the sprite sheet, shared between entities
pub type Clip = Rc<[String]>;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Playback {
    Stopped,
    Playing,
    /// last frame of a non looping clip was passed during this update
    Complete,
}

/// Frame sequence playback plus the display properties of a scene node
#[derive(Debug, Clone)]
pub struct AnimatedSprite {
    textures: Clip,
    current: f32,
    playing: bool,
    looping: bool,
    // frames advanced per update
    speed: f32,
    pub position: Point,
    pub alpha: f32,
    pub visible: bool,
}

impl AnimatedSprite {
    pub fn new(textures: Clip, position: Point, speed: f32) -> Self {
        AnimatedSprite {
            textures,
            current: 0.0,
            playing: false,
            looping: false,
            speed,
            position,
            alpha: 1.0,
            visible: true,
        }
    }

    /// Swapping textures stops playback on frame 0
    pub fn set_textures(&mut self, textures: Clip) {
        self.textures = textures;
        self.goto_and_stop(0);
    }

    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    pub fn goto_and_play(&mut self, frame: usize) {
        self.current = frame as f32;
        self.playing = true;
    }

    pub fn goto_and_stop(&mut self, frame: usize) {
        self.current = frame as f32;
        self.playing = false;
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn current_frame(&self) -> usize {
        let last = self.textures.len().saturating_sub(1);
        (self.current as usize).min(last)
    }

    pub fn frame_name(&self) -> Option<&str> {
        self.textures.get(self.current_frame()).map(String::as_str)
    }

    pub fn update(&mut self) -> Playback {
        if !self.playing {
            return Playback::Stopped;
        }
        let total = self.textures.len() as f32;
        self.current += self.speed;
        if self.current < total {
            return Playback::Playing;
        }
        if self.looping && total > 0.0 {
            self.current %= total;
            Playback::Playing
        } else {
            self.current = (total - 1.0).max(0.0);
            self.playing = false;
            Playback::Complete
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clip(len: usize) -> Clip {
        (0..len).map(|i| format!("frame ({}).png", i + 1)).collect()
    }

    #[test]
    fn non_looping_clip_completes_once() {
        let mut sprite = AnimatedSprite::new(clip(2), Point::default(), 0.5);
        sprite.goto_and_play(0);

        let mut completions = 0;
        for _ in 0..20 {
            if sprite.update() == Playback::Complete {
                completions += 1;
            }
        }
        assert_eq!(completions, 1);
        assert_eq!(sprite.current_frame(), 1);
        assert!(!sprite.is_playing());
    }

    #[test]
    fn completion_takes_frames_over_speed_updates() {
        let mut sprite = AnimatedSprite::new(clip(4), Point::default(), 0.25);
        sprite.goto_and_play(0);
        let updates = (1..=100)
            .find(|_| sprite.update() == Playback::Complete)
            .unwrap();
        assert_eq!(updates, 16);
    }

    #[test]
    fn looping_clip_wraps() {
        let mut sprite = AnimatedSprite::new(clip(2), Point::default(), 1.0);
        sprite.set_looping(true);
        sprite.goto_and_play(1);
        assert_eq!(sprite.update(), Playback::Playing);
        assert_eq!(sprite.frame_name(), Some("frame (1).png"));
    }

    #[test]
    fn set_textures_stops_on_first_frame() {
        let mut sprite = AnimatedSprite::new(clip(3), Point::default(), 1.0);
        sprite.goto_and_play(2);
        sprite.set_textures(clip(5));
        assert_eq!(sprite.current_frame(), 0);
        assert_eq!(sprite.update(), Playback::Stopped);
    }

    #[test]
    fn empty_clip_completes_instead_of_hanging() {
        let mut sprite = AnimatedSprite::new(clip(0), Point::default(), 0.2);
        sprite.goto_and_play(0);
        assert_eq!(sprite.update(), Playback::Complete);
        assert_eq!(sprite.frame_name(), None);
    }
}
