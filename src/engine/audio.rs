use crate::browser;
use crate::engine::tween::{Ease, Tween, TweenState};
use crate::engine::FRAME_SIZE;
use anyhow::{Context, Result};
use std::collections::HashMap;
use web_sys::HtmlAudioElement;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Sound {
    Background,
    Hump,
    PuffSmoke,
    Point,
    Win,
    Lose,
}

impl Sound {
    pub const ALL: [Sound; 6] = [
        Sound::Background,
        Sound::Hump,
        Sound::PuffSmoke,
        Sound::Point,
        Sound::Win,
        Sound::Lose,
    ];

    pub fn source(self) -> &'static str {
        match self {
            Sound::Background => "sounds/background.mp3",
            Sound::Hump => "sounds/hump.mp3",
            Sound::PuffSmoke => "sounds/puffSmoke.mp3",
            Sound::Point => "sounds/point.mp3",
            Sound::Win => "sounds/win.mp3",
            Sound::Lose => "sounds/lose.mp3",
        }
    }

    fn looping(self) -> bool {
        matches!(self, Sound::Background)
    }
}

/// Narrow view of the audio mixer the game needs
pub trait Audio {
    fn play(&mut self, sound: Sound);
    fn stop(&mut self, sound: Sound);
    fn is_playing(&self, sound: Sound) -> bool;
    /// Ramp the volume of `sound` from -> to over `duration_ms`
    fn fade(&mut self, sound: Sound, from: f32, to: f32, duration_ms: f32);
    /// One frame step, drives running fades
    fn update(&mut self) {}
}

pub struct WebAudio {
    tracks: HashMap<Sound, HtmlAudioElement>,
    fades: Vec<(Sound, Tween<f32>)>,
}

impl WebAudio {
    pub fn new() -> Result<Self> {
        let mut tracks = HashMap::new();
        for sound in Sound::ALL {
            let element = browser::create_audio_element(sound.source())
                .with_context(|| format!("Failed to prepare sound {:?}", sound))?;
            element.set_loop(sound.looping());
            tracks.insert(sound, element);
        }
        Ok(WebAudio {
            tracks,
            fades: Vec::new(),
        })
    }
}

impl Audio for WebAudio {
    fn play(&mut self, sound: Sound) {
        if let Some(track) = self.tracks.get(&sound) {
            track.set_current_time(0.0);
            // autoplay may be refused before the first user gesture
            if let Err(err) = track.play() {
                log!("Could not play {:?} : {:#?}", sound, err);
            }
        }
    }

    fn stop(&mut self, sound: Sound) {
        if let Some(track) = self.tracks.get(&sound) {
            if let Err(err) = track.pause() {
                log!("Could not stop {:?} : {:#?}", sound, err);
            }
            track.set_current_time(0.0);
        }
    }

    fn is_playing(&self, sound: Sound) -> bool {
        self.tracks
            .get(&sound)
            .map(|track| !track.paused() && !track.ended())
            .unwrap_or(false)
    }

    fn fade(&mut self, sound: Sound, from: f32, to: f32, duration_ms: f32) {
        self.fades.retain(|(fading, _)| *fading != sound);
        if let Some(track) = self.tracks.get(&sound) {
            track.set_volume(from.into());
        }
        self.fades
            .push((sound, Tween::new(from, to, duration_ms, Ease::Linear)));
    }

    fn update(&mut self) {
        let tracks = &self.tracks;
        self.fades.retain_mut(|(sound, tween)| {
            let state = tween.update(FRAME_SIZE);
            if let Some(track) = tracks.get(&*sound) {
                track.set_volume(state.value().clamp(0.0, 1.0).into());
            }
            matches!(state, TweenState::InProgress(_))
        });
    }
}
