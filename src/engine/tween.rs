//! Property tweening : interpolate a value from -> to over a duration.
//!
//! Tweens are advanced explicitly by the owner with `update(dt)` and report
//! completion through the returned `TweenState`, there are no callbacks.

use crate::engine::Point;

pub trait Lerp: Copy {
    fn lerp(from: Self, to: Self, t: f32) -> Self;
}

impl Lerp for f32 {
    fn lerp(from: Self, to: Self, t: f32) -> Self {
        from + (to - from) * t
    }
}

impl Lerp for Point {
    fn lerp(from: Self, to: Self, t: f32) -> Self {
        Point {
            x: f32::lerp(from.x, to.x, t),
            y: f32::lerp(from.y, to.y, t),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Ease {
    Linear,
    /// decelerating quadratic, `power1.out` in most tween libraries
    QuadOut,
}

impl Ease {
    pub fn apply(self, t: f32) -> f32 {
        match self {
            Ease::Linear => t,
            Ease::QuadOut => 1.0 - (1.0 - t) * (1.0 - t),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum TweenState<T> {
    InProgress(T),
    Done(T),
}

impl<T: Copy> TweenState<T> {
    pub fn value(&self) -> T {
        match self {
            TweenState::InProgress(value) | TweenState::Done(value) => *value,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Tween<T: Lerp> {
    from: T,
    to: T,
    duration: f32,
    elapsed: f32,
    ease: Ease,
    // extra legs after the first one
    repeat: u32,
    yoyo: bool,
    leg: u32,
}

impl<T: Lerp> Tween<T> {
    pub fn new(from: T, to: T, duration_ms: f32, ease: Ease) -> Self {
        Tween {
            from,
            to,
            duration: duration_ms.max(0.0),
            elapsed: 0.0,
            ease,
            repeat: 0,
            yoyo: false,
            leg: 0,
        }
    }

    pub fn with_repeat(mut self, repeat: u32) -> Self {
        self.repeat = repeat;
        self
    }

    /// odd legs play backwards
    pub fn with_yoyo(mut self, yoyo: bool) -> Self {
        self.yoyo = yoyo;
        self
    }

    /// Total run time including repeats
    pub fn total_duration(&self) -> f32 {
        self.duration * (self.repeat + 1) as f32
    }

    pub fn update(&mut self, dt: f32) -> TweenState<T> {
        // zero length legs all finish at once
        if self.duration == 0.0 {
            self.leg = self.repeat;
            return TweenState::Done(self.value_at(1.0));
        }
        self.elapsed += dt;
        while self.elapsed >= self.duration && self.leg < self.repeat {
            self.elapsed -= self.duration;
            self.leg += 1;
        }
        if self.leg >= self.repeat && self.elapsed >= self.duration {
            self.elapsed = self.duration;
            return TweenState::Done(self.value_at(1.0));
        }
        let t = self.elapsed / self.duration;
        TweenState::InProgress(self.value_at(t))
    }

    fn value_at(&self, t: f32) -> T {
        let t = t.clamp(0.0, 1.0);
        let t = if self.yoyo && self.leg % 2 == 1 {
            1.0 - t
        } else {
            t
        };
        T::lerp(self.from, self.to, self.ease.apply(t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn linear_tween_reaches_target_after_duration() {
        let mut tween = Tween::new(0.0_f32, 100.0, 500.0, Ease::Linear);
        assert_eq!(tween.update(250.0), TweenState::InProgress(50.0));
        assert_eq!(tween.update(250.0), TweenState::Done(100.0));
    }

    #[test]
    fn point_tween_interpolates_both_axes() {
        let mut tween = Tween::new(
            Point { x: 0.0, y: 60.0 },
            Point { x: 60.0, y: 0.0 },
            100.0,
            Ease::Linear,
        );
        let halfway = tween.update(50.0).value();
        assert_relative_eq!(halfway.x, 30.0);
        assert_relative_eq!(halfway.y, 30.0);
    }

    #[test]
    fn yoyo_with_odd_repeat_ends_where_it_started() {
        let mut tween = Tween::new(1.0_f32, 0.4, 500.0, Ease::QuadOut)
            .with_repeat(3)
            .with_yoyo(true);
        assert_relative_eq!(tween.total_duration(), 2000.0);

        // end of first leg : at target
        assert_relative_eq!(tween.update(499.0).value(), 0.4, epsilon = 0.01);
        // next legs go back and forth
        assert!(matches!(tween.update(1000.0), TweenState::InProgress(_)));
        match tween.update(501.0) {
            TweenState::Done(alpha) => assert_relative_eq!(alpha, 1.0),
            state => panic!("expected done, got {:?}", state),
        }
    }

    #[test]
    fn zero_duration_is_done_immediately() {
        let mut tween = Tween::new(3.0_f32, 7.0, 0.0, Ease::Linear);
        assert_eq!(tween.update(0.0), TweenState::Done(7.0));
    }

    #[test]
    fn zero_duration_with_repeats_still_finishes() {
        let mut tween = Tween::new(1.0_f32, 0.4, 0.0, Ease::QuadOut)
            .with_repeat(3)
            .with_yoyo(true);
        match tween.update(16.0) {
            TweenState::Done(alpha) => assert_relative_eq!(alpha, 1.0),
            state => panic!("expected done, got {:?}", state),
        }
    }

    #[test]
    fn quad_out_is_ahead_of_linear() {
        assert!(Ease::QuadOut.apply(0.5) > Ease::Linear.apply(0.5));
        assert_relative_eq!(Ease::QuadOut.apply(1.0), 1.0);
    }
}
