// Score, countdown and end of game overlay

#[derive(Debug, Default, Clone)]
pub struct ScoreBoard {
    value: u32,
}

impl ScoreBoard {
    pub fn new() -> Self {
        ScoreBoard::default()
    }

    pub fn update(&mut self, amount: u32) {
        self.value = self.value.saturating_add(amount);
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn text(&self) -> String {
        format!("Score: {}", self.value)
    }
}

/// Countdown that reports its expiry exactly once
#[derive(Debug, Default, Clone)]
pub struct Timer {
    remaining_ms: f32,
    running: bool,
    expired: bool,
}

impl Timer {
    pub fn new() -> Self {
        Timer::default()
    }

    pub fn start(&mut self, duration_ms: f32) {
        self.remaining_ms = duration_ms.max(0.0);
        self.running = true;
        self.expired = false;
    }

    /// true on the single update where the countdown hits zero
    pub fn update(&mut self, dt: f32) -> bool {
        if !self.running || self.expired {
            return false;
        }
        self.remaining_ms = (self.remaining_ms - dt).max(0.0);
        if self.remaining_ms > 0.0 {
            return false;
        }
        self.expired = true;
        self.running = false;
        true
    }

    pub fn is_expired(&self) -> bool {
        self.expired
    }

    pub fn remaining_secs(&self) -> u32 {
        (self.remaining_ms / 1000.0).ceil() as u32
    }

    pub fn text(&self) -> String {
        format!("Time: {}", self.remaining_secs())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub score: u32,
    pub win: bool,
}

#[derive(Debug, Default, Clone)]
pub struct EndScreen {
    outcome: Option<Outcome>,
}

impl EndScreen {
    pub fn new() -> Self {
        EndScreen::default()
    }

    pub fn show(&mut self, score: u32, win: bool) {
        self.outcome = Some(Outcome { score, win });
    }

    pub fn is_shown(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn headline(&self) -> Option<&'static str> {
        self.outcome.map(|outcome| {
            if outcome.win {
                "The herd is happy!"
            } else {
                "Time's up!"
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_is_additive() {
        let mut score = ScoreBoard::new();
        score.update(3);
        score.update(3);
        assert_eq!(score.value(), 6);
        assert_eq!(score.text(), "Score: 6");
    }

    #[test]
    fn timer_fires_once() {
        let mut timer = Timer::new();
        timer.start(1000.0);
        assert_eq!(timer.remaining_secs(), 1);

        let fired: Vec<bool> = (0..10).map(|_| timer.update(400.0)).collect();
        assert_eq!(fired.iter().filter(|fired| **fired).count(), 1);
        assert!(fired[2]);
        assert!(timer.is_expired());
        assert_eq!(timer.text(), "Time: 0");
    }

    #[test]
    fn timer_rounds_seconds_up() {
        let mut timer = Timer::new();
        timer.start(2500.0);
        timer.update(1000.0);
        assert_eq!(timer.remaining_secs(), 2);
    }

    #[test]
    fn idle_timer_never_fires() {
        let mut timer = Timer::new();
        assert!(!timer.update(10_000.0));
    }

    #[test]
    fn end_screen_shows_outcome() {
        let mut screen = EndScreen::new();
        assert!(!screen.is_shown());
        screen.show(12, false);
        assert_eq!(screen.outcome(), Some(Outcome { score: 12, win: false }));
        assert_eq!(screen.headline(), Some("Time's up!"));
    }
}
