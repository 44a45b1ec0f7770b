use crate::browser;
use crate::engine::{self, Game, Image, Point, Rect, Renderer, Sheet, Size, FRAME_SIZE};
use crate::engine::animation::AnimatedSprite;
use crate::engine::audio::{Audio, Sound, WebAudio};
use crate::engine::input::{KeyPress, PressedKeys};
use crate::hud::{EndScreen, ScoreBoard, Timer};
use crate::level::{LevelConfig, Rules};
use crate::map::{Direction, Map, TileId, TilePos};
use crate::sprite::{Sheep, SheepEvent, SheepId, Sven, SvenEvent};
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use futures::join;
use web_sys::HtmlImageElement;

/// ┌──────────────────────── Input / Action Flow ─────────────────────────┐
/// │                                                                      │
/// │  keydown ──► PressedKeys ──► sven_action ──┬─► sven_move  (Moving)   │
/// │  keyup   ──► PressedKeys                   ├─► sven_hump  (Humping)  │
/// │                                            └─► stand_still (Idle)    │
/// │                                                                      │
/// │  update ──► Sven::update ──► Arrived      ──► grid write, sven_action│
/// │                          └─► HumpFinished ──► count hit, sven_action │
/// │         ──► Sheep::update ─► Blinked / Vanished (removal pipeline)   │
/// │         ──► Timer::update ─► on_end (once)                           │
/// └──────────────────────────────────────────────────────────────────────┘
pub enum SvenGame {
    /// Resources are being fetched
    Loading,
    Loaded(Box<Scene>),
}

impl SvenGame {
    const SHEET_PATH: &'static str = "sheet.json";
    const IMAGE_PATH: &'static str = "sheet.png";
    const BACKGROUND_PATH: &'static str = "background.png";
    const LEVEL_PATH: &'static str = "level.json";

    pub fn new() -> Self {
        SvenGame::Loading
    }

    async fn load_sprite_sheet() -> Result<Sheet> {
        browser::fetch_json::<Sheet>(Self::SHEET_PATH)
            .await
            .with_context(|| format!("Failed to load sprite sheet from : {}", Self::SHEET_PATH))
    }

    async fn load_sprite_image() -> Result<HtmlImageElement> {
        engine::load_image(Self::IMAGE_PATH).await.with_context(|| {
            format!(
                "Failed to load sprite image resource from : {}",
                Self::IMAGE_PATH
            )
        })
    }

    async fn load_background() -> Result<HtmlImageElement> {
        engine::load_image(Self::BACKGROUND_PATH)
            .await
            .with_context(|| format!("Failed to load background from : {}", Self::BACKGROUND_PATH))
    }

    /// A missing or broken level file is not fatal, the built in level is used
    async fn load_level() -> LevelConfig {
        let level = browser::fetch_json::<LevelConfig>(Self::LEVEL_PATH)
            .await
            .and_then(|level| level.validate().map(|_| level));
        match level {
            Ok(level) => level,
            Err(err) => {
                log!("Using the built in level, {} unusable : {:#}", Self::LEVEL_PATH, err);
                LevelConfig::default()
            }
        }
    }
}

impl Default for SvenGame {
    fn default() -> Self {
        SvenGame::new()
    }
}

#[async_trait(?Send)]
impl Game for SvenGame {
    async fn initialize(&self) -> Result<Box<dyn Game>> {
        match self {
            SvenGame::Loading => {
                let (sheet, image, background, level) = join!(
                    Self::load_sprite_sheet(),
                    Self::load_sprite_image(),
                    Self::load_background(),
                    Self::load_level(),
                );
                let audio = WebAudio::new()?;
                let mut herding = Herding::new(level, Box::new(audio))?;
                herding.start();
                Ok(Box::new(SvenGame::Loaded(Box::new(Scene {
                    herding,
                    sheet: sheet?,
                    image: image?,
                    background: Image::new(background?, Point::default()),
                }))))
            }
            SvenGame::Loaded(_) => Err(anyhow!("Game is already initialized")),
        }
    }

    fn on_key(&mut self, key: &KeyPress) {
        if let SvenGame::Loaded(scene) = self {
            match key {
                KeyPress::KeyDown(code) => {
                    // browsers hold back audio until the first user gesture
                    scene.herding.resume_music();
                    scene.herding.on_key_down(code);
                }
                KeyPress::KeyUp(code) => scene.herding.on_key_up(code),
            }
        }
    }

    fn update(&mut self) {
        if let SvenGame::Loaded(scene) = self {
            scene.herding.update();
        }
    }

    fn draw(&self, renderer: &Renderer) {
        if let SvenGame::Loaded(scene) = self {
            scene.draw(renderer);
        }
    }
}

/// Loaded assets plus the running game
pub struct Scene {
    herding: Herding,
    sheet: Sheet,
    image: HtmlImageElement,
    background: Image,
}

impl Scene {
    const CANVAS: Size = Size {
        width: 600.0,
        height: 600.0,
    };
    const FONT: &'static str = "bold 28px sans-serif";
    const TEXT_COLOR: &'static str = "#ffffff";

    fn draw(&self, renderer: &Renderer) {
        renderer.clear(&Rect::new(Point::default(), Self::CANVAS));
        // back to front : background, herd, Sven, hud, end screen
        self.background.draw(renderer);
        for sheep in self.herding.herd() {
            self.draw_actor(renderer, sheep.sprite());
        }
        self.draw_actor(renderer, self.herding.sven().sprite());

        let hud = &self.herding;
        renderer.draw_text(
            &hud.score_board().text(),
            &Point { x: 20.0, y: 40.0 },
            Self::FONT,
            Self::TEXT_COLOR,
        );
        renderer.draw_text(
            &hud.timer().text(),
            &Point { x: 440.0, y: 40.0 },
            Self::FONT,
            Self::TEXT_COLOR,
        );

        let end_screen = hud.end_screen();
        if let (Some(outcome), Some(headline)) = (end_screen.outcome(), end_screen.headline()) {
            renderer.fill_rect(&Rect::new(Point::default(), Self::CANVAS), "#000000", 0.7);
            renderer.draw_text(
                headline,
                &Point { x: 160.0, y: 280.0 },
                Self::FONT,
                Self::TEXT_COLOR,
            );
            renderer.draw_text(
                &format!("Final score: {}", outcome.score),
                &Point { x: 190.0, y: 330.0 },
                Self::FONT,
                Self::TEXT_COLOR,
            );
        }
    }

    fn draw_actor(&self, renderer: &Renderer, sprite: &AnimatedSprite) {
        if !sprite.visible {
            return;
        }
        if let Some(frame_name) = sprite.frame_name() {
            renderer.draw_frame(&self.image, &self.sheet, frame_name, &sprite.position, sprite.alpha);
        }
    }
}

/// The key that triggers a hump
pub const ACTION_KEY: &str = "Space";

/// What Sven is busy with. Moves and humps always run to completion.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Turn {
    Idle,
    Moving { from: TilePos, to: TilePos },
    Humping { sheep: SheepId },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Phase {
    Playing,
    Ended,
}

/// Game rules and state, free of any browser type so it runs under native
/// tests. Rendering reads it through the accessors.
pub struct Herding {
    map: Map,
    rules: Rules,
    sven: Sven,
    herd: Vec<Sheep>,
    keys: PressedKeys,
    score_board: ScoreBoard,
    timer: Timer,
    end_screen: EndScreen,
    audio: Box<dyn Audio>,
    turn: Turn,
    phase: Phase,
}

impl Herding {
    pub fn new(level: LevelConfig, audio: Box<dyn Audio>) -> Result<Self> {
        Self::with_facing(level, audio, Direction::random)
    }

    /// `facing` picks the initial direction of Sven, then of every sheep in
    /// row major order
    pub fn with_facing(
        level: LevelConfig,
        audio: Box<dyn Audio>,
        mut facing: impl FnMut() -> Direction,
    ) -> Result<Self> {
        level.validate()?;
        let map = level.map();

        let sven_pos = map
            .sven_pos()
            .ok_or_else(|| anyhow!("level has no Sven tile"))?;
        let sven = Sven::new(
            level.sven.clone(),
            map.coords_from_pos(sven_pos),
            facing(),
            &level.rules,
        );

        let herd = map
            .pos_by_id(TileId::Sheep)
            .into_iter()
            .zip(0..)
            .map(|(pos, id)| {
                Sheep::new(
                    SheepId(id),
                    level.sheep.clone(),
                    pos,
                    map.coords_from_pos(pos),
                    facing(),
                    &level.rules,
                )
            })
            .collect();

        Ok(Herding {
            map,
            rules: level.rules,
            sven,
            herd,
            keys: PressedKeys::new(),
            score_board: ScoreBoard::new(),
            timer: Timer::new(),
            end_screen: EndScreen::new(),
            audio,
            turn: Turn::Idle,
            phase: Phase::Playing,
        })
    }

    /// Start the countdown and the background loop
    pub fn start(&mut self) {
        self.timer.start(self.rules.time_limit_ms);
        self.audio.play(Sound::Background);
    }

    pub fn resume_music(&mut self) {
        if self.phase == Phase::Playing && !self.audio.is_playing(Sound::Background) {
            self.audio.play(Sound::Background);
        }
    }

    pub fn map(&self) -> &Map {
        &self.map
    }

    pub fn sven(&self) -> &Sven {
        &self.sven
    }

    pub fn herd(&self) -> &[Sheep] {
        &self.herd
    }

    pub fn pressed_keys(&self) -> &PressedKeys {
        &self.keys
    }

    pub fn score_board(&self) -> &ScoreBoard {
        &self.score_board
    }

    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    pub fn end_screen(&self) -> &EndScreen {
        &self.end_screen
    }

    pub fn turn(&self) -> Turn {
        self.turn
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn on_key_down(&mut self, code: &str) {
        // held keys repeat keydown, only the first one counts
        if !self.keys.press(code) {
            return;
        }
        self.sven_action();
    }

    pub fn on_key_up(&mut self, code: &str) {
        self.keys.release(code);
    }

    /// Pick Sven's next action from the held keys
    pub fn sven_action(&mut self) {
        if self.phase == Phase::Ended {
            return;
        }
        // never interrupt Sven's movement or hump
        if self.sven.is_moving() || self.sven.is_humping() {
            return;
        }

        if let Some(direction) = self.keys.find(Direction::from_key) {
            return self.sven_move(direction);
        }

        if self.keys.is_pressed(ACTION_KEY) {
            return self.sven_hump();
        }

        self.sven.stand_still();
    }

    fn sven_move(&mut self, direction: Direction) {
        let Some(old_pos) = self.map.sven_pos() else {
            return self.sven.stand_facing(direction);
        };
        let new_pos = self.map.get_destination(old_pos, direction);

        if self.map.out_of_bounds(new_pos) || self.map.collide(new_pos) {
            return self.sven.stand_facing(direction);
        }

        // the grid is only written once the move has completed
        let target = self.map.coords_from_pos(new_pos);
        if self.sven.begin_move(target, direction) {
            self.turn = Turn::Moving {
                from: old_pos,
                to: new_pos,
            };
        }
    }

    fn sven_hump(&mut self) {
        let direction = self.sven.direction();
        let Some(sven_pos) = self.map.sven_pos() else {
            return self.sven.stand_still();
        };
        let target_pos = self.map.get_destination(sven_pos, direction);

        if self.map.get_tile(target_pos) != Some(TileId::Sheep) {
            return self.sven.stand_still();
        }

        let Some(sheep) = self.herd.iter_mut().find(|sheep| sheep.pos() == target_pos) else {
            return self.sven.stand_still();
        };

        // only from behind
        if sheep.direction() != direction {
            return self.sven.stand_still();
        }

        if self.sven.is_humping() {
            return self.sven.stand_still();
        }

        if sheep.humped_count() >= self.rules.humps_to_remove {
            return self.sven.stand_still();
        }

        if !self.sven.hump() {
            return self.sven.stand_still();
        }

        // Sven's hump clip draws both of them
        sheep.set_visible(false);
        self.turn = Turn::Humping { sheep: sheep.id() };
        self.score_board.update(self.rules.hump_score);
        if !self.audio.is_playing(Sound::Hump) {
            self.audio.play(Sound::Hump);
        }
    }

    pub fn update(&mut self) {
        self.audio.update();

        match self.sven.update() {
            Some(SvenEvent::Arrived) => self.on_arrived(),
            Some(SvenEvent::HumpFinished) => self.on_hump_finished(),
            None => {}
        }

        let mut vanished = Vec::new();
        for sheep in self.herd.iter_mut() {
            match sheep.update() {
                Some(SheepEvent::Blinked) => self.audio.play(Sound::PuffSmoke),
                Some(SheepEvent::Vanished) => vanished.push(sheep.id()),
                None => {}
            }
        }
        for id in vanished {
            self.clear_sheep(id);
        }

        if self.phase == Phase::Playing && self.timer.update(FRAME_SIZE) {
            self.on_end();
        }
    }

    fn on_arrived(&mut self) {
        if let Turn::Moving { from, to } = self.turn {
            self.map.set_tile_on_map(from, TileId::Empty);
            self.map.set_tile_on_map(to, TileId::Sven);
        }
        self.turn = Turn::Idle;
        // pick up keys pressed during the move
        self.sven_action();
    }

    fn on_hump_finished(&mut self) {
        let mut worn_out = None;
        if let Turn::Humping { sheep: id } = self.turn {
            if let Some(sheep) = self.herd.iter_mut().find(|sheep| sheep.id() == id) {
                let humped_count = sheep.humped();
                sheep.set_visible(true);
                if humped_count >= self.rules.humps_to_remove {
                    worn_out = Some(id);
                }
            }
        }
        self.turn = Turn::Idle;
        self.sven.stand_still();
        if let Some(id) = worn_out {
            self.remove_sheep(id);
        }
        self.sven_action();
    }

    /// Blink -> disappear -> leave the herd. Runs on its own from here, see
    /// `update`. The sheep keeps its cell until the last stage.
    fn remove_sheep(&mut self, id: SheepId) {
        if let Some(sheep) = self.herd.iter_mut().find(|sheep| sheep.id() == id) {
            sheep.start_removal(&self.rules);
        }
    }

    /// Last stage of the removal pipeline : the sheep leaves the herd, the
    /// scene and the grid together
    fn clear_sheep(&mut self, id: SheepId) {
        self.audio.play(Sound::Point);
        if let Some(index) = self.herd.iter().position(|sheep| sheep.id() == id) {
            let sheep = self.herd.remove(index);
            self.map.set_tile_on_map(sheep.pos(), TileId::Empty);
            log!("Sheep {} left the herd, {} to go", id.0, self.herd.len());
        }
    }

    fn on_end(&mut self) {
        if self.phase == Phase::Ended {
            return;
        }
        self.phase = Phase::Ended;

        let score = self.score_board.value();
        let win = self.herd.is_empty();

        self.audio.play(if win { Sound::Win } else { Sound::Lose });
        self.audio
            .fade(Sound::Background, 1.0, 0.0, self.rules.fade_out_ms);
        self.end_screen.show(score, win);
        log!(
            "Game over, {} with {} points",
            if win { "won" } else { "lost" },
            score
        );
    }
}
