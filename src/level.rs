//! Level configuration : grid layout, tile geometry, gameplay tuning and the
//! clip lists of every actor. Loaded from `level.json`, every field optional.

use crate::engine::{Point, Size};
use crate::map::{Map, TileId};
use crate::sprite::{SheepClips, SvenClips};
use anyhow::{anyhow, ensure, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

// '.' empty  '#' wall  '@' sven  's' sheep
const DEFAULT_LAYOUT: &str = "
##########
#..s.....#
#.....s..#
#.s......#
#...@..s.#
#......s.#
#.s......#
#.....s..#
##########
";

static DEFAULT_TILES: Lazy<Vec<Vec<TileId>>> = Lazy::new(|| {
    // the built in layout only uses known glyphs
    parse_layout(DEFAULT_LAYOUT).unwrap_or_default()
});

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Rules {
    pub hump_score: u32,
    pub humps_to_remove: u8,
    pub time_limit_ms: f32,
    pub move_duration_ms: f32,
    /// frames advanced per update, 0.2 plays 12 frames a second
    pub animation_speed: f32,
    pub blink_alpha: f32,
    pub blink_leg_ms: f32,
    pub blink_repeat: u32,
    pub fade_out_ms: f32,
}

impl Default for Rules {
    fn default() -> Self {
        Rules {
            hump_score: 3,
            humps_to_remove: 4,
            time_limit_ms: 60_000.0,
            move_duration_ms: 500.0,
            animation_speed: 0.2,
            blink_alpha: 0.4,
            blink_leg_ms: 500.0,
            blink_repeat: 3,
            fade_out_ms: 200.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LevelConfig {
    pub tiles: Vec<Vec<TileId>>,
    pub tile_size: Size,
    /// pixel position of the top left cell
    pub origin: Point,
    pub rules: Rules,
    pub sven: SvenClips,
    pub sheep: SheepClips,
}

impl Default for LevelConfig {
    fn default() -> Self {
        LevelConfig::with_tiles(DEFAULT_TILES.clone())
    }
}

impl LevelConfig {
    /// Default geometry, rules and clips around a custom grid
    pub fn with_tiles(tiles: Vec<Vec<TileId>>) -> Self {
        LevelConfig {
            tiles,
            tile_size: Size {
                width: 60.0,
                height: 60.0,
            },
            origin: Point { x: 0.0, y: 60.0 },
            rules: Rules::default(),
            sven: SvenClips::default(),
            sheep: SheepClips::default(),
        }
    }

    pub fn from_layout(layout: &str) -> Result<Self> {
        let level = LevelConfig::with_tiles(parse_layout(layout)?);
        level.validate()?;
        Ok(level)
    }

    pub fn validate(&self) -> Result<()> {
        let cols = self.tiles.first().map(Vec::len).unwrap_or(0);
        ensure!(cols > 0, "level has no tiles");
        if let Some(row) = self.tiles.iter().position(|row| row.len() != cols) {
            return Err(anyhow!(
                "level row {} has {} tiles, expected {}",
                row,
                self.tiles[row].len(),
                cols
            ));
        }
        let svens = self.tiles.iter().flatten().filter(|tile| **tile == TileId::Sven).count();
        ensure!(svens == 1, "level needs exactly one Sven tile, found {}", svens);
        ensure!(
            self.tile_size.width > 0.0 && self.tile_size.height > 0.0,
            "tile size must be positive"
        );
        ensure!(self.rules.humps_to_remove > 0, "humpsToRemove must be at least 1");
        ensure!(self.rules.animation_speed > 0.0, "animationSpeed must be positive");
        ensure!(self.rules.move_duration_ms >= 0.0, "moveDurationMs must not be negative");
        ensure!(self.rules.blink_leg_ms > 0.0, "blinkLegMs must be positive");
        Ok(())
    }

    pub fn map(&self) -> Map {
        Map::new(self.tiles.clone(), self.tile_size, self.origin)
    }
}

fn parse_layout(layout: &str) -> Result<Vec<Vec<TileId>>> {
    layout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| line.chars().map(tile_from_glyph).collect::<Result<Vec<_>>>())
        .collect()
}

fn tile_from_glyph(glyph: char) -> Result<TileId> {
    match glyph {
        '.' => Ok(TileId::Empty),
        '#' => Ok(TileId::Wall),
        '@' => Ok(TileId::Sven),
        's' => Ok(TileId::Sheep),
        other => Err(anyhow!("unknown tile glyph '{}'", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::TilePos;

    #[test]
    fn default_level_is_valid() {
        let level = LevelConfig::default();
        level.validate().unwrap();
        let map = level.map();
        assert_eq!((map.rows(), map.cols()), (9, 10));
        assert_eq!(map.pos_by_id(TileId::Sheep).len(), 7);
        assert_eq!(map.sven_pos(), Some(TilePos::new(4, 4)));
    }

    #[test]
    fn layout_needs_exactly_one_sven() {
        assert!(LevelConfig::from_layout("..s\n...").is_err());
        assert!(LevelConfig::from_layout("@.@\n...").is_err());
        assert!(LevelConfig::from_layout(".@s\n...").is_ok());
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let err = LevelConfig::from_layout("@..\n..").unwrap_err();
        assert!(err.to_string().contains("row 1"), "{}", err);
    }

    #[test]
    fn unknown_glyphs_are_rejected() {
        assert!(LevelConfig::from_layout("@x.").is_err());
    }

    #[test]
    fn rules_that_never_finish_an_action_are_rejected() {
        let stalled = |tweak: fn(&mut Rules)| {
            let mut level = LevelConfig::default();
            tweak(&mut level.rules);
            level.validate().unwrap_err().to_string()
        };
        assert!(stalled(|rules| rules.animation_speed = 0.0).contains("animationSpeed"));
        assert!(stalled(|rules| rules.move_duration_ms = -1.0).contains("moveDurationMs"));
        assert!(stalled(|rules| rules.blink_leg_ms = 0.0).contains("blinkLegMs"));

        let mut instant = LevelConfig::default();
        instant.rules.move_duration_ms = 0.0;
        instant.validate().unwrap();
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let json = r#"{
            "tiles": [[1, 0, 2], [3, 0, 0]],
            "rules": { "timeLimitMs": 5000 }
        }"#;
        let level: LevelConfig = serde_json::from_str(json).unwrap();
        level.validate().unwrap();
        assert_eq!(level.rules.time_limit_ms, 5000.0);
        assert_eq!(level.rules.hump_score, 3);
        assert_eq!(level.rules.humps_to_remove, 4);
        assert_eq!(level.tile_size.width, 60.0);
        assert_eq!(level.sven, SvenClips::default());
    }
}
