use crate::engine::{Point, Size};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What occupies a grid cell
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum TileId {
    #[default]
    Empty,
    Sven,
    Sheep,
    Wall,
}

impl TryFrom<u8> for TileId {
    type Error = String;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        match id {
            0 => Ok(TileId::Empty),
            1 => Ok(TileId::Sven),
            2 => Ok(TileId::Sheep),
            3 => Ok(TileId::Wall),
            other => Err(format!("unknown tile id {}", other)),
        }
    }
}

impl From<TileId> for u8 {
    fn from(id: TileId) -> Self {
        match id {
            TileId::Empty => 0,
            TileId::Sven => 1,
            TileId::Sheep => 2,
            TileId::Wall => 3,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Arrow key codes as reported by `KeyboardEvent.code`
    pub fn from_key(code: &str) -> Option<Self> {
        match code {
            "ArrowUp" => Some(Direction::Up),
            "ArrowDown" => Some(Direction::Down),
            "ArrowLeft" => Some(Direction::Left),
            "ArrowRight" => Some(Direction::Right),
            _ => None,
        }
    }

    /// row/col step
    fn offset(self) -> (i32, i32) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    pub fn random() -> Self {
        let mut byte = [0u8; 1];
        match getrandom::getrandom(&mut byte) {
            Ok(()) => Direction::ALL[byte[0] as usize % Direction::ALL.len()],
            Err(err) => {
                log!("No randomness available ({}), facing down", err);
                Direction::Down
            }
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Up => "Up",
            Direction::Down => "Down",
            Direction::Left => "Left",
            Direction::Right => "Right",
        };
        f.write_str(name)
    }
}

/// Grid cell. Signed so cells just off the grid can be represented and then
/// rejected by `Map::out_of_bounds`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct TilePos {
    pub row: i32,
    pub col: i32,
}

impl TilePos {
    pub fn new(row: i32, col: i32) -> Self {
        TilePos { row, col }
    }
}

#[derive(Debug, Clone)]
pub struct Map {
    tiles: Vec<Vec<TileId>>,
    tile_size: Size,
    origin: Point,
}

impl Map {
    /// Rows are expected to be rectangular, see `LevelConfig::validate`
    pub fn new(tiles: Vec<Vec<TileId>>, tile_size: Size, origin: Point) -> Self {
        Map {
            tiles,
            tile_size,
            origin,
        }
    }

    pub fn rows(&self) -> usize {
        self.tiles.len()
    }

    pub fn cols(&self) -> usize {
        self.tiles.first().map(Vec::len).unwrap_or(0)
    }

    /// Every cell holding `id`, row major
    pub fn pos_by_id(&self, id: TileId) -> Vec<TilePos> {
        self.tiles
            .iter()
            .enumerate()
            .flat_map(|(row, cells)| {
                cells.iter().enumerate().filter_map(move |(col, tile)| {
                    (*tile == id).then(|| TilePos::new(row as i32, col as i32))
                })
            })
            .collect()
    }

    pub fn sven_pos(&self) -> Option<TilePos> {
        self.pos_by_id(TileId::Sven).into_iter().next()
    }

    /// Top left pixel of a cell
    pub fn coords_from_pos(&self, pos: TilePos) -> Point {
        Point {
            x: self.origin.x + pos.col as f32 * self.tile_size.width,
            y: self.origin.y + pos.row as f32 * self.tile_size.height,
        }
    }

    pub fn get_destination(&self, pos: TilePos, direction: Direction) -> TilePos {
        let (row, col) = direction.offset();
        TilePos::new(pos.row + row, pos.col + col)
    }

    pub fn out_of_bounds(&self, pos: TilePos) -> bool {
        pos.row < 0
            || pos.col < 0
            || pos.row as usize >= self.rows()
            || pos.col as usize >= self.cols()
    }

    /// Anything but an empty cell blocks movement
    pub fn collide(&self, pos: TilePos) -> bool {
        self.get_tile(pos)
            .map(|tile| tile != TileId::Empty)
            .unwrap_or(true)
    }

    pub fn get_tile(&self, pos: TilePos) -> Option<TileId> {
        if self.out_of_bounds(pos) {
            return None;
        }
        Some(self.tiles[pos.row as usize][pos.col as usize])
    }

    pub fn set_tile_on_map(&mut self, pos: TilePos, id: TileId) {
        if self.out_of_bounds(pos) {
            log!("Ignoring tile write outside the map at {:?}", pos);
            return;
        }
        self.tiles[pos.row as usize][pos.col as usize] = id;
    }

    pub fn tiles(&self) -> &[Vec<TileId>] {
        &self.tiles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use super::TileId::*;

    fn map() -> Map {
        Map::new(
            vec![
                vec![Empty, Wall, Empty],
                vec![Sheep, Sven, Empty],
                vec![Empty, Sheep, Empty],
            ],
            Size {
                width: 64.0,
                height: 48.0,
            },
            Point { x: 10.0, y: 20.0 },
        )
    }

    #[test]
    fn destination_is_adjacent_and_inverted_by_opposite() {
        let map = map();
        for row in -1..4 {
            for col in -1..4 {
                let cell = TilePos::new(row, col);
                for direction in Direction::ALL {
                    let next = map.get_destination(cell, direction);
                    let distance = (next.row - cell.row).abs() + (next.col - cell.col).abs();
                    assert_eq!(distance, 1);
                    assert_eq!(map.get_destination(next, direction.opposite()), cell);
                }
            }
        }
    }

    #[test]
    fn destination_follows_screen_axes() {
        let map = map();
        let cell = TilePos::new(2, 2);
        assert_eq!(map.get_destination(cell, Direction::Up), TilePos::new(1, 2));
        assert_eq!(map.get_destination(cell, Direction::Down), TilePos::new(3, 2));
        assert_eq!(map.get_destination(cell, Direction::Left), TilePos::new(2, 1));
        assert_eq!(map.get_destination(cell, Direction::Right), TilePos::new(2, 3));
    }

    #[test]
    fn pos_by_id_is_row_major() {
        let map = map();
        assert_eq!(
            map.pos_by_id(Sheep),
            vec![TilePos::new(1, 0), TilePos::new(2, 1)]
        );
        assert_eq!(map.sven_pos(), Some(TilePos::new(1, 1)));
    }

    #[test]
    fn coords_offset_by_origin_and_tile_size() {
        let point = map().coords_from_pos(TilePos::new(2, 1));
        assert_relative_eq!(point.x, 74.0);
        assert_relative_eq!(point.y, 116.0);
    }

    #[test]
    fn bounds_and_collisions() {
        let map = map();
        assert!(map.out_of_bounds(TilePos::new(-1, 0)));
        assert!(map.out_of_bounds(TilePos::new(0, 3)));
        assert!(!map.out_of_bounds(TilePos::new(2, 2)));

        assert!(map.collide(TilePos::new(0, 1)));
        assert!(map.collide(TilePos::new(1, 0)));
        assert!(!map.collide(TilePos::new(0, 0)));
        assert_eq!(map.get_tile(TilePos::new(5, 5)), None);
    }

    #[test]
    fn set_tile_ignores_cells_off_the_grid() {
        let mut map = map();
        let before = map.tiles().to_vec();
        map.set_tile_on_map(TilePos::new(3, 0), Wall);
        assert_eq!(map.tiles(), before.as_slice());

        map.set_tile_on_map(TilePos::new(0, 0), Wall);
        assert_eq!(map.get_tile(TilePos::new(0, 0)), Some(Wall));
    }

    #[test]
    fn tile_ids_parse_from_numbers() {
        let row: Vec<TileId> = serde_json::from_str("[0, 1, 2, 3]").unwrap();
        assert_eq!(row, vec![Empty, Sven, Sheep, Wall]);
        assert!(serde_json::from_str::<TileId>("7").is_err());
    }

    #[test]
    fn arrow_keys_map_to_directions() {
        assert_eq!(Direction::from_key("ArrowLeft"), Some(Direction::Left));
        assert_eq!(Direction::from_key("Space"), None);
    }
}
