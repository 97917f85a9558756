use glam::Vec2;
use serde::{Deserialize, Serialize};
use tilecast_common::TileCoord;

/// One stored grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    Wall,
}

/// Result of a bounds-checked grid lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellQuery {
    Empty,
    Wall,
    OutOfBounds,
}

impl CellQuery {
    /// Only in-bounds empty cells can be entered.
    pub fn is_passable(self) -> bool {
        matches!(self, Self::Empty)
    }
}

impl From<Cell> for CellQuery {
    fn from(cell: Cell) -> Self {
        match cell {
            Cell::Empty => Self::Empty,
            Cell::Wall => Self::Wall,
        }
    }
}

/// Symbol table mapping level characters to cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Legend {
    /// Every character in this string is a wall.
    pub wall: String,
    /// Every character in this string is empty floor.
    pub empty: String,
}

impl Default for Legend {
    fn default() -> Self {
        Self {
            wall: "1#".into(),
            empty: "0.".into(),
        }
    }
}

impl Legend {
    pub fn classify(&self, symbol: char) -> Option<Cell> {
        if self.wall.contains(symbol) {
            Some(Cell::Wall)
        } else if self.empty.contains(symbol) {
            Some(Cell::Empty)
        } else {
            None
        }
    }

    fn validate(&self) -> Result<(), GridError> {
        match self.wall.chars().find(|c| self.empty.contains(*c)) {
            Some(symbol) => Err(GridError::AmbiguousSymbol { symbol }),
            None => Ok(()),
        }
    }
}

/// Errors from building a grid or placing a spawn on it.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GridError {
    #[error("grid has no rows")]
    NoRows,
    #[error("grid has no columns")]
    NoColumns,
    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("expected {expected} cells, got {found}")]
    CellCount { expected: usize, found: usize },
    #[error("unknown symbol {symbol:?} at row {row}, column {column}")]
    UnknownSymbol {
        row: usize,
        column: usize,
        symbol: char,
    },
    #[error("symbol {symbol:?} is listed as both wall and empty")]
    AmbiguousSymbol { symbol: char },
    #[error("tile size must be positive and finite, got {0}")]
    InvalidTileSize(f32),
    #[error("spawn tile {0} is outside the grid")]
    SpawnOutOfBounds(TileCoord),
    #[error("spawn tile {0} is a wall")]
    SpawnBlocked(TileCoord),
}

/// Immutable rectangular tile grid.
///
/// Cells are stored row-major. The only way to read a cell is through
/// [`Grid::cell_at`], which checks bounds first.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    width: usize,
    height: usize,
    tile_size: f32,
    cells: Vec<Cell>,
}

impl Grid {
    /// Parse rows of symbols. Fails fast on empty, ragged or unknown input.
    pub fn from_rows<S: AsRef<str>>(
        rows: &[S],
        legend: &Legend,
        tile_size: f32,
    ) -> Result<Self, GridError> {
        legend.validate()?;
        let first = rows.first().ok_or(GridError::NoRows)?;
        let width = first.as_ref().chars().count();
        if width == 0 {
            return Err(GridError::NoColumns);
        }

        let mut cells = Vec::with_capacity(width * rows.len());
        for (row, line) in rows.iter().enumerate() {
            let line = line.as_ref();
            let found = line.chars().count();
            if found != width {
                return Err(GridError::Ragged {
                    row,
                    expected: width,
                    found,
                });
            }
            for (column, symbol) in line.chars().enumerate() {
                let cell = legend.classify(symbol).ok_or(GridError::UnknownSymbol {
                    row,
                    column,
                    symbol,
                })?;
                cells.push(cell);
            }
        }

        Self::from_cells(width, rows.len(), cells, tile_size)
    }

    /// Build from raw row-major cells.
    pub fn from_cells(
        width: usize,
        height: usize,
        cells: Vec<Cell>,
        tile_size: f32,
    ) -> Result<Self, GridError> {
        if height == 0 {
            return Err(GridError::NoRows);
        }
        if width == 0 {
            return Err(GridError::NoColumns);
        }
        if cells.len() != width * height {
            return Err(GridError::CellCount {
                expected: width * height,
                found: cells.len(),
            });
        }
        if !(tile_size.is_finite() && tile_size > 0.0) {
            return Err(GridError::InvalidTileSize(tile_size));
        }
        Ok(Self {
            width,
            height,
            tile_size,
            cells,
        })
    }

    /// A grid with no walls at all.
    pub fn open(width: usize, height: usize, tile_size: f32) -> Result<Self, GridError> {
        Self::from_cells(width, height, vec![Cell::Empty; width * height], tile_size)
    }

    /// Empty interior enclosed by a one-tile wall ring.
    pub fn walled(width: usize, height: usize, tile_size: f32) -> Result<Self, GridError> {
        let mut cells = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                let edge = x == 0 || y == 0 || x + 1 == width || y + 1 == height;
                cells.push(if edge { Cell::Wall } else { Cell::Empty });
            }
        }
        Self::from_cells(width, height, cells, tile_size)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// World units per tile edge.
    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// Extent of the grid in world units.
    pub fn world_size(&self) -> Vec2 {
        Vec2::new(
            self.width as f32 * self.tile_size,
            self.height as f32 * self.tile_size,
        )
    }

    /// Bounds-checked lookup.
    #[inline]
    pub fn cell_at(&self, tile_x: i32, tile_y: i32) -> CellQuery {
        if tile_x < 0 || tile_y < 0 {
            return CellQuery::OutOfBounds;
        }
        let (x, y) = (tile_x as usize, tile_y as usize);
        if x >= self.width || y >= self.height {
            return CellQuery::OutOfBounds;
        }
        self.cells[y * self.width + x].into()
    }

    #[inline]
    pub fn query(&self, tile: TileCoord) -> CellQuery {
        self.cell_at(tile.x, tile.y)
    }

    /// Tile containing a world point.
    #[inline]
    pub fn tile_of(&self, point: Vec2) -> TileCoord {
        TileCoord::from_world(point, self.tile_size)
    }

    /// Look up the tile containing a world point.
    #[inline]
    pub fn query_point(&self, point: Vec2) -> CellQuery {
        self.query(self.tile_of(point))
    }

    /// World-space centre of a tile.
    pub fn tile_center(&self, tile: TileCoord) -> Vec2 {
        Vec2::new(
            (tile.x as f32 + 0.5) * self.tile_size,
            (tile.y as f32 + 0.5) * self.tile_size,
        )
    }

    /// All cells in row-major order with their coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (TileCoord, Cell)> + '_ {
        self.cells.iter().enumerate().map(|(i, cell)| {
            let tile = TileCoord::new((i % self.width) as i32, (i / self.width) as i32);
            (tile, *cell)
        })
    }

    pub fn wall_count(&self) -> usize {
        self.cells.iter().filter(|c| **c == Cell::Wall).count()
    }

    /// First empty tile in row-major order.
    pub fn first_empty(&self) -> Option<TileCoord> {
        self.iter()
            .find(|(_, cell)| *cell == Cell::Empty)
            .map(|(tile, _)| tile)
    }
}

impl std::fmt::Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.cells.chunks(self.width) {
            for cell in row {
                let c = match cell {
                    Cell::Wall => '1',
                    Cell::Empty => '0',
                };
                write!(f, "{c}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RING: [&str; 4] = ["1111", "1001", "1001", "1111"];

    #[test]
    fn parse_ring() {
        let g = Grid::from_rows(&RING, &Legend::default(), 10.0).unwrap();
        assert_eq!(g.width(), 4);
        assert_eq!(g.height(), 4);
        assert_eq!(g.wall_count(), 12);
        assert_eq!(g.cell_at(0, 0), CellQuery::Wall);
        assert_eq!(g.cell_at(1, 1), CellQuery::Empty);
    }

    #[test]
    fn out_of_bounds_is_checked() {
        let g = Grid::from_rows(&RING, &Legend::default(), 10.0).unwrap();
        assert_eq!(g.cell_at(-1, 0), CellQuery::OutOfBounds);
        assert_eq!(g.cell_at(0, -1), CellQuery::OutOfBounds);
        assert_eq!(g.cell_at(4, 0), CellQuery::OutOfBounds);
        assert_eq!(g.cell_at(0, 4), CellQuery::OutOfBounds);
        assert_eq!(g.cell_at(i32::MAX, i32::MIN), CellQuery::OutOfBounds);
        assert_eq!(
            g.query_point(Vec2::new(f32::INFINITY, 5.0)),
            CellQuery::OutOfBounds
        );
    }

    #[test]
    fn point_lookup_uses_floor_division() {
        let g = Grid::from_rows(&RING, &Legend::default(), 10.0).unwrap();
        assert_eq!(g.tile_of(Vec2::new(15.0, 29.99)), TileCoord::new(1, 2));
        assert_eq!(g.query_point(Vec2::new(15.0, 15.0)), CellQuery::Empty);
        assert_eq!(g.query_point(Vec2::new(5.0, 15.0)), CellQuery::Wall);
    }

    #[test]
    fn ragged_rows_fail_fast() {
        let err = Grid::from_rows(&["111", "11", "111"], &Legend::default(), 1.0).unwrap_err();
        assert_eq!(
            err,
            GridError::Ragged {
                row: 1,
                expected: 3,
                found: 2
            }
        );
    }

    #[test]
    fn unknown_symbol_fails_fast() {
        let err = Grid::from_rows(&["1x1"], &Legend::default(), 1.0).unwrap_err();
        assert_eq!(
            err,
            GridError::UnknownSymbol {
                row: 0,
                column: 1,
                symbol: 'x'
            }
        );
    }

    #[test]
    fn empty_input_fails_fast() {
        let none: [&str; 0] = [];
        assert_eq!(
            Grid::from_rows(&none, &Legend::default(), 1.0).unwrap_err(),
            GridError::NoRows
        );
        assert_eq!(
            Grid::from_rows(&[""], &Legend::default(), 1.0).unwrap_err(),
            GridError::NoColumns
        );
    }

    #[test]
    fn bad_tile_size_rejected() {
        assert!(matches!(
            Grid::from_rows(&RING, &Legend::default(), 0.0),
            Err(GridError::InvalidTileSize(_))
        ));
        assert!(matches!(
            Grid::open(2, 2, f32::NAN),
            Err(GridError::InvalidTileSize(_))
        ));
    }

    #[test]
    fn custom_legend() {
        let legend = Legend {
            wall: "X".into(),
            empty: " ".into(),
        };
        let g = Grid::from_rows(&["XXX", "X X", "XXX"], &legend, 1.0).unwrap();
        assert_eq!(g.cell_at(1, 1), CellQuery::Empty);
        assert_eq!(g.cell_at(1, 0), CellQuery::Wall);
    }

    #[test]
    fn ambiguous_legend_rejected() {
        let legend = Legend {
            wall: "1".into(),
            empty: "01".into(),
        };
        assert_eq!(
            Grid::from_rows(&["1"], &legend, 1.0).unwrap_err(),
            GridError::AmbiguousSymbol { symbol: '1' }
        );
    }

    #[test]
    fn walled_matches_parsed_ring() {
        let parsed = Grid::from_rows(&RING, &Legend::default(), 10.0).unwrap();
        let built = Grid::walled(4, 4, 10.0).unwrap();
        assert_eq!(parsed, built);
        assert_eq!(built.to_string(), "1111\n1001\n1001\n1111\n");
    }

    #[test]
    fn first_empty_and_centre() {
        let g = Grid::walled(4, 4, 10.0).unwrap();
        let tile = g.first_empty().unwrap();
        assert_eq!(tile, TileCoord::new(1, 1));
        assert_eq!(g.tile_center(tile), Vec2::new(15.0, 15.0));
        assert_eq!(g.world_size(), Vec2::new(40.0, 40.0));
    }
}
