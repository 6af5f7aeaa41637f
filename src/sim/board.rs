//! Static tile grid parsed from a level layout
//!
//! Layout glyphs:
//! - `X`: plain wall, `1`-`4`: coloured wall
//! - `B<c>`, `H<c>`, `S<c>`: ball, hole, spawner of colour `<c>`
//! - anything else: open floor
//!
//! The colour character after `B`/`H`/`S` is consumed and its cell becomes a
//! marker tile so it is never drawn or classified twice.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::color::BallColor;
use crate::cell_to_pixel;
use crate::error::LayoutError;

/// What occupies a board cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileKind {
    Open,
    /// Wall; `None` for a plain `X` wall, otherwise the colour it paints
    Wall(Option<BallColor>),
    Hole,
    Spawner,
    /// Origin cell of a ball placed in the layout
    BallOrigin,
    /// Cell whose glyph was consumed as the colour of its left neighbour
    Marker,
}

/// A single board cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub col: usize,
    pub row: usize,
    /// Layout character as written
    pub glyph: char,
    pub kind: TileKind,
}

impl Tile {
    /// Pixel position of the tile's top-left corner
    #[inline]
    pub fn pos(&self) -> Vec2 {
        cell_to_pixel(self.col, self.row)
    }

    #[inline]
    pub fn is_wall(&self) -> bool {
        matches!(self.kind, TileKind::Wall(_))
    }

    #[inline]
    pub fn is_hole(&self) -> bool {
        self.kind == TileKind::Hole
    }

    #[inline]
    pub fn is_spawner(&self) -> bool {
        self.kind == TileKind::Spawner
    }

    #[inline]
    pub fn is_marker(&self) -> bool {
        self.kind == TileKind::Marker
    }

    /// Colour a ball adopts when bouncing off this tile, if any
    #[inline]
    pub fn wall_color(&self) -> Option<BallColor> {
        match self.kind {
            TileKind::Wall(color) => color,
            _ => None,
        }
    }
}

/// A coloured entity position found in the layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub col: usize,
    pub row: usize,
    pub color: BallColor,
}

/// Fixed-size grid of tiles plus the entity placements found while parsing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    width: usize,
    height: usize,
    /// Row-major, exactly `width * height` tiles
    tiles: Vec<Tile>,
    pub balls: Vec<Placement>,
    pub holes: Vec<Placement>,
    pub spawners: Vec<Placement>,
}

impl Board {
    /// Parse a textual layout.
    ///
    /// The board is as tall as the number of lines and as wide as the
    /// longest line; short lines are padded with open tiles.
    pub fn parse(layout: &str) -> Result<Self, LayoutError> {
        let lines: Vec<Vec<char>> = layout
            .lines()
            .map(|l| l.trim_end_matches('\r').chars().collect())
            .collect();
        // Trailing blank lines are editor noise, not board rows
        let height = lines
            .iter()
            .rposition(|l| !l.is_empty())
            .map_or(0, |i| i + 1);
        let width = lines.iter().map(Vec::len).max().unwrap_or(0);
        if height == 0 || width == 0 {
            return Err(LayoutError::Empty);
        }

        let mut board = Self {
            width,
            height,
            tiles: Vec::with_capacity(width * height),
            balls: Vec::new(),
            holes: Vec::new(),
            spawners: Vec::new(),
        };

        for (row, line) in lines.iter().take(height).enumerate() {
            let mut col = 0;
            while col < width {
                let glyph = line.get(col).copied().unwrap_or(' ');
                match glyph {
                    'B' | 'H' | 'S' => {
                        let color_glyph = *line
                            .get(col + 1)
                            .ok_or(LayoutError::MissingColor { glyph, row, col })?;
                        let color = BallColor::from_code(color_glyph).ok_or(
                            LayoutError::UnknownColor {
                                glyph,
                                color: color_glyph,
                                row,
                                col,
                            },
                        )?;
                        let placement = Placement { col, row, color };
                        let kind = match glyph {
                            'B' => {
                                board.balls.push(placement);
                                TileKind::BallOrigin
                            }
                            'H' => {
                                board.holes.push(placement);
                                TileKind::Hole
                            }
                            _ => {
                                board.spawners.push(placement);
                                TileKind::Spawner
                            }
                        };
                        board.tiles.push(Tile { col, row, glyph, kind });
                        board.tiles.push(Tile {
                            col: col + 1,
                            row,
                            glyph: ' ',
                            kind: TileKind::Marker,
                        });
                        col += 2;
                    }
                    _ => {
                        let kind = match glyph {
                            'X' => TileKind::Wall(None),
                            '1'..='4' => TileKind::Wall(BallColor::from_code(glyph)),
                            _ => TileKind::Open,
                        };
                        board.tiles.push(Tile { col, row, glyph, kind });
                        col += 1;
                    }
                }
            }
        }

        log::debug!(
            "Parsed {}x{} board: {} balls, {} holes, {} spawners",
            width,
            height,
            board.balls.len(),
            board.holes.len(),
            board.spawners.len()
        );
        Ok(board)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Tile at (col, row); `None` when out of bounds
    pub fn get(&self, col: i32, row: i32) -> Option<&Tile> {
        if col < 0 || row < 0 {
            return None;
        }
        let (col, row) = (col as usize, row as usize);
        if col >= self.width || row >= self.height {
            return None;
        }
        self.tiles.get(row * self.width + col)
    }

    /// All tiles in row-major order
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Outer ring of cells in clockwise order starting at the top-left
    /// corner: top row, right column, bottom row, left column.
    pub fn perimeter(&self) -> Vec<(usize, usize)> {
        let (w, h) = (self.width, self.height);
        let mut cells = Vec::with_capacity(2 * (w + h));
        for col in 0..w {
            cells.push((col, 0));
        }
        for row in 1..h {
            cells.push((w - 1, row));
        }
        if h > 1 {
            for col in (0..w.saturating_sub(1)).rev() {
                cells.push((col, h - 1));
            }
        }
        if w > 1 {
            for row in (1..h.saturating_sub(1)).rev() {
                cells.push((0, row));
            }
        }
        cells
    }
}
