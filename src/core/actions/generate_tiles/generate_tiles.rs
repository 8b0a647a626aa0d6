use crate::core::data::pixel_rect::PixelRect;

/// A tile together with its cell in the tile grid.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct GridTile {
    pub column: u32,
    pub row: u32,
    pub rect: PixelRect,
}

/// Splits the canvas into `tile_size` squares in row-major order.
///
/// Edge tiles are clipped to the canvas, so the tiles cover every pixel exactly once.
#[must_use]
pub fn generate_tile_grid(width: u32, height: u32, tile_size: u32) -> Vec<GridTile> {
    let tile_size = tile_size.max(1);
    let mut tiles = Vec::new();

    for (row, y) in (0..height).step_by(tile_size as usize).enumerate() {
        for (column, x) in (0..width).step_by(tile_size as usize).enumerate() {
            tiles.push(GridTile {
                column: column as u32,
                row: row as u32,
                rect: PixelRect {
                    x,
                    y,
                    width: tile_size.min(width - x),
                    height: tile_size.min(height - y),
                },
            });
        }
    }

    tiles
}

/// Orders tiles centre-out by grid distance from the centre cell.
///
/// The sort is stable, so equidistant tiles keep their row-major order.
pub fn sort_centre_out(tiles: &mut [GridTile]) {
    let columns = tiles.iter().map(|t| t.column + 1).max().unwrap_or(0);
    let rows = tiles.iter().map(|t| t.row + 1).max().unwrap_or(0);
    let centre_column = i64::from(columns / 2);
    let centre_row = i64::from(rows / 2);

    tiles.sort_by_key(|tile| {
        let dx = i64::from(tile.column) - centre_column;
        let dy = i64::from(tile.row) - centre_row;
        dx * dx + dy * dy
    });
}

/// Tiles covering the canvas, most central first.
#[must_use]
pub fn generate_tiles(width: u32, height: u32, tile_size: u32) -> Vec<PixelRect> {
    let mut tiles = generate_tile_grid(width, height, tile_size);
    sort_centre_out(&mut tiles);
    tiles.into_iter().map(|tile| tile.rect).collect()
}
