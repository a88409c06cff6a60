//! # Visibility
//!
//! Ray-traced field of view with a sticky "seen" overlay.
//!
//! Each cell inside the observer's radius gets its own ray. A ray marks every
//! cell it crosses, including the first opaque one, and stops there. `seen`
//! is only ever set, so explored ground stays remembered after it drops out
//! of sight.

use crate::{Grid, Position};

/// Rasterizes the line from `from` to `to`, both inclusive.
///
/// Bresenham's algorithm, with x and y swapped for steep lines so that the
/// major axis advances by exactly one cell per step. The result always
/// starts at `from`.
///
/// # Examples
///
/// ```
/// use wayfarer::{trace_line, Position};
///
/// let line = trace_line(Position::new(0, 0), Position::new(3, 1));
/// assert_eq!(line.first(), Some(&Position::new(0, 0)));
/// assert_eq!(line.last(), Some(&Position::new(3, 1)));
/// assert_eq!(line.len(), 4);
/// ```
pub fn trace_line(from: Position, to: Position) -> Vec<Position> {
    let (mut x0, mut y0, mut x1, mut y1) = (from.x, from.y, to.x, to.y);

    let steep = (y1 - y0).abs() > (x1 - x0).abs();
    if steep {
        std::mem::swap(&mut x0, &mut y0);
        std::mem::swap(&mut x1, &mut y1);
    }

    let reversed = x0 > x1;
    if reversed {
        std::mem::swap(&mut x0, &mut x1);
        std::mem::swap(&mut y0, &mut y1);
    }

    let dx = x1 - x0;
    let dy = (y1 - y0).abs();
    let y_step = if y0 < y1 { 1 } else { -1 };
    let mut error = dx / 2;
    let mut y = y0;

    let mut line = Vec::with_capacity(dx as usize + 1);
    for x in x0..=x1 {
        line.push(if steep {
            Position::new(y, x)
        } else {
            Position::new(x, y)
        });
        error -= dy;
        if error < 0 {
            y += y_step;
            error += dx;
        }
    }

    if reversed {
        line.reverse();
    }
    line
}

/// Marks everything `origin` can see within `radius` as visible and seen.
///
/// Does not clear previous `visible` flags; use [`refresh_visibility`] for a
/// full per-move update.
pub fn recompute_visibility(grid: &mut Grid, origin: Position, radius: u32) {
    // The bounding square, clipped to the grid.
    let r = i64::from(radius);
    let clip = |center: i32, len: u32| {
        let low = (i64::from(center) - r).max(0);
        let high = (i64::from(center) + r).min(i64::from(len) - 1);
        (low as i32, high as i32)
    };
    let (x_low, x_high) = clip(origin.x, grid.width());
    let (y_low, y_high) = clip(origin.y, grid.height());

    let radius_sq = i128::from(radius) * i128::from(radius);
    for y in y_low..=y_high {
        for x in x_low..=x_high {
            let dx = i128::from(x) - i128::from(origin.x);
            let dy = i128::from(y) - i128::from(origin.y);
            if dx * dx + dy * dy > radius_sq {
                continue;
            }
            cast_ray(grid, origin, Position::new(x, y));
        }
    }
}

/// Clears all `visible` flags, then recomputes from `origin`.
pub fn refresh_visibility(grid: &mut Grid, origin: Position, radius: u32) {
    grid.clear_visible();
    recompute_visibility(grid, origin, radius);
    log::debug!("Visibility refreshed from {} with radius {}", origin, radius);
}

fn cast_ray(grid: &mut Grid, origin: Position, target: Position) {
    for pos in trace_line(origin, target) {
        let Some(cell) = grid.cell_mut(pos) else {
            return;
        };
        cell.reveal();
        if !cell.terrain.is_transparent() {
            return;
        }
    }
}
