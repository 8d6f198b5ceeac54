//! Geometry of the last-move arrow overlay.
//!
//! The arrow is four rotated rectangles: a baseline from the origin cell
//! center to the target cell center, two head strokes leaving the target at
//! ±135° from the baseline, and a small square closing the tip. Every value
//! is derived from scratch from the last move, the orientation and the
//! container width.

use derive_getters::Getters;
use derive_new::new;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::coords::{BoardSquare, Point, cell_center, cell_size, square_to_cell};

/// Stroke thickness relative to the cell size.
pub const THICKNESS_RATIO: f64 = 0.15;

/// Head stroke length relative to the baseline length.
pub const HEAD_RATIO: f64 = 0.4;

/// Angle between the baseline and each head stroke, in degrees.
pub const HEAD_ANGLE_DEG: f64 = 135.0;

/// Origin and target of the most recent committed move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, new)]
pub struct LastMove {
    /// Square the piece left.
    pub from: BoardSquare,
    /// Square the piece reached.
    pub to: BoardSquare,
}

/// One rotated rectangle of the overlay.
///
/// The rectangle is placed at `left`/`top`, then rotated clockwise by
/// `rotation` degrees around `origin`, which is relative to its top-left
/// corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Getters)]
pub struct Stroke {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
    rotation: f64,
    origin: Point,
}

impl Stroke {
    /// Absolute pixel position of the rotation origin.
    pub fn pivot(&self) -> Point {
        Point::new(self.left + self.origin.x, self.top + self.origin.y)
    }

    /// Start and end of the stroke's center line after rotation.
    pub fn center_line(&self) -> (Point, Point) {
        let start = self.pivot();
        let radians = self.rotation.to_radians();
        let end = Point::new(
            start.x + self.width * radians.cos(),
            start.y + self.width * radians.sin(),
        );
        (start, end)
    }
}

/// The four rectangles making up the arrow.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Getters)]
pub struct ArrowGeometry {
    baseline: Stroke,
    left_head: Stroke,
    right_head: Stroke,
    point: Stroke,
}

impl ArrowGeometry {
    /// All strokes, baseline first.
    pub fn strokes(&self) -> [Stroke; 4] {
        [self.baseline, self.left_head, self.right_head, self.point]
    }
}

/// Computes the arrow for a last move.
///
/// Returns `None` when there is no last move or the container has no size
/// yet.
#[instrument]
pub fn compute_arrow(
    last_move: Option<LastMove>,
    reversed: bool,
    container_width: f64,
) -> Option<ArrowGeometry> {
    let last_move = last_move?;
    if container_width.is_nan() || container_width <= 0.0 {
        return None;
    }

    let size = cell_size(container_width);
    let thickness = size * THICKNESS_RATIO;
    let half = thickness / 2.0;

    let start = cell_center(square_to_cell(last_move.from, reversed), size);
    let end = cell_center(square_to_cell(last_move.to, reversed), size);
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let length = dx.hypot(dy);
    let angle = dy.atan2(dx).to_degrees();

    let line = |anchor: Point, width: f64, rotation: f64| Stroke {
        left: anchor.x,
        top: anchor.y - half,
        width,
        height: thickness,
        rotation: normalize_degrees(rotation),
        origin: Point::new(0.0, half),
    };

    let head_length = length * HEAD_RATIO;
    Some(ArrowGeometry {
        baseline: line(start, length, angle),
        left_head: line(end, head_length, angle - HEAD_ANGLE_DEG),
        right_head: line(end, head_length, angle + HEAD_ANGLE_DEG),
        point: Stroke {
            left: end.x - half,
            top: end.y - half,
            width: thickness,
            height: thickness,
            rotation: normalize_degrees(angle),
            origin: Point::new(half, half),
        },
    })
}

/// Maps an angle into `[0, 360)`.
fn normalize_degrees(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0);
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}
