//! Rotation-aware drag, resize and rotate transforms.
//!
//! Every transform is captured once when the pointer goes down and then
//! evaluated against the current pointer position on each move. Nothing is
//! accumulated between frames, so replaying the same pointer position always
//! yields the same result.

use crate::object::{LocationPatch, ObjectLocation};
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Normalize an angle in degrees to `[0, 360)`.
pub fn normalize_degrees(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs.
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Normalize an angle difference in degrees to `(-180, 180]`.
pub fn normalize_signed_degrees(degrees: f64) -> f64 {
    let wrapped = normalize_degrees(degrees);
    if wrapped > 180.0 { wrapped - 360.0 } else { wrapped }
}

/// Rotate a vector by an angle in degrees.
///
/// Board coordinates have y pointing down, so positive angles turn clockwise
/// on screen.
pub fn rotate_vec(v: Vec2, degrees: f64) -> Vec2 {
    let (sin, cos) = degrees.to_radians().sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Angle of a vector in degrees, measured like `atan2`.
pub fn angle_of(v: Vec2) -> f64 {
    v.y.atan2(v.x).to_degrees()
}

/// The eight resize directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Compass {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl Compass {
    /// All directions, clockwise from north.
    pub const ALL: [Compass; 8] = [
        Compass::N,
        Compass::NE,
        Compass::E,
        Compass::SE,
        Compass::S,
        Compass::SW,
        Compass::W,
        Compass::NW,
    ];

    /// Short lowercase name (`"nw"`, `"e"`, ...).
    pub fn name(self) -> &'static str {
        match self {
            Compass::N => "n",
            Compass::NE => "ne",
            Compass::E => "e",
            Compass::SE => "se",
            Compass::S => "s",
            Compass::SW => "sw",
            Compass::W => "w",
            Compass::NW => "nw",
        }
    }

    /// Whether this is one of the four corner handles.
    pub fn is_corner(self) -> bool {
        matches!(self, Compass::NE | Compass::SE | Compass::SW | Compass::NW)
    }

    fn moves_north(self) -> bool {
        matches!(self, Compass::N | Compass::NE | Compass::NW)
    }

    fn moves_south(self) -> bool {
        matches!(self, Compass::S | Compass::SE | Compass::SW)
    }

    fn moves_east(self) -> bool {
        matches!(self, Compass::E | Compass::NE | Compass::SE)
    }

    fn moves_west(self) -> bool {
        matches!(self, Compass::W | Compass::NW | Compass::SW)
    }

    /// Unit offset of the handle from the rectangle center, in half-extents.
    ///
    /// `(-1, -1)` is the top-left corner, `(0, 1)` the bottom edge midpoint.
    pub fn unit_offset(self) -> (f64, f64) {
        let x = if self.moves_west() {
            -1.0
        } else if self.moves_east() {
            1.0
        } else {
            0.0
        };
        let y = if self.moves_north() {
            -1.0
        } else if self.moves_south() {
            1.0
        } else {
            0.0
        };
        (x, y)
    }
}

/// Drag state: the grabbed point expressed in the object's local frame.
#[derive(Debug, Clone, PartialEq)]
pub struct DragAnchor {
    local_offset: Vec2,
    width: f64,
    height: f64,
}

impl DragAnchor {
    /// Capture the anchor when the pointer goes down on an object body.
    pub fn capture(location: &ObjectLocation, pointer: Point) -> Self {
        let offset = pointer - location.center();
        Self {
            local_offset: rotate_vec(offset, -location.rotation),
            width: location.width,
            height: location.height,
        }
    }

    /// Offset from the center to the grabbed point, unrotated.
    pub fn local_offset(&self) -> Vec2 {
        self.local_offset
    }

    /// New top-left position keeping the grabbed point under `pointer`.
    ///
    /// `rotation` is the object's rotation in effect at this step.
    pub fn apply(&self, pointer: Point, rotation: f64) -> LocationPatch {
        let center = pointer - rotate_vec(self.local_offset, rotation);
        LocationPatch::position(center.x - self.width / 2.0, center.y - self.height / 2.0)
    }
}

/// Resize state: start pointer and start rectangle.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeSnapshot {
    handle: Compass,
    start_pointer: Point,
    left: f64,
    top: f64,
    width: f64,
    height: f64,
    min_size: f64,
}

impl ResizeSnapshot {
    /// Capture the snapshot when the pointer goes down on a resize handle.
    pub fn capture(
        location: &ObjectLocation,
        handle: Compass,
        pointer: Point,
        min_size: f64,
    ) -> Self {
        Self {
            handle,
            start_pointer: pointer,
            left: location.left,
            top: location.top,
            width: location.width,
            height: location.height,
            min_size,
        }
    }

    /// The handle being dragged.
    pub fn handle(&self) -> Compass {
        self.handle
    }

    /// New rectangle for the current pointer position.
    ///
    /// The delta is taken in raw board space. Sizes never drop below the
    /// minimum; when they would, the edge opposite the handle stays put.
    pub fn apply(&self, pointer: Point) -> LocationPatch {
        let delta = pointer - self.start_pointer;
        let (mut left, mut top) = (self.left, self.top);
        let (mut width, mut height) = (self.width, self.height);

        if self.handle.moves_west() {
            left += delta.x;
            width -= delta.x;
        } else if self.handle.moves_east() {
            width += delta.x;
        }
        if self.handle.moves_north() {
            top += delta.y;
            height -= delta.y;
        } else if self.handle.moves_south() {
            height += delta.y;
        }

        if width.is_nan() || width < self.min_size {
            width = self.min_size;
            if self.handle.moves_west() {
                left = self.left + self.width - self.min_size;
            }
        }
        if height.is_nan() || height < self.min_size {
            height = self.min_size;
            if self.handle.moves_north() {
                top = self.top + self.height - self.min_size;
            }
        }

        LocationPatch::rect(left, top, width, height)
    }
}

/// Rotate state: pointer angle and object rotation at the start.
#[derive(Debug, Clone, PartialEq)]
pub struct RotateSnapshot {
    center: Point,
    start_angle: f64,
    start_rotation: f64,
}

impl RotateSnapshot {
    /// Capture the snapshot when the pointer goes down on the rotate handle.
    pub fn capture(location: &ObjectLocation, pointer: Point) -> Self {
        let center = location.center();
        Self {
            center,
            start_angle: angle_of(pointer - center),
            start_rotation: location.rotation,
        }
    }

    /// Center of rotation.
    pub fn center(&self) -> Point {
        self.center
    }

    /// New rotation in `[0, 360)` for the current pointer position.
    pub fn apply(&self, pointer: Point) -> f64 {
        let angle = angle_of(pointer - self.center);
        let delta = normalize_signed_degrees(angle - self.start_angle);
        normalize_degrees(self.start_rotation + delta)
    }
}
