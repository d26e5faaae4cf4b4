//! Board objects and their metadata.

use crate::config::MIN_OBJECT_SIZE;
use crate::geometry::{normalize_degrees, rotate_vec};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Stable identifier of a board object.
pub type ObjectId = String;

/// Position, size, stacking and rotation of one rectangular object.
///
/// Coordinates are board-local pixels with the origin at the top-left corner
/// of the board and y growing downwards. Rotation is in degrees, clockwise,
/// around the rectangle center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectLocation {
    pub id: ObjectId,
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub z_index: i32,
    #[serde(default)]
    pub rotation: f64,
}

impl ObjectLocation {
    /// Create an unrotated object at the default stacking level.
    pub fn new(id: impl Into<ObjectId>, left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            top,
            left,
            width,
            height,
            z_index: 0,
            rotation: 0.0,
        }
    }

    /// Set the stacking order.
    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    /// Set the rotation in degrees.
    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = normalize_degrees(rotation);
        self
    }

    /// Center of the rectangle.
    pub fn center(&self) -> Point {
        Point::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    /// The unrotated rectangle.
    pub fn rect(&self) -> Rect {
        Rect::new(
            self.left,
            self.top,
            self.left + self.width,
            self.top + self.height,
        )
    }

    /// Check whether a board point falls inside the rotated rectangle.
    pub fn contains(&self, point: Point) -> bool {
        let center = self.center();
        let local = rotate_vec(point - center, -self.rotation);
        local.x.abs() <= self.width / 2.0 && local.y.abs() <= self.height / 2.0
    }

    /// Map a point given relative to the unrotated center onto the board.
    pub fn to_board(&self, local: Vec2) -> Point {
        self.center() + rotate_vec(local, self.rotation)
    }

    /// Enforce the size floor and the rotation range.
    pub fn normalized(mut self, min_size: f64) -> Self {
        self.width = clamp_size(self.width, min_size);
        self.height = clamp_size(self.height, min_size);
        self.rotation = if self.rotation.is_finite() {
            normalize_degrees(self.rotation)
        } else {
            0.0
        };
        self
    }
}

fn clamp_size(value: f64, min_size: f64) -> f64 {
    if value.is_finite() { value.max(min_size) } else { min_size }
}

/// A partial or full update of an object's location.
///
/// Fields left as `None` keep their current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationPatch {
    pub top: Option<f64>,
    pub left: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub z_index: Option<i32>,
    pub rotation: Option<f64>,
}

impl LocationPatch {
    /// Patch that moves the top-left corner.
    pub fn position(left: f64, top: f64) -> Self {
        Self {
            left: Some(left),
            top: Some(top),
            ..Default::default()
        }
    }

    /// Patch that changes only the rotation.
    pub fn rotation(rotation: f64) -> Self {
        Self {
            rotation: Some(rotation),
            ..Default::default()
        }
    }

    /// Patch that replaces the rectangle but keeps stacking and rotation.
    pub fn rect(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left: Some(left),
            top: Some(top),
            width: Some(width),
            height: Some(height),
            ..Default::default()
        }
    }

    /// Apply the patch, producing a normalized location.
    pub fn apply(&self, base: &ObjectLocation, min_size: f64) -> ObjectLocation {
        ObjectLocation {
            id: base.id.clone(),
            top: self.top.unwrap_or(base.top),
            left: self.left.unwrap_or(base.left),
            width: self.width.unwrap_or(base.width),
            height: self.height.unwrap_or(base.height),
            z_index: self.z_index.unwrap_or(base.z_index),
            rotation: self.rotation.unwrap_or(base.rotation),
        }
        .normalized(min_size)
    }
}

impl From<ObjectLocation> for LocationPatch {
    fn from(location: ObjectLocation) -> Self {
        Self {
            top: Some(location.top),
            left: Some(location.left),
            width: Some(location.width),
            height: Some(location.height),
            z_index: Some(location.z_index),
            rotation: Some(location.rotation),
        }
    }
}

/// A location field editable from the side panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocationField {
    Top,
    Left,
    Width,
    Height,
    Rotation,
    ZIndex,
}

impl LocationField {
    /// Fields in side panel order.
    pub const ALL: [LocationField; 6] = [
        LocationField::Top,
        LocationField::Left,
        LocationField::Width,
        LocationField::Height,
        LocationField::Rotation,
        LocationField::ZIndex,
    ];

    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            LocationField::Top => "Top",
            LocationField::Left => "Left",
            LocationField::Width => "Width",
            LocationField::Height => "Height",
            LocationField::Rotation => "Rotation",
            LocationField::ZIndex => "ZIndex",
        }
    }

    /// Read the field from a location.
    pub fn value_of(self, location: &ObjectLocation) -> f64 {
        match self {
            LocationField::Top => location.top,
            LocationField::Left => location.left,
            LocationField::Width => location.width,
            LocationField::Height => location.height,
            LocationField::Rotation => location.rotation,
            LocationField::ZIndex => f64::from(location.z_index),
        }
    }

    /// Build a patch setting only this field.
    pub fn patch(self, value: f64) -> LocationPatch {
        let mut patch = LocationPatch::default();
        match self {
            LocationField::Top => patch.top = Some(value),
            LocationField::Left => patch.left = Some(value),
            LocationField::Width => patch.width = Some(value),
            LocationField::Height => patch.height = Some(value),
            LocationField::Rotation => patch.rotation = Some(value),
            // Saturating float-to-int cast; NaN becomes 0.
            LocationField::ZIndex => patch.z_index = Some(value.round() as i32),
        }
        patch
    }
}

/// One metadata entry of an object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectDataPair {
    pub key: String,
    pub value: String,
}

impl ObjectDataPair {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl Default for ObjectLocation {
    fn default() -> Self {
        Self::new(String::new(), 0.0, 0.0, MIN_OBJECT_SIZE, MIN_OBJECT_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_and_rect() {
        let loc = ObjectLocation::new("a", 10.0, 20.0, 100.0, 50.0);
        assert_eq!(loc.center(), Point::new(60.0, 45.0));
        let rect = loc.rect();
        assert!((rect.x1 - 110.0).abs() < f64::EPSILON);
        assert!((rect.y1 - 70.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_contains_respects_rotation() {
        // A long thin bar rotated upright.
        let loc = ObjectLocation::new("bar", 0.0, 45.0, 100.0, 10.0).with_rotation(90.0);
        assert!(loc.contains(Point::new(50.0, 10.0)));
        assert!(!loc.contains(Point::new(5.0, 50.0)));
    }

    #[test]
    fn test_normalized_clamps_and_wraps() {
        let loc = ObjectLocation {
            rotation: -30.0,
            ..ObjectLocation::new("a", 0.0, 0.0, 5.0, -10.0)
        }
        .normalized(MIN_OBJECT_SIZE);
        assert!((loc.width - 20.0).abs() < f64::EPSILON);
        assert!((loc.height - 20.0).abs() < f64::EPSILON);
        assert!((loc.rotation - 330.0).abs() < 1e-9);
    }

    #[test]
    fn test_patch_keeps_unset_fields() {
        let base = ObjectLocation::new("a", 1.0, 2.0, 30.0, 40.0).with_z_index(3);
        let patched = LocationPatch::position(7.0, 8.0).apply(&base, MIN_OBJECT_SIZE);
        assert!((patched.left - 7.0).abs() < f64::EPSILON);
        assert!((patched.top - 8.0).abs() < f64::EPSILON);
        assert!((patched.width - 30.0).abs() < f64::EPSILON);
        assert_eq!(patched.z_index, 3);
        assert_eq!(patched.id, "a");
    }

    #[test]
    fn test_field_patch_round_trips_value() {
        let base = ObjectLocation::new("a", 0.0, 0.0, 30.0, 40.0);
        let patched = LocationField::ZIndex.patch(4.4).apply(&base, MIN_OBJECT_SIZE);
        assert_eq!(patched.z_index, 4);
        assert!((LocationField::ZIndex.value_of(&patched) - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_serde_uses_camel_case() {
        let json = r#"{"id":"x","top":1,"left":2,"width":30,"height":40,"zIndex":5}"#;
        let loc: ObjectLocation = serde_json::from_str(json).unwrap();
        assert_eq!(loc.z_index, 5);
        assert!((loc.rotation - 0.0).abs() < f64::EPSILON);
    }
}
