//! Handle definitions for object manipulation.

use crate::geometry::Compass;
use crate::object::ObjectLocation;
use kurbo::{Point, Vec2};

/// The kind of handle - determines what manipulation it performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleKind {
    /// Corner or edge handle for resizing.
    Resize(Compass),
    /// Rotation handle (outside the north edge).
    Rotate,
}

/// A manipulation handle on the selected object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    /// The kind of handle (determines behavior).
    pub kind: HandleKind,
    /// Position in board coordinates.
    pub position: Point,
}

impl Handle {
    /// Create a new handle.
    pub fn new(kind: HandleKind, position: Point) -> Self {
        Self { kind, position }
    }

    /// Check if a board point hits this handle.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let dx = point.x - self.position.x;
        let dy = point.y - self.position.y;
        dx * dx + dy * dy <= tolerance * tolerance
    }
}

/// Get the handles for an object: the rotate handle first, then the eight
/// compass handles clockwise from north.
///
/// Compass handles are the axis-aligned corners and edge midpoints rotated
/// about the center. The rotate handle sits `rotate_offset` beyond the north
/// edge along the rotated north normal.
pub fn object_handles(location: &ObjectLocation, rotate_offset: f64) -> Vec<Handle> {
    let half_w = location.width / 2.0;
    let half_h = location.height / 2.0;

    let mut handles = Vec::with_capacity(9);
    handles.push(Handle::new(
        HandleKind::Rotate,
        location.to_board(Vec2::new(0.0, -half_h - rotate_offset)),
    ));
    for compass in Compass::ALL {
        let (ux, uy) = compass.unit_offset();
        handles.push(Handle::new(
            HandleKind::Resize(compass),
            location.to_board(Vec2::new(ux * half_w, uy * half_h)),
        ));
    }
    handles
}

/// Find which handle (if any) is hit at the given point.
pub fn hit_test_handles(
    location: &ObjectLocation,
    point: Point,
    rotate_offset: f64,
    tolerance: f64,
) -> Option<HandleKind> {
    object_handles(location, rotate_offset)
        .into_iter()
        .find(|handle| handle.hit_test(point, tolerance))
        .map(|handle| handle.kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_near(a: Point, b: Point) {
        assert!((a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9, "{a:?} != {b:?}");
    }

    #[test]
    fn test_unrotated_handles() {
        let loc = ObjectLocation::new("a", 0.0, 0.0, 100.0, 50.0);
        let handles = object_handles(&loc, 32.0);

        assert_eq!(handles.len(), 9);
        assert_eq!(handles[0].kind, HandleKind::Rotate);
        assert_near(handles[0].position, Point::new(50.0, -32.0));

        let find = |c: Compass| {
            handles
                .iter()
                .find(|h| h.kind == HandleKind::Resize(c))
                .map(|h| h.position)
                .unwrap()
        };
        assert_near(find(Compass::NW), Point::new(0.0, 0.0));
        assert_near(find(Compass::SE), Point::new(100.0, 50.0));
        assert_near(find(Compass::E), Point::new(100.0, 25.0));
        assert_near(find(Compass::S), Point::new(50.0, 50.0));
    }

    #[test]
    fn test_rotated_handles() {
        // Rotated a quarter turn clockwise: north now points east.
        let loc = ObjectLocation::new("a", 0.0, 0.0, 100.0, 50.0).with_rotation(90.0);
        let handles = object_handles(&loc, 32.0);
        assert_near(handles[0].position, Point::new(50.0 + 25.0 + 32.0, 25.0));

        let ne = handles
            .iter()
            .find(|h| h.kind == HandleKind::Resize(Compass::NE))
            .unwrap();
        assert_near(ne.position, Point::new(75.0, 75.0));
    }

    #[test]
    fn test_handle_hit_test() {
        let handle = Handle::new(HandleKind::Rotate, Point::new(50.0, 50.0));

        assert!(handle.hit_test(Point::new(50.0, 50.0), 10.0));
        assert!(handle.hit_test(Point::new(55.0, 55.0), 10.0));
        assert!(!handle.hit_test(Point::new(70.0, 70.0), 10.0));
    }

    #[test]
    fn test_hit_test_handles() {
        let loc = ObjectLocation::new("a", 0.0, 0.0, 100.0, 50.0);
        assert_eq!(
            hit_test_handles(&loc, Point::new(101.0, 49.0), 32.0, 6.0),
            Some(HandleKind::Resize(Compass::SE))
        );
        assert_eq!(
            hit_test_handles(&loc, Point::new(50.0, -30.0), 32.0, 6.0),
            Some(HandleKind::Rotate)
        );
        assert_eq!(hit_test_handles(&loc, Point::new(50.0, 25.0), 32.0, 6.0), None);
    }
}
