//! Plain geometry shared by layout, rendering and hit testing.

use serde::{Deserialize, Serialize};

/// A point in surface pixels, origin top-left
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    /// Rotate around `pivot` by `angle` radians (clockwise on screen)
    pub fn rotate_around(&self, pivot: &Point, angle: f64) -> Point {
        let (sin, cos) = angle.sin_cos();
        let dx = self.x - pivot.x;
        let dy = self.y - pivot.y;
        Point::new(pivot.x + dx * cos - dy * sin, pivot.y + dx * sin + dy * cos)
    }
}

/// Axis aligned rectangle
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    pub const fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn from_center(center: Point, width: f64, height: f64) -> Self {
        Self::new(
            center.x - width / 2.0,
            center.y - height / 2.0,
            center.x + width / 2.0,
            center.y + height / 2.0,
        )
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.left + self.right) / 2.0,
            (self.top + self.bottom) / 2.0,
        )
    }

    pub fn contains(&self, point: &Point) -> bool {
        point.x >= self.left && point.x <= self.right && point.y >= self.top && point.y <= self.bottom
    }
}

/// Where a complication is drawn: centre plus nominal radius
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Anchor {
    pub center: Point,
    pub radius: f64,
}

impl Anchor {
    pub const fn new(x: f64, y: f64, radius: f64) -> Self {
        Self {
            center: Point::new(x, y),
            radius,
        }
    }
}

/// Bounding shape registered for hit testing
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum TapShape {
    Circle { center: Point, radius: f64 },
    /// Rounded rectangle whose ends are half discs of diameter `height`
    Pill(Rect),
}

impl TapShape {
    pub fn contains(&self, point: &Point) -> bool {
        match self {
            TapShape::Circle { center, radius } => center.distance_to(point) <= *radius,
            TapShape::Pill(rect) => {
                if !rect.contains(point) {
                    return false;
                }
                let cap = rect.height() / 2.0;
                let mid_y = rect.top + cap;
                if point.x < rect.left + cap {
                    Point::new(rect.left + cap, mid_y).distance_to(point) <= cap
                } else if point.x > rect.right - cap {
                    Point::new(rect.right - cap, mid_y).distance_to(point) <= cap
                } else {
                    true
                }
            }
        }
    }

    pub fn bounds(&self) -> Rect {
        match self {
            TapShape::Circle { center, radius } => {
                Rect::from_center(*center, radius * 2.0, radius * 2.0)
            }
            TapShape::Pill(rect) => *rect,
        }
    }
}
