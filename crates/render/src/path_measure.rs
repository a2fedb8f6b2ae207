//! Length-measured paths
//!
//! Cairo can stroke a path but cannot cut one at a given length, which is
//! what the second sweep needs. [`MeasuredPath`] keeps its own segment list
//! and can emit any prefix of itself into a context.

use cairo::Context;
use line_watchface_types::Point;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    Line {
        from: Point,
        to: Point,
    },
    /// Clockwise on screen from `start` (radians, 0 = 3 o'clock) by `sweep`
    Arc {
        center: Point,
        radius: f64,
        start: f64,
        sweep: f64,
    },
}

impl Segment {
    pub fn length(&self) -> f64 {
        match self {
            Segment::Line { from, to } => from.distance_to(to),
            Segment::Arc { radius, sweep, .. } => radius * sweep.abs(),
        }
    }

    fn start_point(&self) -> Point {
        match self {
            Segment::Line { from, .. } => *from,
            Segment::Arc {
                center,
                radius,
                start,
                ..
            } => Point::new(center.x + radius * start.cos(), center.y + radius * start.sin()),
        }
    }

    /// Leading part of this segment with length `length`
    fn truncated(&self, length: f64) -> Segment {
        let total = self.length();
        let t = if total > 0.0 {
            (length / total).clamp(0.0, 1.0)
        } else {
            0.0
        };
        match *self {
            Segment::Line { from, to } => Segment::Line {
                from,
                to: Point::new(from.x + (to.x - from.x) * t, from.y + (to.y - from.y) * t),
            },
            Segment::Arc {
                center,
                radius,
                start,
                sweep,
            } => Segment::Arc {
                center,
                radius,
                start,
                sweep: sweep * t,
            },
        }
    }

    fn append_to(&self, cr: &Context, connect: bool) {
        let start = self.start_point();
        if connect {
            cr.line_to(start.x, start.y);
        } else {
            cr.move_to(start.x, start.y);
        }
        match *self {
            Segment::Line { to, .. } => cr.line_to(to.x, to.y),
            Segment::Arc {
                center,
                radius,
                start,
                sweep,
            } => {
                if sweep >= 0.0 {
                    cr.arc(center.x, center.y, radius, start, start + sweep);
                } else {
                    cr.arc_negative(center.x, center.y, radius, start, start + sweep);
                }
            }
        }
    }
}

/// Connected sequence of segments
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeasuredPath {
    segments: Vec<Segment>,
}

impl MeasuredPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line(mut self, from: Point, to: Point) -> Self {
        self.segments.push(Segment::Line { from, to });
        self
    }

    pub fn arc(mut self, center: Point, radius: f64, start: f64, sweep: f64) -> Self {
        self.segments.push(Segment::Arc {
            center,
            radius,
            start,
            sweep,
        });
        self
    }

    /// Polyline through `points`
    pub fn polyline(mut self, points: &[Point]) -> Self {
        for pair in points.windows(2) {
            self.segments.push(Segment::Line {
                from: pair[0],
                to: pair[1],
            });
        }
        self
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn length(&self) -> f64 {
        self.segments.iter().map(Segment::length).sum()
    }

    /// The first `length` units of the path
    pub fn prefix(&self, length: f64) -> MeasuredPath {
        let mut remaining = length.max(0.0);
        let mut segments = Vec::new();
        for segment in &self.segments {
            if remaining <= 0.0 {
                break;
            }
            let segment_length = segment.length();
            if segment_length <= remaining {
                segments.push(*segment);
            } else {
                segments.push(segment.truncated(remaining));
            }
            remaining -= segment_length;
        }
        MeasuredPath { segments }
    }

    /// The leading `fraction` (0..=1) of the path by length
    pub fn fraction(&self, fraction: f64) -> MeasuredPath {
        self.prefix(self.length() * fraction.clamp(0.0, 1.0))
    }

    /// Replace the context's current path with this one
    pub fn append_to(&self, cr: &Context) {
        cr.new_path();
        for (i, segment) in self.segments.iter().enumerate() {
            segment.append_to(cr, i > 0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_length_sums_segments() {
        let path = MeasuredPath::new()
            .line(Point::new(0.0, 0.0), Point::new(3.0, 4.0))
            .arc(Point::new(0.0, 0.0), 2.0, 0.0, PI);
        assert!((path.length() - (5.0 + 2.0 * PI)).abs() < 1e-9);
    }

    #[test]
    fn test_prefix_cuts_inside_segment() {
        let path = MeasuredPath::new().polyline(&[
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
        ]);
        let half = path.fraction(0.75);
        assert_eq!(half.segments().len(), 2);
        assert_eq!(
            half.segments()[1],
            Segment::Line {
                from: Point::new(10.0, 0.0),
                to: Point::new(10.0, 5.0)
            }
        );
        assert!((half.length() - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_prefix_of_arc_scales_sweep() {
        let path = MeasuredPath::new().arc(Point::new(0.0, 0.0), 10.0, -PI / 2.0, 2.0 * PI);
        let quarter = path.fraction(0.25);
        match quarter.segments()[0] {
            Segment::Arc { sweep, .. } => assert!((sweep - PI / 2.0).abs() < 1e-9),
            _ => panic!("expected arc"),
        }
        assert!(path.fraction(0.0).segments().is_empty());
    }
}
