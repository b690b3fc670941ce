//! Circle geometry on the reflection coefficient plane
//!
//! Grid circles are clipped against the unit disk `x² + y² ≤ 1`. All
//! intersection points are returned in chart coordinates.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::constants::{NEAR_ZERO, TANGENT_TOL};

/// A point `(x, y)` on the chart
pub type Point = (f64, f64);

/// Slack allowed when deciding that a sampled point is inside the disk
const DISK_SLACK: f64 = 1e-9;

/// How a circle meets the unit circle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum UnitCircleIntersection {
    /// The circles do not touch
    None,
    /// The circle is the unit circle itself
    Coincident,
    /// The circles touch at a single point
    Tangent(Point),
    /// The circles cross at two points
    Secant(Point, Point),
}

impl UnitCircleIntersection {
    /// The discrete intersection points, empty for `None` and `Coincident`
    pub fn points(&self) -> Vec<Point> {
        match *self {
            UnitCircleIntersection::None | UnitCircleIntersection::Coincident => Vec::new(),
            UnitCircleIntersection::Tangent(p) => vec![p],
            UnitCircleIntersection::Secant(p1, p2) => vec![p1, p2],
        }
    }
}

/// Intersect the circle `(center, radius)` with the unit circle
///
/// Tangency is detected with a tolerance of `1e-12` on the center distance.
pub fn unit_circle_intersections(center: Point, radius: f64) -> UnitCircleIntersection {
    let (cx, cy) = center;
    let r = radius.abs();
    if !(r.is_finite() && cx.is_finite() && cy.is_finite()) {
        return UnitCircleIntersection::None;
    }

    let d = cx.hypot(cy);
    if d < NEAR_ZERO {
        return if (r - 1.0).abs() < TANGENT_TOL {
            UnitCircleIntersection::Coincident
        } else {
            UnitCircleIntersection::None
        };
    }

    // unit vector from the origin towards the center
    let (ux, uy) = (cx / d, cy / d);

    if (d - (r - 1.0).abs()).abs() < TANGENT_TOL {
        // internal tangency: a small circle touches on the far side of its
        // center, a large one on the near side
        let p = if r < 1.0 { (ux, uy) } else { (-ux, -uy) };
        return UnitCircleIntersection::Tangent(p);
    }
    if (d - (r + 1.0)).abs() < TANGENT_TOL {
        return UnitCircleIntersection::Tangent((ux, uy));
    }
    if d > r + 1.0 || d + 1.0 < r || d + r < 1.0 {
        return UnitCircleIntersection::None;
    }

    let a = (1.0 - r * r + d * d) / (2.0 * d);
    let h = (1.0 - a * a).max(0.0).sqrt();
    let (mx, my) = (a * ux, a * uy);
    UnitCircleIntersection::Secant((mx - h * uy, my + h * ux), (mx + h * uy, my - h * ux))
}

fn inside_disk(p: Point) -> bool {
    p.0.hypot(p.1) <= 1.0 + DISK_SLACK
}

/// `n` evenly spaced points on the unit circle, closing back on the first
pub fn unit_circle(n: usize) -> Vec<Point> {
    arc_points((0.0, 0.0), 1.0, 0.0, 2.0 * PI, n)
}

/// Sample a circle from angle `start` to `end` (radians, about the center)
///
/// Points that fall outside the unit disk are dropped.
pub fn arc_points(center: Point, radius: f64, start: f64, end: f64, n: usize) -> Vec<Point> {
    let step = if n > 1 {
        (end - start) / (n - 1) as f64
    } else {
        0.0
    };
    (0..n)
        .map(|i| {
            let t = start + step * i as f64;
            (center.0 + radius * t.cos(), center.1 + radius * t.sin())
        })
        .filter(|&p| inside_disk(p))
        .collect()
}

/// Sample the part of a circle that lies inside the unit disk
///
/// A circle that crosses the boundary is sampled along the single arc
/// between its two crossings that stays inside. Circles entirely inside
/// are sampled whole. Circles that only touch the disk from outside yield
/// the tangency point.
pub fn visible_arc(center: Point, radius: f64, n: usize) -> Vec<Point> {
    let r = radius.abs();
    match unit_circle_intersections(center, r) {
        UnitCircleIntersection::Coincident => unit_circle(n),
        UnitCircleIntersection::Tangent(p) => {
            if r < 1.0 && inside_disk(center) {
                arc_points(center, r, 0.0, 2.0 * PI, n)
            } else {
                vec![p]
            }
        }
        UnitCircleIntersection::None => {
            let d = center.0.hypot(center.1);
            if r.is_finite() && d + r < 1.0 {
                arc_points(center, r, 0.0, 2.0 * PI, n)
            } else {
                Vec::new()
            }
        }
        UnitCircleIntersection::Secant(p1, p2) => {
            let t1 = (p1.1 - center.1).atan2(p1.0 - center.0);
            let t2 = (p2.1 - center.1).atan2(p2.0 - center.0);
            let sweep = (t2 - t1).rem_euclid(2.0 * PI);

            let mid = t1 + sweep / 2.0;
            let mid_point = (center.0 + r * mid.cos(), center.1 + r * mid.sin());
            if inside_disk(mid_point) {
                arc_points(center, r, t1, t1 + sweep, n)
            } else {
                arc_points(center, r, t2, t2 + (2.0 * PI - sweep), n)
            }
        }
    }
}
