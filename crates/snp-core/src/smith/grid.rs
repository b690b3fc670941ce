//! Smith chart grid generation
//!
//! Impedance mode draws constant resistance circles and constant reactance
//! arcs. Admittance mode mirrors them through the origin as conductance
//! circles and susceptance arcs. All values are normalized to the reference
//! impedance.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::geometry::{unit_circle_intersections, visible_arc, Point, UnitCircleIntersection};
use crate::constants::NEAR_ZERO;

/// Default constant-resistance (or conductance) values
pub const DEFAULT_CIRCLE_VALUES: [f64; 5] = [0.2, 0.5, 1.0, 2.0, 5.0];

/// Default constant-reactance (or susceptance) values
pub const DEFAULT_ARC_VALUES: [f64; 8] = [-5.0, -2.0, -1.0, -0.5, 0.5, 1.0, 2.0, 5.0];

/// Which family of grid lines to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GridMode {
    #[default]
    Impedance,
    Admittance,
}

/// One grid line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GridElement {
    ResistanceCircle {
        value: f64,
        center: Point,
        radius: f64,
    },
    ReactanceArc {
        value: f64,
        center: Point,
        radius: f64,
    },
    ConductanceCircle {
        value: f64,
        center: Point,
        radius: f64,
    },
    SusceptanceArc {
        value: f64,
        center: Point,
        radius: f64,
    },
    /// Zero reactance or susceptance, the real axis
    AxisLine {
        value: f64,
        start: Point,
        end: Point,
    },
}

impl GridElement {
    /// Constant normalized resistance `r ≥ 0`
    pub fn resistance_circle(r: f64) -> Self {
        GridElement::ResistanceCircle {
            value: r,
            center: (r / (1.0 + r), 0.0),
            radius: 1.0 / (1.0 + r),
        }
    }

    /// Constant normalized conductance `g ≥ 0`
    pub fn conductance_circle(g: f64) -> Self {
        GridElement::ConductanceCircle {
            value: g,
            center: (-g / (1.0 + g), 0.0),
            radius: 1.0 / (1.0 + g),
        }
    }

    /// Constant normalized reactance, the real axis for `x = 0`
    pub fn reactance_arc(x: f64) -> Self {
        if x.abs() < NEAR_ZERO {
            return Self::axis(x);
        }
        GridElement::ReactanceArc {
            value: x,
            center: (1.0, 1.0 / x),
            radius: (1.0 / x).abs(),
        }
    }

    /// Constant normalized susceptance, the real axis for `b = 0`
    pub fn susceptance_arc(b: f64) -> Self {
        if b.abs() < NEAR_ZERO {
            return Self::axis(b);
        }
        GridElement::SusceptanceArc {
            value: b,
            center: (-1.0, -1.0 / b),
            radius: (1.0 / b).abs(),
        }
    }

    fn axis(value: f64) -> Self {
        GridElement::AxisLine {
            value,
            start: (-1.0, 0.0),
            end: (1.0, 0.0),
        }
    }

    pub fn value(&self) -> f64 {
        match *self {
            GridElement::ResistanceCircle { value, .. }
            | GridElement::ReactanceArc { value, .. }
            | GridElement::ConductanceCircle { value, .. }
            | GridElement::SusceptanceArc { value, .. }
            | GridElement::AxisLine { value, .. } => value,
        }
    }

    /// Circle center, `None` for the axis line
    pub fn center(&self) -> Option<Point> {
        match *self {
            GridElement::ResistanceCircle { center, .. }
            | GridElement::ReactanceArc { center, .. }
            | GridElement::ConductanceCircle { center, .. }
            | GridElement::SusceptanceArc { center, .. } => Some(center),
            GridElement::AxisLine { .. } => None,
        }
    }

    /// Circle radius, `None` for the axis line
    pub fn radius(&self) -> Option<f64> {
        match *self {
            GridElement::ResistanceCircle { radius, .. }
            | GridElement::ReactanceArc { radius, .. }
            | GridElement::ConductanceCircle { radius, .. }
            | GridElement::SusceptanceArc { radius, .. } => Some(radius),
            GridElement::AxisLine { .. } => None,
        }
    }

    pub fn is_circle(&self) -> bool {
        matches!(
            self,
            GridElement::ResistanceCircle { .. } | GridElement::ConductanceCircle { .. }
        )
    }

    pub fn is_arc(&self) -> bool {
        matches!(
            self,
            GridElement::ReactanceArc { .. }
                | GridElement::SusceptanceArc { .. }
                | GridElement::AxisLine { .. }
        )
    }

    /// Where the element meets the chart boundary
    pub fn boundary_intersections(&self) -> UnitCircleIntersection {
        match *self {
            GridElement::AxisLine { start, end, .. } => UnitCircleIntersection::Secant(start, end),
            _ => match (self.center(), self.radius()) {
                (Some(center), Some(radius)) => unit_circle_intersections(center, radius),
                _ => UnitCircleIntersection::None,
            },
        }
    }

    /// Sample the part of the element visible on the chart
    pub fn points(&self, n: usize) -> Vec<Point> {
        match *self {
            GridElement::AxisLine { start, end, .. } => {
                let step = if n > 1 { 1.0 / (n - 1) as f64 } else { 0.0 };
                (0..n)
                    .map(|i| {
                        let t = step * i as f64;
                        (start.0 + t * (end.0 - start.0), start.1 + t * (end.1 - start.1))
                    })
                    .collect()
            }
            _ => match (self.center(), self.radius()) {
                (Some(center), Some(radius)) => visible_arc(center, radius, n),
                _ => Vec::new(),
            },
        }
    }
}

/// Grid settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmithGridConfig {
    pub mode: GridMode,
    /// Resistance or conductance values
    pub circle_values: Vec<f64>,
    /// Reactance or susceptance values
    pub arc_values: Vec<f64>,
}

impl Default for SmithGridConfig {
    fn default() -> Self {
        Self::for_mode(GridMode::default())
    }
}

impl SmithGridConfig {
    /// Default values for `mode`
    pub fn for_mode(mode: GridMode) -> Self {
        Self {
            mode,
            circle_values: DEFAULT_CIRCLE_VALUES.to_vec(),
            arc_values: DEFAULT_ARC_VALUES.to_vec(),
        }
    }

    /// Build the grid
    ///
    /// Negative or non-finite circle values and non-finite arc values are
    /// skipped.
    pub fn generate(&self) -> SmithGrid {
        let (circle, arc): (fn(f64) -> GridElement, fn(f64) -> GridElement) = match self.mode {
            GridMode::Impedance => (GridElement::resistance_circle, GridElement::reactance_arc),
            GridMode::Admittance => (GridElement::conductance_circle, GridElement::susceptance_arc),
        };

        let mut elements = Vec::with_capacity(self.circle_values.len() + self.arc_values.len());
        for &value in &self.circle_values {
            if value.is_finite() && value >= 0.0 {
                elements.push(circle(value));
            } else {
                debug!(value, mode = ?self.mode, "skipping grid circle value");
            }
        }
        for &value in &self.arc_values {
            if value.is_finite() {
                elements.push(arc(value));
            } else {
                debug!(value, mode = ?self.mode, "skipping grid arc value");
            }
        }

        SmithGrid {
            mode: self.mode,
            elements,
        }
    }
}

/// A generated grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmithGrid {
    pub mode: GridMode,
    pub elements: Vec<GridElement>,
}

impl SmithGrid {
    pub fn circles(&self) -> impl Iterator<Item = &GridElement> {
        self.elements.iter().filter(|e| e.is_circle())
    }

    pub fn arcs(&self) -> impl Iterator<Item = &GridElement> {
        self.elements.iter().filter(|e| e.is_arc())
    }
}

/// Generate a grid, using the defaults for any values not given
///
/// # Example
/// ```
/// use snp_core::smith::{smith_grid, GridMode};
///
/// let grid = smith_grid(GridMode::Impedance, Some(&[1.0]), Some(&[]));
/// assert_eq!(grid.elements.len(), 1);
/// assert_eq!(grid.elements[0].center(), Some((0.5, 0.0)));
/// ```
pub fn smith_grid(mode: GridMode, circles: Option<&[f64]>, arcs: Option<&[f64]>) -> SmithGrid {
    let mut config = SmithGridConfig::for_mode(mode);
    if let Some(values) = circles {
        config.circle_values = values.to_vec();
    }
    if let Some(values) = arcs {
        config.arc_values = values.to_vec();
    }
    config.generate()
}
