//! Smith chart support
//!
//! Reflection coefficient extraction and transforms, grid generation, and
//! the circle geometry needed to clip grid lines to the chart.

pub mod gamma;
pub mod geometry;
pub mod grid;

pub use gamma::{
    gamma_to_network, gamma_to_y, gamma_to_z, reflection_points, y_to_gamma, z_to_gamma,
    ReflectionPoint, SmithError,
};
pub use geometry::{unit_circle_intersections, visible_arc, Point, UnitCircleIntersection};
pub use grid::{smith_grid, GridElement, GridMode, SmithGrid, SmithGridConfig};
