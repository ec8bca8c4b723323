//! Geometry-driven interpretation of labeled lines.
//!
//! Stages
//! - `orientation`: remove the hand's in-plane rotation.
//! - `geometry`: mounts, strength and length classes, end tangents, branch
//!   tracks.
//! - `bifurcation`: two-means split of tangent directions near an end.
//! - `predicates`: per-label condition policy.
//! - `narrative`: rule-table lookup and assembly.
//!
//! The whole stage is a pure function of the lines, the canvas size, the
//! rule table and the parameters.

pub mod bifurcation;
pub mod geometry;
pub mod narrative;
pub mod orientation;
pub mod predicates;

pub use bifurcation::{has_branch_near, is_bifurcated, two_means_extrema, TwoMeans};
pub use geometry::{mount_of_point, Canvas, Mount};
pub use narrative::{analyze_lines, interpret, render, Interpretation};
pub use orientation::{normalize_rotation, Normalized};
pub use predicates::{line_findings, LineFindings};
