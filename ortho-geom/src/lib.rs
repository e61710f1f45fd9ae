//! This crate contains the projective geometry used to orthocorrect aerial photographs.
//!
//! ## Sight lines
//!
//! The camera is modelled as a point at a fixed `altitude` above a flat ground plane. A line of
//! sight leaving the camera at some pitch and roll meets the ground at a distance proportional
//! to the tangent of those angles. Seen from the side, with `A` the aircraft and `G` the ground
//! point:
//!
//! ```text
//!   A
//!   |\
//!   | \
//!   |  \   pitch measured from straight down
//! alt|   \
//!   |    \
//!   +-----G
//!   alt * tan(pitch)
//! ```
//!
//! The forward and right displacements are then rotated by the yaw of the aircraft into
//! north and east. See [`sight_line`].
//!
//! ## Footprints
//!
//! Projecting the lines of sight through the four corners of the field of view gives the
//! quadrilateral of ground the photograph covers. See [`footprint`].
//!
//! ## Canvas
//!
//! The ground quadrilateral is laid out on an integer pixel canvas large enough to avoid
//! losing resolution when the photograph is warped onto it. See [`canvas`].

pub mod canvas;
pub mod footprint;
pub mod sight_line;

pub use canvas::{map_to_canvas, CanvasError};
pub use footprint::{resolve_footprint, CameraFov, InvalidFov};
pub use sight_line::project_sight_line;
