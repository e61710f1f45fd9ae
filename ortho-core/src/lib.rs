//! # Ortho Core
//!
//! This library provides the common types shared by the orthocorrection crates. It describes
//! where an aircraft and its camera were pointing when a photograph was taken, where the corners
//! of that photograph land on the ground, and how those ground corners are laid out on the
//! pixel canvas that a perspective warp renders into.
//!
//! No computation lives here apart from trivial accessors. The projective geometry is in
//! `ortho-geom` and the orchestration of a warp is in `ortho-warp`.
//!
//! ## Frames
//!
//! Ground distances are measured on a flat earth from the point directly below the aircraft,
//! with north and east positive. Pixel coordinates follow the usual image convention: the
//! origin is the top-left corner, `x` grows to the right and `y` grows downwards.
//!
//! ```text
//!          north
//!            ^
//!            |     top-left     top-right
//!            |         +-----------+
//!            |          \         /
//!  west -----O-----> east \      /
//!            |             +----+
//!            |     bottom-left  bottom-right
//! ```
//!
//! The footprint of an oblique photograph is generally not a rectangle. Corners are always
//! listed in the winding order of the source image: top-left, top-right, bottom-right,
//! bottom-left.

mod attitude;
mod canvas;
mod corners;
mod ground;
mod plan;

pub use attitude::*;
pub use canvas::*;
pub use corners::*;
pub use ground::*;
pub use nalgebra;
pub use plan::*;
