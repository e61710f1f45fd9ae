//! Orthocorrection of individual photographs.
//!
//! [`WarpPlanner`] ties the geometry of `ortho-geom` to three collaborators:
//!
//! * a [`Rasterizer`] that performs the perspective warp of the pixels,
//! * an [`ImageStore`] that keeps the original and the current representation of each image,
//! * a [`Notifier`] that is told whenever an image or its warp becomes (un)available.
//!
//! [`ImageprocRasterizer`], [`MemoryStore`] and [`DirectoryStore`] are ready to use
//! implementations. Notification is left to the host, for instance the control protocol.
//!
//! ```no_run
//! use ortho_core::AttitudeState;
//! use ortho_geom::CameraFov;
//! use ortho_warp::{ImageStore, ImageprocRasterizer, LogNotifier, MemoryStore, WarpPlanner};
//!
//! let planner = WarpPlanner::new(
//!     ImageprocRasterizer::default(),
//!     MemoryStore::new(),
//!     LogNotifier,
//!     CameraFov::new(1.0472, 1.5).unwrap(),
//! );
//! let id = planner.store().store_original(&image::open("photo.jpg").unwrap()).unwrap();
//! let state = AttitudeState::level(120.0).camera(0.2, 0.0);
//! let outcome = planner.correct_stored(id, &state).unwrap();
//! ```

mod notify;
mod planner;
mod rasterizer;
mod sequence;
mod settings;
mod store;

pub use notify::*;
pub use planner::*;
pub use rasterizer::*;
pub use sequence::*;
pub use settings::*;
pub use store::*;
