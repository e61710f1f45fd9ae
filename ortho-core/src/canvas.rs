use crate::Corners;
use derive_more::{AsMut, AsRef, Deref, DerefMut, From, Into};
use nalgebra::Point2;

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// A corner on the destination canvas of a warp, in whole pixels.
///
/// The origin is the top-left of the canvas with `y` growing downwards, so coordinates
/// are never negative.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, AsMut, AsRef, Deref, DerefMut, From, Into,
)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct PixelCorner(pub Point2<u32>);

impl PixelCorner {
    pub fn new(x: u32, y: u32) -> Self {
        Self(Point2::new(x, y))
    }

    /// The corner as floating point coordinates, as consumed by projective transforms.
    pub fn to_f32(self) -> (f32, f32) {
        (self.x as f32, self.y as f32)
    }
}

/// The dimensions of a raster in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

/// Where the footprint of a photograph lands on the destination canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct CanvasLayout {
    /// Destination corners in the winding order of the source image.
    pub corners: Corners<PixelCorner>,
    pub size: CanvasSize,
    /// Pixels per meter of ground that the footprint was scaled by.
    pub scale: u32,
}
