use crate::{CanvasLayout, CanvasSize, Corners, PixelCorner};

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// Everything a rasterizer needs to perform a perspective warp of one photograph.
///
/// The source corners are always the corner pixels of the source image itself, so the
/// warp maps the whole photograph onto the quadrilateral described by the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct WarpPlan {
    pub source_size: CanvasSize,
    pub source_corners: Corners<PixelCorner>,
    pub destination: CanvasLayout,
}

impl WarpPlan {
    pub fn new(source_size: CanvasSize, destination: CanvasLayout) -> Self {
        let right = source_size.width.saturating_sub(1);
        let bottom = source_size.height.saturating_sub(1);
        Self {
            source_size,
            source_corners: Corners::new(
                PixelCorner::new(0, 0),
                PixelCorner::new(right, 0),
                PixelCorner::new(right, bottom),
                PixelCorner::new(0, bottom),
            ),
            destination,
        }
    }

    pub fn destination_corners(&self) -> Corners<PixelCorner> {
        self.destination.corners
    }

    pub fn destination_size(&self) -> CanvasSize {
        self.destination.size
    }
}
