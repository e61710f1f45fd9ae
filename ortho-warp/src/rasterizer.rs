use image::{DynamicImage, GenericImageView, Rgba, RgbaImage};
use imageproc::geometric_transformations::{warp_into, Interpolation, Projection};
use ortho_core::{CanvasSize, PixelCorner, WarpPlan};
use std::sync::Arc;
use thiserror::Error;

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RasterizationError {
    #[error("plan expects a {expected:?} source but the image is {actual:?}")]
    SizeMismatch {
        expected: CanvasSize,
        actual: CanvasSize,
    },
    #[error("destination canvas has no pixels")]
    EmptyCanvas,
    #[error("corners do not define a perspective transform")]
    SingularProjection,
    /// A failure reported by a rasterizer backed by something else.
    #[error("rasterizer failed: {0}")]
    Backend(String),
}

/// Performs the pixel work of a perspective warp.
pub trait Rasterizer {
    /// Warps `source` so that its corners land on the destination corners of `plan`, on a
    /// canvas of the destination size. Canvas pixels outside the warped image are fully
    /// transparent.
    fn warp(&self, source: &DynamicImage, plan: &WarpPlan)
        -> Result<DynamicImage, RasterizationError>;
}

impl<T: Rasterizer + ?Sized> Rasterizer for &T {
    fn warp(
        &self,
        source: &DynamicImage,
        plan: &WarpPlan,
    ) -> Result<DynamicImage, RasterizationError> {
        (**self).warp(source, plan)
    }
}

impl<T: Rasterizer + ?Sized> Rasterizer for Box<T> {
    fn warp(
        &self,
        source: &DynamicImage,
        plan: &WarpPlan,
    ) -> Result<DynamicImage, RasterizationError> {
        (**self).warp(source, plan)
    }
}

impl<T: Rasterizer + ?Sized> Rasterizer for Arc<T> {
    fn warp(
        &self,
        source: &DynamicImage,
        plan: &WarpPlan,
    ) -> Result<DynamicImage, RasterizationError> {
        (**self).warp(source, plan)
    }
}

/// How pixels are sampled from the source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde-serialize", serde(rename_all = "lowercase"))]
pub enum Resampling {
    Nearest,
    Bilinear,
    #[default]
    Bicubic,
}

impl From<Resampling> for Interpolation {
    fn from(resampling: Resampling) -> Self {
        match resampling {
            Resampling::Nearest => Interpolation::Nearest,
            Resampling::Bilinear => Interpolation::Bilinear,
            Resampling::Bicubic => Interpolation::Bicubic,
        }
    }
}

/// A [`Rasterizer`] using the projective warp of `imageproc`.
///
/// The output is always RGBA. Sources without an alpha channel are made fully opaque first so
/// that only the area outside the warped quadrilateral is transparent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImageprocRasterizer {
    resampling: Resampling,
}

impl ImageprocRasterizer {
    pub fn new(resampling: Resampling) -> Self {
        Self { resampling }
    }

    pub fn resampling(&self) -> Resampling {
        self.resampling
    }
}

impl Rasterizer for ImageprocRasterizer {
    fn warp(
        &self,
        source: &DynamicImage,
        plan: &WarpPlan,
    ) -> Result<DynamicImage, RasterizationError> {
        let actual = CanvasSize::new(source.width(), source.height());
        if actual != plan.source_size {
            return Err(RasterizationError::SizeMismatch {
                expected: plan.source_size,
                actual,
            });
        }
        let size = plan.destination_size();
        if size.area() == 0 {
            return Err(RasterizationError::EmptyCanvas);
        }

        let from = plan.source_corners.map(PixelCorner::to_f32).into_array();
        let to = plan.destination_corners().map(PixelCorner::to_f32).into_array();
        let projection = Projection::from_control_points(from, to)
            .ok_or(RasterizationError::SingularProjection)?;

        let source = source.to_rgba8();
        let transparent = Rgba([0, 0, 0, 0]);
        let mut canvas = RgbaImage::from_pixel(size.width, size.height, transparent);
        warp_into(
            &source,
            &projection,
            self.resampling.into(),
            transparent,
            &mut canvas,
        );
        Ok(DynamicImage::ImageRgba8(canvas))
    }
}
