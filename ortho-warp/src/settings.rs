use crate::{ImageprocRasterizer, Resampling};
use ortho_geom::{CameraFov, InvalidFov};

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// The settings of an orthocorrection session.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct CorrectorSettings {
    /// The horizontal field of view of the camera in radians
    #[cfg_attr(
        feature = "serde-serialize",
        serde(default = "default_horizontal_fov")
    )]
    pub horizontal_fov: f64,
    /// The width of the camera's images divided by their height
    #[cfg_attr(feature = "serde-serialize", serde(default = "default_aspect_ratio"))]
    pub aspect_ratio: f64,
    /// How source pixels are sampled when warping
    #[cfg_attr(feature = "serde-serialize", serde(default))]
    pub resampling: Resampling,
    /// The name of the archive folder images of this session are kept in
    #[cfg_attr(feature = "serde-serialize", serde(default = "default_archive_name"))]
    pub archive_name: String,
}

impl Default for CorrectorSettings {
    fn default() -> Self {
        Self {
            horizontal_fov: default_horizontal_fov(),
            aspect_ratio: default_aspect_ratio(),
            resampling: Resampling::default(),
            archive_name: default_archive_name(),
        }
    }
}

impl CorrectorSettings {
    pub fn camera_fov(&self) -> Result<CameraFov, InvalidFov> {
        CameraFov::new(self.horizontal_fov, self.aspect_ratio)
    }

    pub fn rasterizer(&self) -> ImageprocRasterizer {
        ImageprocRasterizer::new(self.resampling)
    }
}

fn default_horizontal_fov() -> f64 {
    1.0472
}

fn default_aspect_ratio() -> f64 {
    1.5
}

fn default_archive_name() -> String {
    "session".to_owned()
}
