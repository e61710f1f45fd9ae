//! The ground footprint of the camera's field of view.

use crate::project_sight_line;
use core::f64::consts::PI;
use ortho_core::{AttitudeState, Corners, Footprint};
use thiserror::Error;

/// A field of view that cannot describe a real camera.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("invalid field of view: horizontal {horizontal} rad, aspect ratio {aspect_ratio}")]
pub struct InvalidFov {
    pub horizontal: f64,
    pub aspect_ratio: f64,
}

/// The angular extent of the camera's image.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct CameraFov {
    horizontal: f64,
    aspect_ratio: f64,
}

impl CameraFov {
    /// `horizontal` is the horizontal field of view in radians, which must lie strictly between
    /// `0` and `pi`. `aspect_ratio` is the width of the image divided by its height and must be
    /// positive.
    pub fn new(horizontal: f64, aspect_ratio: f64) -> Result<Self, InvalidFov> {
        // The negated comparisons reject NaN as well.
        if !(horizontal > 0.0 && horizontal < PI) || !(aspect_ratio > 0.0 && aspect_ratio.is_finite())
        {
            return Err(InvalidFov {
                horizontal,
                aspect_ratio,
            });
        }
        Ok(Self {
            horizontal,
            aspect_ratio,
        })
    }

    pub fn horizontal(&self) -> f64 {
        self.horizontal
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.aspect_ratio
    }

    /// The vertical field of view implied by the horizontal one and the aspect ratio.
    pub fn vertical(&self) -> f64 {
        2.0 * ((self.horizontal / 2.0).tan() / self.aspect_ratio).atan()
    }

    /// The `(d_pitch, d_roll)` offsets of the image corners from the boresight.
    pub fn corner_offsets(&self) -> Corners<(f64, f64)> {
        let half_v = self.vertical() / 2.0;
        let half_h = self.horizontal / 2.0;
        Corners::new(
            (half_v, -half_h),
            (half_v, half_h),
            (-half_v, half_h),
            (-half_v, -half_h),
        )
    }

    /// See [`resolve_footprint`].
    pub fn footprint(&self, state: &AttitudeState) -> Footprint {
        resolve_footprint(state, self)
    }
}

/// Projects the four corners of the field of view onto the ground.
///
/// If any of the corners points at the sky, or lands so far away that its distance is no longer
/// finite, the horizon is in view and [`Footprint::HorizonVisible`] is returned. A footprint is
/// never partially resolved.
pub fn resolve_footprint(state: &AttitudeState, fov: &CameraFov) -> Footprint {
    let [top_left, top_right, bottom_right, bottom_left] = fov
        .corner_offsets()
        .map(|(d_pitch, d_roll)| project_sight_line(state, d_pitch, d_roll).ground())
        .into_array();
    match (top_left, top_right, bottom_right, bottom_left) {
        (Some(tl), Some(tr), Some(br), Some(bl)) => {
            Footprint::Visible(Corners::new(tl, tr, br, bl))
        }
        _ => Footprint::HorizonVisible,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use core::f64::consts::{FRAC_PI_2, FRAC_PI_3};

    #[test]
    fn rejects_impossible_fov() {
        assert!(CameraFov::new(0.0, 1.0).is_err());
        assert!(CameraFov::new(PI, 1.0).is_err());
        assert!(CameraFov::new(1.0, 0.0).is_err());
        assert!(CameraFov::new(f64::NAN, 1.0).is_err());
        assert!(CameraFov::new(1.0, f64::INFINITY).is_err());
        assert!(CameraFov::new(1.0, 1.5).is_ok());
    }

    #[test]
    fn square_image_has_equal_fovs() {
        let fov = CameraFov::new(1.0, 1.0).unwrap();
        assert_relative_eq!(fov.vertical(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn level_flight_winding() {
        let fov = CameraFov::new(FRAC_PI_3, 4.0 / 3.0).unwrap();
        let corners = fov
            .footprint(&AttitudeState::level(100.0))
            .corners()
            .expect("level flight should see the ground");
        for corner in corners.iter() {
            assert!(corner.is_finite());
        }
        assert!(corners.top_left.east < corners.top_right.east);
        assert!(corners.bottom_left.east < corners.bottom_right.east);
        assert!(corners.top_left.north > corners.bottom_left.north);
        assert!(corners.top_right.north > corners.bottom_right.north);

        // Level flight is symmetric about the point below the aircraft.
        assert_relative_eq!(corners.top_left.north, -corners.bottom_left.north, epsilon = 1e-9);
        assert_relative_eq!(corners.top_left.east, -corners.top_right.east, epsilon = 1e-9);
    }

    #[test]
    fn nose_up_sees_horizon() {
        for &horizontal in &[0.1, 0.5, FRAC_PI_3, 2.0, 3.0] {
            let fov = CameraFov::new(horizontal, 1.5).unwrap();
            let state = AttitudeState::level(100.0).aircraft(0.3, FRAC_PI_2 - 0.001, 0.0);
            assert!(resolve_footprint(&state, &fov).is_horizon_visible());
        }
    }

    #[test]
    fn unbounded_distance_sees_horizon() {
        let fov = CameraFov::new(FRAC_PI_3, 1.5).unwrap();
        let state = AttitudeState::level(f64::INFINITY);
        assert!(!state.is_finite());
        assert_eq!(resolve_footprint(&state, &fov), Footprint::HorizonVisible);

        // Every corner passes the sky test but lands infinitely far away.
        let corner = fov.corner_offsets().top_left;
        assert!(!project_sight_line(&state, corner.0, corner.1).is_sky());
    }

    #[test]
    fn steep_bank_sees_horizon() {
        let fov = CameraFov::new(FRAC_PI_3, 1.5).unwrap();
        let state = AttitudeState::level(100.0).aircraft(0.0, 0.0, 1.3);
        assert_eq!(resolve_footprint(&state, &fov), Footprint::HorizonVisible);
    }
}
