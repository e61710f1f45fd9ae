#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// The orientation of an aircraft and its camera at the instant a photograph was taken.
///
/// All angles are in radians and all distances are in meters.
///
/// For the aircraft, a `yaw` of `0` points north and `pi / 2` points east, a `pitch` of `0` is
/// horizontal and a positive pitch points the nose upwards, and a `roll` of `0` is level while
/// a positive roll means the aircraft has rolled to the right.
///
/// For the camera, a `cam_pitch` of `0` points straight down and a positive pitch points towards
/// the nose of the aircraft, and a `cam_roll` of `0` points towards the center of the aircraft
/// while a positive roll points to the right.
///
/// `latitude` and `longitude` are carried along for logging only and take no part in any
/// geometric computation.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct AttitudeState {
    pub latitude: f64,
    pub longitude: f64,
    /// Height above the ground plane. Expected to be positive.
    pub altitude: f64,
    pub yaw: f64,
    pub pitch: f64,
    pub roll: f64,
    pub cam_pitch: f64,
    pub cam_roll: f64,
}

impl AttitudeState {
    /// A camera hanging straight down from a level aircraft flying north at `altitude`.
    pub fn level(altitude: f64) -> Self {
        Self {
            altitude,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn position(self, latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            ..self
        }
    }

    /// Set the aircraft attitude (yaw, pitch, roll).
    #[must_use]
    pub fn aircraft(self, yaw: f64, pitch: f64, roll: f64) -> Self {
        Self {
            yaw,
            pitch,
            roll,
            ..self
        }
    }

    /// Set the camera mount offsets relative to the aircraft.
    #[must_use]
    pub fn camera(self, cam_pitch: f64, cam_roll: f64) -> Self {
        Self {
            cam_pitch,
            cam_roll,
            ..self
        }
    }

    /// Checks that every field is a finite number.
    pub fn is_finite(&self) -> bool {
        [
            self.latitude,
            self.longitude,
            self.altitude,
            self.yaw,
            self.pitch,
            self.roll,
            self.cam_pitch,
            self.cam_roll,
        ]
        .iter()
        .all(|n| n.is_finite())
    }
}
