use crate::Corners;
use nalgebra::Vector2;

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// A displacement on the ground plane from the point directly below the aircraft.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct GroundOffset {
    /// Meters to the north (negative is south).
    pub north: f64,
    /// Meters to the east (negative is west).
    pub east: f64,
}

impl GroundOffset {
    pub fn new(north: f64, east: f64) -> Self {
        Self { north, east }
    }

    pub fn is_finite(&self) -> bool {
        self.north.is_finite() && self.east.is_finite()
    }
}

/// The vector is interpreted as `<north, east>`.
impl From<Vector2<f64>> for GroundOffset {
    fn from(v: Vector2<f64>) -> Self {
        Self::new(v.x, v.y)
    }
}

impl From<GroundOffset> for Vector2<f64> {
    fn from(offset: GroundOffset) -> Self {
        Vector2::new(offset.north, offset.east)
    }
}

/// Where a single line of sight out of the camera meets the ground.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub enum SightLine {
    /// The ray intersects the ground plane at this offset.
    ///
    /// Near the sky boundary the offset may be enormous or even non-finite.
    Ground(GroundOffset),
    /// The ray points at or above the horizon and never meets the ground.
    Sky,
}

impl SightLine {
    /// Retrieves the ground offset if the ray hits the ground at a finite distance.
    pub fn ground(self) -> Option<GroundOffset> {
        match self {
            Self::Ground(offset) if offset.is_finite() => Some(offset),
            _ => None,
        }
    }

    pub fn is_sky(&self) -> bool {
        matches!(self, Self::Sky)
    }
}

/// The region of ground visible to the camera.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub enum Footprint {
    /// All four corners of the image land on the ground.
    Visible(Corners<GroundOffset>),
    /// At least one corner of the image sees the sky, so the footprint has no finite extent.
    HorizonVisible,
}

impl Footprint {
    pub fn corners(self) -> Option<Corners<GroundOffset>> {
        match self {
            Self::Visible(corners) => Some(corners),
            Self::HorizonVisible => None,
        }
    }

    pub fn is_horizon_visible(&self) -> bool {
        matches!(self, Self::HorizonVisible)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_finite_ground_is_not_ground() {
        assert_eq!(
            SightLine::Ground(GroundOffset::new(3.0, -4.0)).ground(),
            Some(GroundOffset::new(3.0, -4.0))
        );
        assert_eq!(SightLine::Ground(GroundOffset::new(f64::NAN, 0.0)).ground(), None);
        assert_eq!(
            SightLine::Ground(GroundOffset::new(0.0, f64::NEG_INFINITY)).ground(),
            None
        );
        assert_eq!(SightLine::Sky.ground(), None);
    }
}
