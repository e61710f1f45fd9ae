//! Projection of a single line of sight onto the ground plane.

use core::f64::consts::FRAC_PI_2;
use ortho_core::nalgebra::{Rotation2, Vector2};
use ortho_core::{AttitudeState, GroundOffset, SightLine};

/// Computes where a line of sight out of the camera meets the ground.
///
/// `d_pitch` and `d_roll` are the angles of the ray above and to the right of where the center
/// of the camera points. Negative values describe rays below and to the left of the boresight.
///
/// The pitch and roll of the ray are accumulated from the aircraft, the camera mount and the
/// offsets. The aircraft roll enters with its sign inverted: rolling the aircraft right swings
/// the camera boresight left.
///
/// The ray is considered to point at the sky when `|pitch| + |d_pitch|` or `|roll| + |d_roll|`
/// reaches `pi / 2`. Note that the offset is counted twice in that test, so rays slightly short
/// of the horizon are already rejected when the offset is large.
///
/// Rays just inside that boundary may produce huge or non-finite offsets. They are returned as
/// they are and it is up to the caller to reject them, see [`SightLine::ground`].
///
/// ```
/// use ortho_core::{AttitudeState, GroundOffset, SightLine};
/// use ortho_geom::project_sight_line;
///
/// let straight_down = project_sight_line(&AttitudeState::level(100.0), 0.0, 0.0);
/// assert_eq!(straight_down, SightLine::Ground(GroundOffset::new(0.0, 0.0)));
/// ```
pub fn project_sight_line(state: &AttitudeState, d_pitch: f64, d_roll: f64) -> SightLine {
    let pitch = state.pitch + state.cam_pitch + d_pitch;
    let roll = -state.roll + state.cam_roll + d_roll;

    // TODO: compare |pitch| and |roll| alone once downstream consumers agree on the boundary.
    if pitch.abs() + d_pitch.abs() >= FRAC_PI_2 || roll.abs() + d_roll.abs() >= FRAC_PI_2 {
        return SightLine::Sky;
    }

    let forward = pitch.tan();
    let right = roll.tan() / pitch.cos();
    let ground = Rotation2::new(state.yaw) * Vector2::new(forward, right) * state.altitude;
    SightLine::Ground(ground.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use core::f64::consts::{FRAC_PI_4, FRAC_PI_6};

    fn ground(line: SightLine) -> GroundOffset {
        line.ground().expect("ray should reach the ground")
    }

    /// The closed form the rotation is expected to reproduce.
    fn closed_form(state: &AttitudeState, d_pitch: f64, d_roll: f64) -> GroundOffset {
        let (alt, yaw) = (state.altitude, state.yaw);
        let p = state.pitch + state.cam_pitch + d_pitch;
        let r = -state.roll + state.cam_roll + d_roll;
        GroundOffset::new(
            alt * (p.tan() * yaw.cos() - r.tan() / p.cos() * yaw.sin()),
            alt * (r.tan() / p.cos() * yaw.cos() + p.tan() * yaw.sin()),
        )
    }

    #[test]
    fn straight_down_hits_below() {
        let offset = ground(project_sight_line(&AttitudeState::level(100.0), 0.0, 0.0));
        assert_relative_eq!(offset.north, 0.0);
        assert_relative_eq!(offset.east, 0.0);
    }

    #[test]
    fn camera_pitch_looks_ahead() {
        let state = AttitudeState::level(100.0).camera(FRAC_PI_4, 0.0);
        let offset = ground(project_sight_line(&state, 0.0, 0.0));
        assert_relative_eq!(offset.north, 100.0, epsilon = 1e-9);
        assert_relative_eq!(offset.east, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn yaw_rotates_into_east() {
        let state = AttitudeState::level(100.0)
            .aircraft(FRAC_PI_2, 0.0, 0.0)
            .camera(FRAC_PI_4, 0.0);
        let offset = ground(project_sight_line(&state, 0.0, 0.0));
        assert_relative_eq!(offset.north, 0.0, epsilon = 1e-9);
        assert_relative_eq!(offset.east, 100.0, epsilon = 1e-9);
    }

    #[test]
    fn aircraft_roll_is_inverted() {
        let rolled = AttitudeState::level(100.0).aircraft(0.0, 0.0, FRAC_PI_6);
        let offset = ground(project_sight_line(&rolled, 0.0, 0.0));
        assert!(offset.east < 0.0);

        let camera = AttitudeState::level(100.0).camera(0.0, FRAC_PI_6);
        let offset = ground(project_sight_line(&camera, 0.0, 0.0));
        assert!(offset.east > 0.0);
    }

    #[test]
    fn matches_closed_form() {
        let state = AttitudeState::level(120.0)
            .aircraft(0.7, 0.1, -0.05)
            .camera(0.2, 0.15);
        for &(d_pitch, d_roll) in &[(0.0, 0.0), (0.3, -0.4), (-0.25, 0.35), (-0.1, -0.1)] {
            let offset = ground(project_sight_line(&state, d_pitch, d_roll));
            let expected = closed_form(&state, d_pitch, d_roll);
            assert_relative_eq!(offset.north, expected.north, epsilon = 1e-9);
            assert_relative_eq!(offset.east, expected.east, epsilon = 1e-9);
        }
    }

    #[test]
    fn finite_away_from_sky() {
        let margin = 0.05;
        let steps = 12;
        let angle = |i: usize| {
            -FRAC_PI_2 + margin + (core::f64::consts::PI - 2.0 * margin) * i as f64 / steps as f64
        };
        for i in 0..=steps {
            for j in 0..=steps {
                let state = AttitudeState::level(80.0).aircraft(1.1, angle(i), angle(j));
                let line = project_sight_line(&state, 0.0, 0.0);
                assert!(
                    line.ground().is_some(),
                    "pitch={} roll={}",
                    angle(i),
                    angle(j)
                );
            }
        }
    }

    #[test]
    fn sky_boundary_counts_offset() {
        let state = AttitudeState::level(100.0).aircraft(0.0, FRAC_PI_2 - 0.01, 0.0);
        assert!(project_sight_line(&state, 0.02, 0.0).is_sky());

        // The offset is counted on top of the accumulated angle, so a ray whose own pitch is
        // well short of the horizon is still rejected.
        let state = AttitudeState::level(100.0).aircraft(0.0, 0.9, 0.0);
        assert!(project_sight_line(&state, 0.4, 0.0).is_sky());
        assert!(project_sight_line(&state, 0.0, 0.0).ground().is_some());
    }

    #[test]
    fn negative_offsets_hit_sky_too() {
        let state = AttitudeState::level(100.0).camera(0.0, -1.2);
        assert!(project_sight_line(&state, 0.0, -0.4).is_sky());
    }
}
