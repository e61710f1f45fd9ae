//! Layout of a ground footprint on the pixel canvas of a warp.
//!
//! The footprint is first discretized to whole meters, then moved so that it touches the top
//! and left edges of the canvas, and finally scaled by the smallest integer factor that gives
//! the canvas at least twice as many pixels as the source image. Oversizing the canvas this way
//! keeps foreshortened parts of the photograph from losing resolution when they are stretched.

use ortho_core::{CanvasLayout, CanvasSize, Corners, GroundOffset, PixelCorner};
use thiserror::Error;

/// The canvas must have at least this many times the pixels of the source image.
pub const AREA_FACTOR: u128 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CanvasError {
    /// The footprint collapsed to a line or a point after discretization.
    #[error("footprint has zero extent: {width} m by {height} m")]
    DegenerateFootprint { width: u128, height: u128 },
    #[error("source image has no pixels")]
    EmptySource,
    #[error("footprint corner is not a finite distance")]
    NonFinite,
    /// The scaled canvas is too large to be addressed with 32-bit pixel coordinates.
    #[error("scaled canvas of {width} by {height} pixels is too large")]
    CanvasOverflow { width: u128, height: u128 },
}

/// Lays out the ground footprint of an image with the pixel dimensions `source` on a canvas.
///
/// Ground corners are converted with `x = east` and `y = north`, truncated toward zero. The
/// corners are then shifted so that the smallest `x` becomes `0` and flipped so that the largest
/// `y` (the northernmost corner) becomes `0`, with `y` growing southwards like image rows.
///
/// The returned corners keep the winding order of the footprint and the canvas size is the
/// largest scaled coordinate on each axis.
///
/// ```
/// use ortho_core::{CanvasSize, Corners, GroundOffset, PixelCorner};
/// use ortho_geom::map_to_canvas;
///
/// let footprint = Corners::new(
///     GroundOffset::new(10.0, -20.0),
///     GroundOffset::new(10.0, 20.0),
///     GroundOffset::new(-10.0, 20.0),
///     GroundOffset::new(-10.0, -20.0),
/// );
/// let layout = map_to_canvas(&footprint, CanvasSize::new(20, 20)).unwrap();
/// assert_eq!(layout.scale, 1);
/// assert_eq!(layout.corners.bottom_right, PixelCorner::new(40, 20));
/// ```
pub fn map_to_canvas(
    footprint: &Corners<GroundOffset>,
    source: CanvasSize,
) -> Result<CanvasLayout, CanvasError> {
    if footprint.iter().any(|corner| !corner.is_finite()) {
        return Err(CanvasError::NonFinite);
    }
    let source_area = u128::from(source.area());
    if source_area == 0 {
        return Err(CanvasError::EmptySource);
    }

    // `as` truncates toward zero.
    let meters = footprint.map(|corner| (corner.east as i64, corner.north as i64));
    let min_x = meters.iter().map(|&(x, _)| x).fold(i64::MAX, i64::min);
    let max_y = meters.iter().map(|&(_, y)| y).fold(i64::MIN, i64::max);
    let shifted = meters.map(|(x, y)| {
        (
            (i128::from(x) - i128::from(min_x)) as u128,
            (i128::from(max_y) - i128::from(y)) as u128,
        )
    });

    let width = shifted.iter().map(|&(x, _)| x).fold(0, u128::max);
    let height = shifted.iter().map(|&(_, y)| y).fold(0, u128::max);
    if width == 0 || height == 0 {
        return Err(CanvasError::DegenerateFootprint { width, height });
    }

    let scale = scale_factor(AREA_FACTOR * source_area, width.saturating_mul(height));
    let overflow = CanvasError::CanvasOverflow {
        width: width.saturating_mul(scale),
        height: height.saturating_mul(scale),
    };
    let to_pixels = |n: u128| {
        n.checked_mul(scale)
            .and_then(|n| u32::try_from(n).ok())
            .ok_or(overflow)
    };

    let size = CanvasSize::new(to_pixels(width)?, to_pixels(height)?);
    let [tl, tr, br, bl] = shifted.into_array();
    let corners = Corners::new(
        PixelCorner::new(to_pixels(tl.0)?, to_pixels(tl.1)?),
        PixelCorner::new(to_pixels(tr.0)?, to_pixels(tr.1)?),
        PixelCorner::new(to_pixels(br.0)?, to_pixels(br.1)?),
        PixelCorner::new(to_pixels(bl.0)?, to_pixels(bl.1)?),
    );

    Ok(CanvasLayout {
        corners,
        size,
        // Bounded by the canvas width, which fits in a `u32`.
        scale: scale as u32,
    })
}

/// The smallest `k >= 1` such that `k * k * area >= target`.
///
/// The floating point estimate `ceil(sqrt(target / area))` can be off by one when the ratio is
/// close to a perfect square, so it is corrected with exact integer arithmetic.
fn scale_factor(target: u128, area: u128) -> u128 {
    let covers = |k: u128| {
        k.checked_mul(k)
            .and_then(|k2| k2.checked_mul(area))
            .map_or(true, |scaled| scaled >= target)
    };
    let mut k = ((target as f64 / area as f64).sqrt().ceil() as u128).max(1);
    while k > 1 && covers(k - 1) {
        k -= 1;
    }
    while !covers(k) {
        k += 1;
    }
    k
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad(points: [(f64, f64); 4]) -> Corners<GroundOffset> {
        Corners::from(points).map(|(north, east)| GroundOffset::new(north, east))
    }

    #[test]
    fn truncates_then_scales() {
        let footprint = quad([(10.7, -20.9), (10.2, 20.5), (-10.9, 20.2), (-10.1, -20.8)]);
        let layout = map_to_canvas(&footprint, CanvasSize::new(400, 300)).unwrap();

        // 40 m by 20 m after truncation toward zero; 240000 / 800 = 300 so k = 18.
        assert_eq!(layout.scale, 18);
        assert_eq!(layout.size, CanvasSize::new(720, 360));
        assert_eq!(
            layout.corners.into_array(),
            [
                PixelCorner::new(0, 0),
                PixelCorner::new(720, 0),
                PixelCorner::new(720, 360),
                PixelCorner::new(0, 360),
            ]
        );
    }

    #[test]
    fn exact_square_ratio_is_not_rounded_up() {
        let footprint = quad([(10.0, -20.0), (10.0, 20.0), (-10.0, 20.0), (-10.0, -20.0)]);
        // 2 * 160 * 40 / (40 * 20) = 16
        let layout = map_to_canvas(&footprint, CanvasSize::new(160, 40)).unwrap();
        assert_eq!(layout.scale, 4);
        assert_eq!(layout.size.area(), 2 * 160 * 40);
    }

    #[test]
    fn skewed_quad_keeps_shape() {
        let footprint = quad([(30.0, -5.0), (30.0, 5.0), (0.0, 15.0), (0.0, -15.0)]);
        let layout = map_to_canvas(&footprint, CanvasSize::new(30, 30)).unwrap();
        assert_eq!(layout.scale, 2);
        assert_eq!(
            layout.corners.into_array(),
            [
                PixelCorner::new(20, 0),
                PixelCorner::new(40, 0),
                PixelCorner::new(60, 60),
                PixelCorner::new(0, 60),
            ]
        );
    }

    #[test]
    fn large_footprint_is_not_shrunk() {
        let footprint = quad([(500.0, -500.0), (500.0, 500.0), (-500.0, 500.0), (-500.0, -500.0)]);
        let layout = map_to_canvas(&footprint, CanvasSize::new(10, 10)).unwrap();
        assert_eq!(layout.scale, 1);
        assert_eq!(layout.size, CanvasSize::new(1000, 1000));
    }

    #[test]
    fn degenerate_footprints() {
        let point = quad([(0.0, 0.0); 4]);
        assert_eq!(
            map_to_canvas(&point, CanvasSize::new(10, 10)),
            Err(CanvasError::DegenerateFootprint {
                width: 0,
                height: 0
            })
        );

        // Less than a meter wide truncates to a line.
        let sliver = quad([(10.0, -0.4), (10.0, 0.4), (-10.0, 0.9), (-10.0, -0.9)]);
        assert_eq!(
            map_to_canvas(&sliver, CanvasSize::new(10, 10)),
            Err(CanvasError::DegenerateFootprint {
                width: 0,
                height: 20
            })
        );
    }

    #[test]
    fn rejects_bad_inputs() {
        let footprint = quad([(10.0, -20.0), (10.0, 20.0), (-10.0, 20.0), (-10.0, -20.0)]);
        assert_eq!(
            map_to_canvas(&footprint, CanvasSize::new(0, 10)),
            Err(CanvasError::EmptySource)
        );

        let infinite = quad([(f64::INFINITY, -20.0), (10.0, 20.0), (-10.0, 20.0), (-10.0, -20.0)]);
        assert_eq!(
            map_to_canvas(&infinite, CanvasSize::new(10, 10)),
            Err(CanvasError::NonFinite)
        );

        let huge = quad([(1e10, -1e10), (1e10, 1e10), (-1e10, 1e10), (-1e10, -1e10)]);
        assert!(matches!(
            map_to_canvas(&huge, CanvasSize::new(10, 10)),
            Err(CanvasError::CanvasOverflow { .. })
        ));
    }

    #[test]
    fn scale_factor_is_minimal() {
        assert_eq!(scale_factor(16, 1), 4);
        assert_eq!(scale_factor(17, 1), 5);
        assert_eq!(scale_factor(1, 100), 1);
        assert_eq!(scale_factor(u128::MAX, u128::MAX), 1);
    }
}
