use crate::{
    ImageId, ImageStatus, ImageStore, Notifier, RasterizationError, Rasterizer, SampleTicket,
    SampleTracker, StoreError,
};
use image::{DynamicImage, GenericImageView};
use log::*;
use ortho_core::{AttitudeState, CanvasSize, Footprint, WarpPlan};
use ortho_geom::{map_to_canvas, CameraFov, CanvasError};
use thiserror::Error;

/// How an attempt to orthocorrect an image ended, short of a hard failure.
#[derive(Debug, Clone, PartialEq)]
pub enum WarpOutcome {
    /// The warped raster was stored as the current representation of the image.
    Warped(WarpPlan),
    /// The camera saw the horizon. The image was left as it is.
    HorizonVisible,
    /// The rasterizer could not warp the image. The image was left as it is.
    RasterizationFailed(RasterizationError),
    /// A newer attitude sample was submitted for the image while this one was warping, so
    /// this result was dropped.
    Superseded,
}

#[derive(Debug, Error)]
pub enum WarpError {
    /// The footprint could not be laid out on a canvas. This indicates inconsistent camera
    /// settings or telemetry and is not retried.
    #[error("image {image}: cannot lay out footprint: {source}")]
    Canvas { image: ImageId, source: CanvasError },
    #[error("image {image}: {source}")]
    Store { image: ImageId, source: StoreError },
}

/// Orthocorrects images from attitude samples.
///
/// The planner holds no state between calls other than the sequence of samples issued per
/// image, so one planner can be shared between threads that each correct a different image
/// (or the same image, in which case the newest sample wins).
pub struct WarpPlanner<R, S, N> {
    rasterizer: R,
    store: S,
    notifier: N,
    fov: CameraFov,
    samples: SampleTracker,
}

impl<R, S, N> WarpPlanner<R, S, N>
where
    R: Rasterizer,
    S: ImageStore,
    N: Notifier,
{
    pub fn new(rasterizer: R, store: S, notifier: N, fov: CameraFov) -> Self {
        Self {
            rasterizer,
            store,
            notifier,
            fov,
            samples: SampleTracker::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn rasterizer(&self) -> &R {
        &self.rasterizer
    }

    pub fn fov(&self) -> CameraFov {
        self.fov
    }

    /// Computes the warp of an image with the pixel dimensions `source` taken at `state`.
    ///
    /// Returns `None` if the horizon is visible.
    pub fn plan(
        &self,
        source: CanvasSize,
        state: &AttitudeState,
    ) -> Result<Option<WarpPlan>, CanvasError> {
        match self.fov.footprint(state) {
            Footprint::Visible(corners) => {
                trace!("footprint {:?}", corners);
                let layout = map_to_canvas(&corners, source)?;
                Ok(Some(WarpPlan::new(source, layout)))
            }
            Footprint::HorizonVisible => Ok(None),
        }
    }

    /// Orthocorrects the original of a stored image.
    ///
    /// Corrections always start from the original, never from an earlier warp.
    pub fn correct_stored(
        &self,
        image: ImageId,
        state: &AttitudeState,
    ) -> Result<WarpOutcome, WarpError> {
        let source = self
            .store
            .original(image)
            .map_err(|source| WarpError::Store { image, source })?;
        self.correct(image, &source, state)
    }

    /// Orthocorrects `source`, the photograph of `image` taken at `state`.
    ///
    /// On success the warped raster becomes the current representation of the image in the
    /// store and the notifier is told the warp is available. If the horizon is visible or the
    /// rasterizer fails, any earlier warp is discarded so the original is current again, and
    /// the notifier is told the warp is unavailable instead.
    pub fn correct(
        &self,
        image: ImageId,
        source: &DynamicImage,
        state: &AttitudeState,
    ) -> Result<WarpOutcome, WarpError> {
        let ticket = self.samples.issue(image);
        let size = CanvasSize::new(source.width(), source.height());

        let plan = match self.plan(size, state) {
            Ok(Some(plan)) => plan,
            Ok(None) => {
                info!("image {}: cannot warp since the horizon is visible", image);
                return self.unwarp(ticket, WarpOutcome::HorizonVisible);
            }
            Err(e) => {
                error!(
                    "image {}: {} (source {}x{}, {:?}, {:?})",
                    image, e, size.width, size.height, state, self.fov
                );
                return Err(WarpError::Canvas { image, source: e });
            }
        };
        debug!(
            "image {} (sample {}): warping {}x{} onto {}x{} canvas at scale {}",
            image,
            ticket.sequence,
            size.width,
            size.height,
            plan.destination.size.width,
            plan.destination.size.height,
            plan.destination.scale
        );

        let warped = match self.rasterizer.warp(source, &plan) {
            Ok(warped) => warped,
            Err(e) => {
                warn!("image {}: rasterization failed: {}", image, e);
                return self.unwarp(ticket, WarpOutcome::RasterizationFailed(e));
            }
        };

        match self
            .samples
            .commit(ticket, || self.store.store_warped(image, &warped))
        {
            Some(stored) => {
                stored.map_err(|source| WarpError::Store { image, source })?;
                info!("image {}: warp available", image);
                self.notifier.notify(image, ImageStatus::WarpAvailable);
                Ok(WarpOutcome::Warped(plan))
            }
            None => {
                debug!(
                    "image {}: dropping warp of superseded sample {}",
                    image, ticket.sequence
                );
                Ok(WarpOutcome::Superseded)
            }
        }
    }

    /// Makes the original the current representation again after the sample of `ticket`
    /// could not be warped, unless a newer sample has been issued since.
    fn unwarp(
        &self,
        ticket: SampleTicket,
        outcome: WarpOutcome,
    ) -> Result<WarpOutcome, WarpError> {
        let image = ticket.image;
        match self.samples.commit(ticket, || self.store.revert(image)) {
            Some(reverted) => {
                reverted.map_err(|source| WarpError::Store { image, source })?;
                self.notifier.notify(image, ImageStatus::WarpUnavailable);
                Ok(outcome)
            }
            None => {
                debug!(
                    "image {}: superseded sample {} could not be warped",
                    image, ticket.sequence
                );
                Ok(WarpOutcome::Superseded)
            }
        }
    }
}
