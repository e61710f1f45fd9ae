use crate::{Client, ClientNotifier, Outgoing, ProtocolError};
use base64::engine::{general_purpose::STANDARD, Engine};
use image::{DynamicImage, ImageOutputFormat};
use log::*;
use ortho_core::AttitudeState;
use ortho_geom::CameraFov;
use ortho_warp::{
    ImageId, ImageStatus, ImageStore, Notifier, Rasterizer, WarpOutcome, WarpPlanner,
};
use std::io::Cursor;
use std::sync::Arc;

type DynRasterizer = Box<dyn Rasterizer + Send + Sync>;
type DynStore = Box<dyn ImageStore + Send + Sync>;

/// The state of one orthocorrection session.
///
/// Images are ingested as they are taken and corrected as soon as their telemetry arrives.
pub struct Corrector {
    planner: WarpPlanner<DynRasterizer, DynStore, ClientNotifier>,
    client: Arc<dyn Client>,
}

impl Corrector {
    pub fn new(
        rasterizer: impl Rasterizer + Send + Sync + 'static,
        store: impl ImageStore + Send + Sync + 'static,
        client: Arc<dyn Client>,
        fov: CameraFov,
    ) -> Self {
        Self {
            planner: WarpPlanner::new(
                Box::new(rasterizer),
                Box::new(store),
                ClientNotifier::new(client.clone()),
                fov,
            ),
            client,
        }
    }

    pub fn client(&self) -> &dyn Client {
        &*self.client
    }

    pub fn store(&self) -> &(dyn ImageStore + Send + Sync) {
        &**self.planner.store()
    }

    /// Stores a newly taken photograph, announces it and asks for its telemetry.
    ///
    /// `captured_at` is the capture time in seconds since the Unix epoch, which the client uses
    /// to find the matching telemetry sample.
    pub fn ingest(&self, image: &DynamicImage, captured_at: f64) -> Result<ImageId, ProtocolError> {
        let id = self.planner.store().store_original(image)?;
        info!("image {}: original available", id);
        self.planner
            .notifier()
            .notify(id, ImageStatus::OriginalAvailable);
        self.client.send_message(&Outgoing::TelemetryRequest {
            image: id,
            time: captured_at,
        })?;
        Ok(id)
    }

    /// Orthocorrects an ingested image with its telemetry.
    pub fn apply_telemetry(
        &self,
        image: ImageId,
        state: &AttitudeState,
    ) -> Result<WarpOutcome, ProtocolError> {
        if !state.is_finite() {
            return Err(ProtocolError::InvalidTelemetry(image));
        }
        debug!("image {}: telemetry {:?}", image, state);
        Ok(self.planner.correct_stored(image, state)?)
    }

    /// The current raster of an image as a base64 encoded PNG.
    pub fn encode_current(&self, image: ImageId) -> Result<String, ProtocolError> {
        let current = self.planner.store().current(image)?;
        let mut png = Vec::new();
        current.write_to(&mut Cursor::new(&mut png), ImageOutputFormat::Png)?;
        Ok(STANDARD.encode(png))
    }
}
