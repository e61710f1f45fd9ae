use crate::{
    Corrector, Envelope, ImageRequest, MessageKind, Outgoing, PayloadKind, ProtocolError,
    TelemetryData,
};
use log::*;
use ortho_warp::{ImageId, WarpOutcome};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

/// Acts on the payload of one kind of message.
pub trait MessageHandler: Send + Sync {
    fn handle(&self, corrector: &Corrector, message: &Value) -> Result<(), ProtocolError>;
}

/// Maps message kinds to their handlers.
///
/// The registry is built once and then handed to whatever runs the protocol loop.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<MessageKind, Box<dyn MessageHandler>>,
}

impl HandlerRegistry {
    /// A registry without any handlers.
    pub fn new() -> Self {
        Default::default()
    }

    /// A registry handling `ping`, `close`, `telemetry` and `image` messages.
    pub fn standard() -> Self {
        Self::new()
            .with(MessageKind::Ping, PingHandler)
            .with(MessageKind::Close, CloseHandler)
            .with(MessageKind::Telemetry, TelemetryHandler)
            .with(MessageKind::Image, ImageRequestHandler)
    }

    /// Registers `handler` for `kind`, replacing any previous handler.
    #[must_use]
    pub fn with(mut self, kind: MessageKind, handler: impl MessageHandler + 'static) -> Self {
        self.handlers.insert(kind, Box::new(handler));
        self
    }

    pub fn handles(&self, kind: MessageKind) -> bool {
        self.handlers.contains_key(&kind)
    }

    /// Parses a message and passes its payload to the handler registered for its kind.
    pub fn dispatch(&self, corrector: &Corrector, text: &str) -> Result<(), ProtocolError> {
        let envelope = Envelope::parse(text)?;
        let kind: MessageKind = envelope.kind.parse()?;
        let handler = self
            .handlers
            .get(&kind)
            .ok_or_else(|| ProtocolError::UnhandledMessage(envelope.kind.clone()))?;
        trace!("dispatching {} message", kind);
        handler.handle(corrector, &envelope.message)
    }
}

/// Replies to a ping with a ping.
pub struct PingHandler;

impl MessageHandler for PingHandler {
    fn handle(&self, corrector: &Corrector, _message: &Value) -> Result<(), ProtocolError> {
        Ok(corrector.client().send_message(&Outgoing::Ping)?)
    }
}

/// Closes the client.
pub struct CloseHandler;

impl MessageHandler for CloseHandler {
    fn handle(&self, corrector: &Corrector, _message: &Value) -> Result<(), ProtocolError> {
        info!("closing session at the client's request");
        corrector.client().close();
        Ok(())
    }
}

/// Orthocorrects an image with the telemetry sample in the message.
pub struct TelemetryHandler;

impl MessageHandler for TelemetryHandler {
    fn handle(&self, corrector: &Corrector, message: &Value) -> Result<(), ProtocolError> {
        let PayloadKind { kind } = PayloadKind::deserialize(message)?;
        if kind != "data" {
            return Err(ProtocolError::UnhandledTelemetry(kind));
        }
        let data = TelemetryData::deserialize(message)?;
        match corrector.apply_telemetry(data.image(), &data.attitude())? {
            WarpOutcome::Warped(plan) => debug!(
                "image {}: warped onto {:?}",
                data.image_number,
                plan.destination_size()
            ),
            outcome => debug!("image {}: {:?}", data.image_number, outcome),
        }
        Ok(())
    }
}

/// Sends the current raster of the requested image.
pub struct ImageRequestHandler;

impl MessageHandler for ImageRequestHandler {
    fn handle(&self, corrector: &Corrector, message: &Value) -> Result<(), ProtocolError> {
        let ImageRequest { number } = ImageRequest::deserialize(message)?;
        let image = corrector.encode_current(ImageId(number))?;
        Ok(corrector
            .client()
            .send_message(&Outgoing::ImageData(image))?)
    }
}
