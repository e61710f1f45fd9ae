use crate::Outgoing;
use log::*;
use ortho_warp::{ImageId, ImageStatus, Notifier};
use std::io;
use std::sync::Arc;

/// The far end of the protocol.
pub trait Client: Send + Sync {
    /// Sends one message of text.
    fn send(&self, message: &str) -> io::Result<()>;

    /// Ends the session. No more messages should be dispatched afterwards.
    fn close(&self);

    fn is_closed(&self) -> bool;

    fn send_message(&self, message: &Outgoing) -> io::Result<()> {
        let text = message.to_json().map_err(io::Error::from)?;
        trace!("sending {}", text);
        self.send(&text)
    }
}

/// Forwards image status changes to a client as alerts.
#[derive(Clone)]
pub struct ClientNotifier {
    client: Arc<dyn Client>,
}

impl ClientNotifier {
    pub fn new(client: Arc<dyn Client>) -> Self {
        Self { client }
    }
}

impl Notifier for ClientNotifier {
    fn notify(&self, image: ImageId, status: ImageStatus) {
        if let Err(e) = self.client.send_message(&Outgoing::Alert(status)) {
            error!("failed to send {:?} alert for image {}: {}", status, image, e);
        }
    }
}
