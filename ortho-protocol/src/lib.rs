//! The JSON control protocol of an orthocorrection session.
//!
//! Every message is a JSON object `{"type": <kind>, "message": <payload>}`. Incoming messages
//! are dispatched by a [`HandlerRegistry`] to the [`MessageHandler`] registered for their
//! [`MessageKind`]. Handlers act on a [`Corrector`], which owns the warp planner, the image
//! store and the [`Client`] that replies and status alerts are sent through.
//!
//! The transport behind a [`Client`] is up to the host.

mod client;
mod corrector;
mod error;
mod handler;
mod message;

pub use client::*;
pub use corrector::*;
pub use error::*;
pub use handler::*;
pub use message::*;
