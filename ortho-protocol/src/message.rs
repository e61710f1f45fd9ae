use crate::ProtocolError;
use ortho_core::AttitudeState;
use ortho_warp::{ImageId, ImageStatus};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// The `type` of a top level message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Ping,
    Close,
    Telemetry,
    Image,
}

impl MessageKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ping => "ping",
            Self::Close => "close",
            Self::Telemetry => "telemetry",
            Self::Image => "image",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageKind {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ping" => Ok(Self::Ping),
            "close" => Ok(Self::Close),
            "telemetry" => Ok(Self::Telemetry),
            "image" => Ok(Self::Image),
            other => Err(ProtocolError::UnhandledMessage(other.to_owned())),
        }
    }
}

/// A message as received, before its payload is interpreted.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Envelope {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub message: Value,
}

impl Envelope {
    pub fn parse(text: &str) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_str(text)?)
    }
}

/// The `type` field shared by the payloads of telemetry and image messages.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub(crate) struct PayloadKind {
    #[serde(rename = "type")]
    pub kind: String,
}

/// A telemetry sample for an image, the payload of a `telemetry` message of type `data`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct TelemetryData {
    #[serde(rename = "image-number")]
    pub image_number: u32,
    pub lat: f64,
    pub lon: f64,
    pub alt: f64,
    pub yaw: f64,
    pub pitch: f64,
    pub roll: f64,
    pub cam_pitch: f64,
    pub cam_roll: f64,
}

impl TelemetryData {
    pub fn image(&self) -> ImageId {
        ImageId(self.image_number)
    }

    pub fn attitude(&self) -> AttitudeState {
        AttitudeState::level(self.alt)
            .position(self.lat, self.lon)
            .aircraft(self.yaw, self.pitch, self.roll)
            .camera(self.cam_pitch, self.cam_roll)
    }
}

/// The payload of an `image` message asking for the current raster of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ImageRequest {
    pub number: u32,
}

#[derive(Serialize)]
struct OutgoingEnvelope<T> {
    #[serde(rename = "type")]
    kind: MessageKind,
    message: T,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
enum Format {
    Original,
    Warped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
enum Availability {
    Available,
    Unavailable,
}

#[derive(Serialize)]
struct Alert {
    #[serde(rename = "type")]
    kind: &'static str,
    format: Format,
    status: Availability,
}

#[derive(Serialize)]
struct Request {
    #[serde(rename = "type")]
    kind: &'static str,
    time: f64,
    #[serde(rename = "image-number")]
    image_number: u32,
}

#[derive(Serialize)]
struct ImageData<'a> {
    image: &'a str,
}

/// A message sent to the client.
#[derive(Debug, Clone, PartialEq)]
pub enum Outgoing {
    /// The reply to a ping.
    Ping,
    /// Tells the client a representation of an image changed availability.
    ///
    /// The alert does not name the image; alerts are sent in the order the images change.
    Alert(ImageStatus),
    /// Asks for the telemetry of an image captured at `time` (seconds since the Unix epoch).
    TelemetryRequest { image: ImageId, time: f64 },
    /// A base64 encoded PNG of an image.
    ImageData(String),
}

impl Outgoing {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        match self {
            Self::Ping => serde_json::to_string(&OutgoingEnvelope {
                kind: MessageKind::Ping,
                message: (),
            }),
            Self::Alert(status) => {
                let (format, status) = match status {
                    ImageStatus::OriginalAvailable => (Format::Original, Availability::Available),
                    ImageStatus::WarpAvailable => (Format::Warped, Availability::Available),
                    ImageStatus::WarpUnavailable => (Format::Warped, Availability::Unavailable),
                };
                serde_json::to_string(&OutgoingEnvelope {
                    kind: MessageKind::Image,
                    message: Alert {
                        kind: "alert",
                        format,
                        status,
                    },
                })
            }
            Self::TelemetryRequest { image, time } => serde_json::to_string(&OutgoingEnvelope {
                kind: MessageKind::Telemetry,
                message: Request {
                    kind: "request",
                    time: *time,
                    image_number: image.0,
                },
            }),
            Self::ImageData(image) => serde_json::to_string(&ImageData { image }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn value(outgoing: Outgoing) -> Value {
        serde_json::from_str(&outgoing.to_json().unwrap()).unwrap()
    }

    #[test]
    fn outgoing_shapes() {
        assert_eq!(value(Outgoing::Ping), json!({"type": "ping", "message": null}));
        assert_eq!(
            value(Outgoing::Alert(ImageStatus::WarpUnavailable)),
            json!({
                "type": "image",
                "message": {"type": "alert", "format": "warped", "status": "unavailable"}
            })
        );
        assert_eq!(
            value(Outgoing::TelemetryRequest {
                image: ImageId(4),
                time: 12.5
            }),
            json!({
                "type": "telemetry",
                "message": {"type": "request", "time": 12.5, "image-number": 4}
            })
        );
        assert_eq!(
            value(Outgoing::ImageData("aGk=".into())),
            json!({"image": "aGk="})
        );
    }

    #[test]
    fn parses_kinds() {
        assert_eq!("telemetry".parse::<MessageKind>().unwrap(), MessageKind::Telemetry);
        assert!(matches!(
            "pong".parse::<MessageKind>(),
            Err(ProtocolError::UnhandledMessage(kind)) if kind == "pong"
        ));
    }

    #[test]
    fn telemetry_fields_map_to_attitude() {
        let data: TelemetryData = serde_json::from_value(json!({
            "type": "data",
            "image-number": 7,
            "lat": 43.47,
            "lon": -80.54,
            "alt": 120.0,
            "yaw": 0.1,
            "pitch": 0.2,
            "roll": 0.3,
            "cam_pitch": 0.4,
            "cam_roll": 0.5
        }))
        .unwrap();
        assert_eq!(data.image(), ImageId(7));
        assert_eq!(
            data.attitude(),
            AttitudeState {
                latitude: 43.47,
                longitude: -80.54,
                altitude: 120.0,
                yaw: 0.1,
                pitch: 0.2,
                roll: 0.3,
                cam_pitch: 0.4,
                cam_roll: 0.5,
            }
        );
    }

    #[test]
    fn envelope_without_payload() {
        let envelope = Envelope::parse(r#"{"type": "close"}"#).unwrap();
        assert_eq!(envelope.kind, "close");
        assert_eq!(envelope.message, Value::Null);
        assert!(Envelope::parse("not json").is_err());
    }
}
