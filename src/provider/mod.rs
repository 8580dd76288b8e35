//! Facial-analysis provider integration
//!
//! Wire types for the detect response, the transport trait with its
//! production and scripted implementations, and the endpoint-fallback
//! gateway.

pub mod gateway;
pub mod transport;
pub mod types;

pub use gateway::FaceppGateway;
pub use transport::{DetectTransport, FakeTransport, HttpReply, HttpTransport, TransportError};
pub use types::{AttrValue, DetectResponse, Face, FaceAttributes, SkinStatus};
