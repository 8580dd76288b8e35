//! Image utility functions

/// Strip a data-URL prefix, returning only the base64 payload.
///
/// Clients may submit either a bare base64 string or a full
/// `data:image/jpeg;base64,...` URI; the provider only accepts the
/// former.
pub fn base64_payload(image: &str) -> &str {
    match image.split_once("base64,") {
        Some((_, payload)) => payload,
        None => image,
    }
}
