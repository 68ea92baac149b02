//! Thumbnail messages.
//!
//! Road camera thumbnails carry an encoded (JPEG) image in their `thumbnail`
//! field. They are forwarded to the viewer as a single image instead of
//! being walked for scalars.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::Value;
use tracing::debug;

/// Type tag of thumbnail messages.
pub const THUMBNAIL_KIND: &str = "thumbnail";

/// Entity path every thumbnail is logged at.
pub const THUMBNAIL_PATH: &str = "/thumbnail";

/// Field of the payload holding the encoded image.
const CONTENT_FIELD: &str = "thumbnail";

/// Extract the encoded image bytes from a thumbnail payload.
///
/// Binary fields appear either as a base64 string or as an array of byte
/// values. Returns `None` when the field is missing or cannot be decoded.
pub fn extract(payload: &Value) -> Option<Vec<u8>> {
    match payload.get(CONTENT_FIELD)? {
        Value::String(encoded) => match STANDARD.decode(encoded) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                debug!(error = %e, "thumbnail is not valid base64");
                None
            }
        },
        Value::Array(items) => {
            let bytes = items
                .iter()
                .map(|item| item.as_u64().and_then(|b| u8::try_from(b).ok()))
                .collect::<Option<Vec<u8>>>();
            if bytes.is_none() {
                debug!("thumbnail array holds non-byte values");
            }
            bytes
        }
        other => {
            debug!(kind = ?other, "unexpected thumbnail encoding");
            None
        }
    }
}
