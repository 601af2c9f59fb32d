//! Image URL resolution.
//!
//! Sweet records carry either a full image URL or a bare Cloudinary public
//! id. Full URLs pass through untouched; public ids are turned into
//! delivery URLs against the configured cloud name with an auto
//! format/quality fill-crop transformation.

use url::Url;

use crate::config::CloudinaryConfig;

/// Transformation string applied to every delivery URL.
const TRANSFORMATION: &str = "f_auto,q_auto,c_fill";

/// Resolve an image reference to a usable URL.
///
/// - `None` or an empty reference resolves to `None`
/// - full http(s) URLs are returned as-is
/// - anything else is treated as a Cloudinary public id; resolution yields
///   `None` when no cloud name is configured
#[must_use]
pub fn resolve_image_url(
    config: &CloudinaryConfig,
    image_ref: Option<&str>,
    width: u32,
    height: u32,
) -> Option<String> {
    let image_ref = image_ref.filter(|r| !r.is_empty())?;

    if is_absolute_http_url(image_ref) {
        return Some(image_ref.to_string());
    }

    let cloud_name = config.cloud_name.as_deref()?;
    Some(format!(
        "https://res.cloudinary.com/{cloud_name}/image/upload/{TRANSFORMATION},w_{width},h_{height}/{}",
        urlencode_path_segment(image_ref)
    ))
}

fn is_absolute_http_url(s: &str) -> bool {
    Url::parse(s)
        .map(|u| matches!(u.scheme(), "http" | "https"))
        .unwrap_or(false)
}

/// Percent-encode a public id for use as a path segment.
///
/// Public ids may contain folder slashes, which must survive encoding.
fn urlencode_path_segment(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '/' | '~') {
                c.to_string()
            } else {
                let mut out = String::new();
                let mut buf = [0u8; 4];
                for byte in c.encode_utf8(&mut buf).bytes() {
                    out.push_str(&format!("%{byte:02X}"));
                }
                out
            }
        })
        .collect()
}
