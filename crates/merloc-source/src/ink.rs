//! mermaid.ink renders a diagram encoded directly in the URL path, which makes it a render
//! backend that needs neither Node nor a browser.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use flate2::Compression;
use flate2::write::ZlibEncoder;
use std::io::Write as _;
use std::str::FromStr;

pub const MERMAID_INK_BASE: &str = "https://mermaid.ink";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InkImageType {
    #[default]
    Png,
    Svg,
    Webp,
    Jpeg,
}

impl InkImageType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Svg => "svg",
            Self::Webp => "webp",
            Self::Jpeg => "jpeg",
        }
    }
}

impl FromStr for InkImageType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "svg" => Ok(Self::Svg),
            "webp" => Ok(Self::Webp),
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InkOptions {
    pub image_type: InkImageType,
    /// Passed as `bgColor`; a leading `!` marks a named color (`!white`), otherwise hex digits.
    pub background: Option<String>,
}

impl Default for InkOptions {
    fn default() -> Self {
        Self {
            image_type: InkImageType::Png,
            background: Some("!white".to_string()),
        }
    }
}

/// Encodes `code` as the path segment mermaid.ink expects: `pako:` + URL-safe base64 of the
/// zlib-compressed JSON state `{"code": ...}`.
pub fn encode_diagram(code: &str) -> std::io::Result<String> {
    let payload = serde_json::json!({ "code": code }).to_string();
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(payload.as_bytes())?;
    let compressed = encoder.finish()?;
    Ok(format!("pako:{}", URL_SAFE_NO_PAD.encode(compressed)))
}

/// Builds a mermaid.ink URL for `code`.
///
/// SVG output is served from `/svg/`; raster types from `/img/` with a `type` query parameter
/// (left out for JPEG, the service default).
pub fn ink_url(code: &str, options: &InkOptions) -> std::io::Result<String> {
    let encoded = encode_diagram(code)?;

    let mut params: Vec<String> = Vec::new();
    if let Some(bg) = options.background.as_deref().filter(|bg| !bg.is_empty()) {
        params.push(format!("bgColor={bg}"));
    }
    let endpoint = match options.image_type {
        InkImageType::Svg => "svg",
        InkImageType::Jpeg => "img",
        other => {
            params.push(format!("type={}", other.as_str()));
            "img"
        }
    };

    let query = if params.is_empty() {
        String::new()
    } else {
        format!("?{}", params.join("&"))
    };
    Ok(format!("{MERMAID_INK_BASE}/{endpoint}/{encoded}{query}"))
}
