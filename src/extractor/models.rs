//! Data structures for raw extraction output

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Raw metadata record as reported by a backend.
///
/// Field names follow yt-dlp's `--dump-json` output so the direct adapter can
/// deserialize it as-is. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawMetadataRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub uploader: Option<String>,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub creator: Option<String>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub view_count: Option<u64>,
    #[serde(default)]
    pub webpage_url: Option<String>,
    #[serde(default)]
    pub extractor: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub formats: Vec<RawStreamDescriptor>,
}

/// One stream entry as reported by a backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawStreamDescriptor {
    #[serde(default)]
    pub format_id: Option<String>,
    #[serde(default)]
    pub ext: Option<String>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub height: Option<u32>,
    #[serde(default)]
    pub abr: Option<f64>, // Audio bitrate (kbps)
    #[serde(default)]
    pub tbr: Option<f64>, // Total bitrate (kbps)
    #[serde(default, deserialize_with = "lenient_u64")]
    pub filesize: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub filesize_approx: Option<u64>,
    #[serde(default)]
    pub vcodec: Option<String>,
    #[serde(default)]
    pub acodec: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

// yt-dlp passes floats through its numeric sanitizer, so integer fields may
// arrive as `1048576.5` or `720.0`. Anything non-numeric or negative reads as
// missing rather than failing the whole record.
fn lenient_number(value: Option<Value>) -> Option<f64> {
    let n = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    (n.is_finite() && n >= 0.0).then(|| n.trunc())
}

fn lenient_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(lenient_number(value).map(|n| n as u64))
}

fn lenient_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(lenient_number(value).and_then(|n| u32::try_from(n as u64).ok()))
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<RawStreamDescriptor>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<RawStreamDescriptor>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Tri-state codec presence flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecPresence {
    Present,
    Absent,
    Unknown,
}

impl CodecPresence {
    /// yt-dlp reports a missing track as the literal codec name "none".
    fn from_codec(codec: Option<&str>) -> Self {
        match codec.map(str::trim) {
            None | Some("") => CodecPresence::Unknown,
            Some(c) if c.eq_ignore_ascii_case("none") => CodecPresence::Absent,
            Some(_) => CodecPresence::Present,
        }
    }

    pub fn is_absent(self) -> bool {
        self == CodecPresence::Absent
    }
}

impl RawStreamDescriptor {
    pub fn video(&self) -> CodecPresence {
        CodecPresence::from_codec(self.vcodec.as_deref())
    }

    pub fn audio(&self) -> CodecPresence {
        CodecPresence::from_codec(self.acodec.as_deref())
    }

    /// Exact size when known, otherwise the backend's estimate
    pub fn effective_size(&self) -> Option<u64> {
        self.filesize.or(self.filesize_approx)
    }

    /// Audio bitrate, falling back to total bitrate
    pub fn audio_bitrate(&self) -> Option<f64> {
        self.abr.or(self.tbr).filter(|b| b.is_finite())
    }
}
