//! Canonical, user-facing catalog types

use serde::{Deserialize, Serialize};

/// One downloadable rendition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamVariant {
    pub quality: String,
    pub ext: String,
    pub size: String,
    pub url: String,
}

/// Everything a client needs to pick a stream.
///
/// Serialized field names match what the web front end consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaCatalog {
    pub title: String,
    pub thumbnail: String,
    pub duration: u64,
    pub uploader: String,
    pub views: String,
    #[serde(rename = "normal")]
    pub combined: Vec<StreamVariant>,
    #[serde(rename = "audio")]
    pub audio_only: Vec<StreamVariant>,
    #[serde(rename = "video")]
    pub video_only: Vec<StreamVariant>,
}

/// Stream class a descriptor falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamClass {
    Combined,
    AudioOnly,
    VideoOnly,
}

impl StreamClass {
    /// Label used when the ranking attribute is unknown
    pub fn sentinel(&self) -> &'static str {
        match self {
            StreamClass::Combined => "Auto",
            StreamClass::AudioOnly => "Audio",
            StreamClass::VideoOnly => "Video",
        }
    }
}
