//! Reduces a raw, duplicate-laden stream list to a ranked catalog

use crate::catalog::format::{format_size, format_views, label_rank};
use crate::catalog::models::{MediaCatalog, StreamClass, StreamVariant};
use crate::extractor::models::{RawMetadataRecord, RawStreamDescriptor};
use std::collections::HashMap;

/// Entries kept per stream class
pub const MAX_PER_CLASS: usize = 8;

pub const UNTITLED: &str = "Untitled";
pub const UNKNOWN_UPLOADER: &str = "Unknown";

/// A descriptor that survived filtering, plus ranking bookkeeping
struct Candidate<'a> {
    label: String,
    rank: u64,
    /// Byte size for video classes, bitrate for audio
    weight: f64,
    descriptor: &'a RawStreamDescriptor,
}

/// Build the catalog for a raw record. Pure and total: missing data degrades
/// to sentinel values, never to an error.
pub fn canonicalize(record: &RawMetadataRecord) -> MediaCatalog {
    let mut buckets: [Vec<Candidate<'_>>; 3] = [Vec::new(), Vec::new(), Vec::new()];
    let mut index: [HashMap<String, usize>; 3] = Default::default();

    for descriptor in record.formats.iter().filter(|d| is_direct_resource(d)) {
        let Some(class) = classify(descriptor) else {
            continue;
        };
        let slot = bucket_slot(class);
        let candidate = candidate_for(class, descriptor);

        match index[slot].get(&candidate.label).copied() {
            // Strictly larger wins; ties keep the first seen
            Some(pos) => {
                if candidate.weight > buckets[slot][pos].weight {
                    buckets[slot][pos] = candidate;
                }
            }
            None => {
                index[slot].insert(candidate.label.clone(), buckets[slot].len());
                buckets[slot].push(candidate);
            }
        }
    }

    let [combined, audio_only, video_only] = buckets.map(rank_and_render);

    MediaCatalog {
        title: non_blank(&record.title).unwrap_or(UNTITLED).to_string(),
        thumbnail: non_blank(&record.thumbnail).unwrap_or_default().to_string(),
        duration: duration_secs(record.duration),
        uploader: [&record.uploader, &record.channel, &record.creator]
            .into_iter()
            .find_map(non_blank)
            .unwrap_or(UNKNOWN_UPLOADER)
            .to_string(),
        views: format_views(record.view_count),
        combined,
        audio_only,
        video_only,
    }
}

/// Direct, fetchable resources only; manifests need further resolution
pub fn is_direct_resource(descriptor: &RawStreamDescriptor) -> bool {
    let Some(url) = descriptor.url.as_deref().map(str::trim) else {
        return false;
    };
    let lower = url.to_ascii_lowercase();

    (lower.starts_with("http://") || lower.starts_with("https://"))
        && !lower.contains("manifest")
        && !lower.contains(".m3u8")
        && !lower.contains(".mpd")
}

/// Exhaustive, mutually exclusive class assignment. Unknown presence counts
/// as present; both tracks absent means the descriptor is dropped.
pub fn classify(descriptor: &RawStreamDescriptor) -> Option<StreamClass> {
    match (
        descriptor.video().is_absent(),
        descriptor.audio().is_absent(),
    ) {
        (false, false) => Some(StreamClass::Combined),
        (true, false) => Some(StreamClass::AudioOnly),
        (false, true) => Some(StreamClass::VideoOnly),
        (true, true) => None,
    }
}

/// Quality label a descriptor deduplicates under within its class
pub fn quality_label(class: StreamClass, descriptor: &RawStreamDescriptor) -> String {
    match class {
        StreamClass::Combined | StreamClass::VideoOnly => match descriptor.height {
            Some(h) if h > 0 => format!("{}p", h),
            _ => class.sentinel().to_string(),
        },
        StreamClass::AudioOnly => match descriptor.audio_bitrate() {
            Some(b) if b >= 1.0 => format!("{}kbps", b.trunc() as u64),
            _ => class.sentinel().to_string(),
        },
    }
}

fn candidate_for(class: StreamClass, descriptor: &RawStreamDescriptor) -> Candidate<'_> {
    let label = quality_label(class, descriptor);
    let weight = match class {
        StreamClass::AudioOnly => descriptor.audio_bitrate().unwrap_or(0.0),
        _ => descriptor.effective_size().unwrap_or(0) as f64,
    };

    Candidate {
        rank: label_rank(&label),
        label,
        weight,
        descriptor,
    }
}

fn bucket_slot(class: StreamClass) -> usize {
    match class {
        StreamClass::Combined => 0,
        StreamClass::AudioOnly => 1,
        StreamClass::VideoOnly => 2,
    }
}

fn rank_and_render(mut bucket: Vec<Candidate<'_>>) -> Vec<StreamVariant> {
    // Stable, so equal ranks keep first-seen order
    bucket.sort_by(|a, b| b.rank.cmp(&a.rank));
    bucket.truncate(MAX_PER_CLASS);

    bucket
        .into_iter()
        .map(|c| StreamVariant {
            ext: non_blank(&c.descriptor.ext).unwrap_or("unknown").to_string(),
            size: format_size(c.descriptor.effective_size()),
            url: c.descriptor.url.as_deref().unwrap_or_default().trim().to_string(),
            quality: c.label,
        })
        .collect()
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn duration_secs(duration: Option<f64>) -> u64 {
    match duration {
        Some(d) if d.is_finite() && d > 0.0 => d.round() as u64,
        _ => 0,
    }
}
