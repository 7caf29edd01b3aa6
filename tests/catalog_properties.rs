//! Property tests for the stream catalog builder.

use proptest::prelude::*;
use rustgrab::catalog::{canonicalize, format::label_rank, StreamVariant, MAX_PER_CLASS};
use rustgrab::extractor::{RawMetadataRecord, RawStreamDescriptor};
use std::collections::HashSet;

fn codec() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some(String::new())),
        Just(Some("none".to_string())),
        Just(Some("avc1.64001F".to_string())),
        Just(Some("opus".to_string())),
    ]
}

fn stream_url() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        "[a-z]{1,6}".prop_map(|p| Some(format!("https://cdn.example/{p}.mp4"))),
        "[a-z]{1,6}".prop_map(|p| Some(format!("https://cdn.example/{p}/index.m3u8"))),
        "[a-z]{1,6}".prop_map(|p| Some(format!("https://cdn.example/{p}/manifest.mpd"))),
        Just(Some("ftp://example.com/file.mp4".to_string())),
    ]
}

prop_compose! {
    fn descriptor()(
        ext in proptest::option::of(prop_oneof![Just("mp4"), Just("webm"), Just("m4a")]),
        height in proptest::option::of(prop_oneof![Just(0u32), Just(144), Just(360), Just(720), Just(1080), Just(2160)]),
        abr in proptest::option::of(0.0f64..400.0),
        tbr in proptest::option::of(0.0f64..5000.0),
        filesize in proptest::option::of(0u64..2_000_000_000),
        filesize_approx in proptest::option::of(0u64..2_000_000_000),
        vcodec in codec(),
        acodec in codec(),
        url in stream_url(),
    ) -> RawStreamDescriptor {
        RawStreamDescriptor {
            format_id: None,
            ext: ext.map(str::to_string),
            height,
            abr,
            tbr,
            filesize,
            filesize_approx,
            vcodec,
            acodec,
            url,
        }
    }
}

prop_compose! {
    fn record()(
        title in proptest::option::of("[ a-zA-Z]{0,12}"),
        duration in proptest::option::of(-10.0f64..10_000.0),
        view_count in proptest::option::of(any::<u64>()),
        formats in proptest::collection::vec(descriptor(), 0..40),
    ) -> RawMetadataRecord {
        RawMetadataRecord {
            title,
            duration,
            view_count,
            formats,
            ..Default::default()
        }
    }
}

fn assert_well_formed(bucket: &[StreamVariant]) {
    assert!(bucket.len() <= MAX_PER_CLASS);

    let labels: HashSet<&str> = bucket.iter().map(|v| v.quality.as_str()).collect();
    assert_eq!(labels.len(), bucket.len(), "duplicate labels in {bucket:?}");

    let ranks: Vec<u64> = bucket.iter().map(|v| label_rank(&v.quality)).collect();
    assert!(
        ranks.windows(2).all(|w| w[0] >= w[1]),
        "not sorted by descending rank: {ranks:?}"
    );

    for variant in bucket {
        let url = variant.url.to_ascii_lowercase();
        assert!(url.starts_with("http://") || url.starts_with("https://"));
        assert!(!url.contains(".m3u8") && !url.contains(".mpd"));
    }
}

proptest! {
    #[test]
    fn catalog_buckets_are_well_formed(record in record()) {
        let catalog = canonicalize(&record);

        assert_well_formed(&catalog.combined);
        assert_well_formed(&catalog.audio_only);
        assert_well_formed(&catalog.video_only);
        prop_assert!(!catalog.title.trim().is_empty());
        prop_assert!(!catalog.uploader.trim().is_empty());
    }

    #[test]
    fn catalog_output_is_deterministic(record in record()) {
        let first = serde_json::to_string(&canonicalize(&record)).unwrap();
        let second = serde_json::to_string(&canonicalize(&record)).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn only_direct_resources_survive(record in record()) {
        let catalog = canonicalize(&record);
        let total = catalog.combined.len() + catalog.audio_only.len() + catalog.video_only.len();
        let direct = record
            .formats
            .iter()
            .filter(|d| {
                d.url.as_deref().is_some_and(|u| {
                    u.starts_with("https://") && !u.contains(".m3u8") && !u.contains(".mpd")
                })
            })
            .count();
        prop_assert!(total <= direct);
    }
}
