//! Fuzz target for the searchdata.js artifact parser.
//!
//! Run with: cargo +nightly fuzz run fuzz_artifact_parser
//!
//! Feeds arbitrary text through `parse_artifact()` in every format. Any table
//! that parses must answer lookups for all of its categories and render back
//! to an equal table.

#![no_main]

use idxtabs_core::{ArtifactFormat, Bucket, parse_artifact, render_js};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(src) = std::str::from_utf8(data) else {
        return;
    };

    for format in [ArtifactFormat::Auto, ArtifactFormat::Js, ArtifactFormat::Json] {
        let Ok(table) = parse_artifact(src, format) else {
            continue;
        };
        for category in table.categories() {
            for bucket in Bucket::ALL {
                assert!(table.is_available(category, bucket.label()).is_ok());
            }
        }
        let reparsed = parse_artifact(&render_js(&table), ArtifactFormat::Js)
            .expect("rendered artifact must parse");
        assert_eq!(reparsed, table);
    }
});
