#![deny(unsafe_code)]

//! Section availability tables for generated documentation indexes.
//!
//! A documentation generator records, for every index category ("General",
//! "Functions", "Classes", ...), which alphabetical buckets hold at least one
//! entry. Search front-ends use that table to enable or disable letter tabs.
//! This crate loads the generator's artifact into an immutable
//! [`SectionAvailabilityTable`] and answers lookups against it.

/// Loading and rendering the generator's `searchdata.js` artifact.
pub mod artifact;
/// The 28 fixed index buckets.
pub mod bucket;
mod builtin;
/// The immutable lookup table.
pub mod table;

pub use artifact::{
    ArtifactError, ArtifactFormat, JsArtifact, load_artifact, parse_artifact, render_js,
};
pub use bucket::Bucket;
pub use table::{BucketFlags, LookupError, SectionAvailabilityTable};
