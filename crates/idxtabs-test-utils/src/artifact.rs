//! Artifact fixtures.
//!
//! [`ArtifactBuilder`] produces artifact text with chosen flags, and
//! [`TestArtifact`] writes it to a temporary file that lives as long as the
//! value does.

use std::path::PathBuf;

use idxtabs_core::{Bucket, SectionAvailabilityTable, render_js};
use tempfile::TempDir;

/// The artifact text shipped with the generated documentation.
pub const SHIPPED_ARTIFACT: &str = include_str!("../../idxtabs-core/data/searchdata.js");

/// Builds artifact text category by category.
///
/// Buckets not switched on are written as `false`, so every row is complete
/// unless [`without_bucket`](Self::without_bucket) removes one.
#[derive(Debug, Default)]
pub struct ArtifactBuilder {
    rows: Vec<(String, Vec<(Bucket, bool)>)>,
}

impl ArtifactBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a category with the given buckets marked available.
    pub fn category(mut self, name: &str, available: &[Bucket]) -> Self {
        let flags = Bucket::ALL
            .into_iter()
            .map(|b| (b, available.contains(&b)))
            .collect();
        self.rows.push((name.to_string(), flags));
        self
    }

    /// Drop `bucket` from the most recently added category.
    pub fn without_bucket(mut self, bucket: Bucket) -> Self {
        if let Some((_, flags)) = self.rows.last_mut() {
            flags.retain(|(b, _)| *b != bucket);
        }
        self
    }

    /// Bare JSON object text.
    pub fn to_json(&self) -> String {
        let rows: Vec<String> = self
            .rows
            .iter()
            .map(|(name, flags)| {
                let fields: Vec<String> = flags
                    .iter()
                    .map(|(b, f)| format!("\"{}\": {f}", b.label()))
                    .collect();
                format!("\"{name}\": {{{}}}", fields.join(", "))
            })
            .collect();
        format!("{{{}}}", rows.join(", "))
    }

    /// `var indexSectionsWithContent = ...;` script text.
    pub fn to_js(&self) -> String {
        format!("var indexSectionsWithContent = {};\n", self.to_json())
    }
}

/// An artifact file in a temporary directory.
///
/// The directory is deleted when this value is dropped.
pub struct TestArtifact {
    pub path: PathBuf,
    _temp_dir: TempDir,
}

impl TestArtifact {
    /// Write `contents` to `file_name` inside a fresh temp directory.
    pub async fn with_contents(file_name: &str, contents: &str) -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let path = temp_dir.path().join(file_name);
        tokio::fs::write(&path, contents)
            .await
            .expect("failed to write test artifact");
        Self {
            path,
            _temp_dir: temp_dir,
        }
    }

    /// A copy of the shipped `searchdata.js`.
    pub async fn shipped() -> Self {
        Self::with_contents("searchdata.js", SHIPPED_ARTIFACT).await
    }

    /// The given table rendered in the generator's layout.
    pub async fn rendered(table: &SectionAvailabilityTable) -> Self {
        Self::with_contents("searchdata.js", &render_js(table)).await
    }
}
