//! Loading and rendering the generator's `searchdata.js` artifact.
//!
//! The generator writes the table as a JavaScript assignment:
//!
//! ```text
//! var indexSectionsWithContent = {
//!    "General": {
//!       "Symbols": true,
//!       ...
//!       "Z": false
//!       },
//!    ...
//!    }
//! ```
//!
//! The same object may also be supplied as bare JSON. Both forms are parsed
//! into a [`SectionAvailabilityTable`], rejecting rows that do not carry
//! exactly the 28 known buckets.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};

use crate::bucket::Bucket;
use crate::table::{BucketFlags, SectionAvailabilityTable};

/// Name of the JavaScript variable the generator assigns the table to.
pub const ARTIFACT_VARIABLE: &str = "indexSectionsWithContent";

/// Errors from loading an artifact.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("failed to read artifact: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed artifact JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("artifact does not assign `indexSectionsWithContent`")]
    MissingAssignment,

    #[error("artifact contains no table")]
    Empty,

    #[error("category {category:?} has no entry for bucket {bucket}")]
    MissingBucket { category: String, bucket: Bucket },

    #[error("category {category:?} has unknown bucket {label:?}")]
    UnknownBucket { category: String, label: String },

    #[error("category {category:?} lists bucket {bucket} more than once")]
    DuplicateBucket { category: String, bucket: Bucket },

    #[error("category {0:?} is defined more than once")]
    DuplicateCategory(String),

    #[error("unknown artifact format {0:?} (expected \"auto\", \"js\" or \"json\")")]
    UnknownFormat(String),
}

/// How to interpret artifact text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ArtifactFormat {
    /// `js` if the text declares [`ARTIFACT_VARIABLE`] (`var`, `let` or
    /// `const` followed by `=`), otherwise `json`.
    #[default]
    Auto,
    /// A `var indexSectionsWithContent = {...}` script.
    Js,
    /// A bare JSON object.
    Json,
}

impl FromStr for ArtifactFormat {
    type Err = ArtifactError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(ArtifactFormat::Auto),
            "js" => Ok(ArtifactFormat::Js),
            "json" => Ok(ArtifactFormat::Json),
            other => Err(ArtifactError::UnknownFormat(other.to_string())),
        }
    }
}

impl fmt::Display for ArtifactFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactFormat::Auto => write!(f, "auto"),
            ArtifactFormat::Js => write!(f, "js"),
            ArtifactFormat::Json => write!(f, "json"),
        }
    }
}

/// Category rows exactly as they appear in the source, before validation.
///
/// Keeps source order and repeated category names so both can be checked.
pub(crate) struct RawTable(Vec<(String, RawRow)>);

/// One category's `label -> flag` entries in source order, repeats included.
pub(crate) struct RawRow(Vec<(String, bool)>);

impl<'de> Deserialize<'de> for RawTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RawTableVisitor;

        impl<'de> Visitor<'de> for RawTableVisitor {
            type Value = RawTable;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of category names to bucket flags")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<RawTable, A::Error> {
                let mut rows = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((name, row)) = map.next_entry::<String, RawRow>()? {
                    rows.push((name, row));
                }
                Ok(RawTable(rows))
            }
        }

        deserializer.deserialize_map(RawTableVisitor)
    }
}

impl<'de> Deserialize<'de> for RawRow {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RawRowVisitor;

        impl<'de> Visitor<'de> for RawRowVisitor {
            type Value = RawRow;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of bucket labels to booleans")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<RawRow, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(Bucket::COUNT));
                while let Some(entry) = map.next_entry::<String, bool>()? {
                    entries.push(entry);
                }
                Ok(RawRow(entries))
            }
        }

        deserializer.deserialize_map(RawRowVisitor)
    }
}

/// Validate raw rows and build the table from them.
pub(crate) fn table_from_raw(raw: RawTable) -> Result<SectionAvailabilityTable, ArtifactError> {
    let rows = raw
        .0
        .into_iter()
        .map(|(category, row)| {
            let flags = row_flags(&category, &row)?;
            Ok((category, flags))
        })
        .collect::<Result<Vec<_>, ArtifactError>>()?;
    SectionAvailabilityTable::from_rows(rows)
}

/// Turn one row's entries into a full set of flags.
///
/// Every bucket must appear exactly once.
fn row_flags(category: &str, row: &RawRow) -> Result<BucketFlags, ArtifactError> {
    let mut flags = [false; Bucket::COUNT];
    let mut seen = [false; Bucket::COUNT];

    for (label, available) in &row.0 {
        let bucket = Bucket::from_label(label).ok_or_else(|| ArtifactError::UnknownBucket {
            category: category.to_string(),
            label: label.clone(),
        })?;
        if seen[bucket.index()] {
            return Err(ArtifactError::DuplicateBucket {
                category: category.to_string(),
                bucket,
            });
        }
        flags[bucket.index()] = *available;
        seen[bucket.index()] = true;
    }

    if let Some(bucket) = Bucket::ALL.into_iter().find(|b| !seen[b.index()]) {
        return Err(ArtifactError::MissingBucket {
            category: category.to_string(),
            bucket,
        });
    }

    Ok(flags)
}

/// Declaration keywords that may introduce the table variable.
const DECLARATION_KEYWORDS: [&str; 3] = ["var", "let", "const"];

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Whether `before` ends with a declaration keyword followed by whitespace.
fn ends_with_declaration(before: &str) -> bool {
    let trimmed = before.trim_end();
    if trimmed.len() == before.len() {
        return false;
    }
    DECLARATION_KEYWORDS.iter().any(|kw| {
        trimmed
            .strip_suffix(kw)
            .is_some_and(|rest| !rest.ends_with(is_ident_char))
    })
}

/// Locate `var indexSectionsWithContent =` and return the text after the `=`.
///
/// Mentions of the variable name elsewhere (comments, string keys) are
/// skipped.
fn assignment_body(src: &str) -> Option<&str> {
    src.match_indices(ARTIFACT_VARIABLE).find_map(|(start, _)| {
        if !ends_with_declaration(&src[..start]) {
            return None;
        }
        let rest = &src[start + ARTIFACT_VARIABLE.len()..];
        if rest.starts_with(is_ident_char) {
            return None;
        }
        let rest = rest.trim_start().strip_prefix('=')?;
        if rest.starts_with('=') {
            return None;
        }
        Some(rest.trim_start())
    })
}

/// Parse artifact text into a table.
pub fn parse_artifact(
    src: &str,
    format: ArtifactFormat,
) -> Result<SectionAvailabilityTable, ArtifactError> {
    let body = match format {
        ArtifactFormat::Json => None,
        ArtifactFormat::Js => Some(assignment_body(src).ok_or(ArtifactError::MissingAssignment)?),
        ArtifactFormat::Auto => assignment_body(src),
    };

    let raw = match body {
        None => {
            if src.trim().is_empty() {
                return Err(ArtifactError::Empty);
            }
            serde_json::from_str::<RawTable>(src)?
        }
        // Only the first value is read, so a trailing `;` or further
        // statements after the object are left alone.
        Some(body) => serde_json::Deserializer::from_str(body)
            .into_iter::<RawTable>()
            .next()
            .ok_or(ArtifactError::Empty)??,
    };

    let detected = if body.is_some() { "js" } else { "json" };
    let table = table_from_raw(raw)?;
    tracing::debug!(
        format = detected,
        categories = table.len(),
        "Parsed section availability artifact"
    );
    Ok(table)
}

/// Read and parse an artifact file.
pub async fn load_artifact(
    path: &Path,
    format: ArtifactFormat,
) -> Result<SectionAvailabilityTable, ArtifactError> {
    tracing::debug!(path = %path.display(), %format, "Loading section availability artifact");
    let contents = tokio::fs::read_to_string(path).await?;
    parse_artifact(&contents, format)
}

/// Render a table in the generator's `searchdata.js` layout.
pub fn render_js(table: &SectionAvailabilityTable) -> String {
    JsArtifact(table).to_string()
}

/// [`Display`](fmt::Display) adapter writing a table as `searchdata.js` text.
pub struct JsArtifact<'a>(pub &'a SectionAvailabilityTable);

impl fmt::Display for JsArtifact<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "var {ARTIFACT_VARIABLE} = {{")?;
        let count = self.0.len();

        for (i, (category, flags)) in self.0.rows().enumerate() {
            writeln!(f, "   {}: {{", serde_json::Value::from(category))?;
            for bucket in Bucket::ALL {
                let sep = if bucket == Bucket::Z { "" } else { "," };
                writeln!(f, "      \"{bucket}\": {}{sep}", flags[bucket.index()])?;
            }
            let sep = if i + 1 < count { "," } else { "" };
            writeln!(f, "      }}{sep}")?;
        }

        write!(f, "   }}")
    }
}
