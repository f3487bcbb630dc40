//! The section availability table.
//!
//! Maps each index category (e.g. "Functions") to one flag per [`Bucket`],
//! stating whether the category has at least one entry under that bucket.
//! The table is immutable once built and safe to share across threads.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::LazyLock;

use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::artifact::{self, ArtifactError, RawTable};
use crate::bucket::Bucket;
use crate::builtin;

/// One availability flag per bucket, indexed by [`Bucket::index`].
pub type BucketFlags = [bool; Bucket::COUNT];

/// Errors from querying the table with a name it does not know.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("unknown index category: {0:?}")]
    UnknownCategory(String),

    #[error("unknown index bucket: {0:?}")]
    UnknownBucket(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CategoryRow {
    name: String,
    flags: BucketFlags,
}

/// Read-only lookup table of which index sections have content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionAvailabilityTable {
    /// Rows in display order.
    rows: Vec<CategoryRow>,
    /// Category name to position in `rows`.
    by_name: HashMap<String, usize>,
}

static BUILTIN: LazyLock<SectionAvailabilityTable> =
    LazyLock::new(|| SectionAvailabilityTable::build(builtin::ROWS.iter().map(|(n, f)| (*n, *f))));

impl SectionAvailabilityTable {
    /// The table shipped with the generated documentation.
    pub fn builtin() -> &'static SectionAvailabilityTable {
        &BUILTIN
    }

    /// Build a table from complete rows, keeping their order for display.
    ///
    /// Fails if the same category name appears twice.
    pub fn from_rows<I, S>(rows: I) -> Result<Self, ArtifactError>
    where
        I: IntoIterator<Item = (S, BucketFlags)>,
        S: Into<String>,
    {
        let rows: Vec<(String, BucketFlags)> =
            rows.into_iter().map(|(n, f)| (n.into(), f)).collect();

        let mut seen = HashSet::with_capacity(rows.len());
        for (name, _) in &rows {
            if !seen.insert(name.as_str()) {
                return Err(ArtifactError::DuplicateCategory(name.clone()));
            }
        }

        Ok(Self::build(rows))
    }

    /// Assemble the table from rows already known to be unique.
    fn build<I, S>(rows: I) -> Self
    where
        I: IntoIterator<Item = (S, BucketFlags)>,
        S: Into<String>,
    {
        let rows: Vec<CategoryRow> = rows
            .into_iter()
            .map(|(name, flags)| CategoryRow {
                name: name.into(),
                flags,
            })
            .collect();
        let by_name = rows
            .iter()
            .enumerate()
            .map(|(i, row)| (row.name.clone(), i))
            .collect();
        Self { rows, by_name }
    }

    /// Whether `category` has any entries under the bucket labelled `bucket`.
    pub fn is_available(&self, category: &str, bucket: &str) -> Result<bool, LookupError> {
        let flags = self.flags(category)?;
        let bucket: Bucket = bucket.parse()?;
        Ok(flags[bucket.index()])
    }

    /// Like [`is_available`](Self::is_available) for callers already holding a [`Bucket`].
    pub fn is_available_in(&self, category: &str, bucket: Bucket) -> Result<bool, LookupError> {
        Ok(self.flags(category)?[bucket.index()])
    }

    /// All buckets of `category` with their flags, in canonical order.
    ///
    /// The returned iterator always yields exactly [`Bucket::COUNT`] items and
    /// can be cloned to restart it.
    pub fn buckets_for(
        &self,
        category: &str,
    ) -> Result<impl ExactSizeIterator<Item = (Bucket, bool)> + Clone + '_, LookupError> {
        let flags = self.flags(category)?;
        Ok(Bucket::ALL.into_iter().map(move |b| (b, flags[b.index()])))
    }

    /// Only the buckets of `category` that have content, in canonical order.
    pub fn active_buckets(
        &self,
        category: &str,
    ) -> Result<impl Iterator<Item = Bucket> + Clone + '_, LookupError> {
        Ok(self
            .buckets_for(category)?
            .filter(|(_, available)| *available)
            .map(|(bucket, _)| bucket))
    }

    /// Category names in display order.
    pub fn categories(&self) -> impl ExactSizeIterator<Item = &str> + Clone + '_ {
        self.rows.iter().map(|row| row.name.as_str())
    }

    /// Whether the table has a row for `category`.
    pub fn contains_category(&self, category: &str) -> bool {
        self.by_name.contains_key(category)
    }

    /// Number of categories.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no categories at all.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Category names with their flags, in display order.
    pub(crate) fn rows(&self) -> impl ExactSizeIterator<Item = (&str, &BucketFlags)> + '_ {
        self.rows.iter().map(|row| (row.name.as_str(), &row.flags))
    }

    fn flags(&self, category: &str) -> Result<&BucketFlags, LookupError> {
        self.by_name
            .get(category)
            .map(|&i| &self.rows[i].flags)
            .ok_or_else(|| LookupError::UnknownCategory(category.to_string()))
    }
}

/// Serializes one row as a `label -> flag` map in canonical bucket order.
struct FlagsMap<'a>(&'a BucketFlags);

impl Serialize for FlagsMap<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Bucket::COUNT))?;
        for bucket in Bucket::ALL {
            map.serialize_entry(bucket.label(), &self.0[bucket.index()])?;
        }
        map.end()
    }
}

impl Serialize for SectionAvailabilityTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.rows.len()))?;
        for row in &self.rows {
            map.serialize_entry(&row.name, &FlagsMap(&row.flags))?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SectionAvailabilityTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawTable::deserialize(deserializer)?;
        artifact::table_from_raw(raw).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for SectionAvailabilityTable {
    /// One line per category: the name followed by the active bucket labels.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            write!(f, "{}:", row.name)?;
            for bucket in Bucket::ALL {
                if row.flags[bucket.index()] {
                    write!(f, " {bucket}")?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
