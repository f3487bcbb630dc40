//! Index buckets: the 28 fixed grouping keys of an alphabetical index.
//!
//! Every category in a [`SectionAvailabilityTable`](crate::SectionAvailabilityTable)
//! is partitioned into the same buckets, always presented in the canonical
//! order `Symbols, Numbers, A..Z`.

use std::fmt;
use std::str::FromStr;

use crate::table::LookupError;

/// A grouping key within an index category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Bucket {
    /// Entries whose name starts with punctuation or any non-alphanumeric character.
    Symbols,
    /// Entries whose name starts with a digit.
    Numbers,
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,
}

/// Labels as written by the generator, indexed by [`Bucket::index`].
const LABELS: [&str; Bucket::COUNT] = [
    "Symbols", "Numbers", "A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L", "M", "N", "O",
    "P", "Q", "R", "S", "T", "U", "V", "W", "X", "Y", "Z",
];

impl Bucket {
    /// Number of buckets every category carries.
    pub const COUNT: usize = 28;

    /// All buckets in canonical display order.
    pub const ALL: [Bucket; Bucket::COUNT] = [
        Bucket::Symbols,
        Bucket::Numbers,
        Bucket::A,
        Bucket::B,
        Bucket::C,
        Bucket::D,
        Bucket::E,
        Bucket::F,
        Bucket::G,
        Bucket::H,
        Bucket::I,
        Bucket::J,
        Bucket::K,
        Bucket::L,
        Bucket::M,
        Bucket::N,
        Bucket::O,
        Bucket::P,
        Bucket::Q,
        Bucket::R,
        Bucket::S,
        Bucket::T,
        Bucket::U,
        Bucket::V,
        Bucket::W,
        Bucket::X,
        Bucket::Y,
        Bucket::Z,
    ];

    /// Position of this bucket in the canonical order.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The label the generator uses for this bucket (`"Symbols"`, `"Numbers"`, `"A"`..`"Z"`).
    pub const fn label(self) -> &'static str {
        LABELS[self.index()]
    }

    /// Look up a bucket by its exact label.
    ///
    /// Matching is case-sensitive: `"q"` is not a bucket, `"Q"` is.
    pub fn from_label(label: &str) -> Option<Bucket> {
        LABELS
            .iter()
            .position(|l| *l == label)
            .map(|i| Bucket::ALL[i])
    }

    /// The bucket a search term files under, judged by its first character.
    ///
    /// ASCII letters go to their uppercase letter bucket, ASCII digits to
    /// [`Bucket::Numbers`], everything else to [`Bucket::Symbols`]. Returns
    /// `None` for an empty term.
    pub fn of_term(term: &str) -> Option<Bucket> {
        let first = term.chars().next()?;
        let bucket = if first.is_ascii_alphabetic() {
            let offset = (first.to_ascii_uppercase() as u8 - b'A') as usize;
            Bucket::ALL[Bucket::A.index() + offset]
        } else if first.is_ascii_digit() {
            Bucket::Numbers
        } else {
            Bucket::Symbols
        };
        Some(bucket)
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Bucket {
    type Err = LookupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Bucket::from_label(s).ok_or_else(|| LookupError::UnknownBucket(s.to_string()))
    }
}
