//! The section table shipped with the generated documentation.

use crate::table::BucketFlags;

const T: bool = true;
const F: bool = false;

/// Rows in the generator's display order; buckets in canonical order.
#[rustfmt::skip]
pub(crate) const ROWS: [(&str, BucketFlags); 5] = [
    ("General", [
        T, F,
        T, T, T, T, T, T, T, T, T, T, T, T, T,
        T, T, T, F, T, T, T, T, T, T, T, F, F,
    ]),
    ("Variables", [
        F, F,
        T, T, T, T, F, T, T, T, T, F, F, T, T,
        T, T, T, F, T, T, T, T, T, T, F, F, F,
    ]),
    ("Functions", [
        T, F,
        T, T, T, T, T, T, T, T, T, F, T, T, T,
        T, T, T, F, T, T, T, T, T, T, T, F, F,
    ]),
    ("Files", [
        F, F,
        F, F, F, F, F, F, F, F, F, T, F, F, F,
        F, F, T, F, F, T, F, T, F, F, F, F, F,
    ]),
    ("Classes", [
        F, F,
        F, T, T, T, T, T, F, F, F, F, F, F, T,
        T, T, T, F, T, T, T, T, F, F, T, F, F,
    ]),
];
