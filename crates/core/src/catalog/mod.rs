//! Catalog data model - the three resource kinds mirrored from Tube Archivist.
//!
//! Items keep their scalar fields typed and their nested fields as raw JSON:
//! the cache stores those blobs and only a few reporting queries look inside.

pub(crate) mod de;
mod types;

pub use types::*;
