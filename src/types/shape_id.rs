use std::{fmt, sync::Arc};

use serde::{Serialize, Serializer};

/// Stable key for one drawable region in the vector map asset.
/// Keep the original id text (e.g. "PEARE") but avoid repeated owned Strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShapeId(Arc<str>);

impl ShapeId {
    pub fn new(id: &str) -> Self {
        Self(Arc::from(id))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ShapeId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl Serialize for ShapeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}
