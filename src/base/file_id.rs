//! Source file identifiers.

use std::fmt;

/// Handle for one source file of a compilation.
///
/// Symbol locations and diagnostics refer to files through this id; the path or
/// text lives with whoever assigned it.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Default)]
pub struct FileId(pub u32);

impl FileId {
    /// Create a new FileId from a raw index.
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw index.
    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FileId({})", self.0)
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "file#{}", self.0)
    }
}

impl From<u32> for FileId {
    #[inline]
    fn from(id: u32) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_id_display() {
        assert_eq!(FileId::new(3).to_string(), "file#3");
        assert_eq!(format!("{:?}", FileId::from(7)), "FileId(7)");
    }

    #[test]
    fn test_file_id_ordering() {
        let mut ids = vec![FileId::new(2), FileId::new(0), FileId::new(1)];
        ids.sort();
        assert_eq!(ids, vec![FileId::new(0), FileId::new(1), FileId::new(2)]);
    }
}
