//! Immutable paths of bucket names.

use std::fmt;
use std::sync::Arc;

use crate::error::{BucketeerError, Result};

/// Separator used when rendering a path.
pub const SEPARATOR: char = '/';

/// An ordered chain of bucket names, from a top-level bucket down to the
/// target bucket.
///
/// Paths are immutable and cheap to clone: clones share the segment storage.
/// [`Path::nest`] builds a new path instead of extending this one.
///
/// A path with no segments can be constructed, but every resolution over it
/// fails with [`BucketeerError::EmptyPath`].
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Path {
    segments: Arc<[Vec<u8>]>,
}

impl Path {
    /// Build a path from bucket names.
    ///
    /// ```
    /// use bucketeer::Path;
    ///
    /// let path = Path::new(["app", "users"]);
    /// assert_eq!(path.len(), 2);
    /// assert_eq!(path.to_string(), "app/users");
    /// ```
    pub fn new<I, N>(names: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: AsRef<[u8]>,
    {
        Self {
            segments: names.into_iter().map(|n| n.as_ref().to_vec()).collect(),
        }
    }

    /// A new path with `name` appended. `self` is left untouched.
    pub fn nest(&self, name: impl AsRef<[u8]>) -> Path {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend(self.segments.iter().cloned());
        segments.push(name.as_ref().to_vec());
        Self {
            segments: segments.into(),
        }
    }

    /// The path without its last segment, or `None` for paths of length 0
    /// or 1.
    pub fn parent(&self) -> Option<Path> {
        match self.segments.len() {
            0 | 1 => None,
            n => Some(Self {
                segments: self.segments[..n - 1].into(),
            }),
        }
    }

    /// The last segment: the name of the target bucket.
    pub fn name(&self) -> Option<&[u8]> {
        self.segments.last().map(Vec::as_slice)
    }

    pub fn segments(&self) -> &[Vec<u8>] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Split into the top-level bucket name and the nested names below it.
    pub fn split_first(&self) -> Result<(&[u8], &[Vec<u8>])> {
        match self.segments.split_first() {
            Some((first, rest)) => Ok((first.as_slice(), rest)),
            None => Err(BucketeerError::EmptyPath),
        }
    }

    /// Fail with [`BucketeerError::EmptyPath`] if the path has no segments.
    pub fn ensure_non_empty(&self) -> Result<()> {
        self.split_first().map(|_| ())
    }

    pub(crate) fn missing(&self) -> BucketeerError {
        BucketeerError::MissingPath {
            path: self.to_string(),
        }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, "{SEPARATOR}")?;
            }
            write!(f, "{}", String::from_utf8_lossy(segment))?;
        }
        Ok(())
    }
}

impl fmt::Debug for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Path({self})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nest_leaves_original_untouched() {
        let base = Path::new(["app"]);
        let users = base.nest("users");
        let orders = base.nest("orders");
        assert_eq!(base.len(), 1);
        assert_eq!(users.to_string(), "app/users");
        assert_eq!(orders.to_string(), "app/orders");
        assert_ne!(users, orders);
    }

    #[test]
    fn equality_and_display() {
        assert_eq!(Path::new(["a", "b"]), Path::new(["a"]).nest("b"));
        assert_eq!(format!("{:?}", Path::new(["x", "y"])), "Path(x/y)");
        assert_eq!(Path::new(Vec::<&str>::new()).to_string(), "");
    }

    #[test]
    fn byte_segments() {
        let path = Path::new([&[0xff_u8, 0x00][..], &b"ok"[..]]);
        assert_eq!(path.segments()[0], vec![0xff, 0x00]);
        assert_eq!(path.name(), Some(&b"ok"[..]));
        assert!(path.to_string().ends_with("/ok"));
    }

    #[test]
    fn parent_and_name() {
        let path = Path::new(["a", "b", "c"]);
        assert_eq!(path.parent(), Some(Path::new(["a", "b"])));
        assert_eq!(Path::new(["a"]).parent(), None);
        assert_eq!(path.name(), Some(&b"c"[..]));
    }

    #[test]
    fn empty_path_fails_split() {
        let empty = Path::new(Vec::<Vec<u8>>::new());
        assert!(empty.is_empty());
        assert!(matches!(empty.split_first(), Err(BucketeerError::EmptyPath)));
        assert!(empty.ensure_non_empty().is_err());
        assert_eq!(empty.nest("a").len(), 1);
    }

    #[test]
    fn split_first() {
        let path = Path::new(["a", "b", "c"]);
        let (first, rest) = path.split_first().unwrap();
        assert_eq!(first, b"a");
        assert_eq!(rest, &[b"b".to_vec(), b"c".to_vec()][..]);
    }
}
