//! Walking, and creating, chains of nested buckets.

use bucketeer_store::{Bucket, BucketMut, ReadTx, Store, WriteTx};
use tracing::debug;

use crate::error::{BucketeerError, Result};
use crate::path::Path;

/// Resolve the innermost bucket of `path` inside an open read transaction.
///
/// Returns `Ok(None)` as soon as any bucket along the path is missing; no
/// lookups happen past the first missing segment. Fails only for an empty
/// path.
pub fn get_bucket<'t, T: ReadTx>(tx: &'t T, path: &Path) -> Result<Option<&'t T::Bucket>> {
    let (first, rest) = path.split_first()?;
    let Some(mut bucket) = tx.bucket(first) else {
        return Ok(None);
    };
    for name in rest {
        bucket = match bucket.bucket(name) {
            Some(nested) => nested,
            None => return Ok(None),
        };
    }
    Ok(Some(bucket))
}

/// Resolve the innermost bucket of `path` inside an open write transaction,
/// for mutation. Same contract as [`get_bucket`].
pub fn get_bucket_mut<'t, T: WriteTx>(
    tx: &'t mut T,
    path: &Path,
) -> Result<Option<&'t mut T::Bucket>> {
    let (first, rest) = path.split_first()?;
    let Some(mut bucket) = tx.bucket_mut(first) else {
        return Ok(None);
    };
    for name in rest {
        bucket = match bucket.bucket_mut(name) {
            Some(nested) => nested,
            None => return Ok(None),
        };
    }
    Ok(Some(bucket))
}

/// Create every bucket along `path` that does not exist yet, in a single
/// write transaction. Idempotent.
pub fn ensure_path_buckets<S: Store>(db: &S, path: &Path) -> Result<()> {
    let (first, rest) = path.split_first()?;
    db.update(|tx| {
        let mut bucket = tx.create_bucket_if_not_exists(first)?;
        for name in rest {
            bucket = bucket.create_bucket_if_not_exists(name)?;
        }
        Ok::<_, BucketeerError>(())
    })?;
    debug!(path = %path, "ensured path buckets");
    Ok(())
}

/// Create a bucket called `name` directly under the bucket at `path`.
///
/// The parent path must already exist in full; missing ancestors are not
/// created and yield [`BucketeerError::MissingPath`].
pub fn ensure_nested_bucket<S: Store>(db: &S, path: &Path, name: &[u8]) -> Result<()> {
    path.ensure_non_empty()?;
    db.update(|tx| match get_bucket_mut(tx, path)? {
        Some(parent) => {
            parent.create_bucket_if_not_exists(name)?;
            Ok(())
        }
        None => Err(path.missing()),
    })?;
    debug!(
        path = %path,
        name = %String::from_utf8_lossy(name),
        "ensured nested bucket"
    );
    Ok(())
}
