//! Transactions scoped to the bucket at the end of a path.
//!
//! Each function opens one store transaction, resolves the path inside it,
//! and hands the resolved bucket to the caller's closure. When the path does
//! not resolve the closure is not run and the result is `Ok(None)`.

use bucketeer_store::{Bucket, BucketMut, BucketStats, Store};
use tracing::debug;

use crate::error::Result;
use crate::path::Path;
use crate::resolve::{get_bucket, get_bucket_mut};

/// Run `f` against the bucket at `path` in a read-only transaction.
pub fn view_in_bucket<S, T, F>(db: &S, path: &Path, f: F) -> Result<Option<T>>
where
    S: Store,
    F: FnOnce(&S::Bucket) -> Result<T>,
{
    path.ensure_non_empty()?;
    db.view(|tx| match get_bucket(tx, path)? {
        Some(bucket) => f(bucket).map(Some),
        None => {
            debug!(path = %path, "path not found; view skipped");
            Ok(None)
        }
    })
}

/// Run `f` against the bucket at `path` in a read-write transaction.
///
/// The transaction commits if `f` returns `Ok` and rolls back otherwise.
pub fn update_in_bucket<S, T, F>(db: &S, path: &Path, f: F) -> Result<Option<T>>
where
    S: Store,
    F: FnOnce(&mut S::Bucket) -> Result<T>,
{
    path.ensure_non_empty()?;
    db.update(|tx| match get_bucket_mut(tx, path)? {
        Some(bucket) => f(bucket).map(Some),
        None => {
            debug!(path = %path, "path not found; update skipped");
            Ok(None)
        }
    })
}

/// Like [`update_in_bucket`], but first draws the bucket's next sequence
/// value and passes it to `f`.
///
/// The sequence advance and `f`'s writes commit or roll back together.
pub fn update_with_sequence<S, T, F>(db: &S, path: &Path, f: F) -> Result<Option<(u64, T)>>
where
    S: Store,
    F: FnOnce(&mut S::Bucket, u64) -> Result<T>,
{
    update_in_bucket(db, path, |bucket| {
        let sequence = bucket.next_sequence()?;
        f(bucket, sequence).map(|value| (sequence, value))
    })
}

/// Delete the bucket called `name` nested directly under `path`.
///
/// Fails with the store's native error if `name` does not exist, and with
/// `MissingPath` if `path` itself does not resolve.
pub fn delete_nested_bucket<S: Store>(db: &S, path: &Path, name: &[u8]) -> Result<()> {
    update_in_bucket(db, path, |bucket| Ok(bucket.delete_bucket(name)?))?
        .ok_or_else(|| path.missing())?;
    debug!(
        path = %path,
        name = %String::from_utf8_lossy(name),
        "deleted nested bucket"
    );
    Ok(())
}

/// Statistics for the bucket at `path`, as reported by the store.
pub fn bucket_stats<S: Store>(db: &S, path: &Path) -> Result<BucketStats> {
    view_in_bucket(db, path, |bucket| Ok(bucket.stats()))?.ok_or_else(|| path.missing())
}
