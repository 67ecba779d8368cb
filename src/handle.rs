//! # Native Handles
//!
//! Objects returned by the native proof primitives are not managed by Rust
//! and must be released exactly once. [`NativeHandle`] owns such an object
//! and releases it when dropped, so every exit path of a presentation build
//! or verification releases it.

use std::ops::Deref;

use serde_json::Value;

/// A presentation object owned by the native proof primitives.
pub trait NativePresentation: Send {
    /// Serialize the presentation to JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the native object cannot be serialized.
    fn to_json(&self) -> anyhow::Result<Value>;

    /// Timestamp of the revocation status list the credential at
    /// `entry_index` was proven against, if any.
    fn timestamp(&self, entry_index: usize) -> Option<u64>;

    /// Free the native object. Called at most once, by [`NativeHandle`].
    fn release(&mut self);
}

/// Scoped ownership of a native presentation. The handle cannot be cloned
/// and releases the native object when dropped.
#[derive(Debug)]
pub struct NativeHandle<T: NativePresentation> {
    inner: T,
    released: bool,
}

impl<T: NativePresentation> NativeHandle<T> {
    /// Take ownership of a native presentation.
    pub const fn new(inner: T) -> Self {
        Self {
            inner,
            released: false,
        }
    }

    /// Release the native object. Subsequent calls do nothing.
    pub(crate) fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        self.inner.release();
    }
}

impl<T: NativePresentation> Deref for NativeHandle<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<T: NativePresentation> Drop for NativeHandle<T> {
    fn drop(&mut self) {
        tracing::debug!("handle::drop");
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use serde_json::json;

    use super::*;

    #[derive(Default)]
    struct Counted {
        releases: Arc<AtomicUsize>,
    }

    impl NativePresentation for Counted {
        fn to_json(&self) -> anyhow::Result<Value> {
            Ok(json!({}))
        }

        fn timestamp(&self, _: usize) -> Option<u64> {
            None
        }

        fn release(&mut self) {
            self.releases.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn release_on_drop() {
        let native = Counted::default();
        let releases = Arc::clone(&native.releases);

        let handle = NativeHandle::new(native);
        assert!(handle.to_json().is_ok());
        assert_eq!(releases.load(Ordering::SeqCst), 0);

        drop(handle);
        assert_eq!(releases.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn release_twice() {
        let native = Counted::default();
        let releases = Arc::clone(&native.releases);

        let mut handle = NativeHandle::new(native);
        handle.release();
        handle.release();
        drop(handle);

        assert_eq!(releases.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn release_on_error_path() {
        fn fails(handle: &NativeHandle<Counted>) -> anyhow::Result<()> {
            handle.to_json()?;
            anyhow::bail!("verification could not complete")
        }

        let native = Counted::default();
        let releases = Arc::clone(&native.releases);

        let result = {
            let handle = NativeHandle::new(native);
            fails(&handle)
        };
        assert!(result.is_err());
        assert_eq!(releases.load(Ordering::SeqCst), 1);
    }
}
