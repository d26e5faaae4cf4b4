//! Editor implementation abstraction.
//!
//! The host application supplies generation and persistence through an
//! [`EditorImplementation`]. The board controller only keeps a replica of the
//! object collection and pushes every change back through this trait.

mod memory;

pub use memory::{MemoryEditor, PlaceholderDecoration};

use crate::object::{ObjectDataPair, ObjectLocation};
use std::any::Any;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use thiserror::Error;

/// Editor errors.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("Object not found: {0}")]
    NotFound(String),
    #[error("Generation failed: {0}")]
    Generation(String),
    #[error("Editor implementation unavailable")]
    Unavailable,
    #[error("Editor error: {0}")]
    Other(String),
}

/// Result type for editor operations.
pub type EditorResult<T> = Result<T, EditorError>;

/// Boxed future for async operations (compatible with WASM).
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Opaque render capability returned by generation.
///
/// The board never inspects it; hosts downcast it to whatever their
/// rendering layer understands and mount it under the overlays.
#[derive(Clone)]
pub struct Decoration {
    inner: Arc<dyn Any + Send + Sync>,
}

impl Decoration {
    /// Wrap a host-defined render value.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            inner: Arc::new(value),
        }
    }

    /// Borrow the wrapped value if it has type `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Check whether the wrapped value has type `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.inner.is::<T>()
    }
}

impl fmt::Debug for Decoration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Decoration").finish_non_exhaustive()
    }
}

/// Output of a generation request.
#[derive(Debug, Clone)]
pub struct GenerationResult {
    /// Content rendered beneath the overlays.
    pub decoration: Decoration,
    /// New board width in pixels.
    pub width: f64,
    /// New board height in pixels.
    pub height: f64,
}

impl GenerationResult {
    /// Whether the reported board size is usable.
    pub fn has_valid_size(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Host-provided generation and object store.
///
/// After a successful [`generate_from_prompt`](Self::generate_from_prompt)
/// the new objects must be returned by
/// [`get_object_locations`](Self::get_object_locations).
///
/// Note: On native platforms, implementations must be Send + Sync.
/// On WASM, these bounds are relaxed since it's single-threaded.
#[cfg(not(target_arch = "wasm32"))]
pub trait EditorImplementation: Send + Sync {
    /// Current canonical object collection.
    fn get_object_locations(&self) -> Vec<ObjectLocation>;

    /// Generate new board content from a prompt.
    fn generate_from_prompt(&self, prompt: &str) -> BoxFuture<'_, EditorResult<GenerationResult>>;

    /// Store the location of one object.
    fn set_object_location(&self, id: &str, location: &ObjectLocation) -> EditorResult<()>;

    /// Load the metadata of one object. Synchronous stores return a ready future.
    fn get_object_data(&self, id: &str) -> BoxFuture<'_, EditorResult<Vec<ObjectDataPair>>>;

    /// Store the full metadata sequence of one object.
    fn set_object_data(&self, id: &str, pairs: &[ObjectDataPair]) -> EditorResult<()>;
}

/// Host-provided generation and object store (WASM version without Send + Sync).
#[cfg(target_arch = "wasm32")]
pub trait EditorImplementation {
    /// Current canonical object collection.
    fn get_object_locations(&self) -> Vec<ObjectLocation>;

    /// Generate new board content from a prompt.
    fn generate_from_prompt(&self, prompt: &str) -> BoxFuture<'_, EditorResult<GenerationResult>>;

    /// Store the location of one object.
    fn set_object_location(&self, id: &str, location: &ObjectLocation) -> EditorResult<()>;

    /// Load the metadata of one object. Synchronous stores return a ready future.
    fn get_object_data(&self, id: &str) -> BoxFuture<'_, EditorResult<Vec<ObjectDataPair>>>;

    /// Store the full metadata sequence of one object.
    fn set_object_data(&self, id: &str, pairs: &[ObjectDataPair]) -> EditorResult<()>;
}

/// Simple blocking executor for tests.
#[cfg(test)]
pub(crate) fn block_on<F: std::future::IntoFuture>(f: F) -> F::Output {
    use std::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};

    fn dummy_raw_waker() -> RawWaker {
        fn no_op(_: *const ()) {}
        fn clone(_: *const ()) -> RawWaker {
            dummy_raw_waker()
        }
        static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, no_op, no_op, no_op);
        RawWaker::new(std::ptr::null(), &VTABLE)
    }

    let waker = unsafe { Waker::from_raw(dummy_raw_waker()) };
    let mut cx = Context::from_waker(&waker);
    let mut f = std::pin::pin!(f.into_future());

    loop {
        match f.as_mut().poll(&mut cx) {
            Poll::Ready(result) => return result,
            Poll::Pending => {}
        }
    }
}
