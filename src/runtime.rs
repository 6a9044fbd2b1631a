//! Runtime abstraction layer for async operations
//!
//! Loads started by the controller are fire-and-forget: the future is handed
//! to an [`AsyncSpawner`] and reports back through a channel. This keeps the
//! controller independent of whichever runtime the host application uses.

use futures::future::BoxFuture;
use once_cell::sync::OnceCell;
use std::sync::Arc;

/// A trait for spawning async tasks (object-safe version)
pub trait AsyncSpawner: Send + Sync + 'static {
    /// Spawn a future and return a handle to it
    fn spawn_boxed(&self, future: BoxFuture<'static, ()>) -> Box<dyn AsyncHandle>;
}

/// Handle to a spawned async task
pub trait AsyncHandle: Send + Sync {
    /// Check if the task is finished
    fn is_finished(&self) -> bool;

    /// Cancel the task
    fn cancel(&self);
}

/// Convenience function for spawning on the global runtime
pub fn spawn<F>(future: F) -> Box<dyn AsyncHandle>
where
    F: futures::Future<Output = ()> + Send + 'static,
{
    log::trace!("runtime::spawn()");
    runtime().spawn_boxed(Box::pin(future))
}

/// Default spawner implementations
pub mod spawners {
    use super::*;

    /// Drives each future to completion on the calling thread.
    ///
    /// Useful headless and in tests where loads resolve immediately.
    #[derive(Debug, Default, Clone, Copy)]
    pub struct InlineSpawner;

    impl AsyncSpawner for InlineSpawner {
        fn spawn_boxed(&self, future: BoxFuture<'static, ()>) -> Box<dyn AsyncHandle> {
            futures::executor::block_on(future);
            Box::new(FinishedHandle)
        }
    }

    struct FinishedHandle;

    impl AsyncHandle for FinishedHandle {
        fn is_finished(&self) -> bool {
            true
        }

        fn cancel(&self) {}
    }

    #[cfg(feature = "tokio-runtime")]
    pub mod tokio_impl {
        use super::*;
        use ::tokio::task::JoinHandle;

        /// Tokio-based async spawner
        ///
        /// Falls back to running inline when called outside a tokio runtime.
        #[derive(Debug, Default, Clone, Copy)]
        pub struct TokioSpawner;

        impl AsyncSpawner for TokioSpawner {
            fn spawn_boxed(&self, future: BoxFuture<'static, ()>) -> Box<dyn AsyncHandle> {
                match ::tokio::runtime::Handle::try_current() {
                    Ok(handle) => Box::new(TokioHandle(handle.spawn(future))),
                    Err(_) => {
                        log::warn!("no tokio runtime on this thread, running load inline");
                        InlineSpawner.spawn_boxed(future)
                    }
                }
            }
        }

        struct TokioHandle(JoinHandle<()>);

        impl AsyncHandle for TokioHandle {
            fn is_finished(&self) -> bool {
                self.0.is_finished()
            }

            fn cancel(&self) {
                self.0.abort();
            }
        }
    }
}

/// Global runtime instance
static RUNTIME: OnceCell<Arc<dyn AsyncSpawner>> = OnceCell::new();

/// Initialize the runtime with a specific spawner. Only the first call wins.
pub fn init_runtime(spawner: Arc<dyn AsyncSpawner>) -> bool {
    RUNTIME.set(spawner).is_ok()
}

/// Get the global runtime spawner
pub fn runtime() -> Arc<dyn AsyncSpawner> {
    RUNTIME
        .get_or_init(|| {
            #[cfg(feature = "tokio-runtime")]
            {
                Arc::new(spawners::tokio_impl::TokioSpawner)
            }

            #[cfg(not(feature = "tokio-runtime"))]
            {
                Arc::new(spawners::InlineSpawner)
            }
        })
        .clone()
}
