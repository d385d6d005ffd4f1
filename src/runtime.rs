//! Spawning background work on tokio
//!
//! Tasks go to the ambient runtime when called from inside one, otherwise to a
//! small runtime owned by this module.

use once_cell::sync::Lazy;
use std::future::Future;
use tokio::runtime::{Builder, Handle, Runtime};
use tokio::task::JoinHandle;

static FALLBACK_RUNTIME: Lazy<Option<Runtime>> = Lazy::new(|| {
    Builder::new_multi_thread()
        .worker_threads(2)
        .thread_name("shipspot-assets")
        .enable_all()
        .build()
        .map_err(|e| log::error!("failed to start asset runtime: {}", e))
        .ok()
});

/// Handle to a spawned task
#[derive(Debug)]
pub struct TaskHandle(JoinHandle<()>);

impl TaskHandle {
    pub fn is_finished(&self) -> bool {
        self.0.is_finished()
    }

    pub fn cancel(&self) {
        self.0.abort();
    }
}

/// Spawn `future`; `None` if no runtime could be found or started
pub fn spawn<F>(future: F) -> Option<TaskHandle>
where
    F: Future<Output = ()> + Send + 'static,
{
    let handle = match Handle::try_current() {
        Ok(handle) => handle,
        Err(_) => FALLBACK_RUNTIME.as_ref()?.handle().clone(),
    };
    log::trace!("spawning background task");
    Some(TaskHandle(handle.spawn(future)))
}
