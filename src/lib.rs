//! stickyproxy
//!
//! Sticky token-to-proxy allocation: each opaque client token is bound to
//! one proxy endpoint drawn from a finite pool, the binding is stable for
//! the lifetime of the store, no two tokens share an endpoint, and the
//! bindings survive process restarts through a persisted JSON store.
//!
//! Browser launchers, chat clients, and other orchestration code are pure
//! consumers of [`ProxyAllocator::get_proxy`]: they take the returned
//! host/port/credentials and wire up their outbound connection with them.

pub mod proxy;

pub use proxy::{
    AllocatorConfig, AssignmentStore, ProxyAddress, ProxyAllocator, ProxyAuth, ProxyError,
};

use std::path::PathBuf;

/// Conventional data directory for the pool source and the persisted store
pub fn data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("stickyproxy"))
}

/// Get log directory path (shared across modules)
pub fn log_dir() -> Option<PathBuf> {
    data_dir().map(|p| p.join("logs"))
}

/// Initialize logging for binaries embedding the allocator
pub fn init_logging() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());

    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(false);

    if let Some(log_dir) = log_dir() {
        let _ = std::fs::create_dir_all(&log_dir);
        let file_appender = tracing_appender::rolling::daily(&log_dir, "stickyproxy.log");
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        let file_layer = tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(true)
            .with_writer(non_blocking);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(console_layer)
            .with(file_layer)
            .init();

        Some(guard)
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(console_layer)
            .init();

        None
    }
}
