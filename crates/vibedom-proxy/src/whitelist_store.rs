//! Hot-reloadable whitelist: SIGHUP re-reads the domain file and swaps it in
//! under a single write lock, safe under the proxy's single-threaded
//! request-handling model.

use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use vibedom_config::Whitelist;

#[derive(Clone)]
pub struct WhitelistStore {
    path: PathBuf,
    current: Arc<RwLock<Whitelist>>,
}

impl WhitelistStore {
    pub fn load(path: PathBuf) -> Self {
        let whitelist = Whitelist::load(&path).unwrap_or_else(|err| {
            tracing::warn!(%err, "whitelist missing at startup; blocking all egress until reload");
            Whitelist::empty()
        });
        WhitelistStore { path, current: Arc::new(RwLock::new(whitelist)) }
    }

    pub fn is_allowed(&self, host: &str) -> bool {
        self.current.read().expect("whitelist lock poisoned").is_allowed(host)
    }

    /// Re-read the whitelist file from its known path and replace the
    /// in-memory set. Pattern rules are release-time artifacts and are
    /// never reloaded here.
    pub fn reload(&self) {
        match Whitelist::load(&self.path) {
            Ok(fresh) => {
                *self.current.write().expect("whitelist lock poisoned") = fresh;
                tracing::info!(path = %self.path.display(), "whitelist reloaded");
            }
            Err(err) => {
                tracing::warn!(%err, "whitelist reload failed; keeping previous set");
            }
        }
    }
}

/// Spawn the SIGHUP listener that drives [`WhitelistStore::reload`]. The
/// `reload-whitelist` host command triggers this indirectly by sending
/// SIGHUP to the in-container `mitmdump` process via the runtime adapter.
#[cfg(unix)]
pub fn spawn_sighup_reloader(store: WhitelistStore) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut stream = match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::hangup()) {
            Ok(stream) => stream,
            Err(err) => {
                tracing::warn!(%err, "failed to install SIGHUP handler; whitelist hot reload disabled");
                return;
            }
        };
        loop {
            stream.recv().await;
            store.reload();
        }
    })
}
