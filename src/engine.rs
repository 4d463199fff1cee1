use std::fs;
use std::path::Path;
use std::sync::Arc;

use arc_swap::ArcSwap;
use sha2::{Digest, Sha256};
use tracing::{info, warn};

use crate::catalog::PermissionCatalog;
use crate::error::PolicyError;
use crate::guard::RouteGuard;
use crate::loader::{self, SCHOOL_POLICY};
use crate::types::{Decision, PolicyVersion, Principal};

#[cfg(feature = "observability")]
use crate::metrics;
#[cfg(feature = "observability")]
use crate::timers::PhaseTimer;
#[cfg(feature = "observability")]
use std::time::Duration;

#[cfg(test)]
mod tests;

/// A catalog together with the version it was loaded as.
#[derive(Debug)]
pub struct CatalogSnapshot {
    catalog: Arc<PermissionCatalog>,
    version: PolicyVersion,
}

impl CatalogSnapshot {
    fn compile(text: &str) -> Result<Self, PolicyError> {
        let catalog = loader::compile_catalog(text)?;
        Ok(CatalogSnapshot {
            catalog: Arc::new(catalog),
            version: PolicyVersion {
                hash: format!("{:x}", Sha256::digest(text.as_bytes())),
                loaded_at: chrono::Utc::now().to_rfc3339(),
            },
        })
    }

    pub fn catalog(&self) -> &Arc<PermissionCatalog> {
        &self.catalog
    }

    pub fn version(&self) -> &PolicyVersion {
        &self.version
    }
}

/// The main engine handle. Cloneable and thread-safe.
///
/// Readers load the current snapshot with a single atomic pointer read. A
/// reload compiles and validates the new catalog first and then swaps the
/// whole snapshot, so no reader ever sees a partially updated table and a
/// failed reload leaves the previous catalog in place.
#[derive(Clone)]
pub struct AccessEngine {
    inner: Arc<ArcSwap<CatalogSnapshot>>,
}

impl AccessEngine {
    pub fn new_from_str(catalog_text: &str) -> Result<Self, PolicyError> {
        let snapshot = CatalogSnapshot::compile(catalog_text)?;
        info!(
            event = "Catalog",
            phase = "Loaded",
            hash = snapshot.version.hash.as_str()
        );
        Ok(AccessEngine {
            inner: Arc::new(ArcSwap::from_pointee(snapshot)),
        })
    }

    /// An engine over the built-in school catalog.
    pub fn school() -> Result<Self, PolicyError> {
        Self::new_from_str(SCHOOL_POLICY)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, PolicyError> {
        let text = fs::read_to_string(path)?;
        Self::new_from_str(&text)
    }

    pub fn reload_from_str(&self, catalog_text: &str) -> Result<(), PolicyError> {
        let snapshot = match CatalogSnapshot::compile(catalog_text) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!(event = "Catalog", phase = "ReloadRejected", error = %err);
                return Err(err);
            }
        };
        info!(
            event = "Catalog",
            phase = "Reloaded",
            hash = snapshot.version.hash.as_str()
        );
        self.inner.store(Arc::new(snapshot));

        #[cfg(feature = "observability")]
        metrics::record_reload();

        Ok(())
    }

    pub fn reload_from_file<P: AsRef<Path>>(&self, path: P) -> Result<(), PolicyError> {
        let text = fs::read_to_string(path)?;
        self.reload_from_str(&text)
    }

    pub fn current_snapshot(&self) -> Arc<CatalogSnapshot> {
        self.inner.load_full()
    }

    pub fn current_version(&self) -> PolicyVersion {
        self.inner.load().version.clone()
    }

    pub fn catalog(&self) -> Arc<PermissionCatalog> {
        Arc::clone(&self.inner.load().catalog)
    }

    /// A guard bound to the catalog that is current right now. Later reloads
    /// do not affect it.
    pub fn guard(&self) -> RouteGuard {
        RouteGuard::new(self.catalog())
    }

    pub fn evaluate(&self, principal: Option<&Principal>, path: &str) -> Decision {
        #[cfg(feature = "observability")]
        let mut elapsed = Duration::ZERO;

        let decision = {
            #[cfg(feature = "observability")]
            let _timer = PhaseTimer::new(&mut elapsed);
            self.guard().evaluate(principal, path)
        };

        #[cfg(feature = "observability")]
        metrics::record_evaluation(
            decision.state(),
            elapsed,
            principal.and_then(|p| p.role.clone()),
            path.to_string(),
        );

        decision
    }
}
