//! Lazily loaded view of the schemas a device advertises.

use tracing::debug;

use crate::error::ResolveError;
use crate::session::SchemaSession;
use crate::types::CatalogEntry;

/// Advertised schema inventory, listed at most once.
#[derive(Debug, Default)]
pub struct Catalog {
    entries: Option<Vec<CatalogEntry>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the listing call has completed successfully.
    pub fn is_loaded(&self) -> bool {
        self.entries.is_some()
    }

    /// Loaded entries, empty before the first successful load.
    pub fn entries(&self) -> &[CatalogEntry] {
        self.entries.as_deref().unwrap_or_default()
    }

    /// Issue the listing request unless it already succeeded.
    ///
    /// # Errors
    ///
    /// Returns `ResolveError::CatalogUnavailable` if the session call fails.
    /// The catalog stays unloaded in that case.
    pub fn ensure_loaded<S>(&mut self, session: &mut S) -> Result<&[CatalogEntry], ResolveError>
    where
        S: SchemaSession + ?Sized,
    {
        if self.entries.is_none() {
            let entries = session
                .list_schemas()
                .map_err(|source| ResolveError::CatalogUnavailable { source })?;
            debug!(count = entries.len(), "loaded schema catalog");
            self.entries = Some(entries);
        }
        Ok(self.entries())
    }

    /// Look up an entry by exact identifier.
    ///
    /// When the device advertises the identifier in several formats (yang
    /// and yin), the YANG entry is returned. A missing entry is `Ok(None)`,
    /// not an error.
    pub fn find<S>(
        &mut self,
        session: &mut S,
        identifier: &str,
    ) -> Result<Option<&CatalogEntry>, ResolveError>
    where
        S: SchemaSession + ?Sized,
    {
        let entries = self.ensure_loaded(session)?;
        let mut matches = entries.iter().filter(|entry| entry.identifier == identifier);
        let first = matches.next();
        match first {
            Some(entry) if !entry.is_yang() => Ok(matches.find(|e| e.is_yang()).or(first)),
            _ => Ok(first),
        }
    }
}
