//! Closure resolution - fetches a schema and everything it transitively imports.

use std::collections::VecDeque;

use indexmap::IndexMap;
use tracing::{debug, info, trace};

use crate::catalog::Catalog;
use crate::error::ResolveError;
use crate::imports::{ImportScanner, RegexImportScanner};
use crate::session::SchemaSession;
use crate::types::Resolution;

/// Resolve the import closure of `root` over `session`.
///
/// Shorthand for `Resolver::new(session).resolve(root)`.
///
/// # Errors
///
/// See [`Resolver::resolve`].
pub fn resolve<S>(session: &mut S, root: &str) -> Result<Resolution, ResolveError>
where
    S: SchemaSession + ?Sized,
{
    Resolver::new(session).resolve(root)
}

/// Worklist engine for one resolution run.
///
/// Owns a fresh [`Catalog`]; the session is borrowed from the caller.
/// [`resolve`](Resolver::resolve) consumes the resolver, so nothing is
/// cached between runs.
pub struct Resolver<'s, S: ?Sized, I = RegexImportScanner> {
    session: &'s mut S,
    catalog: Catalog,
    scanner: I,
}

impl<'s, S> Resolver<'s, S>
where
    S: SchemaSession + ?Sized,
{
    pub fn new(session: &'s mut S) -> Self {
        Self {
            session,
            catalog: Catalog::new(),
            scanner: RegexImportScanner::new(),
        }
    }
}

impl<'s, S, I> Resolver<'s, S, I>
where
    S: SchemaSession + ?Sized,
    I: ImportScanner,
{
    /// Replace the import scanner.
    pub fn with_scanner<J: ImportScanner>(self, scanner: J) -> Resolver<'s, S, J> {
        Resolver {
            session: self.session,
            catalog: self.catalog,
            scanner,
        }
    }

    /// Fetch `root` and its transitive imports, breadth-first.
    ///
    /// Every identifier discovered as an import that is not yet fetched is
    /// queued and counted. An identifier queued twice before its first fetch
    /// is skipped on the second dequeue and its count taken back, so
    /// `total_attempts` always equals the number of fetched schemas.
    ///
    /// # Errors
    ///
    /// - `CatalogUnavailable` if the schema listing fails.
    /// - `SchemaNotSupported` if the root or any import is not advertised.
    /// - `FetchFailed` if retrieving an advertised schema fails.
    pub fn resolve(self, root: &str) -> Result<Resolution, ResolveError> {
        let Resolver {
            session,
            mut catalog,
            scanner,
        } = self;

        let mut fetched: IndexMap<String, String> = IndexMap::new();
        let mut worklist = VecDeque::from([root.to_string()]);
        let mut total_attempts: usize = 1;
        let mut resolved_beyond_root = false;

        while let Some(identifier) = worklist.pop_front() {
            if fetched.contains_key(&identifier) {
                // Queued again before its first fetch completed.
                total_attempts -= 1;
                trace!(%identifier, "skipping duplicate");
                continue;
            }

            if catalog.find(&mut *session, &identifier)?.is_none() {
                return Err(ResolveError::SchemaNotSupported { identifier });
            }

            let body = session
                .fetch_schema(&identifier)
                .map_err(|source| ResolveError::FetchFailed {
                    identifier: identifier.clone(),
                    source,
                })?;
            debug!(%identifier, bytes = body.len(), "fetched schema");

            let imports = scanner.scan(&body);
            fetched.insert(identifier, body);

            for import in imports {
                if !fetched.contains_key(&import) {
                    worklist.push_back(import);
                    total_attempts += 1;
                    resolved_beyond_root = true;
                }
            }
        }

        debug_assert_eq!(total_attempts, fetched.len());
        info!(root, fetched = total_attempts, "resolved schema closure");

        Ok(Resolution {
            fetched,
            resolved_beyond_root,
            total_attempts,
        })
    }
}
