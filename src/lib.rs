//! YANG Schema Fetcher
//!
//! Retrieves a YANG module from a network device together with every module
//! it transitively imports.
//!
//! The import graph is not known up front. Each fetched module is scanned
//! for `import <name> {` statements, and every import not yet fetched is
//! queued, until the queue drains. Only modules the device advertises in its
//! schema catalog are fetched; an unadvertised import fails the whole run.
//!
//! # Example
//!
//! ```
//! use yang_fetch::{resolve, CatalogEntry, SchemaSession, SessionError};
//!
//! struct Device;
//!
//! impl SchemaSession for Device {
//!     fn list_schemas(&mut self) -> Result<Vec<CatalogEntry>, SessionError> {
//!         Ok(vec![CatalogEntry::new("acme-system"), CatalogEntry::new("ietf-inet-types")])
//!     }
//!
//!     fn fetch_schema(&mut self, identifier: &str) -> Result<String, SessionError> {
//!         Ok(match identifier {
//!             "acme-system" => "module acme-system {\n  import ietf-inet-types {\n    prefix inet;\n  }\n}\n",
//!             _ => "module ietf-inet-types {\n}\n",
//!         }
//!         .to_string())
//!     }
//! }
//!
//! let resolution = resolve(&mut Device, "acme-system").unwrap();
//!
//! assert_eq!(resolution.total_attempts, 2);
//! assert!(resolution.resolved_beyond_root);
//! assert!(resolution.fetched.contains_key("ietf-inet-types"));
//! ```
//!
//! # Sessions
//!
//! | Session | Source |
//! |---------|--------|
//! | [`DirectorySession`] | Local directory of `<module>[@<revision>].yang` files |
//! | `RestconfSession` | RESTCONF device (`remote` feature, enabled by default) |

mod catalog;
mod error;
mod imports;
mod mirror;
mod resolver;
mod session;
mod types;

#[cfg(feature = "remote")]
mod restconf;

pub use catalog::Catalog;
pub use error::{ResolveError, SessionError};
pub use imports::{ImportScanner, RegexImportScanner, IMPORT_PATTERN};
pub use mirror::DirectorySession;
pub use resolver::{resolve, Resolver};
pub use session::SchemaSession;
pub use types::{CatalogEntry, Resolution, YANG_FORMAT};

#[cfg(feature = "remote")]
pub use restconf::{RestconfSession, DEFAULT_TIMEOUT};
