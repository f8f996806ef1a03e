//! The remote operations the resolver depends on.

use crate::error::SessionError;
use crate::types::CatalogEntry;

/// An established request/response session with a device.
///
/// Both calls take `&mut self`: exchanges over one session are strictly
/// ordered and never overlap.
pub trait SchemaSession {
    /// Retrieve the device's advertised schema inventory.
    fn list_schemas(&mut self) -> Result<Vec<CatalogEntry>, SessionError>;

    /// Retrieve the source text of one schema.
    fn fetch_schema(&mut self, identifier: &str) -> Result<String, SessionError>;
}

impl<S: SchemaSession + ?Sized> SchemaSession for &mut S {
    fn list_schemas(&mut self) -> Result<Vec<CatalogEntry>, SessionError> {
        (**self).list_schemas()
    }

    fn fetch_schema(&mut self, identifier: &str) -> Result<String, SessionError> {
        (**self).fetch_schema(identifier)
    }
}

impl<S: SchemaSession + ?Sized> SchemaSession for Box<S> {
    fn list_schemas(&mut self) -> Result<Vec<CatalogEntry>, SessionError> {
        (**self).list_schemas()
    }

    fn fetch_schema(&mut self, identifier: &str) -> Result<String, SessionError> {
        (**self).fetch_schema(identifier)
    }
}
