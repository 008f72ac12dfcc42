//! Schema namespaces: a two-phase registry of named schemas.
//!
//! Phase 1 (`NamespaceBuilder`) collects declarations in any order; a
//! `SchemaRef` is just a name, so referencing a schema before its body is
//! declared needs no placeholder. Phase 2 (`finalize`) resolves every
//! reference against the complete table and freezes it into a `Namespace`,
//! which has no declaration methods at all.
use std::sync::Arc;

use indexmap::IndexMap;

use crate::descriptor::TypeDescriptor;
use crate::error::{Error, Result};
use crate::schema::SchemaDefinition;

// ------------------------------ Declaration ------------------------------- //

#[derive(Debug)]
pub struct NamespaceBuilder {
    name: String,
    schemas: IndexMap<String, Arc<SchemaDefinition>>,
    root: Option<String>,
}

impl NamespaceBuilder {
    /// Declare a schema from `(field, descriptor)` pairs. See [`SchemaDefinition::new`].
    pub fn declare<N, I>(&mut self, name: &str, fields: I) -> Result<&mut Self>
    where
        N: AsRef<str>,
        I: IntoIterator<Item = (N, TypeDescriptor)>,
    {
        let def = SchemaDefinition::new(name, fields)?;
        self.declare_schema(def)
    }

    pub fn declare_schema(&mut self, def: SchemaDefinition) -> Result<&mut Self> {
        if self.schemas.contains_key(def.name()) {
            return Err(Error::DuplicateSchema { namespace: self.name.clone(), name: def.name().to_owned() });
        }
        self.schemas.insert(def.name().to_owned(), Arc::new(def));
        Ok(self)
    }

    /// Designate the schema `build` targets. Must already be declared, and
    /// may only be set once.
    pub fn set_root(&mut self, name: &str) -> Result<&mut Self> {
        if let Some(existing) = &self.root {
            return Err(Error::DuplicateRoot {
                namespace: self.name.clone(),
                existing: existing.clone(),
                attempted: name.to_owned(),
            });
        }
        if !self.schemas.contains_key(name) {
            return Err(Error::UnknownSchema { namespace: self.name.clone(), name: name.to_owned() });
        }
        self.root = Some(name.to_owned());
        Ok(self)
    }

    /// Resolve every reference and freeze.
    ///
    /// With no explicit root, a namespace holding exactly one schema uses it
    /// as root; with several, the namespace is left without a root and only
    /// `build_as` works on it.
    pub fn finalize(self) -> Result<Namespace> {
        if self.schemas.is_empty() {
            return Err(Error::EmptyNamespace { namespace: self.name });
        }
        for def in self.schemas.values() {
            for (field, desc) in def.iter() {
                if let Some(missing) = desc.schema_refs().into_iter().find(|r| !self.schemas.contains_key(*r)) {
                    return Err(Error::UnknownSchemaReference {
                        namespace: self.name.clone(),
                        name: missing.to_owned(),
                        referenced_by: format!("{}.{}", def.name(), field),
                    });
                }
            }
        }
        let root = match (&self.root, self.schemas.len()) {
            (Some(name), _) => self.schemas.get(name).cloned(),
            (None, 1) => self.schemas.values().next().cloned(),
            (None, _) => None,
        };
        Ok(Namespace { name: self.name, schemas: self.schemas, root })
    }
}

// -------------------------------- Frozen ---------------------------------- //

/// Frozen registry. Immutable, `Send + Sync`; share it freely.
#[derive(Debug, Clone)]
pub struct Namespace {
    name: String,
    schemas: IndexMap<String, Arc<SchemaDefinition>>,
    root: Option<Arc<SchemaDefinition>>,
}

impl Namespace {
    pub fn builder(name: &str) -> NamespaceBuilder {
        NamespaceBuilder { name: name.to_owned(), schemas: IndexMap::new(), root: None }
    }

    /// Declaration block: forward references between the schemas declared
    /// inside `block` resolve once it returns.
    ///
    /// ```
    /// use function_types::{Namespace, TypeDescriptor as T};
    ///
    /// let ns = Namespace::define("Nested", |ns| {
    ///     ns.declare("Outer", [("inner", T::schema("Inner"))])?;
    ///     ns.declare("Inner", [("v", T::integer())])?;
    ///     ns.set_root("Outer")?;
    ///     Ok(())
    /// })
    /// .unwrap();
    /// assert_eq!(ns.root().map(|s| s.name()), Some("Outer"));
    /// ```
    pub fn define<F>(name: &str, block: F) -> Result<Namespace>
    where
        F: FnOnce(&mut NamespaceBuilder) -> Result<()>,
    {
        let mut builder = Self::builder(name);
        block(&mut builder)?;
        builder.finalize()
    }

    pub fn name(&self) -> &str { &self.name }

    pub fn root(&self) -> Option<&SchemaDefinition> { self.root.as_deref() }

    pub fn schema(&self, name: &str) -> Option<&SchemaDefinition> {
        self.schemas.get(name).map(Arc::as_ref)
    }

    /// Schemas in declaration order.
    pub fn schemas(&self) -> impl Iterator<Item = &SchemaDefinition> {
        self.schemas.values().map(Arc::as_ref)
    }

    pub(crate) fn schema_arc(&self, name: &str) -> Option<&Arc<SchemaDefinition>> { self.schemas.get(name) }

    pub(crate) fn root_arc(&self) -> Result<&Arc<SchemaDefinition>> {
        self.root.as_ref().ok_or_else(|| Error::MissingRootSchema { namespace: self.name.clone() })
    }

    pub(crate) fn lookup(&self, name: &str) -> Result<&Arc<SchemaDefinition>> {
        self.schemas
            .get(name)
            .ok_or_else(|| Error::UnknownSchema { namespace: self.name.clone(), name: name.to_owned() })
    }

    /// Lazy `SchemaRef` resolution used while building.
    pub(crate) fn resolve(&self, name: &str, schema: &str, field: &str) -> Result<&Arc<SchemaDefinition>> {
        self.schemas.get(name).ok_or_else(|| Error::UnknownSchemaReference {
            namespace: self.name.clone(),
            name: name.to_owned(),
            referenced_by: format!("{schema}.{field}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::TypeDescriptor as T;

    #[test]
    fn forward_references_resolve_inside_a_block() {
        let ns = Namespace::define("Forward", |ns| {
            ns.declare("Outer", [("inner", T::schema("Inner")), ("many", T::array_of(T::schema("Inner")))])?;
            ns.declare("Inner", [("v", T::integer())])?;
            ns.set_root("Outer")?;
            Ok(())
        })
        .unwrap();
        assert_eq!(ns.schemas().map(|s| s.name()).collect::<Vec<_>>(), vec!["Outer", "Inner"]);
        assert_eq!(ns.root().unwrap().name(), "Outer");
    }

    #[test]
    fn unresolved_reference_fails_finalize() {
        let err = Namespace::define("Dangling", |ns| {
            ns.declare("Outer", [("inner", T::nullable(T::schema("Missing")))])?;
            Ok(())
        })
        .unwrap_err();
        assert_eq!(
            err,
            Error::UnknownSchemaReference {
                namespace: "Dangling".into(),
                name: "Missing".into(),
                referenced_by: "Outer.inner".into(),
            }
        );
    }

    #[test]
    fn empty_block_fails() {
        let err = Namespace::define("Empty", |_| Ok(())).unwrap_err();
        assert!(matches!(err, Error::EmptyNamespace { .. }));
    }

    #[test]
    fn single_schema_becomes_root() {
        let mut b = Namespace::builder("Single");
        b.declare("Only", [("s", T::string())]).unwrap();
        let ns = b.finalize().unwrap();
        assert_eq!(ns.root().unwrap().name(), "Only");
    }

    #[test]
    fn several_schemas_without_root_have_none() {
        let ns = Namespace::define("Ambiguous", |ns| {
            ns.declare("A", [("s", T::string())])?.declare("B", [("s", T::string())])?;
            Ok(())
        })
        .unwrap();
        assert!(ns.root().is_none());
        assert!(matches!(ns.root_arc(), Err(Error::MissingRootSchema { .. })));
    }

    #[test]
    fn root_is_set_once_and_must_exist() {
        let mut b = Namespace::builder("Roots");
        b.declare("A", [("s", T::string())]).unwrap();
        b.declare("B", [("s", T::string())]).unwrap();

        assert!(matches!(b.set_root("C"), Err(Error::UnknownSchema { .. })));
        b.set_root("A").unwrap();
        let err = b.set_root("B").unwrap_err();
        assert_eq!(
            err,
            Error::DuplicateRoot { namespace: "Roots".into(), existing: "A".into(), attempted: "B".into() }
        );
    }

    #[test]
    fn schema_names_are_unique() {
        let mut b = Namespace::builder("Dup");
        b.declare("A", [("s", T::string())]).unwrap();
        assert!(matches!(b.declare("A", [("t", T::string())]), Err(Error::DuplicateSchema { .. })));
    }

    #[test]
    fn frozen_namespace_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Namespace>();
    }
}
