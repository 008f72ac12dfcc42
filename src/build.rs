//! Instance builder: raw nested data → immutable typed instance graph.
//!
//! Per schema level:
//! 1. reject keys the schema does not declare (closed schema);
//! 2. absent `Nullable` fields become null, absent required fields fail;
//! 3. every field is validated, in declaration order, stopping at the first failure;
//! 4. values whose descriptor reaches a `SchemaRef` (directly or through
//!    array/map/nullable/enum wrappers) are built recursively against the
//!    namespace-resolved schema.
//!
//! Recursion only happens at step 4 and consumes one level of input nesting
//! per level, so it terminates on any finite payload.
use std::sync::Arc;

use indexmap::IndexMap;

use crate::descriptor::TypeDescriptor;
use crate::error::{Error, FieldPath, Result, Segment};
use crate::instance::{Instance, Value};
use crate::namespace::Namespace;
use crate::raw::{Key, Raw};
use crate::schema::SchemaDefinition;
use crate::validate::{is_valid, validate};

impl Namespace {
    /// Build against the root schema.
    pub fn build(&self, raw: &Raw) -> Result<Instance> {
        let root = self.root_arc()?;
        Builder::new(self).instance(root, raw)
    }

    /// Build against a named, not necessarily root, schema.
    pub fn build_as(&self, name: &str, raw: &Raw) -> Result<Instance> {
        let def = self.lookup(name)?;
        Builder::new(self).instance(def, raw)
    }

    /// New instance of the same schema with `changes` (a map of field → raw
    /// value) replacing the current values. `instance` is left untouched and
    /// must have been built by this namespace.
    pub fn update(&self, instance: &Instance, changes: &Raw) -> Result<Instance> {
        let def = instance.schema_arc();
        match self.schema_arc(def.name()) {
            Some(own) if Arc::ptr_eq(own, def) => {}
            _ => {
                return Err(Error::UnknownSchema { namespace: self.name().to_owned(), name: def.name().to_owned() });
            }
        }
        let Raw::Map(changes) = changes else {
            return Err(Error::TypeMismatch {
                schema: def.name().to_owned(),
                path: FieldPath::root(),
                expected: TypeDescriptor::schema(def.name()),
                found: changes.shape(),
            });
        };
        let mut merged = match instance.to_raw() {
            Raw::Map(m) => m,
            _ => IndexMap::new(),
        };
        for (k, v) in changes {
            match merged.keys().position(|existing| existing.as_str() == k.as_str()) {
                Some(idx) => {
                    if let Some((_, slot)) = merged.get_index_mut(idx) {
                        *slot = v.clone();
                    }
                }
                None => {
                    merged.insert(k.clone(), v.clone());
                }
            }
        }
        Builder::new(self).instance(def, &Raw::Map(merged))
    }
}

// -------------------------------- Builder --------------------------------- //

static NULL: Raw = Raw::Null;

struct Builder<'ns> {
    ns: &'ns Namespace,
    path: FieldPath,
}

impl<'ns> Builder<'ns> {
    fn new(ns: &'ns Namespace) -> Self { Self { ns, path: FieldPath::root() } }

    fn at(&self, name: &str) -> FieldPath {
        let mut p = self.path.clone();
        p.push(Segment::Name(name.to_owned()));
        p
    }

    fn instance(&mut self, def: &Arc<SchemaDefinition>, raw: &Raw) -> Result<Instance> {
        let schema = def.name();
        let Raw::Map(entries) = raw else {
            return Err(Error::TypeMismatch {
                schema: schema.to_owned(),
                path: self.path.clone(),
                expected: TypeDescriptor::schema(schema),
                found: raw.shape(),
            });
        };

        let mut given: IndexMap<&str, &Raw> = IndexMap::with_capacity(entries.len());
        for (key, value) in entries {
            let name = key.as_str();
            if def.field(name).is_none() {
                return Err(Error::UnknownField {
                    schema: schema.to_owned(),
                    field: name.to_owned(),
                    path: self.at(name),
                });
            }
            if given.insert(name, value).is_some() {
                return Err(Error::DuplicateKey { schema: schema.to_owned(), path: self.at(name) });
            }
        }

        let mut fields = IndexMap::with_capacity(def.len());
        for (name, desc) in def.iter() {
            self.path.push(Segment::Name(name.to_owned()));
            let value = match given.get(name) {
                Some(value) => *value,
                None if desc.is_nullable() => &NULL,
                None => {
                    return Err(Error::MissingField {
                        schema: schema.to_owned(),
                        path: self.path.clone(),
                        expected: desc.clone(),
                    });
                }
            };
            if let Err(v) = validate(value, desc) {
                return Err(Error::TypeMismatch {
                    schema: schema.to_owned(),
                    path: self.path.join(&v.at),
                    expected: v.expected,
                    found: v.found,
                });
            }
            let coerced = self.coerce(value, desc, schema, name)?;
            self.path.pop();
            fields.insert(name.to_owned(), coerced);
        }

        Ok(Instance::new(def.clone(), fields))
    }

    /// `value` has already passed `validate(value, desc)`.
    fn coerce(&mut self, value: &Raw, desc: &TypeDescriptor, schema: &str, field: &str) -> Result<Value> {
        match (desc, value) {
            (TypeDescriptor::SchemaRef(name), _) => {
                let ns = self.ns;
                let def = ns.resolve(name, schema, field)?;
                Ok(Value::Instance(self.instance(def, value)?))
            }
            (TypeDescriptor::Nullable(_), Raw::Null) => Ok(Value::Null),
            (TypeDescriptor::Nullable(inner), _) => self.coerce(value, inner, schema, field),
            (TypeDescriptor::ArrayOf(elem), Raw::Array(xs)) => {
                let mut out = Vec::with_capacity(xs.len());
                for (i, x) in xs.iter().enumerate() {
                    self.path.push(Segment::Index(i));
                    out.push(self.coerce(x, elem, schema, field)?);
                    self.path.pop();
                }
                Ok(Value::Array(out))
            }
            (TypeDescriptor::MapOf(_, elem), Raw::Map(entries)) => {
                let mut out = IndexMap::with_capacity(entries.len());
                for (k, v) in entries {
                    self.path.push(Segment::Name(k.as_str().to_owned()));
                    out.insert(k.clone(), self.coerce(v, elem, schema, field)?);
                    self.path.pop();
                }
                Ok(Value::Map(out))
            }
            (TypeDescriptor::Enum(members), _) => {
                // schema members only pass a map check here; a failed nested
                // build falls through to the next member
                let mut last = None;
                for member in members.iter().filter(|m| is_valid(value, m)) {
                    let saved = self.path.clone();
                    match self.coerce(value, member, schema, field) {
                        Ok(v) => return Ok(v),
                        Err(e) => {
                            self.path = saved;
                            last = Some(e);
                        }
                    }
                }
                match last {
                    Some(e) => Err(e),
                    None => Ok(plain(value)),
                }
            }
            _ => Ok(plain(value)),
        }
    }
}

/// Structural copy of schema-free data.
fn plain(raw: &Raw) -> Value {
    match raw {
        Raw::Null => Value::Null,
        Raw::Bool(b) => Value::Bool(*b),
        Raw::Integer(i) => Value::Integer(*i),
        Raw::Float(x) => Value::Float(*x),
        Raw::String(s) => Value::String(s.clone()),
        Raw::Symbol(s) => Value::Symbol(s.clone()),
        Raw::Array(xs) => Value::Array(xs.iter().map(plain).collect()),
        Raw::Map(m) => Value::Map(m.iter().map(|(k, v)| (k.clone(), plain(v))).collect::<IndexMap<Key, Value>>()),
    }
}

// ------------------------------- Tests ------------------------------------ //
