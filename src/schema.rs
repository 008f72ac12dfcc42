//! A named, ordered mapping of field name → descriptor.
use indexmap::IndexMap;

use crate::descriptor::TypeDescriptor;
use crate::error::{Error, Result};

/// Declaration-time sugar: `"?name"` declares `name` as `Nullable`.
const NULLABLE_PREFIX: char = '?';

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SchemaDefinition {
    name: String,
    fields: IndexMap<String, TypeDescriptor>,
    nullable: Vec<String>, // derived, declaration order
}

impl SchemaDefinition {
    /// Fields keep the order they are given in. A `?`-prefixed name is
    /// desugared to the bare name wrapped in `Nullable`; there is no other
    /// runtime representation of optionality.
    pub fn new<N, I>(name: &str, fields: I) -> Result<Self>
    where
        N: AsRef<str>,
        I: IntoIterator<Item = (N, TypeDescriptor)>,
    {
        let mut out: IndexMap<String, TypeDescriptor> = IndexMap::new();
        for (raw_name, desc) in fields {
            let raw_name = raw_name.as_ref();
            let (field, desc) = match raw_name.strip_prefix(NULLABLE_PREFIX) {
                Some(bare) => (bare, TypeDescriptor::nullable(desc)),
                None => (raw_name, desc),
            };
            if desc.has_empty_enum() {
                return Err(Error::EmptyEnum { schema: name.to_owned(), field: field.to_owned() });
            }
            if out.insert(field.to_owned(), desc).is_some() {
                return Err(Error::DuplicateField { schema: name.to_owned(), field: field.to_owned() });
            }
        }
        let nullable = out
            .iter()
            .filter(|(_, d)| d.is_nullable())
            .map(|(k, _)| k.clone())
            .collect();
        Ok(Self { name: name.to_owned(), fields: out, nullable })
    }

    pub fn name(&self) -> &str { &self.name }

    /// Field names in declaration order.
    pub fn fields(&self) -> Vec<&str> { self.fields.keys().map(String::as_str).collect() }

    /// Fields that default to null when absent.
    pub fn nullable_fields(&self) -> Vec<&str> { self.nullable.iter().map(String::as_str).collect() }

    pub fn field(&self, name: &str) -> Option<&TypeDescriptor> { self.fields.get(name) }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TypeDescriptor)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize { self.fields.len() }

    pub fn is_empty(&self) -> bool { self.fields.is_empty() }
}
