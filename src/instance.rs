//! Typed instances: the immutable result of building a schema against raw data.
use std::fmt;
use std::ops::Index;
use std::sync::Arc;

use indexmap::IndexMap;
use ordered_float::OrderedFloat;

use crate::raw::{Key, Symbol};
use crate::schema::SchemaDefinition;

/// Field value of an instance. Nested schemas become [`Value::Instance`];
/// everything else mirrors the raw input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Value {
    Null,
    Bool(bool),
    Integer(i64),
    Float(OrderedFloat<f64>),
    String(String),
    Symbol(Symbol),
    Array(Vec<Value>),
    Map(IndexMap<Key, Value>),
    Instance(Instance),
}

static NULL: Value = Value::Null;

impl Value {
    pub fn is_null(&self) -> bool { matches!(self, Value::Null) }

    pub fn as_bool(&self) -> Option<bool> {
        match self { Value::Bool(b) => Some(*b), _ => None }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self { Value::Integer(i) => Some(*i), _ => None }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self { Value::Float(x) => Some(x.0), _ => None }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self { Value::String(s) => Some(s), _ => None }
    }

    pub fn as_symbol(&self) -> Option<&Symbol> {
        match self { Value::Symbol(s) => Some(s), _ => None }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self { Value::Array(xs) => Some(xs), _ => None }
    }

    pub fn as_map(&self) -> Option<&IndexMap<Key, Value>> {
        match self { Value::Map(m) => Some(m), _ => None }
    }

    pub fn as_instance(&self) -> Option<&Instance> {
        match self { Value::Instance(i) => Some(i), _ => None }
    }
}

// -------------------------------- Instance -------------------------------- //

/// Value semantics: two instances are equal when they were built against the
/// same schema (the same declaration, not just the same name) and hold equal
/// field values. There are no setters; use
/// `Namespace::update` to derive a changed copy.
#[derive(Clone)]
pub struct Instance {
    schema: Arc<SchemaDefinition>,
    fields: IndexMap<String, Value>,
}

impl Instance {
    /// Only the builder constructs instances, always with every declared field.
    pub(crate) fn new(schema: Arc<SchemaDefinition>, fields: IndexMap<String, Value>) -> Self {
        Self { schema, fields }
    }

    pub fn schema(&self) -> &SchemaDefinition { &self.schema }

    pub(crate) fn schema_arc(&self) -> &Arc<SchemaDefinition> { &self.schema }

    pub fn get(&self, field: &str) -> Option<&Value> { self.fields.get(field) }

    /// `(field, value)` in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl PartialEq for Instance {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.schema, &other.schema) && self.fields == other.fields
    }
}

impl Eq for Instance {}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct(self.schema.name());
        for (k, v) in &self.fields {
            out.field(k, v);
        }
        out.finish()
    }
}

/// Unknown field names index to `Value::Null`, like `serde_json::Value`.
impl Index<&str> for Instance {
    type Output = Value;

    fn index(&self, field: &str) -> &Value { self.fields.get(field).unwrap_or(&NULL) }
}
