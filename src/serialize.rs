//! Instance → plain data. The structural inverse of the builder.
//!
//! Field names come back as symbol keys, the same keys decoded JSON carries,
//! and nullable fields the builder defaulted appear as explicit nulls.
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::instance::{Instance, Value};
use crate::raw::{Key, Raw};

impl Instance {
    pub fn to_raw(&self) -> Raw {
        Raw::Map(self.fields().map(|(k, v)| (Key::sym(k), v.to_raw())).collect())
    }

    /// JSON view of the instance (symbols written as strings).
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> { serde_json::to_value(self) }
}

impl Value {
    pub fn to_raw(&self) -> Raw {
        match self {
            Value::Null => Raw::Null,
            Value::Bool(b) => Raw::Bool(*b),
            Value::Integer(i) => Raw::Integer(*i),
            Value::Float(x) => Raw::Float(*x),
            Value::String(s) => Raw::String(s.clone()),
            Value::Symbol(s) => Raw::Symbol(s.clone()),
            Value::Array(xs) => Raw::Array(xs.iter().map(Value::to_raw).collect()),
            Value::Map(m) => Raw::Map(m.iter().map(|(k, v)| (k.clone(), v.to_raw())).collect()),
            Value::Instance(inst) => inst.to_raw(),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => s.serialize_unit(),
            Value::Bool(b) => s.serialize_bool(*b),
            Value::Integer(i) => s.serialize_i64(*i),
            Value::Float(x) => s.serialize_f64(x.0),
            Value::String(x) => s.serialize_str(x),
            Value::Symbol(x) => s.serialize_str(x.as_str()),
            Value::Array(xs) => {
                let mut seq = s.serialize_seq(Some(xs.len()))?;
                for x in xs {
                    seq.serialize_element(x)?;
                }
                seq.end()
            }
            Value::Map(m) => {
                let mut out = s.serialize_map(Some(m.len()))?;
                for (k, v) in m {
                    out.serialize_entry(k, v)?;
                }
                out.end()
            }
            Value::Instance(inst) => inst.serialize(s),
        }
    }
}

impl Serialize for Instance {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        let mut out = s.serialize_map(None)?;
        for (k, v) in self.fields() {
            out.serialize_entry(k, v)?;
        }
        out.end()
    }
}
