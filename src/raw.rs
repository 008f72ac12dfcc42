//! Plain nested data as payloads arrive: scalars, sequences, and maps keyed by
//! strings or symbols. No serde_json::Value past the decoding edge.
use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Mutex};

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use ordered_float::OrderedFloat;
use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Unexpected, Visitor};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

// ------------------------------- Symbols ---------------------------------- //

static INTERNER: Lazy<Mutex<HashSet<Arc<str>>>> = Lazy::new(Default::default);

/// Interned atom. Cloning is a refcount bump; equality is by name.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(Arc<str>);

impl Symbol {
    pub fn intern(name: &str) -> Self {
        // entries are never removed, so a poisoned table is still consistent
        let mut table = INTERNER.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(hit) = table.get(name) {
            return Symbol(hit.clone());
        }
        let atom: Arc<str> = Arc::from(name);
        table.insert(atom.clone());
        Symbol(atom)
    }

    pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, ":{}", self.0) }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl From<&str> for Symbol {
    fn from(name: &str) -> Self { Symbol::intern(name) }
}

// --------------------------------- Keys ----------------------------------- //

/// Map key. Decoded JSON objects always produce `Key::Symbol`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    String(String),
    Symbol(Symbol),
}

impl Key {
    pub fn sym(name: &str) -> Self { Key::Symbol(Symbol::intern(name)) }
    pub fn string(name: impl Into<String>) -> Self { Key::String(name.into()) }

    /// Key text regardless of kind.
    pub fn as_str(&self) -> &str {
        match self {
            Key::String(s) => s,
            Key::Symbol(s) => s.as_str(),
        }
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::String(s) => write!(f, "{s:?}"),
            Key::Symbol(s) => write!(f, "{s:?}"),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl From<&str> for Key {
    fn from(name: &str) -> Self { Key::sym(name) }
}

impl From<Symbol> for Key {
    fn from(sym: Symbol) -> Self { Key::Symbol(sym) }
}

// --------------------------------- Raw ------------------------------------ //

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Raw {
    Null,
    Bool(bool),
    Integer(i64),
    Float(OrderedFloat<f64>),
    String(String),
    Symbol(Symbol),
    Array(Vec<Raw>),
    /// Insertion-ordered; equality ignores order.
    Map(IndexMap<Key, Raw>),
}

/// Observed shape of a raw value, as reported in type mismatches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Shape {
    Null,
    Boolean,
    Integer,
    Float,
    String,
    Symbol,
    Array,
    Map,
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Shape::Null => "null",
            Shape::Boolean => "boolean",
            Shape::Integer => "integer",
            Shape::Float => "float",
            Shape::String => "string",
            Shape::Symbol => "symbol",
            Shape::Array => "array",
            Shape::Map => "map",
        })
    }
}

impl Raw {
    pub fn shape(&self) -> Shape {
        match self {
            Raw::Null => Shape::Null,
            Raw::Bool(_) => Shape::Boolean,
            Raw::Integer(_) => Shape::Integer,
            Raw::Float(_) => Shape::Float,
            Raw::String(_) => Shape::String,
            Raw::Symbol(_) => Shape::Symbol,
            Raw::Array(_) => Shape::Array,
            Raw::Map(_) => Shape::Map,
        }
    }

    /// Build a map from `(key, value)` pairs, keeping their order.
    pub fn map<K, V, I>(pairs: I) -> Raw
    where
        K: Into<Key>,
        V: Into<Raw>,
        I: IntoIterator<Item = (K, V)>,
    {
        Raw::Map(pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }

    pub fn is_null(&self) -> bool { matches!(self, Raw::Null) }

    pub fn as_map(&self) -> Option<&IndexMap<Key, Raw>> {
        match self {
            Raw::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Look up a map entry by key text, ignoring whether the key is a string or a symbol.
    pub fn get(&self, name: &str) -> Option<&Raw> {
        self.as_map()?.iter().find(|(k, _)| k.as_str() == name).map(|(_, v)| v)
    }
}

impl From<bool> for Raw {
    fn from(v: bool) -> Self { Raw::Bool(v) }
}
impl From<i64> for Raw {
    fn from(v: i64) -> Self { Raw::Integer(v) }
}
impl From<i32> for Raw {
    fn from(v: i32) -> Self { Raw::Integer(v.into()) }
}
impl From<f64> for Raw {
    fn from(v: f64) -> Self { Raw::Float(OrderedFloat(v)) }
}
impl From<&str> for Raw {
    fn from(v: &str) -> Self { Raw::String(v.to_owned()) }
}
impl From<String> for Raw {
    fn from(v: String) -> Self { Raw::String(v) }
}
impl From<Symbol> for Raw {
    fn from(v: Symbol) -> Self { Raw::Symbol(v) }
}
impl<T: Into<Raw>> From<Vec<T>> for Raw {
    fn from(xs: Vec<T>) -> Self { Raw::Array(xs.into_iter().map(Into::into).collect()) }
}
impl<T: Into<Raw>> From<Option<T>> for Raw {
    fn from(v: Option<T>) -> Self { v.map_or(Raw::Null, Into::into) }
}

impl TryFrom<serde_json::Value> for Raw {
    type Error = serde_json::Error;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        serde_json::from_value(value)
    }
}

// ------------------------------ Decoding ---------------------------------- //

struct RawVisitor;

impl<'de> Visitor<'de> for RawVisitor {
    type Value = Raw;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a JSON value")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Raw, E> { Ok(Raw::Null) }
    fn visit_none<E: de::Error>(self) -> Result<Raw, E> { Ok(Raw::Null) }

    fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Raw, D::Error> {
        Raw::deserialize(d)
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Raw, E> { Ok(Raw::Bool(v)) }
    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Raw, E> { Ok(Raw::Integer(v)) }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Raw, E> {
        // exact integers only; never widen to float
        i64::try_from(v)
            .map(Raw::Integer)
            .map_err(|_| E::invalid_value(Unexpected::Unsigned(v), &"an integer within the i64 range"))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Raw, E> { Ok(Raw::Float(OrderedFloat(v))) }
    fn visit_str<E: de::Error>(self, v: &str) -> Result<Raw, E> { Ok(Raw::String(v.to_owned())) }
    fn visit_string<E: de::Error>(self, v: String) -> Result<Raw, E> { Ok(Raw::String(v)) }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Raw, A::Error> {
        let mut out = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(el) = seq.next_element::<Raw>()? {
            out.push(el);
        }
        Ok(Raw::Array(out))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Raw, A::Error> {
        let mut out = IndexMap::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((k, v)) = map.next_entry::<String, Raw>()? {
            out.insert(Key::sym(&k), v);
        }
        Ok(Raw::Map(out))
    }
}

impl<'de> Deserialize<'de> for Raw {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        d.deserialize_any(RawVisitor)
    }
}

// ------------------------------ Encoding ---------------------------------- //

impl Serialize for Key {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(self.as_str())
    }
}

impl Serialize for Raw {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        match self {
            Raw::Null => s.serialize_unit(),
            Raw::Bool(b) => s.serialize_bool(*b),
            Raw::Integer(i) => s.serialize_i64(*i),
            Raw::Float(x) => s.serialize_f64(x.0),
            Raw::String(x) => s.serialize_str(x),
            Raw::Symbol(x) => s.serialize_str(x.as_str()),
            Raw::Array(xs) => {
                let mut seq = s.serialize_seq(Some(xs.len()))?;
                for x in xs {
                    seq.serialize_element(x)?;
                }
                seq.end()
            }
            Raw::Map(m) => {
                let mut out = s.serialize_map(Some(m.len()))?;
                for (k, v) in m {
                    out.serialize_entry(k, v)?;
                }
                out.end()
            }
        }
    }
}

// ------------------------------- Tests ------------------------------------ //
