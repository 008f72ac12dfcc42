//! Type descriptors: what shape of data is legal in a field.
//!
//! Descriptors are plain values, immutable once built. `SchemaRef` stores a
//! schema *name*; resolution happens against a namespace when an instance is
//! built, so a descriptor may name a schema that is declared later.
use std::fmt;
use std::sync::Arc;

/// Scalar kinds checked by exact variant (an integer is never a float).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Primitive {
    String,
    Integer,
    Float,
    Symbol,
}

/// Legal key kinds for `MapOf`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyKind {
    String,
    Symbol,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeDescriptor {
    Primitive(Primitive),
    /// Exactly `true` or `false`; no truthy surrogates.
    Boolean,
    ArrayOf(Box<TypeDescriptor>),
    MapOf(KeyKind, Box<TypeDescriptor>),
    Nullable(Box<TypeDescriptor>),
    /// Members are tried in order; first match wins.
    Enum(Vec<TypeDescriptor>),
    SchemaRef(Arc<str>),
}

impl TypeDescriptor {
    pub fn string() -> Self { Self::Primitive(Primitive::String) }
    pub fn integer() -> Self { Self::Primitive(Primitive::Integer) }
    pub fn float() -> Self { Self::Primitive(Primitive::Float) }
    pub fn symbol() -> Self { Self::Primitive(Primitive::Symbol) }
    pub fn boolean() -> Self { Self::Boolean }

    pub fn array_of(elem: TypeDescriptor) -> Self { Self::ArrayOf(Box::new(elem)) }

    pub fn map_of(key: KeyKind, value: TypeDescriptor) -> Self {
        Self::MapOf(key, Box::new(value))
    }

    pub fn nullable(inner: TypeDescriptor) -> Self {
        match inner {
            already @ Self::Nullable(_) => already,
            inner => Self::Nullable(Box::new(inner)),
        }
    }

    pub fn enum_of(members: impl IntoIterator<Item = TypeDescriptor>) -> Self {
        Self::Enum(members.into_iter().collect())
    }

    pub fn schema(name: &str) -> Self { Self::SchemaRef(Arc::from(name)) }

    pub fn is_nullable(&self) -> bool { matches!(self, Self::Nullable(_)) }

    /// Every schema name referenced anywhere inside this descriptor.
    pub fn schema_refs(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_refs(&mut out);
        out
    }

    fn collect_refs<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Self::Primitive(_) | Self::Boolean => {}
            Self::ArrayOf(inner) | Self::MapOf(_, inner) | Self::Nullable(inner) => {
                inner.collect_refs(out)
            }
            Self::Enum(members) => members.iter().for_each(|m| m.collect_refs(out)),
            Self::SchemaRef(name) => out.push(name),
        }
    }

    /// True if a member-less `Enum` (which can never match) appears anywhere inside.
    pub(crate) fn has_empty_enum(&self) -> bool {
        match self {
            Self::Primitive(_) | Self::Boolean | Self::SchemaRef(_) => false,
            Self::ArrayOf(inner) | Self::MapOf(_, inner) | Self::Nullable(inner) => {
                inner.has_empty_enum()
            }
            Self::Enum(members) => members.is_empty() || members.iter().any(Self::has_empty_enum),
        }
    }
}

// ------------------------------- Display ---------------------------------- //

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Primitive::String => "String",
            Primitive::Integer => "Integer",
            Primitive::Float => "Float",
            Primitive::Symbol => "Symbol",
        })
    }
}

impl fmt::Display for KeyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            KeyKind::String => "String",
            KeyKind::Symbol => "Symbol",
        })
    }
}

/// Declaration notation: `Array[T]`, `Hash[K, V]`, `Nullable[T]`, `Enum[A, B]`.
impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(p) => write!(f, "{p}"),
            Self::Boolean => f.write_str("Boolean"),
            Self::ArrayOf(elem) => write!(f, "Array[{elem}]"),
            Self::MapOf(k, v) => write!(f, "Hash[{k}, {v}]"),
            Self::Nullable(inner) => write!(f, "Nullable[{inner}]"),
            Self::Enum(members) => {
                f.write_str("Enum[")?;
                for (i, m) in members.iter().enumerate() {
                    if i > 0 { f.write_str(", ")?; }
                    write!(f, "{m}")?;
                }
                f.write_str("]")
            }
            Self::SchemaRef(name) => f.write_str(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::TypeDescriptor as T;

    #[test]
    fn renders_declaration_notation() {
        let t = T::nullable(T::map_of(KeyKind::Symbol, T::array_of(T::schema("AttributeValue"))));
        assert_eq!(t.to_string(), "Nullable[Hash[Symbol, Array[AttributeValue]]]");
        assert_eq!(T::enum_of([T::string(), T::integer(), T::boolean()]).to_string(), "Enum[String, Integer, Boolean]");
    }

    #[test]
    fn nullable_does_not_stack() {
        assert_eq!(T::nullable(T::nullable(T::string())), T::nullable(T::string()));
    }

    #[test]
    fn collects_nested_schema_refs() {
        let t = T::enum_of([T::array_of(T::schema("A")), T::map_of(KeyKind::String, T::nullable(T::schema("B")))]);
        assert_eq!(t.schema_refs(), vec!["A", "B"]);
        assert!(T::integer().schema_refs().is_empty());
    }

    #[test]
    fn finds_empty_enums_under_wrappers() {
        assert!(T::array_of(T::Enum(Vec::new())).has_empty_enum());
        assert!(!T::enum_of([T::float()]).has_empty_enum());
    }
}
