//! Validator dispatch: is this raw value shaped like that descriptor?
//!
//! Purely structural on the descriptor's tag. Containers and modifiers recurse
//! into their wrapped descriptors, so recursion depth follows the descriptor,
//! not the input. A `SchemaRef` is only checked for being a map here; the
//! builder does the full recursive check with a namespace in scope, which
//! keeps this usable without one.
use crate::descriptor::{KeyKind, Primitive, TypeDescriptor};
use crate::error::{FieldPath, Segment};
use crate::raw::{Key, Raw, Shape};

/// Local failure: where inside the value it happened (relative to the value
/// being checked), what was expected there, and what was found.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Violation {
    pub at: FieldPath,
    pub expected: TypeDescriptor,
    pub found: Shape,
}

impl Violation {
    fn new(expected: &TypeDescriptor, found: Shape) -> Self {
        Self { at: FieldPath::root(), expected: expected.clone(), found }
    }

    fn under(mut self, seg: Segment) -> Self {
        self.at.push_front(seg);
        self
    }
}

pub fn validate(value: &Raw, desc: &TypeDescriptor) -> Result<(), Violation> {
    match desc {
        TypeDescriptor::Primitive(kind) => literal(value, *kind, desc),
        TypeDescriptor::Boolean => boolean(value, desc),
        TypeDescriptor::ArrayOf(elem) => array(value, elem, desc),
        TypeDescriptor::MapOf(key, elem) => map(value, *key, elem, desc),
        TypeDescriptor::Nullable(inner) => match value {
            Raw::Null => Ok(()),
            _ => validate(value, inner),
        },
        TypeDescriptor::Enum(members) => one_of(value, members, desc),
        TypeDescriptor::SchemaRef(_) => sub_schema(value, desc),
    }
}

pub fn is_valid(value: &Raw, desc: &TypeDescriptor) -> bool {
    validate(value, desc).is_ok()
}

// ------------------------------ Validators -------------------------------- //

fn literal(value: &Raw, kind: Primitive, desc: &TypeDescriptor) -> Result<(), Violation> {
    let ok = matches!(
        (kind, value),
        (Primitive::String, Raw::String(_))
            | (Primitive::Integer, Raw::Integer(_))
            | (Primitive::Float, Raw::Float(_))
            | (Primitive::Symbol, Raw::Symbol(_))
    );
    if ok { Ok(()) } else { Err(Violation::new(desc, value.shape())) }
}

fn boolean(value: &Raw, desc: &TypeDescriptor) -> Result<(), Violation> {
    match value {
        Raw::Bool(_) => Ok(()),
        other => Err(Violation::new(desc, other.shape())),
    }
}

fn array(value: &Raw, elem: &TypeDescriptor, desc: &TypeDescriptor) -> Result<(), Violation> {
    let Raw::Array(xs) = value else {
        return Err(Violation::new(desc, value.shape()));
    };
    for (i, x) in xs.iter().enumerate() {
        validate(x, elem).map_err(|v| v.under(Segment::Index(i)))?;
    }
    Ok(())
}

fn map(value: &Raw, key: KeyKind, elem: &TypeDescriptor, desc: &TypeDescriptor) -> Result<(), Violation> {
    let Raw::Map(entries) = value else {
        return Err(Violation::new(desc, value.shape()));
    };
    for (k, v) in entries {
        let seg = || Segment::Name(k.as_str().to_owned());
        match (key, k) {
            (KeyKind::String, Key::String(_)) | (KeyKind::Symbol, Key::Symbol(_)) => {}
            (KeyKind::String, Key::Symbol(_)) => {
                return Err(Violation::new(&TypeDescriptor::string(), Shape::Symbol).under(seg()));
            }
            (KeyKind::Symbol, Key::String(_)) => {
                return Err(Violation::new(&TypeDescriptor::symbol(), Shape::String).under(seg()));
            }
        }
        validate(v, elem).map_err(|e| e.under(seg()))?;
    }
    Ok(())
}

fn one_of(value: &Raw, members: &[TypeDescriptor], desc: &TypeDescriptor) -> Result<(), Violation> {
    if members.iter().any(|m| is_valid(value, m)) {
        Ok(())
    } else {
        Err(Violation::new(desc, value.shape()))
    }
}

fn sub_schema(value: &Raw, desc: &TypeDescriptor) -> Result<(), Violation> {
    match value {
        Raw::Map(_) => Ok(()),
        other => Err(Violation::new(desc, other.shape())),
    }
}

// ------------------------------- Tests ------------------------------------ //
