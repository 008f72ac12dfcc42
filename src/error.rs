//! Error taxonomy for declaration and construction.
//!
//! Every error is raised where it is detected and never recovered internally;
//! the caller decides how to surface it.
use std::collections::VecDeque;
use std::fmt;

use thiserror::Error;

use crate::descriptor::TypeDescriptor;
use crate::raw::Shape;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    // ---- construction ----
    /// Closed-schema violation: the payload carries a key the schema does not declare.
    #[error("unknown attribute {path} for schema {schema}")]
    UnknownField { schema: String, field: String, path: FieldPath },

    #[error("expected {path} to be a {expected}, got {found}")]
    TypeMismatch { schema: String, path: FieldPath, expected: TypeDescriptor, found: Shape },

    #[error("missing required attribute {path} ({expected}) for schema {schema}")]
    MissingField { schema: String, path: FieldPath, expected: TypeDescriptor },

    /// A string key and a symbol key with the same text both name one field.
    #[error("attribute {path} given more than once for schema {schema}")]
    DuplicateKey { schema: String, path: FieldPath },

    #[error("namespace {namespace} has no root schema")]
    MissingRootSchema { namespace: String },

    #[error("schema {name} referenced by {referenced_by} is not declared in namespace {namespace}")]
    UnknownSchemaReference { namespace: String, name: String, referenced_by: String },

    // ---- declaration ----
    #[error("schema {name} is not declared in namespace {namespace}")]
    UnknownSchema { namespace: String, name: String },

    #[error("root schema of {namespace} is already {existing}, refusing to set it to {attempted}")]
    DuplicateRoot { namespace: String, existing: String, attempted: String },

    #[error("schema {name} is declared twice in namespace {namespace}")]
    DuplicateSchema { namespace: String, name: String },

    #[error("field `{field}` is declared twice in schema {schema}")]
    DuplicateField { schema: String, field: String },

    #[error("field `{field}` of schema {schema} uses an Enum with no members")]
    EmptyEnum { schema: String, field: String },

    #[error("no schemas were declared in namespace {namespace}")]
    EmptyNamespace { namespace: String },
}

// ------------------------------ Field paths ------------------------------- //

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Field of an instance or key of a map.
    Name(String),
    Index(usize),
}

/// Location of a value from the payload root, e.g. `Records[0].dynamodb.Keys.Id`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct FieldPath(VecDeque<Segment>);

impl FieldPath {
    pub fn root() -> Self { Self::default() }

    pub fn is_root(&self) -> bool { self.0.is_empty() }

    pub fn segments(&self) -> impl Iterator<Item = &Segment> { self.0.iter() }

    pub fn push(&mut self, seg: Segment) { self.0.push_back(seg) }

    pub fn pop(&mut self) -> Option<Segment> { self.0.pop_back() }

    pub(crate) fn push_front(&mut self, seg: Segment) { self.0.push_front(seg) }

    /// `self` followed by every segment of `tail`.
    pub fn join(&self, tail: &FieldPath) -> FieldPath {
        let mut out = self.clone();
        out.0.extend(tail.0.iter().cloned());
        out
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("(root)");
        }
        for (i, seg) in self.0.iter().enumerate() {
            match seg {
                Segment::Name(name) if i == 0 => f.write_str(name)?,
                Segment::Name(name) => write!(f, ".{name}")?,
                Segment::Index(idx) => write!(f, "[{idx}]")?,
            }
        }
        Ok(())
    }
}
