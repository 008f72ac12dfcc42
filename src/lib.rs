//! Structural schemas for nested event payloads.
//!
//! Declare named schemas in a [`Namespace`] (forward references allowed
//! inside one declaration block), then build raw decoded payloads into
//! immutable, validated [`Instance`]s and serialize them back to plain data.
//!
//! ```
//! use function_types::{Namespace, Raw, TypeDescriptor as T};
//!
//! let ns = Namespace::define("People", |ns| {
//!     ns.declare("Person", [("name", T::string()), ("?nick", T::string())])?;
//!     Ok(())
//! })
//! .unwrap();
//!
//! let raw = function_types::path_de::raw_from_str(r#"{"name": "Ann"}"#).unwrap();
//! let person = ns.build(&raw).unwrap();
//! assert_eq!(person["name"].as_str(), Some("Ann"));
//! assert!(person["nick"].is_null());
//! assert_eq!(person.to_raw(), Raw::map([("name", Raw::from("Ann")), ("nick", Raw::Null)]));
//! ```
pub mod build;
pub mod descriptor;
pub mod error;
pub mod events;
pub mod instance;
pub mod namespace;
pub mod path_de;
pub mod raw;
pub mod schema;
pub mod serialize;
pub mod validate;

pub use descriptor::{KeyKind, Primitive, TypeDescriptor};
pub use error::{Error, FieldPath, Result, Segment};
pub use instance::{Instance, Value};
pub use namespace::{Namespace, NamespaceBuilder};
pub use raw::{Key, Raw, Shape, Symbol};
pub use schema::SchemaDefinition;
