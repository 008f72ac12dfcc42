//! DynamoDB Streams records.
use once_cell::sync::Lazy;

use crate::descriptor::{KeyKind, TypeDescriptor as T};
use crate::error::Result;
use crate::namespace::Namespace;

pub(super) static NAMESPACE: Lazy<Namespace> =
    Lazy::new(|| declare().expect("DynamoDB event schemas are well-formed"));

pub fn declare() -> Result<Namespace> {
    Namespace::define("DynamoDBEvent", |ns| {
        ns.declare("Event", [("Records", T::array_of(T::schema("Record")))])?;

        ns.declare("Record", [
            ("eventID", T::string()),
            ("eventVersion", T::string()),
            ("eventName", T::string()),
            ("eventSource", T::string()),
            ("eventSourceARN", T::string()),
            ("awsRegion", T::string()),
            ("dynamodb", T::schema("StreamRecord")),
        ])?;

        ns.declare("StreamRecord", [
            ("?ApproximateCreationDateTime", T::enum_of([T::integer(), T::float()])),
            ("Keys", attribute_map()),
            ("SequenceNumber", T::string()),
            ("SizeBytes", T::integer()),
            ("StreamViewType", T::string()),
            ("?NewImage", attribute_map()),
            ("?OldImage", attribute_map()),
        ])?;

        // self-referential through L and M
        ns.declare("AttributeValue", [
            ("?B", T::string()),
            ("?BOOL", T::boolean()),
            ("?BS", T::array_of(T::string())),
            ("?L", T::array_of(T::schema("AttributeValue"))),
            ("?M", attribute_map()),
            ("?N", T::string()),
            ("?NS", T::array_of(T::string())),
            ("?NULL", T::boolean()),
            ("?S", T::string()),
            ("?SS", T::array_of(T::string())),
        ])?;

        ns.set_root("Event")?;
        Ok(())
    })
}

fn attribute_map() -> T { T::map_of(KeyKind::Symbol, T::schema("AttributeValue")) }
