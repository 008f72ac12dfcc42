//! SQS batches.
use once_cell::sync::Lazy;

use crate::descriptor::{KeyKind, TypeDescriptor as T};
use crate::error::Result;
use crate::namespace::Namespace;

pub(super) static NAMESPACE: Lazy<Namespace> =
    Lazy::new(|| declare().expect("SQS event schemas are well-formed"));

pub fn declare() -> Result<Namespace> {
    Namespace::define("SqsEvent", |ns| {
        ns.declare("Event", [("Records", T::array_of(T::schema("Record")))])?;

        ns.declare("Record", [
            ("messageId", T::string()),
            ("receiptHandle", T::string()),
            ("body", T::string()),
            ("attributes", T::schema("RecordAttributes")),
            ("messageAttributes", T::map_of(KeyKind::Symbol, T::schema("MessageAttribute"))),
            ("md5OfBody", T::string()),
            ("eventSource", T::string()),
            ("eventSourceARN", T::string()),
            ("awsRegion", T::string()),
        ])?;

        ns.declare("RecordAttributes", [
            ("?AWSTraceHeader", T::string()),
            ("ApproximateReceiveCount", T::string()),
            ("SentTimestamp", T::string()),
            ("SenderId", T::string()),
            ("ApproximateFirstReceiveTimestamp", T::string()),
            ("?SequenceNumber", T::string()),
            ("?MessageGroupId", T::string()),
            ("?MessageDeduplicationId", T::string()),
            ("?DeadLetterQueueSourceArn", T::string()),
        ])?;

        ns.declare("MessageAttribute", [
            ("?stringValue", T::string()),
            ("?binaryValue", T::string()),
            ("?stringListValues", T::array_of(T::string())),
            ("?binaryListValues", T::array_of(T::string())),
            ("dataType", T::enum_of([T::string(), T::integer(), T::boolean()])),
        ])?;

        ns.set_root("Event")?;
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::raw::Raw;
    use serde_json::json;

    #[test]
    fn declares_cleanly() {
        assert_eq!(declare().unwrap().root().unwrap().name(), "Event");
    }

    #[test]
    fn message_attribute_data_type_is_an_enum() {
        for data_type in [json!("String"), json!(1), json!(false)] {
            let raw = Raw::try_from(json!({"stringValue": "v", "dataType": data_type})).unwrap();
            assert!(NAMESPACE.build_as("MessageAttribute", &raw).is_ok());
        }
        let raw = Raw::try_from(json!({"dataType": 1.5})).unwrap();
        let err = NAMESPACE.build_as("MessageAttribute", &raw).unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { ref path, .. } if path.to_string() == "dataType"));
    }
}
