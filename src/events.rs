//! AWS Lambda event shapes declared with the schema engine.
//!
//! Each namespace is declared once, on first use, and shared process-wide.
//! Deciding *which* shape an incoming event has is up to the caller.
pub mod api_gateway;
pub mod dynamodb;
pub mod sqs;

use crate::namespace::Namespace;

/// Names accepted by [`lookup`].
pub const EVENT_NAMES: [&str; 3] = ["dynamodb", "sqs", "api-gateway-v2"];

pub fn dynamodb() -> &'static Namespace { &dynamodb::NAMESPACE }

pub fn sqs() -> &'static Namespace { &sqs::NAMESPACE }

pub fn api_gateway_v2() -> &'static Namespace { &api_gateway::NAMESPACE }

pub fn lookup(name: &str) -> Option<&'static Namespace> {
    match name {
        "dynamodb" => Some(dynamodb()),
        "sqs" => Some(sqs()),
        "api-gateway-v2" => Some(api_gateway_v2()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_event_name_resolves() {
        for name in EVENT_NAMES {
            let ns = lookup(name).unwrap();
            assert_eq!(ns.root().unwrap().name(), "Event");
        }
        assert!(lookup("kinesis").is_none());
    }
}
