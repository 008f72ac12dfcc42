//! Real AWS sample payloads built through the bundled event namespaces.
use function_types::path_de::raw_from_str;
use function_types::{Error, Instance, Key, Raw, events};

fn fixture(name: &str) -> Raw {
    let path = format!("{}/tests/fixtures/aws_events/{name}", env!("CARGO_MANIFEST_DIR"));
    let src = std::fs::read_to_string(&path).unwrap();
    raw_from_str(&src).unwrap()
}

fn records(event: &Instance) -> Vec<&Instance> {
    event["Records"].as_array().unwrap().iter().map(|r| r.as_instance().unwrap()).collect()
}

#[test]
fn dynamodb_stream_batch_builds() {
    let event = events::dynamodb().build(&fixture("dynamodb_event.json")).unwrap();
    let records = records(&event);
    assert_eq!(records.len(), 3);

    let names: Vec<_> = records.iter().map(|r| r["eventName"].as_str().unwrap()).collect();
    assert_eq!(names, ["INSERT", "MODIFY", "REMOVE"]);

    let insert = records[0]["dynamodb"].as_instance().unwrap();
    assert_eq!(insert.schema().name(), "StreamRecord");
    assert_eq!(insert["SizeBytes"].as_i64(), Some(26));
    assert!(insert["OldImage"].is_null());
    assert!(insert["ApproximateCreationDateTime"].is_null());

    let new_image = insert["NewImage"].as_map().unwrap();
    let message = new_image[&Key::sym("Message")].as_instance().unwrap();
    assert_eq!(message["S"].as_str(), Some("New item!"));
    assert!(message["N"].is_null());

    let remove = records[2]["dynamodb"].as_instance().unwrap();
    assert!(remove["NewImage"].is_null());
    assert_eq!(remove["ApproximateCreationDateTime"].as_i64(), Some(1479499740));
}

#[test]
fn dynamodb_nested_list_attributes_build_recursively() {
    let event = events::dynamodb().build(&fixture("dynamodb_event.json")).unwrap();
    let modify = records(&event)[1]["dynamodb"].as_instance().unwrap();
    let tags = modify["NewImage"].as_map().unwrap()[&Key::sym("Tags")].as_instance().unwrap();
    let list = tags["L"].as_array().unwrap();
    assert_eq!(list[0].as_instance().unwrap()["S"].as_str(), Some("blue"));
    let nested = list[1].as_instance().unwrap()["M"].as_map().unwrap();
    let weight = nested[&Key::sym("weight")].as_instance().unwrap();
    assert_eq!(weight["N"].as_str(), Some("3"));
}

#[test]
fn dynamodb_rejects_unknown_stream_attribute() {
    let src = r#"{"Records": [{
        "eventID": "1", "eventVersion": "1.0", "eventName": "INSERT",
        "eventSource": "aws:dynamodb", "eventSourceARN": "arn", "awsRegion": "us-west-2",
        "dynamodb": {
            "Keys": {"Id": {"N": "1"}}, "SequenceNumber": "1", "SizeBytes": 1,
            "StreamViewType": "KEYS_ONLY", "Shard": "x"
        }
    }]}"#;
    let err = events::dynamodb().build(&raw_from_str(src).unwrap()).unwrap_err();
    match err {
        Error::UnknownField { schema, field, path } => {
            assert_eq!(schema, "StreamRecord");
            assert_eq!(field, "Shard");
            assert_eq!(path.to_string(), "Records[0].dynamodb.Shard");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn dynamodb_reports_wrong_size_type_with_full_path() {
    let src = r#"{"Records": [{
        "eventID": "1", "eventVersion": "1.0", "eventName": "INSERT",
        "eventSource": "aws:dynamodb", "eventSourceARN": "arn", "awsRegion": "us-west-2",
        "dynamodb": {
            "Keys": {"Id": {"N": "1"}}, "SequenceNumber": "1", "SizeBytes": 1.5,
            "StreamViewType": "KEYS_ONLY"
        }
    }]}"#;
    let err = events::dynamodb().build(&raw_from_str(src).unwrap()).unwrap_err();
    assert_eq!(err.to_string(), "expected Records[0].dynamodb.SizeBytes to be a Integer, got float");
}

#[test]
fn sqs_batch_builds() {
    let event = events::sqs().build(&fixture("sqs_event.json")).unwrap();
    let records = records(&event);
    assert_eq!(records.len(), 2);

    let attrs = records[0]["messageAttributes"].as_map().unwrap();
    let attr = attrs[&Key::sym("myAttribute")].as_instance().unwrap();
    assert_eq!(attr["dataType"].as_str(), Some("String"));
    assert_eq!(attr["stringListValues"].as_array().map(<[_]>::len), Some(0));
    assert!(attr["binaryValue"].is_null());

    let fifo = records[1]["attributes"].as_instance().unwrap();
    assert_eq!(fifo["MessageGroupId"].as_str(), Some("1"));
    assert!(records[0]["attributes"].as_instance().unwrap()["AWSTraceHeader"].is_null());
    assert!(records[1]["messageAttributes"].as_map().unwrap().is_empty());
}

#[test]
fn sqs_missing_body_is_reported() {
    let mut raw = fixture("sqs_event.json");
    if let Raw::Map(top) = &mut raw {
        if let Some(Raw::Array(records)) = top.get_mut(&Key::sym("Records")) {
            if let Raw::Map(first) = &mut records[0] {
                first.shift_remove(&Key::sym("body"));
            }
        }
    }
    let err = events::sqs().build(&raw).unwrap_err();
    assert!(matches!(err, Error::MissingField { ref path, .. } if path.to_string() == "Records[0].body"));
}

#[test]
fn api_gateway_v2_event_builds() {
    let event = events::api_gateway_v2().build(&fixture("api_gateway_v2_event.json")).unwrap();
    assert_eq!(event["routeKey"].as_str(), Some("$default"));
    assert_eq!(event["isBase64Encoded"].as_bool(), Some(false));

    let ctx = event["requestContext"].as_instance().unwrap();
    assert_eq!(ctx["timeEpoch"].as_i64(), Some(1583348638390));
    assert_eq!(ctx["http"].as_instance().unwrap()["method"].as_str(), Some("POST"));

    let cert = ctx["authentication"].as_instance().unwrap()["clientCert"].as_instance().unwrap();
    let validity = cert["validity"].as_instance().unwrap();
    assert_eq!(validity.schema().name(), "Validity");

    let jwt = ctx["authorizer"].as_instance().unwrap()["jwt"].as_instance().unwrap();
    assert_eq!(jwt["scopes"].as_array().map(<[_]>::len), Some(2));
}

#[test]
fn api_gateway_v2_minimal_event_defaults_optional_parts() {
    let src = r#"{
        "version": "2.0", "routeKey": "GET /", "rawPath": "/", "rawQueryString": "",
        "headers": {"accept": "*/*"}, "isBase64Encoded": false,
        "requestContext": {
            "accountId": "1", "apiId": "a", "domainName": "d", "requestId": "r",
            "routeKey": "GET /", "stage": "$default", "time": "t", "timeEpoch": 1,
            "http": {"method": "GET", "path": "/", "protocol": "HTTP/1.1"}
        }
    }"#;
    let event = events::api_gateway_v2().build(&raw_from_str(src).unwrap()).unwrap();
    for field in ["cookies", "body", "pathParameters", "queryStringParameters", "stageVariables"] {
        assert!(event[field].is_null(), "{field} should default to null");
    }
    assert!(event["requestContext"].as_instance().unwrap()["authorizer"].is_null());
}

#[test]
fn serialized_events_rebuild_identically() {
    for (name, file) in [
        ("dynamodb", "dynamodb_event.json"),
        ("sqs", "sqs_event.json"),
        ("api-gateway-v2", "api_gateway_v2_event.json"),
    ] {
        let ns = events::lookup(name).unwrap();
        let event = ns.build(&fixture(file)).unwrap();
        assert_eq!(ns.build(&event.to_raw()).unwrap(), event, "{name}");
    }
}

#[test]
fn update_stays_within_the_building_namespace() {
    let sqs = events::sqs().build(&fixture("sqs_event.json")).unwrap();
    let empty = Raw::map(Vec::<(&str, Raw)>::new());
    let err = events::dynamodb().update(&sqs, &empty).unwrap_err();
    assert!(matches!(err, Error::UnknownSchema { ref name, .. } if name == "Event"));
    assert_eq!(events::sqs().update(&sqs, &empty).unwrap(), sqs);
}
