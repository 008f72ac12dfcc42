//! Serialize → rebuild must give back an equal instance, for any payload the
//! schema accepts.
use function_types::path_de::raw_from_str;
use function_types::{KeyKind, Namespace, Raw, TypeDescriptor as T};
use proptest::prelude::*;
use serde_json::{Value as Json, json};

fn namespace() -> Namespace {
    Namespace::define("Catalog", |ns| {
        ns.declare("Order", [
            ("id", T::string()),
            ("quantity", T::integer()),
            ("price", T::float()),
            ("paid", T::boolean()),
            ("tags", T::array_of(T::string())),
            ("counters", T::map_of(KeyKind::Symbol, T::integer())),
            ("lines", T::array_of(T::schema("Line"))),
            ("?note", T::string()),
            ("status", T::enum_of([T::string(), T::integer()])),
        ])?;
        ns.declare("Line", [
            ("sku", T::string()),
            ("?discount", T::float()),
        ])?;
        ns.set_root("Order")?;
        Ok(())
    })
    .unwrap()
}

/// Quarter steps print and parse back exactly.
fn amount() -> impl Strategy<Value = f64> {
    any::<i32>().prop_map(|n| f64::from(n) / 4.0)
}

fn line() -> impl Strategy<Value = Json> {
    ("[a-z]{1,8}", proptest::option::of(amount())).prop_map(|(sku, discount)| match discount {
        Some(d) => json!({"sku": sku, "discount": d}),
        None => json!({"sku": sku}),
    })
}

fn order() -> impl Strategy<Value = Json> {
    (
        "[A-Za-z0-9-]{0,12}",
        any::<i64>(),
        amount(),
        any::<bool>(),
        proptest::collection::vec("[a-z ]{0,6}", 0..4),
        proptest::collection::btree_map("[a-z]{1,5}", any::<i32>(), 0..4),
        proptest::collection::vec(line(), 0..4),
        proptest::option::of("[a-z]{0,10}"),
        prop_oneof![any::<i64>().prop_map(Json::from), "[A-Z]{1,6}".prop_map(Json::from)],
    )
        .prop_map(|(id, quantity, price, paid, tags, counters, lines, note, status)| {
            let mut order = json!({
                "id": id,
                "quantity": quantity,
                "price": price,
                "paid": paid,
                "tags": tags,
                "counters": counters,
                "lines": lines,
                "status": status,
            });
            if let Some(note) = note {
                order["note"] = json!(note);
            }
            order
        })
}

proptest! {
    #[test]
    fn rebuilding_serialized_instance_is_identity(doc in order()) {
        let ns = namespace();
        let raw = Raw::try_from(doc).unwrap();
        let inst = ns.build(&raw).unwrap();
        prop_assert_eq!(ns.build(&inst.to_raw()).unwrap(), inst);
    }

    #[test]
    fn json_text_round_trip_preserves_instances(doc in order()) {
        let ns = namespace();
        let inst = ns.build(&Raw::try_from(doc).unwrap()).unwrap();
        let text = serde_json::to_string(&inst).unwrap();
        let rebuilt = ns.build(&raw_from_str(&text).unwrap()).unwrap();
        prop_assert_eq!(rebuilt, inst);
    }

    #[test]
    fn serialization_only_adds_defaulted_nulls(doc in order()) {
        let ns = namespace();
        let inst = ns.build(&Raw::try_from(doc.clone()).unwrap()).unwrap();
        let mut expected = doc;
        if expected.get("note").is_none() {
            expected["note"] = Json::Null;
        }
        for line in expected["lines"].as_array_mut().unwrap() {
            if line.get("discount").is_none() {
                line["discount"] = Json::Null;
            }
        }
        prop_assert_eq!(inst.to_raw(), Raw::try_from(expected).unwrap());
    }
}
