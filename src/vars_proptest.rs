//! Property-based tests for variable resolution and document merging.
//!
//! These tests use proptest to generate random templates and element trees
//! and verify that the engine's invariants hold for all of them.

#[cfg(test)]
mod proptest_tests {
    use crate::error::Error;
    use crate::format::Format;
    use crate::merge::structural::reconcile;
    use crate::strategy::Strategy as WriteStrategy;
    use crate::vars::{determine_vars, populate_lazy, populate_strict, VariableMap};
    use proptest::prelude::*;
    use serde_json::{json, Map, Value};

    fn name_strategy() -> impl Strategy<Value = String> {
        "[a-z][a-zA-Z0-9_]{0,8}"
    }

    /// Templates built from literal text and `${name}` references.
    fn template_strategy() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            "[a-z ]{0,10}".prop_map(Value::String),
            name_strategy().prop_map(|name| Value::String(format!("${{{}}}", name))),
            (name_strategy(), "[a-z]{1,5}")
                .prop_map(|(name, text)| Value::String(format!("{}-${{{}}}", text, name))),
            any::<i32>().prop_map(|n| json!(n)),
        ];
        leaf.prop_recursive(3, 24, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
                prop::collection::btree_map("[a-z]{1,4}", inner, 0..4)
                    .prop_map(|map| Value::Object(map.into_iter().collect())),
            ]
        })
    }

    /// XML-like element trees with a small vocabulary so that matches occur.
    /// Elements carry at most one text node, placed before their children.
    fn element_strategy() -> impl Strategy<Value = Value> {
        let leaf = (prop::sample::select(vec!["a", "b", "c"]), 0..3u8).prop_map(|(name, id)| {
            json!({"type": "element", "name": name, "attributes": {"id": id.to_string()}})
        });
        leaf.prop_recursive(2, 16, 3, |inner| {
            (
                prop::sample::select(vec!["a", "b", "c"]),
                prop::option::of("[a-z]{1,6}"),
                prop::collection::vec(inner, 0..3),
            )
                .prop_map(|(name, text, children)| {
                    let mut elements: Vec<Value> = text
                        .map(|text| json!({"type": "text", "text": text}))
                        .into_iter()
                        .collect();
                    elements.extend(children);
                    let mut element = json!({"type": "element", "name": name});
                    if !elements.is_empty() {
                        element["elements"] = Value::Array(elements);
                    }
                    element
                })
        })
    }

    fn document_strategy() -> impl Strategy<Value = Value> {
        prop::collection::vec(element_strategy(), 0..4).prop_map(|elements| json!({ "elements": elements }))
    }

    /// A document with a single root element, as written to disk.
    fn rooted_document_strategy() -> impl Strategy<Value = Value> {
        element_strategy().prop_map(|root| json!({ "elements": [root] }))
    }

    proptest! {
        /// Property: binding every referenced name leaves no reference behind
        #[test]
        fn strict_resolution_is_complete(template in template_strategy()) {
            let variables: VariableMap = determine_vars(&template)
                .into_iter()
                .map(|name| (name, json!("value")))
                .collect::<Map<String, Value>>();
            let resolved = populate_strict(&template, &variables);
            prop_assert!(resolved.is_ok());
            prop_assert!(determine_vars(resolved.unwrap().as_value()).is_empty());
        }

        /// Property: a strict pass without bindings fails on the first reference
        #[test]
        fn strict_resolution_reports_first_missing(template in template_strategy()) {
            let names = determine_vars(&template);
            match populate_strict(&template, &VariableMap::new()) {
                Ok(_) => prop_assert!(names.is_empty()),
                Err(Error::MissingVariable { name }) => prop_assert_eq!(Some(&name), names.first()),
                Err(other) => prop_assert!(false, "unexpected error {:?}", other),
            }
        }

        /// Property: a lazy pass without bindings changes nothing
        #[test]
        fn lazy_resolution_without_bindings_is_identity(template in template_strategy()) {
            let partial = populate_lazy(&template, &VariableMap::new());
            prop_assert_eq!(partial.as_value(), &template);
        }

        /// Property: reconciling the same changeset twice equals reconciling once
        #[test]
        fn reconcile_is_idempotent(
            existing in document_strategy(),
            changeset in document_strategy(),
        ) {
            let once = reconcile(&existing, &changeset);
            let twice = reconcile(&once, &changeset);
            prop_assert_eq!(twice, once);
        }

        /// Property: a reconciled tree reads back unchanged after rendering
        #[test]
        fn reconciled_xml_survives_render(
            existing in rooted_document_strategy(),
            changeset in rooted_document_strategy(),
        ) {
            let merged = reconcile(&existing, &changeset);
            let rendered = Format::Xml.render(&merged).unwrap();
            let reparsed = Format::Xml.parse(&rendered).unwrap();
            prop_assert_eq!(&reparsed, &merged);

            let again = Format::Xml.render(&reconcile(&reparsed, &changeset)).unwrap();
            prop_assert_eq!(again, rendered);
        }

        /// Property: existing top-level elements are never dropped
        #[test]
        fn reconcile_never_drops_elements(
            existing in document_strategy(),
            changeset in document_strategy(),
        ) {
            let merged = reconcile(&existing, &changeset);
            let before = existing["elements"].as_array().map_or(0, Vec::len);
            let after = merged["elements"].as_array().map_or(0, Vec::len);
            prop_assert!(after >= before);
        }

        /// Property: the default strategy is idempotent
        #[test]
        fn default_strategy_is_idempotent(
            existing in template_strategy(),
            changeset in template_strategy(),
        ) {
            let once = WriteStrategy::Default.apply(Some(&existing), &changeset);
            let twice = WriteStrategy::Default.apply(Some(&once), &changeset);
            prop_assert_eq!(twice, once);
        }
    }
}
