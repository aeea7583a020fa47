#[cfg(test)]
mod tests {
    use crate::{
        client_schema, compile_directory, compile_document, parse_simple_filter,
        utils::{matching_inums, nested_and},
    };
    use compiler::{
        Backend, CompileContext, CompileError, CompileOptions, DirectoryBackend, DocumentBackend,
    };
    use model::{
        AttributeMetadata, Cardinality, EntitySchema, Filter, FilterKind, IdentityResolver,
        RawFilterError, config::SchemaConfig,
    };
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tracing_test::traced_test;

    fn client_query() -> Filter {
        Filter::and(vec![
            Filter::or(vec![
                Filter::equality("clientId", "portal"),
                Filter::equality("clientId", "mobile"),
            ]),
            Filter::not(Filter::equality("status", "inactive")),
            Filter::equality("scope", "openid"),
            Filter::equality("displayName", "Portal"),
        ])
    }

    #[test]
    fn compiling_twice_yields_identical_output() {
        let filter = client_query();
        assert_eq!(
            compile_document(&filter).unwrap(),
            compile_document(&filter).unwrap()
        );
        assert_eq!(
            compile_directory(&filter).unwrap(),
            compile_directory(&filter).unwrap()
        );
    }

    #[test]
    fn consistency_propagates_through_nested_composites() {
        let leaf = |consistent: bool| {
            if consistent {
                Filter::presence("expiration")
            } else {
                Filter::presence("inum")
            }
        };

        // AND(OR(a, AND(b, NOT(c))), d): depth 4 from the root to `c`.
        for mask in 0u8..16 {
            let flags: Vec<bool> = (0..4).map(|bit| mask & (1 << bit) != 0).collect();
            let filter = Filter::and(vec![
                Filter::or(vec![
                    leaf(flags[0]),
                    Filter::and(vec![leaf(flags[1]), Filter::not(leaf(flags[2]))]),
                ]),
                leaf(flags[3]),
            ]);
            let expected = flags.iter().any(|flag| *flag);

            assert_eq!(
                compile_document(&filter).unwrap().consistency,
                expected,
                "document backend, flags {flags:?}"
            );
            assert_eq!(
                compile_directory(&filter).unwrap().consistency,
                expected,
                "directory backend, flags {flags:?}"
            );
        }
    }

    #[traced_test]
    #[test]
    fn or_of_equalities_accepts_the_listed_values() {
        let filter = Filter::or(vec![
            Filter::equality("clientId", "portal"),
            Filter::equality("clientId", "mobile"),
            Filter::equality("clientId", "reporting"),
        ]);
        let compiled = compile_document(&filter).unwrap();

        assert_eq!(
            compiled.expression.to_string(),
            r#"(`clientId` IN ["portal", "mobile", "reporting"])"#
        );
        assert_eq!(matching_inums(&compiled.expression), vec!["1001", "1002"]);
        assert!(logs_contain("Rewriting OR of equalities as IN"));

        // The same predicate without the rewrite accepts the same documents.
        let disjunction = Filter::or(vec![
            Filter::equality("clientId", "portal"),
            Filter::equality("clientId", "mobile").with_alias(Filter::lowercase("clientId")),
            Filter::equality("clientId", "reporting"),
        ]);
        let compiled = compile_document(&disjunction).unwrap();
        assert!(!compiled.expression.to_string().contains(" IN ["));
        assert_eq!(matching_inums(&compiled.expression), vec!["1001", "1002"]);
    }

    #[test]
    fn multi_valued_equality_is_existential() {
        let compiled = compile_document(&Filter::equality("scope", "profile")).unwrap();
        assert_eq!(matching_inums(&compiled.expression), vec!["1001"]);
        assert!(compiled.consistency);

        let compiled = compile_document(&Filter::equality("scope", "openid")).unwrap();
        assert_eq!(matching_inums(&compiled.expression), vec!["1001", "1002"]);

        let expr = compile_document(&Filter::equality("redirectUri", "v2"))
            .unwrap()
            .expression;
        assert!(expr.matches(&json!({"redirectUri": ["v1", "v2"]})));
        assert!(!expr.matches(&json!({"redirectUri": ["v1", "v3"]})));
    }

    #[traced_test]
    #[test]
    fn unknown_cardinality_matches_scalars_and_arrays() {
        let compiled = compile_document(&Filter::equality("displayName", "Mobile")).unwrap();
        assert_eq!(matching_inums(&compiled.expression), vec!["1002"]);
        assert!(logs_contain("Cardinality unknown"));

        let compiled = compile_document(&Filter::equality("displayName", "Portal")).unwrap();
        assert_eq!(matching_inums(&compiled.expression), vec!["1001"]);
    }

    #[test]
    fn substring_honors_component_order() {
        let filter = Filter::substring("displayName", Some("ab"), &["cd"], Some("ef"));
        let expr = compile_document(&filter).unwrap().expression;

        assert!(expr.matches(&json!({"displayName": "abXcdYef"})));
        assert!(!expr.matches(&json!({"displayName": "abefcd"})));
        assert!(!expr.matches(&json!({"displayName": "cdabef"})));
        // `%` matches an empty run, so adjacent components still match.
        assert!(expr.matches(&json!({"displayName": "abcdef"})));

        let filter = Filter::substring("redirectUri", None, &["portal"], Some("/cb"));
        let expr = compile_document(&filter).unwrap().expression;
        assert_eq!(matching_inums(&expr), vec!["1001"]);
    }

    #[test]
    fn approximate_match_is_rejected_for_any_schema() {
        let schemas = [
            EntitySchema::new(),
            EntitySchema::new().attribute("cn", AttributeMetadata::single()),
            EntitySchema::new().attribute("cn", AttributeMetadata::multi().with_consistency()),
            EntitySchema::new().attribute(
                "cn",
                AttributeMetadata {
                    cardinality: Cardinality::Unknown,
                    consistency: true,
                },
            ),
        ];
        let filters = [
            Filter::approximate_match("cn", "bob"),
            Filter::approximate_match("cn", "bob").multi_valued(true),
            Filter::approximate_match("cn", 7).multi_valued(false),
        ];

        for schema in &schemas {
            let ctx = CompileContext::new(schema, &IdentityResolver);
            for filter in &filters {
                assert_eq!(
                    DocumentBackend.compile(filter, &ctx).err(),
                    Some(CompileError::UnsupportedFilterKind {
                        kind: FilterKind::ApproximateMatch,
                        backend: "document",
                    })
                );
            }
        }

        // Nested failures abort the whole compilation.
        let nested = Filter::and(vec![
            Filter::presence("inum"),
            Filter::not(Filter::approximate_match("cn", "bob")),
        ]);
        assert!(compile_document(&nested).is_err());
    }

    #[test]
    fn numeric_and_string_literals_differ() {
        let number = compile_document(&Filter::equality("inum", 1001)).unwrap();
        let string = compile_document(&Filter::equality("inum", "1001")).unwrap();

        assert_eq!(number.expression.to_string(), "`inum` = 1001");
        assert_eq!(string.expression.to_string(), r#"`inum` = "1001""#);
        assert!(matching_inums(&number.expression).is_empty());
        assert_eq!(matching_inums(&string.expression), vec!["1001"]);

        let long = compile_document(&Filter::greater_or_equal("expiration", 1_750_000_000i64))
            .unwrap();
        assert_eq!(long.expression.to_string(), "`expiration` >= 1750000000");
        assert_eq!(matching_inums(&long.expression), vec!["1002"]);
    }

    #[test]
    fn visitor_sees_every_node_once() {
        let visited = AtomicUsize::new(0);
        let visitor = |_: &Filter| {
            visited.fetch_add(1, Ordering::Relaxed);
        };
        let schema = client_schema();
        let ctx = CompileContext::new(&schema, &IdentityResolver).with_visitor(&visitor);

        // AND, OR, 2 equalities, NOT, presence, aliased equality, its alias.
        let filter = Filter::and(vec![
            Filter::or(vec![
                Filter::equality("clientId", "portal"),
                Filter::equality("clientId", "mobile"),
            ]),
            Filter::not(Filter::presence("expiration")),
            Filter::equality("clientId", "portal").with_alias(Filter::lowercase("clientId")),
        ]);

        DocumentBackend.compile(&filter, &ctx).unwrap();
        assert_eq!(visited.swap(0, Ordering::Relaxed), 8);

        DirectoryBackend.compile(&filter, &ctx).unwrap();
        assert_eq!(visited.load(Ordering::Relaxed), 7);
    }

    #[test]
    fn deep_trees_are_refused() {
        let within = nested_and(63, Filter::presence("inum"));
        assert!(compile_document(&within).is_ok());

        let beyond = nested_and(64, Filter::presence("inum"));
        assert_eq!(
            compile_document(&beyond).err(),
            Some(CompileError::DepthLimitExceeded { limit: 64 })
        );
        assert_eq!(
            compile_directory(&beyond).err(),
            Some(CompileError::DepthLimitExceeded { limit: 64 })
        );

        let schema = client_schema();
        let ctx = CompileContext::new(&schema, &IdentityResolver)
            .with_options(CompileOptions { max_depth: 3 });
        let aliased = Filter::and(vec![Filter::not(
            Filter::equality("clientId", "x").with_alias(Filter::lowercase("clientId")),
        )]);
        assert_eq!(
            DocumentBackend.compile(&aliased, &ctx).err(),
            Some(CompileError::DepthLimitExceeded { limit: 3 })
        );
    }

    #[test]
    fn concurrent_compilations_agree() {
        let schema = client_schema();
        let ctx = CompileContext::new(&schema, &IdentityResolver);
        let filter = client_query();
        let expected = DocumentBackend.compile(&filter, &ctx).unwrap();

        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| DocumentBackend.compile(&filter, &ctx)))
                .collect();

            for handle in handles {
                assert_eq!(handle.join().unwrap().unwrap(), expected);
            }
        });
    }

    #[traced_test]
    #[test]
    fn raw_filters_are_parsed_then_compiled() {
        let schema = client_schema();
        let ctx =
            CompileContext::new(&schema, &IdentityResolver).with_raw_parser(&parse_simple_filter);

        let filter = Filter::and(vec![
            Filter::raw("(clientId=portal)"),
            Filter::raw("(expiration=*)"),
        ]);
        let compiled = DocumentBackend.compile(&filter, &ctx).unwrap();
        assert_eq!(
            compiled.expression.to_string(),
            r#"(`clientId` = "portal" AND `expiration` IS NOT MISSING)"#
        );
        assert!(compiled.consistency);
        assert!(logs_contain("RAW filter conversion is deprecated"));

        let compiled = DirectoryBackend.compile(&filter, &ctx).unwrap();
        assert_eq!(compiled.to_string(), "(&(clientId=portal)(expiration=*))");

        let broken = Filter::not(Filter::raw("clientId=portal"));
        assert_eq!(
            DocumentBackend.compile(&broken, &ctx).err(),
            Some(CompileError::RawFilterParse {
                filter: "clientId=portal".to_string(),
                source: RawFilterError::Syntax("clientId=portal".to_string()),
            })
        );
    }

    #[test]
    fn raw_filters_parsed_into_raw_are_rejected() {
        let reparse = |text: &str| -> Result<Filter, RawFilterError> { Ok(Filter::raw(text)) };
        let schema = client_schema();
        let ctx = CompileContext::new(&schema, &IdentityResolver).with_raw_parser(&reparse);
        let filter = Filter::and(vec![Filter::raw("(clientId=portal)")]);

        assert_eq!(
            DocumentBackend.compile(&filter, &ctx).err(),
            Some(CompileError::UnsupportedFilterKind {
                kind: FilterKind::Raw,
                backend: "document",
            })
        );
        assert_eq!(
            DirectoryBackend.compile(&filter, &ctx).err(),
            Some(CompileError::UnsupportedFilterKind {
                kind: FilterKind::Raw,
                backend: "directory",
            })
        );
    }

    #[test]
    fn raw_filters_count_towards_the_depth_limit() {
        let expand = |_: &str| -> Result<Filter, RawFilterError> {
            Ok(nested_and(10, Filter::presence("inum")))
        };
        let schema = client_schema();
        let ctx = CompileContext::new(&schema, &IdentityResolver)
            .with_raw_parser(&expand)
            .with_options(CompileOptions { max_depth: 8 });

        // The parsed tree replaces the RAW node at depth 1.
        let filter = Filter::not(Filter::raw("(deep)"));
        assert_eq!(
            DocumentBackend.compile(&filter, &ctx).err(),
            Some(CompileError::DepthLimitExceeded { limit: 8 })
        );
        assert_eq!(
            DirectoryBackend.compile(&filter, &ctx).err(),
            Some(CompileError::DepthLimitExceeded { limit: 8 })
        );

        let roomy = ctx.with_options(CompileOptions { max_depth: 12 });
        assert!(DocumentBackend.compile(&filter, &roomy).is_ok());
    }

    #[test]
    fn raw_filters_need_a_parser() {
        let err = compile_document(&Filter::raw("(clientId=portal)")).err();
        assert!(matches!(
            err,
            Some(CompileError::RawFilterParse {
                source: RawFilterError::Unavailable,
                ..
            })
        ));
    }

    #[test]
    fn schema_config_drives_names_and_cardinality() {
        let config = SchemaConfig::from_json(
            r#"{
                "attributes": {
                    "mail": {"cardinality": "multi"},
                    "uid": {"cardinality": "single", "consistency": true}
                },
                "internal_names": {"mail": "emails", "uid": "user_id"}
            }"#,
        )
        .unwrap();
        let (schema, resolver) = (config.schema(), config.resolver());
        let ctx = CompileContext::new(&schema, &resolver);

        let filter = Filter::and(vec![
            Filter::equality("mail", "a@x.org"),
            Filter::or(vec![Filter::equality("uid", "a"), Filter::equality("uid", "b")]),
        ]);

        let compiled = DocumentBackend.compile(&filter, &ctx).unwrap();
        assert_eq!(
            compiled.expression.to_string(),
            r#"(ANY `emails_` IN `emails` SATISFIES `emails_` = "a@x.org" END AND (`user_id` IN ["a", "b"]))"#
        );
        assert!(compiled.consistency);

        let compiled = DirectoryBackend.compile(&filter, &ctx).unwrap();
        assert_eq!(
            compiled.to_string(),
            "(&(emails=a@x.org)(|(user_id=a)(user_id=b)))"
        );
    }

    #[test]
    fn filters_load_from_json() {
        let filter: Filter = serde_json::from_value(json!({
            "kind": "OR",
            "filters": [
                {"kind": "EQUALITY", "attribute": "clientId", "value": "portal"},
                {"kind": "EQUALITY", "attribute": "clientId", "value": "batch"}
            ]
        }))
        .unwrap();

        let compiled = compile_document(&filter).unwrap();
        assert_eq!(matching_inums(&compiled.expression), vec!["1001", "1003"]);
    }
}
