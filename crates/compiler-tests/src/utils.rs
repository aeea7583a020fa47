#![allow(dead_code)]

use compiler::document::ast::Expr;
use model::Filter;
use serde_json::{Value, json};

/// Client documents as a document store would hold them. `displayName` is a
/// scalar in some and an array in others.
pub fn client_documents() -> Vec<Value> {
    vec![
        json!({
            "inum": "1001",
            "clientId": "portal",
            "status": "active",
            "redirectUri": ["https://portal.example.org/cb", "https://portal.example.org/alt"],
            "scope": ["openid", "profile"],
            "expiration": 1_700_000_000,
            "displayName": "Portal"
        }),
        json!({
            "inum": "1002",
            "clientId": "mobile",
            "status": "inactive",
            "redirectUri": ["app://mobile/cb"],
            "scope": ["openid", "email"],
            "expiration": 1_800_000_000,
            "displayName": ["Mobile", "Mobile App"]
        }),
        json!({
            "inum": "1003",
            "clientId": "batch",
            "status": "active",
            "scope": ["uma_protection"]
        }),
    ]
}

/// Values of `inum` for every document the expression accepts.
pub fn matching_inums(expr: &Expr) -> Vec<String> {
    client_documents()
        .iter()
        .filter(|doc| expr.matches(doc))
        .filter_map(|doc| doc.get("inum").and_then(Value::as_str).map(str::to_string))
        .collect()
}

/// A left-leaning AND chain `levels` nodes deep ending in `leaf`.
pub fn nested_and(levels: usize, leaf: Filter) -> Filter {
    (0..levels).fold(leaf, |inner, _| Filter::and(vec![inner]))
}
