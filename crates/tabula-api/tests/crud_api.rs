//! End-to-end tests of the CRUD API through the dispatcher.

mod common;

use common::{api, body, count, error_message, json_request, SEEDED};
use serde_json::{json, Value};
use tabula_router::{Method, Request};

// =============================================================================
// Tables
// =============================================================================

#[tokio::test]
async fn list_tables() {
    let (d, _db) = api(1000).await;
    let res = d.dispatch(Request::get("/apid/db/_table")).await;
    assert_eq!(res.status, 200);
    assert_eq!(body(&res), json!({"Names": ["gadgets", "widgets"]}));
}

#[tokio::test]
async fn get_db_is_not_implemented() {
    let (d, _db) = api(1000).await;
    let res = d.dispatch(Request::get("/apid/db")).await;
    assert_eq!(res.status, 501);
    assert_eq!(error_message(&res), "API not implemented yet");
}

#[tokio::test]
async fn schema_routes_are_not_implemented() {
    let (d, db) = api(1000).await;
    for req in [
        Request::get("/apid/db/_schema"),
        Request::new(Method::Put, "/apid/db/_schema"),
        Request::post("/apid/db/_schema/widgets"),
        Request::delete("/apid/db/_schema/widgets"),
        Request::get("/apid/db/_schema/widgets/name"),
    ] {
        let path = req.path.clone();
        let res = d.dispatch(req).await;
        assert_eq!(res.status, 501, "{path}");
    }
    assert_eq!(count(&db, "widgets").await, SEEDED);
}

// =============================================================================
// Select
// =============================================================================

#[tokio::test]
async fn get_by_query_id_returns_one_record() {
    let (d, _db) = api(1000).await;
    let res = d.dispatch(Request::get("/apid/db/_table/widgets?id=7")).await;
    assert_eq!(res.status, 200);
    assert_eq!(
        body(&res),
        json!({"Records": [{"Keys": ["id", "name", "size"], "Values": ["7", "widget7", "70"]}]})
    );
}

#[tokio::test]
async fn get_one_by_path_id() {
    let (d, _db) = api(1000).await;
    let res = d
        .dispatch(Request::get("/apid/db/_table/widgets/0003?fields=name"))
        .await;
    assert_eq!(res.status, 200);
    assert_eq!(
        body(&res),
        json!({"Records": [{"Keys": ["name"], "Values": ["widget3"]}]})
    );
}

#[tokio::test]
async fn get_one_missing_is_no_matching_record() {
    let (d, _db) = api(1000).await;
    let res = d.dispatch(Request::get("/apid/db/_table/widgets/99")).await;
    assert_eq!(res.status, 400);
    assert_eq!(error_message(&res), "no matching record");
}

#[tokio::test]
async fn get_by_ids_with_custom_id_field() {
    let (d, _db) = api(1000).await;
    let res = d
        .dispatch(Request::get(
            "/apid/db/_table/widgets?id_field=size&ids=20,40&fields=id",
        ))
        .await;
    assert_eq!(res.status, 200);
    assert_eq!(
        body(&res)["Records"],
        json!([{"Keys": ["id"], "Values": ["2"]}, {"Keys": ["id"], "Values": ["4"]}])
    );
}

#[tokio::test]
async fn negative_limit_behaves_like_the_ceiling() {
    let (d, _db) = api(7).await;
    let clamped = d
        .dispatch(Request::get("/apid/db/_table/widgets?limit=-5"))
        .await;
    let ceiling = d
        .dispatch(Request::get("/apid/db/_table/widgets?limit=7"))
        .await;
    let omitted = d.dispatch(Request::get("/apid/db/_table/widgets")).await;

    assert_eq!(clamped.status, 200);
    assert_eq!(clamped.body, ceiling.body);
    assert_eq!(clamped.body, omitted.body);
    assert_eq!(body(&clamped)["Records"].as_array().unwrap().len(), 7);
}

#[tokio::test]
async fn limit_and_offset_page_through_rows() {
    let (d, _db) = api(1000).await;
    let res = d
        .dispatch(Request::get(
            "/apid/db/_table/widgets?fields=id&limit=2&offset=3",
        ))
        .await;
    assert_eq!(
        body(&res)["Records"],
        json!([{"Keys": ["id"], "Values": ["4"]}, {"Keys": ["id"], "Values": ["5"]}])
    );
}

#[tokio::test]
async fn null_columns_are_json_null() {
    let (d, _db) = api(1000).await;
    let res = d
        .dispatch(json_request(
            Method::Post,
            "/apid/db/_table/gadgets",
            &json!({"Records": [{"Keys": ["label"], "Values": [null]}]}),
        ))
        .await;
    assert_eq!(res.status, 201);

    let res = d.dispatch(Request::get("/apid/db/_table/gadgets?id_field=gid&ids=1")).await;
    assert_eq!(
        body(&res)["Records"][0],
        json!({"Keys": ["gid", "label"], "Values": ["1", null]})
    );
}

// =============================================================================
// Validation
// =============================================================================

#[tokio::test]
async fn invalid_parameters_are_rejected() {
    let (d, _db) = api(1000).await;
    for target in [
        "/apid/db/_table/1widgets",
        "/apid/db/_table/widgets?fields=id,(select%201)",
        "/apid/db/_table/widgets?ids=1,x",
        "/apid/db/_table/widgets?limit=%201",
        "/apid/db/_table/widgets?offset=1.5",
        "/apid/db/_table/widgets?id_field=id;",
        "/apid/db/_table/widgets/abc",
        "/apid/db/_table/widgets/99999999999999999999",
    ] {
        let res = d.dispatch(Request::get(target)).await;
        assert_eq!(res.status, 400, "{target}");
        assert!(!error_message(&res).is_empty());
    }
}

#[tokio::test]
async fn unknown_table_is_a_query_error() {
    let (d, _db) = api(1000).await;
    let res = d.dispatch(Request::get("/apid/db/_table/nothing")).await;
    assert_eq!(res.status, 400);
    assert!(error_message(&res).contains("no such table"));
}

// =============================================================================
// Insert
// =============================================================================

#[tokio::test]
async fn insert_returns_ids_in_insertion_order() {
    let (d, db) = api(1000).await;
    let res = d
        .dispatch(json_request(
            Method::Post,
            "/apid/db/_table/widgets",
            &json!({"Records": [
                {"Keys": ["name", "size"], "Values": ["sprocket", 5]},
                {"Keys": ["name"], "Values": ["flange"]}
            ]}),
        ))
        .await;
    assert_eq!(res.status, 201);
    assert_eq!(body(&res), json!({"Ids": [SEEDED + 1, SEEDED + 2]}));
    assert_eq!(count(&db, "widgets").await, SEEDED + 2);
}

#[tokio::test]
async fn insert_accepts_resource_alias() {
    let (d, _db) = api(1000).await;
    let res = d
        .dispatch(json_request(
            Method::Post,
            "/apid/db/_table/gadgets",
            &json!({"Resource": [{"Keys": ["label"], "Values": ["a"]}]}),
        ))
        .await;
    assert_eq!(res.status, 201);
    assert_eq!(body(&res), json!({"Ids": [1]}));
}

#[tokio::test]
async fn insert_checks_every_record_first() {
    let (d, db) = api(1000).await;
    let res = d
        .dispatch(json_request(
            Method::Post,
            "/apid/db/_table/widgets",
            &json!({"Records": [
                {"Keys": ["name"], "Values": ["fine"]},
                {"Keys": ["name", "size"], "Values": ["short"]}
            ]}),
        ))
        .await;
    assert_eq!(res.status, 400);
    assert_eq!(error_message(&res), "record 1: 2 keys != 1 values");
    assert_eq!(count(&db, "widgets").await, SEEDED);
}

#[tokio::test]
async fn insert_rejects_empty_record_before_writing() {
    let (d, db) = api(1000).await;
    let res = d
        .dispatch(json_request(
            Method::Post,
            "/apid/db/_table/widgets",
            &json!({"Records": [
                {"Keys": ["name"], "Values": ["first"]},
                {"Keys": [], "Values": []}
            ]}),
        ))
        .await;
    assert_eq!(res.status, 400);
    assert_eq!(error_message(&res), "record 1: no columns given");
    assert_eq!(count(&db, "widgets").await, SEEDED);
}

#[tokio::test]
async fn insert_rejects_injected_column_names() {
    let (d, db) = api(1000).await;
    let res = d
        .dispatch(json_request(
            Method::Post,
            "/apid/db/_table/widgets",
            &json!({"Records": [{"Keys": ["name) VALUES ('x'); --"], "Values": ["y"]}]}),
        ))
        .await;
    assert_eq!(res.status, 400);
    assert_eq!(count(&db, "widgets").await, SEEDED);
}

#[tokio::test]
async fn insert_malformed_body() {
    let (d, _db) = api(1000).await;
    let res = d
        .dispatch(Request::post("/apid/db/_table/widgets").body("not json"))
        .await;
    assert_eq!(res.status, 400);
    assert!(error_message(&res).starts_with("invalid request body"));
}

// =============================================================================
// Update
// =============================================================================

#[tokio::test]
async fn update_one_by_path_id() {
    let (d, _db) = api(1000).await;
    let res = d
        .dispatch(json_request(
            Method::Patch,
            "/apid/db/_table/widgets/2",
            &json!({"Records": [{"Keys": ["name", "size"], "Values": ["renamed", 0]}]}),
        ))
        .await;
    assert_eq!(res.status, 200);
    assert_eq!(body(&res), json!({"NumChanged": 1}));

    let res = d.dispatch(Request::get("/apid/db/_table/widgets/2")).await;
    assert_eq!(
        body(&res)["Records"][0]["Values"],
        json!(["2", "renamed", "0"])
    );
}

#[tokio::test]
async fn update_many_by_ids() {
    let (d, _db) = api(1000).await;
    let res = d
        .dispatch(json_request(
            Method::Patch,
            "/apid/db/_table/widgets?ids=1,3,5",
            &json!({"Records": [{"Keys": ["size"], "Values": [1]}]}),
        ))
        .await;
    assert_eq!(res.status, 200);
    assert_eq!(body(&res), json!({"NumChanged": 3}));
}

#[tokio::test]
async fn update_with_missing_id_is_a_mismatch() {
    let (d, _db) = api(1000).await;
    let res = d
        .dispatch(json_request(
            Method::Patch,
            "/apid/db/_table/widgets?ids=1,100",
            &json!({"Records": [{"Keys": ["size"], "Values": [1]}]}),
        ))
        .await;
    assert_eq!(res.status, 400);
    assert!(error_message(&res).starts_with("mismatch in rows affected"));
}

#[tokio::test]
async fn update_requires_id_or_ids() {
    let (d, _db) = api(1000).await;
    let res = d
        .dispatch(json_request(
            Method::Patch,
            "/apid/db/_table/widgets",
            &json!({"Records": [{"Keys": ["size"], "Values": [1]}]}),
        ))
        .await;
    assert_eq!(res.status, 400);
    assert_eq!(error_message(&res), "update must specify id or ids");
}

#[tokio::test]
async fn update_requires_a_record() {
    let (d, _db) = api(1000).await;
    let res = d
        .dispatch(json_request(
            Method::Patch,
            "/apid/db/_table/widgets/1",
            &json!({"Records": []}),
        ))
        .await;
    assert_eq!(res.status, 400);
    assert!(error_message(&res).contains("no data records"));
}

// =============================================================================
// Delete
// =============================================================================

#[tokio::test]
async fn delete_one_by_path_id() {
    let (d, db) = api(1000).await;
    let res = d.dispatch(Request::delete("/apid/db/_table/widgets/8")).await;
    assert_eq!(res.status, 200);
    assert_eq!(body(&res), json!({"NumChanged": 1}));
    assert_eq!(count(&db, "widgets").await, SEEDED - 1);
}

#[tokio::test]
async fn delete_many_by_ids() {
    let (d, db) = api(1000).await;
    let res = d
        .dispatch(Request::delete("/apid/db/_table/widgets?ids=1,2,3"))
        .await;
    assert_eq!(res.status, 200);
    assert_eq!(body(&res), json!({"NumChanged": 3}));
    assert_eq!(count(&db, "widgets").await, SEEDED - 3);
}

#[tokio::test]
async fn delete_with_missing_id_is_a_mismatch() {
    let (d, _db) = api(1000).await;
    let res = d.dispatch(Request::delete("/apid/db/_table/widgets/2")).await;
    assert_eq!(res.status, 200);

    let res = d
        .dispatch(Request::delete("/apid/db/_table/widgets?ids=1,2,3"))
        .await;
    assert_eq!(res.status, 400);
    assert_eq!(
        error_message(&res),
        "mismatch in rows affected: expected 3, got 2"
    );
}

#[tokio::test]
async fn delete_with_repeated_ids_is_a_mismatch() {
    let (d, db) = api(1000).await;
    let res = d
        .dispatch(Request::delete("/apid/db/_table/widgets?ids=1,1"))
        .await;
    assert_eq!(res.status, 400);
    assert_eq!(
        error_message(&res),
        "mismatch in rows affected: expected 2, got 1"
    );
    assert_eq!(count(&db, "widgets").await, SEEDED - 1);
}

#[tokio::test]
async fn delete_requires_id_or_ids() {
    let (d, db) = api(1000).await;
    let res = d.dispatch(Request::delete("/apid/db/_table/widgets")).await;
    assert_eq!(res.status, 400);
    assert_eq!(error_message(&res), "deletion must specify id or ids");
    assert_eq!(count(&db, "widgets").await, SEEDED);
}

// =============================================================================
// Dispatch
// =============================================================================

#[tokio::test]
async fn unknown_path_is_not_found() {
    let (d, _db) = api(1000).await;
    let res = d.dispatch(Request::get("/apid/nope")).await;
    assert_eq!(res.status, 404);
    let res = d.dispatch(Request::get("/db/_table")).await;
    assert_eq!(res.status, 404);
}

#[tokio::test]
async fn wrong_verb_advertises_sorted_methods() {
    let (d, _db) = api(1000).await;
    let res = d
        .dispatch(Request::new(Method::Put, "/apid/db/_table/widgets"))
        .await;
    assert_eq!(res.status, 405);
    assert_eq!(
        res.headers.get("Allow").map(String::as_str),
        Some("DELETE,GET,PATCH,POST")
    );

    let res = d.dispatch(Request::post("/apid/db/_table")).await;
    assert_eq!(res.status, 405);
    assert_eq!(res.headers.get("Allow").map(String::as_str), Some("GET"));
    let message: Value = body(&res)["Message"].clone();
    assert!(message.as_str().unwrap().contains("POST"));
}
