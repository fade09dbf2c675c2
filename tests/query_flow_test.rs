//! End-to-end flow: URL query string -> QueryHandler -> rendered SQL.

mod common;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use common::{customer, to_sql};
use request_query::{FieldGuard, QueryError, QueryHandler, QueryParams};
use sea_orm::EntityTrait;
use serde_json::json;

fn params(query_string: &str) -> QueryParams {
    serde_urlencoded::from_str(query_string).expect("valid query string")
}

#[test]
fn sort_filter_and_pagination_end_up_in_the_sql() {
    let params = params(
        "sort=%7B%22name%22%3A%20%22desc%22%2C%20%22age%22%3A%20%22%22%7D\
         &filter=%7B%22age%22%3A%20%7B%22operator%22%3A%20%22%3E%22%2C%20%22value%22%3A%2018%7D%7D\
         &limit=5&page=3",
    );
    // Decoded: sort={"name": "desc", "age": ""}
    //          filter={"age": {"operator": ">", "value": 18}}

    let mut handler = QueryHandler::new(params);
    handler.set_query(customer::Entity::find()).unwrap();
    handler.handle_filter().unwrap().handle_sort().unwrap().handle_pagination().unwrap();

    let sql = to_sql(handler.into_query().unwrap());
    assert!(sql.contains(r#""age" > 18"#), "{sql}");
    assert!(sql.contains(r#"ORDER BY "name" DESC, "age" ASC"#), "{sql}");
    assert!(sql.contains("LIMIT 5"), "{sql}");
    assert!(sql.contains("OFFSET 10"), "{sql}");
}

#[test]
fn scalar_sort_with_order_parameter() {
    let mut handler = QueryHandler::new(params("sort=name&order=desc"));
    handler.set_query(customer::Entity::find()).unwrap();
    handler.handle_sort().unwrap();

    let sql = to_sql(handler.into_query().unwrap());
    assert!(sql.contains(r#"ORDER BY "name" DESC"#), "{sql}");
}

#[test]
fn absent_parameters_leave_the_select_untouched() {
    let mut handler = QueryHandler::new(QueryParams::default());
    handler.set_query(customer::Entity::find()).unwrap();
    handler.handle_filter().unwrap().handle_sort().unwrap().handle_pagination().unwrap();

    let sql = to_sql(handler.into_query().unwrap());
    assert!(!sql.contains("WHERE"), "{sql}");
    assert!(!sql.contains("ORDER BY"), "{sql}");
    assert!(!sql.contains("LIMIT"), "{sql}");
}

#[test]
fn literal_value_normalization_reaches_the_sql() {
    let mut handler = QueryHandler::new(QueryParams {
        filter: Some(r#"{"team": "null", "name": {"operator": "!=", "value": "TRUE"}}"#.to_string()),
        ..Default::default()
    });
    handler.set_query(customer::Entity::find()).unwrap();
    handler.handle_filter().unwrap();

    let sql = to_sql(handler.into_query().unwrap());
    assert!(sql.contains(r#""team" IS NULL"#), "{sql}");
    assert!(sql.contains(r#""name" <> TRUE"#), "{sql}");
}

#[test]
fn guarded_field_is_rejected_with_expectation_failed() {
    let mut handler = QueryHandler::new(params("sort=salary"));
    handler.set_sort_fields(FieldGuard::allow(["name", "age"]));
    handler.set_query(customer::Entity::find()).unwrap();

    let err = handler.handle_sort().unwrap_err();
    assert!(matches!(
        &err,
        QueryError::FieldNotAllowed { field, usage: "sort" } if field == "salary"
    ));
    assert_eq!(err.into_response().status(), StatusCode::EXPECTATION_FAILED);
}

#[test]
fn group_by_reshapes_materialized_rows() {
    let rows = vec![
        json!({"id": 1, "team": "a"}),
        json!({"id": 2, "team": "a"}),
        json!({"id": 3, "team": "b"}),
    ];

    let mut handler: QueryHandler<sea_orm::Select<customer::Entity>> =
        QueryHandler::new(params("group_by=team&group_map=%7B%22a%22%3A%22alpha%22%2C%22c%22%3A%22gamma%22%7D"));
    // Decoded: group_map={"a":"alpha","c":"gamma"}

    let groups = handler.handle_group_by(&rows).unwrap().unwrap();
    assert_eq!(groups["alpha"].as_array().unwrap().len(), 2);
    assert_eq!(groups["gamma"], json!([]));
    assert!(!groups.contains_key("b"));
}

#[test]
fn handler_without_query_refuses_sort_but_not_group_by() {
    let mut handler: QueryHandler<sea_orm::Select<customer::Entity>> =
        QueryHandler::new(params("group_by=team"));

    let groups = handler.handle_group_by(&[json!({"team": "a"})]).unwrap().unwrap();
    assert_eq!(groups.len(), 1);

    let err = handler.handle_sort().unwrap_err();
    assert!(matches!(err, QueryError::QueryNotBound));
    assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
}
