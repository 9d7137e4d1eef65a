use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use dealboard_server::config::Config;
use dealboard_server::App;
use serde_json::{json, Value};
use sqlx::PgPool;
use std::sync::Arc;
use testcontainers::{runners::AsyncRunner, ContainerAsync};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;
use tower::ServiceExt;

static TEST_CONTAINER: OnceCell<Arc<ContainerAsync<Postgres>>> = OnceCell::const_new();

async fn test_database_url() -> String {
    let container = TEST_CONTAINER
        .get_or_init(|| async {
            let container = Postgres::default()
                .start()
                .await
                .expect("Failed to start postgres container");
            Arc::new(container)
        })
        .await;

    let host = container.get_host().await.expect("Failed to get host");
    let port = container
        .get_host_port_ipv4(5432)
        .await
        .expect("Failed to get port");
    format!("postgres://postgres:postgres@{}:{}/postgres", host, port)
}

async fn setup() -> (Router, PgPool) {
    let config = Config {
        database_url: test_database_url().await,
        bind_address: "0.0.0.0:8080".to_string(),
        db_max_connections: 5,
        otlp_endpoint: None,
    };

    let app = App::new(config).await.expect("Failed to create app");
    let pool = app.db().clone();

    (app.router(), pool)
}

async fn request(
    router: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(v) => {
            builder = builder.header("content-type", "application/json");
            Body::from(v.to_string())
        }
        None => Body::empty(),
    };

    let res = router
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();

    let status = res.status();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, json)
}

async fn create_business(router: &Router, body: Value) -> i64 {
    let (status, json) = request(router, "POST", "/businesses", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);
    json["id"].as_i64().unwrap()
}

async fn create_deal(router: &Router, business_id: i64, body: Value) -> i64 {
    let mut body = body;
    body["business_id"] = json!(business_id);
    let (status, json) = request(router, "POST", "/deals", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);
    json["id"].as_i64().unwrap()
}

// =============================================================================
// BUSINESS CRUD
// =============================================================================

#[tokio::test]
async fn test_create_business_defaults() {
    let (router, _pool) = setup().await;

    let (status, json) = request(
        &router,
        "POST",
        "/businesses",
        Some(json!({"name": "Taco Spot"})),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["name"], "Taco Spot");
    assert_eq!(json["vote_score"], 0);
    assert_eq!(json["created_by"], "anonymous");
    assert!(json["created_at"].is_string());
    assert!(json["address"].is_null());
}

#[tokio::test]
async fn test_partial_update_keeps_omitted_fields() {
    let (router, _pool) = setup().await;

    let id = create_business(
        &router,
        json!({"name": "Oyster House", "address": "1 Pier Way"}),
    )
    .await;

    let (status, json) = request(
        &router,
        "PUT",
        &format!("/businesses/{}", id),
        Some(json!({"phone": "510-555-0100"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["name"], "Oyster House");
    assert_eq!(json["address"], "1 Pier Way");
    assert_eq!(json["phone"], "510-555-0100");
}

#[tokio::test]
async fn test_update_with_explicit_null_clears_field() {
    let (router, _pool) = setup().await;

    let id = create_business(
        &router,
        json!({"name": "Noodle Bar", "address": "22 Webster St", "phone": "510-555-0142"}),
    )
    .await;

    let (status, json) = request(
        &router,
        "PUT",
        &format!("/businesses/{}", id),
        Some(json!({"address": null})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(json["address"].is_null());
    assert_eq!(json["phone"], "510-555-0142");
    assert_eq!(json["name"], "Noodle Bar");
}

#[tokio::test]
async fn test_deal_update_with_explicit_null_clears_fields() {
    let (router, _pool) = setup().await;

    let business_id = create_business(&router, json!({"name": "Dumpling House"})).await;
    let deal_id = create_deal(
        &router,
        business_id,
        json!({
            "deal_type": "lunch_special",
            "time_start": "11:00:00",
            "tags": ["weekday"],
            "pricing": "$10 combo"
        }),
    )
    .await;

    let (status, json) = request(
        &router,
        "PUT",
        &format!("/deals/{}", deal_id),
        Some(json!({"time_start": null, "tags": null})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(json["time_start"].is_null());
    assert!(json["tags"].is_null());
    assert_eq!(json["pricing"], "$10 combo");
    assert_eq!(json["deal_type"], "lunch_special");
}

#[tokio::test]
async fn test_delete_then_read_is_not_found() {
    let (router, _pool) = setup().await;

    let id = create_business(&router, json!({"name": "Pop-up"})).await;

    let (status, _) = request(&router, "DELETE", &format!("/businesses/{}", id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, json) = request(&router, "GET", &format!("/businesses/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"]["code"], "business_not_found");
}

#[tokio::test]
async fn test_unknown_ids_return_404() {
    let (router, _pool) = setup().await;

    for uri in ["/businesses/999999", "/deals/999999", "/comments/999999"] {
        let (status, _) = request(&router, "GET", uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = request(&router, "DELETE", uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}

// =============================================================================
// VOTES
// =============================================================================

#[tokio::test]
async fn test_vote_up_then_down_restores_score() {
    let (router, _pool) = setup().await;

    let business_id = create_business(&router, json!({"name": "Brewpub"})).await;
    let deal_id = create_deal(&router, business_id, json!({"deal_type": "happy_hour"})).await;

    let (status, json) = request(
        &router,
        "POST",
        &format!("/deals/{}/vote", deal_id),
        Some(json!({"vote": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["vote_score"], 1);

    let (status, json) = request(
        &router,
        "POST",
        &format!("/deals/{}/vote", deal_id),
        Some(json!({"vote": -1})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["vote_score"], 0);
}

#[tokio::test]
async fn test_vote_score_can_go_negative() {
    let (router, _pool) = setup().await;

    let id = create_business(&router, json!({"name": "Divey Bar"})).await;

    for _ in 0..2 {
        request(
            &router,
            "POST",
            &format!("/businesses/{}/vote", id),
            Some(json!({"vote": -1})),
        )
        .await;
    }

    let (_, json) = request(&router, "GET", &format!("/businesses/{}", id), None).await;
    assert_eq!(json["vote_score"], -2);
}

#[tokio::test]
async fn test_vote_out_of_range_rejected() {
    let (router, _pool) = setup().await;

    let id = create_business(&router, json!({"name": "Wine Bar"})).await;

    for vote in [0, 2, -5] {
        let (status, json) = request(
            &router,
            "POST",
            &format!("/businesses/{}/vote", id),
            Some(json!({"vote": vote})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "validation_error");
    }

    // Rejected votes must not touch the score.
    let (_, json) = request(&router, "GET", &format!("/businesses/{}", id), None).await;
    assert_eq!(json["vote_score"], 0);
}

#[tokio::test]
async fn test_vote_on_unknown_id_is_404() {
    let (router, _pool) = setup().await;

    let (status, _) = request(
        &router,
        "POST",
        "/deals/999999/vote",
        Some(json!({"vote": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// =============================================================================
// COMMENT PARENTAGE
// =============================================================================

#[tokio::test]
async fn test_comment_requires_exactly_one_parent() {
    let (router, _pool) = setup().await;

    let business_id = create_business(&router, json!({"name": "Taqueria"})).await;
    let deal_id = create_deal(&router, business_id, json!({"deal_type": "taco_tuesday"})).await;

    let (status, json) = request(
        &router,
        "POST",
        "/comments",
        Some(json!({"text": "great", "business_id": business_id, "deal_id": deal_id})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "validation_error");

    let (status, _) = request(&router, "POST", "/comments", Some(json!({"text": "great"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, json) = request(
        &router,
        "POST",
        "/comments",
        Some(json!({"text": "great", "business_id": business_id})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["business_id"], business_id);
    assert!(json["deal_id"].is_null());
}

#[tokio::test]
async fn test_comment_update_cannot_relink() {
    let (router, _pool) = setup().await;

    let business_id = create_business(&router, json!({"name": "Izakaya"})).await;
    let other_id = create_business(&router, json!({"name": "Ramen Shop"})).await;

    let (_, comment) = request(
        &router,
        "POST",
        "/comments",
        Some(json!({"text": "solid", "business_id": business_id})),
    )
    .await;
    let comment_id = comment["id"].as_i64().unwrap();

    // Parent fields in the update body are ignored; only text is mutable.
    let (status, json) = request(
        &router,
        "PUT",
        &format!("/comments/{}", comment_id),
        Some(json!({"text": "edited", "business_id": other_id})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["text"], "edited");
    assert_eq!(json["business_id"], business_id);
}

// =============================================================================
// CASCADE DELETE
// =============================================================================

#[tokio::test]
async fn test_business_delete_cascades_to_deals_and_comments() {
    let (router, _pool) = setup().await;

    let business_id = create_business(&router, json!({"name": "Beer Garden"})).await;
    let deal_a = create_deal(&router, business_id, json!({"deal_type": "happy_hour"})).await;
    let deal_b = create_deal(&router, business_id, json!({"deal_type": "brunch"})).await;

    let (_, biz_comment) = request(
        &router,
        "POST",
        "/comments",
        Some(json!({"text": "love it", "business_id": business_id})),
    )
    .await;
    let (_, deal_comment) = request(
        &router,
        "POST",
        "/comments",
        Some(json!({"text": "cheap pints", "deal_id": deal_a})),
    )
    .await;

    let (status, _) = request(
        &router,
        "DELETE",
        &format!("/businesses/{}", business_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    for uri in [
        format!("/deals/{}", deal_a),
        format!("/deals/{}", deal_b),
        format!("/comments/{}", biz_comment["id"]),
        format!("/comments/{}", deal_comment["id"]),
    ] {
        let (status, _) = request(&router, "GET", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "expected {} to be gone", uri);
    }
}

#[tokio::test]
async fn test_deal_delete_cascades_to_comments() {
    let (router, _pool) = setup().await;

    let business_id = create_business(&router, json!({"name": "Pizzeria"})).await;
    let deal_id = create_deal(&router, business_id, json!({"deal_type": "slice_special"})).await;

    let (_, comment) = request(
        &router,
        "POST",
        "/comments",
        Some(json!({"text": "huge slices", "deal_id": deal_id})),
    )
    .await;

    let (status, _) = request(&router, "DELETE", &format!("/deals/{}", deal_id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = request(&router, "GET", &format!("/comments/{}", comment["id"]), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // The parent business is untouched.
    let (status, _) = request(&router, "GET", &format!("/businesses/{}", business_id), None).await;
    assert_eq!(status, StatusCode::OK);
}

// =============================================================================
// LISTING
// =============================================================================

#[tokio::test]
async fn test_list_filters_and_pagination() {
    let (router, _pool) = setup().await;

    let business_id = create_business(&router, json!({"name": "Cafe"})).await;
    let mut ids = Vec::new();
    for text in ["first", "second", "third"] {
        let (_, json) = request(
            &router,
            "POST",
            "/comments",
            Some(json!({"text": text, "business_id": business_id})),
        )
        .await;
        ids.push(json["id"].as_i64().unwrap());
    }

    let (status, json) = request(
        &router,
        "GET",
        &format!("/comments?business_id={}", business_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let listed: Vec<i64> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_i64().unwrap())
        .collect();
    assert_eq!(listed, ids, "insertion order, ascending id");

    let (_, json) = request(
        &router,
        "GET",
        &format!("/comments?business_id={}&skip=1&limit=1", business_id),
        None,
    )
    .await;
    let page = json.as_array().unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0]["id"].as_i64().unwrap(), ids[1]);
    assert_eq!(page[0]["text"], "second");
}

// =============================================================================
// ENRICHED VIEW
// =============================================================================

#[tokio::test]
async fn test_enriched_deal_projection() {
    let (router, _pool) = setup().await;

    // No coordinates on purpose, to exercise the fallback.
    let business_id = create_business(
        &router,
        json!({"name": "Mezcaleria", "address": "400 Grand Ave", "phone": "510-555-0199"}),
    )
    .await;
    let deal_id = create_deal(
        &router,
        business_id,
        json!({
            "deal_type": "happy_hour",
            "days_active": ["monday", "tuesday"],
            "time_start": "16:00:00",
            "time_end": "18:00:00",
            "pricing": "$2 off mezcal"
        }),
    )
    .await;

    let (status, json) = request(&router, "GET", "/api/deals-enriched?limit=10000", None).await;
    assert_eq!(status, StatusCode::OK);

    let enriched = json
        .as_array()
        .unwrap()
        .iter()
        .find(|d| d["id"].as_i64() == Some(deal_id))
        .expect("deal missing from enriched view")
        .clone();

    assert_eq!(enriched["restaurant_name"], "Mezcaleria");
    assert_eq!(enriched["business_id"], business_id);
    assert_eq!(enriched["deal_description"], "");
    assert_eq!(enriched["schedule"]["days"], json!(["Monday", "Tuesday"]));
    assert_eq!(enriched["schedule"]["start_time"], "16:00:00");
    assert_eq!(enriched["schedule"]["end_time"], "18:00:00");
    assert_eq!(enriched["vote_count"], 0);
    assert_eq!(enriched["address"], "400 Grand Ave");
    assert_eq!(enriched["pricing"], "$2 off mezcal");
    assert!(enriched["neighborhood"].is_null());
    assert!(enriched["created_at"].is_string());

    // Coordinate fallback: downtown Oakland.
    assert_eq!(enriched["location"]["lat"], 37.8044);
    assert_eq!(enriched["location"]["lng"], -122.2712);

    // Image is chosen by id modulo the fixed list.
    let expected_image =
        dealboard_server::domain::DEFAULT_IMAGES[(deal_id % 8) as usize];
    assert_eq!(enriched["image_url"], expected_image);
}

#[tokio::test]
async fn test_enriched_skips_deals_with_missing_business() {
    let (router, pool) = setup().await;

    let business_id = create_business(&router, json!({"name": "Ghost Kitchen"})).await;
    let deal_id = create_deal(&router, business_id, json!({"deal_type": "happy_hour"})).await;

    // Orphan the deal: remove the business row with FK triggers disabled,
    // which the cascade would otherwise make impossible.
    let mut conn = pool.acquire().await.unwrap();
    sqlx::query("SET session_replication_role = replica")
        .execute(&mut *conn)
        .await
        .unwrap();
    sqlx::query("DELETE FROM businesses WHERE id = $1")
        .bind(business_id)
        .execute(&mut *conn)
        .await
        .unwrap();
    sqlx::query("SET session_replication_role = DEFAULT")
        .execute(&mut *conn)
        .await
        .unwrap();
    drop(conn);

    // The deal row itself is still readable.
    let (status, _) = request(&router, "GET", &format!("/deals/{}", deal_id), None).await;
    assert_eq!(status, StatusCode::OK);

    // But the enriched view tolerates the gap by omitting it.
    let (status, json) = request(&router, "GET", "/api/deals-enriched?limit=10000", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(json
        .as_array()
        .unwrap()
        .iter()
        .all(|d| d["id"].as_i64() != Some(deal_id)));
}

#[tokio::test]
async fn test_enriched_uses_stored_coordinates() {
    let (router, _pool) = setup().await;

    let business_id = create_business(
        &router,
        json!({"name": "Lakeside Bar", "latitude": 37.8101, "longitude": -122.2559}),
    )
    .await;
    let deal_id = create_deal(&router, business_id, json!({"deal_type": "sunset_special"})).await;

    let (_, json) = request(&router, "GET", "/api/deals-enriched?limit=10000", None).await;
    let enriched = json
        .as_array()
        .unwrap()
        .iter()
        .find(|d| d["id"].as_i64() == Some(deal_id))
        .unwrap()
        .clone();

    assert_eq!(enriched["location"]["lat"], 37.8101);
    assert_eq!(enriched["location"]["lng"], -122.2559);
}
