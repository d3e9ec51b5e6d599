mod common;

use actix_web::{App, http::StatusCode, test};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

use iot_telemetry_server::api_contract::sensor_data::SensorReadingResponse;
use iot_telemetry_server::routes::configure_app;

fn ingest_request(body: Value) -> test::TestRequest {
    test::TestRequest::post().uri("/api/sensor-data").set_json(body)
}

#[actix_web::test]
async fn ingested_reading_is_returned_by_filtered_query() {
    let (_dir, pool) = common::test_pool().await;
    let app = test::init_service(App::new().configure(|cfg| configure_app(cfg, &pool))).await;

    let resp = test::call_service(
        &app,
        ingest_request(json!({
            "device_id": "X1",
            "temperature": 24.5,
            "humidity": 58.2,
            "pressure": 1013.25,
            "light": 450.0,
            "motion": true
        }))
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let ack: Value = test::read_body_json(resp).await;
    assert_eq!(ack, json!({ "status": "success", "message": "Data received" }));

    let readings: Vec<SensorReadingResponse> = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/api/sensor-data?device_id=X1&limit=1").to_request(),
    )
    .await;

    assert_eq!(readings.len(), 1);
    let reading = &readings[0];
    assert_eq!(reading.device_id, "X1");
    assert_eq!(reading.temperature, Some(24.5));
    assert_eq!(reading.humidity, Some(58.2));
    assert_eq!(reading.pressure, Some(1013.25));
    assert_eq!(reading.light, Some(450.0));
    assert_eq!(reading.motion, Some(true));
}

#[actix_web::test]
async fn unfiltered_query_returns_newest_first_up_to_limit() {
    let (_dir, pool) = common::test_pool().await;
    let app = test::init_service(App::new().configure(|cfg| configure_app(cfg, &pool))).await;

    let devices = ["A", "B", "A", "C", "B"];
    for (n, device_id) in devices.iter().enumerate() {
        let resp = test::call_service(
            &app,
            ingest_request(json!({ "device_id": device_id, "light": n as f64 })).to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let readings: Vec<SensorReadingResponse> = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/api/sensor-data?limit=2").to_request(),
    )
    .await;

    assert_eq!(readings.len(), 2);
    assert_eq!(readings[0].light, Some(4.0));
    assert_eq!(readings[0].device_id, "B");
    assert_eq!(readings[1].light, Some(3.0));
    assert_eq!(readings[1].device_id, "C");
    assert!(readings[0].timestamp >= readings[1].timestamp);
}

#[actix_web::test]
async fn default_limit_is_fifty() {
    let (_dir, pool) = common::test_pool().await;
    let app = test::init_service(App::new().configure(|cfg| configure_app(cfg, &pool))).await;

    for n in 0..55 {
        let resp = test::call_service(
            &app,
            ingest_request(json!({ "device_id": "BULK", "temperature": n })).to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let readings: Vec<SensorReadingResponse> = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/api/sensor-data").to_request(),
    )
    .await;

    assert_eq!(readings.len(), 50);
    assert_eq!(readings[0].temperature, Some(54.0));

    let none: Vec<SensorReadingResponse> = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/api/sensor-data?limit=0").to_request(),
    )
    .await;
    assert!(none.is_empty());
}

#[actix_web::test]
async fn readings_from_unregistered_devices_are_accepted() {
    let (_dir, pool) = common::test_pool().await;
    let app = test::init_service(App::new().configure(|cfg| configure_app(cfg, &pool))).await;

    let resp = test::call_service(
        &app,
        ingest_request(json!({ "device_id": "NOT_REGISTERED", "temperature": 19.0 })).to_request(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(common::count_rows(&pool, "sensor_data").await, 1);
    assert_eq!(common::count_rows(&pool, "devices").await, 0);
}

#[actix_web::test]
async fn omitted_measurements_serialize_as_null_and_motion_as_false() {
    let (_dir, pool) = common::test_pool().await;
    let app = test::init_service(App::new().configure(|cfg| configure_app(cfg, &pool))).await;

    let resp = test::call_service(&app, ingest_request(json!({ "device_id": "X2" })).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let readings: Vec<Value> = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/api/sensor-data?device_id=X2").to_request(),
    )
    .await;
    let reading = readings[0].as_object().unwrap();

    for field in ["temperature", "humidity", "pressure", "light"] {
        assert_eq!(reading.get(field), Some(&Value::Null), "field {}", field);
    }
    assert_eq!(reading.get("motion"), Some(&json!(false)));
    assert!(reading.get("timestamp").map(Value::is_string).unwrap_or(false));
    assert!(reading.get("id").map(Value::is_i64).unwrap_or(false));
}

#[actix_web::test]
async fn malformed_submissions_are_rejected() {
    let (_dir, pool) = common::test_pool().await;
    let app = test::init_service(App::new().configure(|cfg| configure_app(cfg, &pool))).await;

    let bodies = vec![
        json!({ "temperature": 21.0 }),
        json!({ "device_id": "" }),
        json!({ "device_id": 17 }),
        json!({ "device_id": "X3", "humidity": "damp" }),
        json!({ "device_id": "N1", "temperature": "NaN" }),
        json!({ "device_id": "N1", "humidity": "inf" }),
        json!({ "device_id": "N1", "light": "-inf" }),
    ];

    for body in bodies {
        let resp = test::call_service(&app, ingest_request(body.clone()).to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "body {}", body);
        let error: Value = test::read_body_json(resp).await;
        assert_eq!(error["error_type"], json!("invalid_input"));
    }

    assert_eq!(common::count_rows(&pool, "sensor_data").await, 0);
}

#[actix_web::test]
async fn non_numeric_or_negative_limit_is_invalid() {
    let (_dir, pool) = common::test_pool().await;
    let app = test::init_service(App::new().configure(|cfg| configure_app(cfg, &pool))).await;

    for uri in ["/api/sensor-data?limit=lots", "/api/sensor-data?limit=-1"] {
        let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "uri {}", uri);
    }
}
