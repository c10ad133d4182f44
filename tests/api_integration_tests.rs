// API Integration Tests
//
// Purpose: Exercise every HTTP endpoint through the router
// Run with: cargo test --features api --test api_integration_tests

#[cfg(feature = "api")]
mod api_tests {
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use env_scorer::{create_router, AppState, ServerConfig};
    use serde_json::Value;
    use tower::ServiceExt; // for oneshot

    // Helper: Create test app with in-memory history
    fn create_test_app() -> axum::Router {
        let state = AppState::new(&ServerConfig::default()).expect("Failed to build state");
        create_router(state)
    }

    // Helper: Parse JSON response
    async fn json_response(response: axum::response::Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read response body");
        serde_json::from_slice(&body).expect("Failed to parse JSON")
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    // =========================================================================
    // Section 1: Health Check
    // =========================================================================

    #[tokio::test]
    async fn test_health_check() {
        let response = create_test_app().oneshot(get("/health")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body: Value = json_response(response).await;
        assert_eq!(body["status"], "healthy");
        assert!(body["timestamp"].is_string());
    }

    // =========================================================================
    // Section 2: Scoring
    // =========================================================================

    #[tokio::test]
    async fn test_score_optimal_reading() {
        let response = create_test_app()
            .oneshot(post_json(
                "/api/score",
                serde_json::json!({
                    "temperature": 22.0,
                    "humidity": 50.0,
                    "soil_ph": 6.5,
                    "light_intensity": 50000.0
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = json_response(response).await;
        assert_eq!(body["aggregate_score"], 1.0);
        assert_eq!(body["confidence"], 0.9);
        assert_eq!(body["per_factor_score"]["soil_ph"], 1.0);
        assert!(body["per_factor_score"].get("co2_level").is_none());
        assert_eq!(body["recommendations"].as_array().unwrap().len(), 0);
        assert_eq!(body["risk_factors"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_score_stressed_reading() {
        let response = create_test_app()
            .oneshot(post_json(
                "/api/score",
                serde_json::json!({
                    "temperature": 15.0,
                    "humidity": 80.0,
                    "soil_ph": 8.0,
                    "light_intensity": 90000.0
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = json_response(response).await;
        assert_eq!(body["risk_factors"].as_array().unwrap().len(), 4);
        assert_eq!(body["factors"][0]["status"], "critical");
    }

    #[tokio::test]
    async fn test_score_rejects_malformed_body() {
        let response = create_test_app()
            .oneshot(post_json("/api/score", serde_json::json!({ "temperature": 22.0 })))
            .await
            .unwrap();

        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn test_batch_evaluation() {
        let response = create_test_app()
            .oneshot(post_json(
                "/api/evaluate/batch",
                serde_json::json!([
                    { "temperature": 22.0, "humidity": 50.0, "soil_ph": 6.5, "light_intensity": 50000.0 },
                    { "temperature": 27.0, "humidity": 50.0, "soil_ph": 6.5, "light_intensity": 25000.0, "co2_level": 400.0 }
                ]),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = json_response(response).await;
        let results = body.as_array().unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0]["aggregate_score"], 1.0);
        assert_eq!(results[1]["per_factor_score"]["co2_level"], 1.0);
    }

    // =========================================================================
    // Section 3: History
    // =========================================================================

    #[tokio::test]
    async fn test_history_records_scores_only() {
        let app = create_test_app();
        let reading = serde_json::json!({
            "temperature": 22.0,
            "humidity": 50.0,
            "soil_ph": 6.5,
            "light_intensity": 50000.0
        });

        for _ in 0..3 {
            let response = app
                .clone()
                .oneshot(post_json("/api/score", reading.clone()))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        // Batch evaluation must not touch history
        let response = app
            .clone()
            .oneshot(post_json("/api/evaluate/batch", serde_json::json!([reading])))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app.oneshot(get("/api/history")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_response(response).await;
        assert_eq!(body["entries"].as_array().unwrap().len(), 3);
        assert_eq!(body["statistics"]["count"], 3);
        assert_eq!(body["statistics"]["mean"], 1.0);
    }

    #[tokio::test]
    async fn test_history_persisted_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        let config = ServerConfig {
            history_path: Some(path.clone()),
            ..ServerConfig::default()
        };
        let app = create_router(AppState::new(&config).unwrap());

        let response = app
            .oneshot(post_json(
                "/api/score",
                serde_json::json!({
                    "temperature": 20.0,
                    "humidity": 55.0,
                    "soil_ph": 6.8,
                    "light_intensity": 45000.0
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let saved: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(saved.as_array().unwrap().len(), 1);

        // A fresh state picks the saved history back up
        let restored = AppState::new(&config).unwrap();
        assert_eq!(restored.scorer.history().len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_scores_all_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        let config = ServerConfig {
            history_path: Some(path.clone()),
            ..ServerConfig::default()
        };
        let app = create_router(AppState::new(&config).unwrap());

        let requests: Vec<_> = (0..10)
            .map(|i| {
                let app = app.clone();
                let reading = serde_json::json!({
                    "temperature": 18.0 + i as f64,
                    "humidity": 50.0,
                    "soil_ph": 6.5,
                    "light_intensity": 50000.0
                });
                tokio::spawn(async move { app.oneshot(post_json("/api/score", reading)).await })
            })
            .collect();

        for request in requests {
            let response = request.await.unwrap().unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        // The last save to finish holds every score
        let saved: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(saved.as_array().unwrap().len(), 10);
        assert!(!dir.path().join("history.json.tmp").exists());

        let response = app.oneshot(get("/api/history")).await.unwrap();
        let body = json_response(response).await;
        assert_eq!(body["entries"], saved);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_batch_rejects_non_finite_without_history() {
        let app = create_test_app();

        // JSON has no NaN; an out-of-range number is the closest a client can send
        let body = r#"[{"temperature": 22.0, "humidity": 50.0, "soil_ph": 6.5, "light_intensity": 1e400}]"#;
        let request = Request::builder()
            .method("POST")
            .uri("/api/evaluate/batch")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert!(response.status().is_client_error());

        let response = app.oneshot(get("/api/history")).await.unwrap();
        let body = json_response(response).await;
        assert_eq!(body["entries"].as_array().unwrap().len(), 0);
    }

    // =========================================================================
    // Section 4: Reference Data
    // =========================================================================

    #[tokio::test]
    async fn test_limits_table() {
        let response = create_test_app().oneshot(get("/api/limits")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_response(response).await;
        let limits = body["limits"].as_array().unwrap();
        assert_eq!(limits.len(), 5);
        assert_eq!(limits[0]["factor"], "temperature");
        assert_eq!(limits[0]["critical"]["low"], 15.0);
    }
}
