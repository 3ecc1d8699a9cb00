// API Integration Tests
//
// Purpose: Exercise every HTTP route against stubbed providers
// Run with: cargo test --features api --test api_integration_tests

#[cfg(feature = "api")]
mod api_tests {
    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use crop_advisor_rust::environment::{StaticSoilTable, WeatherProvider, WeatherReading};
    use crop_advisor_rust::error::Result;
    use crop_advisor_rust::ranking::StaticPriceTable;
    use crop_advisor_rust::regions::Coordinates;
    use crop_advisor_rust::{create_router, AdvisorConfig, AnalysisError, AppState, Catalogs, CropAdvisor, Providers};
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt; // for oneshot

    struct StubWeather(Option<WeatherReading>);

    #[async_trait]
    impl WeatherProvider for StubWeather {
        async fn current_conditions(&self, _coordinates: Coordinates) -> Result<WeatherReading> {
            self.0
                .ok_or_else(|| AnalysisError::data_unavailable("weather", "OPENWEATHER_API_KEY is required"))
        }
    }

    // Helper: Router over the rule-based pipeline with fixed weather
    fn create_test_app(weather: Option<WeatherReading>, expose_error_details: bool) -> axum::Router {
        let providers = Providers {
            weather: Arc::new(StubWeather(weather)),
            soil: Arc::new(StaticSoilTable::builtin()),
            generator: None,
            market: Arc::new(StaticPriceTable::builtin()),
        };
        let advisor = CropAdvisor::new(&AdvisorConfig::default(), Catalogs::builtin(), providers);
        create_router(AppState::with_advisor(advisor, expose_error_details))
    }

    fn healthy_app() -> axum::Router {
        create_test_app(
            Some(WeatherReading { temperature_c: 28.0, humidity_pct: 70.0, rainfall_mm: 45.0 }),
            false,
        )
    }

    // Helper: Parse JSON response
    async fn json_response(response: axum::response::Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read response body");
        serde_json::from_slice(&body).expect("Failed to parse JSON")
    }

    fn post_analyze(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/analyze")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    // =========================================================================
    // Section 1: Health and service info
    // =========================================================================

    #[tokio::test]
    async fn test_health_check() {
        for uri in ["/health", "/api/health"] {
            let response = healthy_app().oneshot(get(uri)).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);

            let body = json_response(response).await;
            assert_eq!(body["status"], "healthy");
            assert!(body["timestamp"].is_string());
        }
    }

    #[tokio::test]
    async fn test_service_info() {
        let response = healthy_app().oneshot(get("/api/analyze")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_response(response).await;
        assert_eq!(body["status"], "online");
        assert_eq!(body["endpoints"]["analyze"]["method"], "POST");
        assert_eq!(body["stages"]["candidates"], "rule-based");
    }

    // =========================================================================
    // Section 2: Analysis
    // =========================================================================

    #[tokio::test]
    async fn test_analyze_success() {
        let response = healthy_app()
            .oneshot(post_analyze(r#"{"district": "Patna", "state": "Bihar", "acres": 5}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_response(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["district"], "Patna");
        assert_eq!(body["acres"], 5.0);
        assert_eq!(body["candidateSource"], "rule-based");
        assert_eq!(body["weatherData"]["temperature"], 28.0);
        assert_eq!(body["soilData"]["type"], "Alluvial Soil");
        assert!(body["analysisDate"].is_string());

        let recs = body["recommendations"].as_array().unwrap();
        assert_eq!(recs.len(), 3);
        // Candidates depend on the current season; ordering does not
        let profits: Vec<f64> = recs.iter().map(|r| r["expectedProfitPerAcre"].as_f64().unwrap()).collect();
        assert!(profits.windows(2).all(|w| w[0] >= w[1]));
        assert!(recs[0]["marketTrend"].is_string());
    }

    #[tokio::test]
    async fn test_analyze_validation_errors() {
        let cases = [
            (r#"{"district": "Patna", "state": "Bihar", "acres": 0}"#, "Acres must be greater than 0 and at most 1000"),
            (r#"{"district": "Patna", "state": "Bihar", "acres": 1500}"#, "Acres must be greater than 0 and at most 1000"),
            (r#"{"district": "", "state": "Bihar", "acres": 5}"#, "District and state are required"),
            (r#"{"district": "Patna", "acres": 5}"#, "District and state are required"),
        ];

        for (payload, message) in cases {
            let response = healthy_app().oneshot(post_analyze(payload)).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", payload);

            let body = json_response(response).await;
            assert_eq!(body["success"], false);
            assert_eq!(body["error"], message);
            assert!(body.get("details").is_none());
        }
    }

    #[tokio::test]
    async fn test_analyze_malformed_body() {
        let response = healthy_app().oneshot(post_analyze("not json")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = json_response(response).await;
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().starts_with("Invalid request body"));
    }

    #[tokio::test]
    async fn test_analyze_unknown_district() {
        let response = healthy_app()
            .oneshot(post_analyze(r#"{"district": "Atlantis", "state": "Bihar", "acres": 5}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = json_response(response).await;
        assert!(body["error"].as_str().unwrap().contains("District \"Atlantis\" not found"));
        assert!(body["recommendations"].is_null());
    }

    #[tokio::test]
    async fn test_weather_failure_details_only_when_exposed() {
        let payload = r#"{"district": "Patna", "state": "Bihar", "acres": 5}"#;

        let response = create_test_app(None, false).oneshot(post_analyze(payload)).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_response(response).await;
        assert!(body["error"].as_str().unwrap().contains("Failed to fetch weather data"));
        assert!(body.get("details").is_none());

        let response = create_test_app(None, true).oneshot(post_analyze(payload)).await.unwrap();
        let body = json_response(response).await;
        assert!(body["details"].as_str().unwrap().contains("CollectingEnvironment"));
    }

    // =========================================================================
    // Section 3: Location registry
    // =========================================================================

    #[tokio::test]
    async fn test_list_states() {
        let response = healthy_app().oneshot(get("/api/states")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_response(response).await;
        let states: Vec<&str> = body["states"]
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s.as_str().unwrap())
            .collect();
        assert!(states.contains(&"Bihar"));
        let mut sorted = states.clone();
        sorted.sort();
        assert_eq!(states, sorted);
    }

    #[tokio::test]
    async fn test_list_districts() {
        let response = healthy_app().oneshot(get("/api/states/bihar/districts")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_response(response).await;
        assert_eq!(body["state"], "Bihar");
        let districts = body["districts"].as_array().unwrap();
        assert!(districts.iter().any(|d| d["name"] == "Patna"));
        assert!(districts[0]["coordinates"]["lat"].is_number());
    }

    #[tokio::test]
    async fn test_list_districts_unknown_state() {
        let response = healthy_app().oneshot(get("/api/states/Atlantis/districts")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
