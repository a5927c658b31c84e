//! HTTP front-end: `GET /weather` and `GET /health`.

use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use forecast_core::{ForecastError, ForecastService, Stage, WeatherQuery, WeatherReport};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, signal};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, error, info};

/// Raw query string. Every field is optional so that bad input reaches
/// validation instead of failing extraction.
#[derive(Debug, Default, Deserialize)]
pub struct WeatherParams {
    pub city: Option<String>,
    pub unit: Option<String>,
    pub days: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// A failed request as seen by an HTTP caller.
#[derive(Debug)]
pub struct ApiError(ForecastError);

impl From<ForecastError> for ApiError {
    fn from(err: ForecastError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        (status, Json(ErrorResponse { error: self.0.to_string() })).into_response()
    }
}

pub fn create_router(service: ForecastService) -> Router {
    Router::new()
        .route("/weather", get(weather))
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

async fn weather(
    State(service): State<ForecastService>,
    params: Result<Query<WeatherParams>, QueryRejection>,
) -> Result<Json<WeatherReport>, ApiError> {
    // Repeated keys fail extraction; answer them like any other bad input.
    let Query(params) = params.map_err(|e| {
        debug!(stage = %Stage::Validating, error = %e, "unreadable query string");
        ForecastError::invalid_input(format!("Invalid query parameters: {}", e.body_text()))
    })?;

    let query = WeatherQuery::parse(
        params.city.as_deref(),
        params.unit.as_deref(),
        params.days.as_deref(),
    )
    .inspect_err(|e| debug!(stage = %Stage::Validating, error = %e, "rejected query"))?;

    Ok(Json(service.report(&query).await?))
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

pub async fn serve(service: ForecastService, addr: &str) -> anyhow::Result<()> {
    let app = create_router(service);
    let listener = TcpListener::bind(addr).await?;

    info!("listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!("failed to install Ctrl+C handler: {e}");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeGenerator, FakeWeather};
    use axum_test::TestServer;
    use serde_json::Value;

    fn create_test_server(weather: &FakeWeather, generator: &FakeGenerator) -> TestServer {
        let service = ForecastService::new(weather.shared(), generator.shared());
        TestServer::new(create_router(service)).expect("Failed to create test server")
    }

    #[tokio::test]
    async fn seattle_end_to_end() {
        let weather = FakeWeather::ok();
        let generator = FakeGenerator::replying("Expect mild, rainy weather.");
        let server = create_test_server(&weather, &generator);

        let response = server
            .get("/weather")
            .add_query_param("city", "Seattle")
            .add_query_param("unit", "C")
            .add_query_param("days", "3")
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["summary"], "Expect mild, rainy weather.");
        assert_eq!(body["weather_data"]["forecast"].as_array().unwrap().len(), 3);
        assert_eq!(body["weather_data"]["current"]["temperature"], 11.0);
        assert_eq!(body["weather_data"]["forecast"][0]["date"], "2024-03-01");
        assert_eq!(generator.calls(), 1);
    }

    #[tokio::test]
    async fn fahrenheit_is_passed_through() {
        let weather = FakeWeather::ok();
        let generator = FakeGenerator::replying("Warm.");
        let server = create_test_server(&weather, &generator);

        let response = server
            .get("/weather")
            .add_query_param("city", "Seattle")
            .add_query_param("unit", "f")
            .add_query_param("days", "2")
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["weather_data"]["unit"], "F");
        assert_eq!(body["weather_data"]["current"]["temperature"], 51.8);
        assert_eq!(body["weather_data"]["forecast"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn absent_unit_and_days_take_defaults() {
        let weather = FakeWeather::ok();
        let generator = FakeGenerator::replying("Fine.");
        let server = create_test_server(&weather, &generator);

        let response = server.get("/weather").add_query_param("city", "Seattle").await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["weather_data"]["unit"], "C");
        assert_eq!(body["weather_data"]["forecast"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn invalid_input_is_400_without_network_calls() {
        let cases: &[&[(&str, &str)]] = &[
            &[("unit", "C"), ("days", "3")],
            &[("city", "   "), ("unit", "C"), ("days", "3")],
            &[("city", "Seattle"), ("unit", "K"), ("days", "3")],
            &[("city", "Seattle"), ("unit", "C"), ("days", "abc")],
            &[("city", "Seattle"), ("unit", "C"), ("days", "0")],
            &[("city", "Seattle"), ("unit", "C"), ("days", "11")],
            &[("city", "Seattle"), ("unit", "C"), ("days", "")],
            &[("city", "Seattle"), ("city", "Oslo"), ("days", "3")],
        ];

        for params in cases {
            let weather = FakeWeather::ok();
            let generator = FakeGenerator::replying("unused");
            let server = create_test_server(&weather, &generator);

            let mut request = server.get("/weather");
            for (k, v) in *params {
                request = request.add_query_param(k, v);
            }
            let response = request.await;

            response.assert_status_bad_request();
            let body: Value = response.json();
            assert!(body["error"].is_string(), "params {params:?}");
            assert_eq!(weather.calls(), 0, "params {params:?}");
            assert_eq!(generator.calls(), 0, "params {params:?}");
        }
    }

    #[tokio::test]
    async fn repeated_key_is_json_400() {
        let weather = FakeWeather::ok();
        let generator = FakeGenerator::replying("unused");
        let server = create_test_server(&weather, &generator);

        let response = server.get("/weather?city=Seattle&city=Oslo&days=3").await;

        response.assert_status_bad_request();
        let body: Value = response.json();
        let error = body["error"].as_str().unwrap();
        assert!(error.starts_with("Invalid query parameters"), "got: {error}");
        assert!(error.contains("city"), "got: {error}");
        assert_eq!(weather.calls(), 0);
    }

    #[tokio::test]
    async fn days_error_message() {
        let weather = FakeWeather::ok();
        let generator = FakeGenerator::replying("unused");
        let server = create_test_server(&weather, &generator);

        let response =
            server.get("/weather").add_query_param("city", "Oslo").add_query_param("days", "x").await;

        response.assert_status_bad_request();
        assert_eq!(
            response.json::<Value>(),
            serde_json::json!({ "error": "Days must be an integer between 1 and 10" })
        );
    }

    #[tokio::test]
    async fn provider_unavailable_is_500_and_skips_summary() {
        let weather = FakeWeather::failing(ForecastError::ProviderUnavailable(
            "Error fetching current weather data: weather provider responded with status 404 Not Found"
                .into(),
        ));
        let generator = FakeGenerator::replying("unused");
        let server = create_test_server(&weather, &generator);

        let response = server.get("/weather").add_query_param("city", "Atlantis").await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = response.json();
        assert!(body["error"].as_str().unwrap().contains("404"));
        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test]
    async fn data_missing_is_500() {
        let weather =
            FakeWeather::failing(ForecastError::ProviderDataMissing("No forecast data found".into()));
        let generator = FakeGenerator::replying("unused");
        let server = create_test_server(&weather, &generator);

        let response = server.get("/weather").add_query_param("city", "Nowhere").await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.json::<Value>(),
            serde_json::json!({ "error": "No forecast data found" })
        );
    }

    #[tokio::test]
    async fn summary_failure_returns_no_weather_data() {
        let weather = FakeWeather::ok();
        let generator = FakeGenerator::failing("Error generating AI summary: quota exceeded");
        let server = create_test_server(&weather, &generator);

        let response = server.get("/weather").add_query_param("city", "Seattle").await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = response.json();
        assert_eq!(body, serde_json::json!({ "error": "Error generating AI summary: quota exceeded" }));
        assert!(body.get("weather_data").is_none());
        assert_eq!(weather.calls(), 2);
    }

    #[tokio::test]
    async fn health_is_ok() {
        let server = create_test_server(&FakeWeather::ok(), &FakeGenerator::replying("-"));

        let response = server.get("/health").await;

        response.assert_status_ok();
        assert_eq!(response.json::<Value>(), serde_json::json!({ "status": "ok" }));
    }
}
