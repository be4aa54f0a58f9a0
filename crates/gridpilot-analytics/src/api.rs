//! ---
//! gp_section: "08-grid-analytics"
//! gp_subsection: "module"
//! gp_type: "source"
//! gp_scope: "code"
//! gp_description: "Feature-gated REST surface over the grid and weather tools."
//! gp_version: "v0.1.0"
//! gp_owner: "grid-analytics"
//! ---
use serde::Deserialize;

#[cfg(feature = "rest-api")]
pub use rest::router;

#[cfg(feature = "rest-api")]
mod rest {
    use axum::{
        extract::{Path, Query, State},
        http::StatusCode,
        routing::get,
        Json, Router,
    };
    use serde_json::Value;
    use std::sync::Arc;

    use crate::{
        envelope::format_response,
        source::{MarketDataSource, WeatherSource},
        tools::{GridTool, GridTools, ToolArgs, WeatherTools},
    };

    use super::TemperatureQuery;

    pub struct ApiState<S, W> {
        grid: GridTools<S>,
        weather: WeatherTools<W>,
    }

    /// Tool envelopes are returned with status 200 whether they carry a
    /// payload or an error; only an unknown tool name is a 404.
    pub fn router<S, W>(grid: GridTools<S>, weather: WeatherTools<W>) -> Router
    where
        S: MarketDataSource + Send + Sync + 'static,
        W: WeatherSource + Send + Sync + 'static,
    {
        Router::new()
            .route("/api/grid/:tool", get(grid_tool::<S, W>))
            .route("/api/weather/locations/:node", get(weather_locations::<S, W>))
            .route("/api/weather/temperature", get(temperature::<S, W>))
            .with_state(Arc::new(ApiState { grid, weather }))
    }

    async fn grid_tool<S, W>(
        State(state): State<Arc<ApiState<S, W>>>,
        Path(tool): Path<String>,
        Query(args): Query<ToolArgs>,
    ) -> Result<Json<Value>, StatusCode>
    where
        S: MarketDataSource + Send + Sync + 'static,
        W: WeatherSource + Send + Sync + 'static,
    {
        let tool: GridTool = tool.parse().map_err(|_| StatusCode::NOT_FOUND)?;
        Ok(Json(state.grid.dispatch(tool, &args)))
    }

    async fn weather_locations<S, W>(
        State(state): State<Arc<ApiState<S, W>>>,
        Path(node): Path<String>,
    ) -> Json<Value>
    where
        S: MarketDataSource + Send + Sync + 'static,
        W: WeatherSource + Send + Sync + 'static,
    {
        Json(format_response(&state.weather.weather_locations(&node)))
    }

    async fn temperature<S, W>(
        State(state): State<Arc<ApiState<S, W>>>,
        Query(query): Query<TemperatureQuery>,
    ) -> Json<Value>
    where
        S: MarketDataSource + Send + Sync + 'static,
        W: WeatherSource + Send + Sync + 'static,
    {
        Json(format_response(
            &state
                .weather
                .temperature_summary(&query.location, &query.date),
        ))
    }
}

#[derive(Debug, Clone, serde::Serialize, Deserialize)]
pub struct TemperatureQuery {
    pub location: String,
    pub date: String,
}

#[cfg(all(test, feature = "rest-api"))]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        Router,
    };
    use chrono::NaiveDate;
    use gridpilot_common::PolicyConfig;
    use serde_json::Value;
    use tower::util::ServiceExt;

    use super::*;
    use crate::{
        model::TemperatureReading,
        source::{InMemoryMarketData, InMemoryWeather},
        tools::{GridTools, WeatherTools},
    };

    fn app() -> Router {
        let day = NaiveDate::from_ymd_opt(2024, 7, 10).unwrap();
        let readings = [(6, 22.0), (12, 36.5), (18, 39.0)]
            .into_iter()
            .map(|(hour, temperature_c)| TemperatureReading {
                location: "Fresno, CA".to_owned(),
                time: day.and_hms_opt(hour, 0, 0).unwrap(),
                temperature_c,
            })
            .collect();
        router(
            GridTools::new(InMemoryMarketData::default(), PolicyConfig::default()),
            WeatherTools::new(InMemoryWeather { readings }),
        )
    }

    async fn get(uri: &str) -> (StatusCode, Option<Value>) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).ok())
    }

    #[tokio::test]
    async fn error_envelope_is_served_with_ok_status() {
        let (status, body) = get("/api/grid/net_demand?date=2024-05-01").await;
        assert_eq!(status, StatusCode::OK);
        let body = body.unwrap();
        assert_eq!(body["kind"], "no_data");
        assert_eq!(body["date"], "2024-05-01");
    }

    #[tokio::test]
    async fn unknown_tool_is_not_found() {
        let (status, _) = get("/api/grid/bogus").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn temperature_route_reads_query_string() {
        let (status, body) =
            get("/api/weather/temperature?location=Fresno,%20CA&date=2024-07-10").await;
        assert_eq!(status, StatusCode::OK);
        let body = body.unwrap();
        assert_eq!(body["max_temp"], 39.0);
        assert_eq!(body["noon_temp"], 36.5);
        assert_eq!(body["location"], "Fresno, CA");
    }

    #[tokio::test]
    async fn weather_locations_route_resolves_shorthand() {
        let (status, body) = get("/api/weather/locations/sp15").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.unwrap()["zone"], "SP15");
    }
}
