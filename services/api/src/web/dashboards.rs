//! services/api/src/web/dashboards.rs
//!
//! Simulated metrics behind the traffic, waste and energy dashboards.

use axum::{
    extract::Query,
    http::StatusCode,
    response::Json,
    Extension,
};
use smart_city_core::{
    metrics::{self, City},
    View,
};

use crate::web::{
    middleware::require_view,
    protocol::{CityQuery, EnergyResponse, TrafficResponse, WasteResponse},
    state::SessionContext,
};

fn resolve_city(query: &CityQuery) -> Result<City, (StatusCode, String)> {
    match query.city.as_deref() {
        None => Ok(City::NewDelhi),
        Some(name) => name
            .parse::<City>()
            .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string())),
    }
}

#[utoipa::path(
    get,
    path = "/dashboards/traffic",
    responses(
        (status = 200, description = "Simulated traffic data", body = TrafficResponse),
        (status = 400, description = "Unknown city")
    ),
    params(
        CityQuery,
        ("x-session-id" = String, Header, description = "The session ID returned by POST /sessions.")
    )
)]
pub async fn traffic_handler(
    Extension(ctx): Extension<SessionContext>,
    Query(query): Query<CityQuery>,
) -> Result<Json<TrafficResponse>, (StatusCode, String)> {
    require_view(&ctx, View::TrafficAnalysis)?;
    let city = resolve_city(&query)?;
    Ok(Json(TrafficResponse::new(city, &metrics::traffic(city))))
}

#[utoipa::path(
    get,
    path = "/dashboards/waste",
    responses(
        (status = 200, description = "Simulated waste management figures", body = WasteResponse),
        (status = 400, description = "Unknown city")
    ),
    params(
        CityQuery,
        ("x-session-id" = String, Header, description = "The session ID returned by POST /sessions.")
    )
)]
pub async fn waste_handler(
    Extension(ctx): Extension<SessionContext>,
    Query(query): Query<CityQuery>,
) -> Result<Json<WasteResponse>, (StatusCode, String)> {
    require_view(&ctx, View::WasteManagement)?;
    let city = resolve_city(&query)?;
    Ok(Json(WasteResponse::new(city, &metrics::waste(city))))
}

#[utoipa::path(
    get,
    path = "/dashboards/energy",
    responses(
        (status = 200, description = "Simulated hourly energy consumption", body = EnergyResponse),
        (status = 400, description = "Unknown city")
    ),
    params(
        CityQuery,
        ("x-session-id" = String, Header, description = "The session ID returned by POST /sessions.")
    )
)]
pub async fn energy_handler(
    Extension(ctx): Extension<SessionContext>,
    Query(query): Query<CityQuery>,
) -> Result<Json<EnergyResponse>, (StatusCode, String)> {
    require_view(&ctx, View::EnergyConsumption)?;
    let city = resolve_city(&query)?;
    Ok(Json(EnergyResponse::new(city, &metrics::energy(city))))
}
