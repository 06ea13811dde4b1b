//! Appointment endpoint.
//!
//! `GET /appointments` — every appointment booked since startup, in
//! creation order.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::appointment::AppointmentRecord;

#[derive(Serialize)]
pub struct AppointmentsResponse {
    pub appointments: Vec<AppointmentRecord>,
}

/// `GET /appointments` — list appointments.
pub async fn list(
    State(ctx): State<ApiContext>,
) -> Result<Json<AppointmentsResponse>, ApiError> {
    let appointments = ctx.core.appointments()?;
    Ok(Json(AppointmentsResponse { appointments }))
}
