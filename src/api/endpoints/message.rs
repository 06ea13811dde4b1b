//! Message endpoint.
//!
//! `POST /message` — body `{ "message": string, "userId"?: string }`,
//! response `{ "botReply": string }`.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::ApiContext;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRequest {
    pub message: String,
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub bot_reply: String,
}

/// `POST /message` — answer a patient message.
pub async fn send(
    State(ctx): State<ApiContext>,
    payload: Result<Json<MessageRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(req) = payload?;

    let outcome = ctx
        .core
        .handle_message(req.user_id.as_deref(), &req.message)?;

    Ok(Json(MessageResponse {
        bot_reply: outcome.reply,
    }))
}
