use axum::http::StatusCode;
use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// Query string for the phone number search.
#[derive(Debug, Deserialize)]
pub struct PhoneNumberQuery {
    #[serde(rename = "phoneNumber")]
    pub phone_number: String,
}

// Error envelope returned with every non-2xx JSON response.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub timestamp: NaiveDateTime,
    pub status_code: u16,
    pub message: String,
    pub detail: String,
}

impl ErrorResponse {
    pub fn new(status: StatusCode, message: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now().naive_local(),
            status_code: status.as_u16(),
            message: message.into(),
            detail: detail.into(),
        }
    }
}
