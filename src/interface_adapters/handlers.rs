use crate::domain::entities::Patient;
use crate::interface_adapters::protocol::{ErrorResponse, PhoneNumberQuery};
use crate::interface_adapters::state::AppState;
use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::error;

pub type ErrorReply = (StatusCode, Json<ErrorResponse>);

/// Create a new patient
#[utoipa::path(
    post,
    path = "/api/patients/post",
    description = "Creates and saves a new patient record.",
    request_body = Patient,
    responses(
        (status = 201, description = "Patient created successfully", body = Patient),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Patient Management"
)]
pub async fn create_patient(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Patient>, JsonRejection>,
) -> Result<(StatusCode, Json<Patient>), ErrorReply> {
    let Json(patient) = payload.map_err(invalid_request)?;

    let saved = state.patients.save(patient).await.map_err(|err| {
        error!(error = %err, "error creating patient");
        error_reply(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to create patient",
            err.to_string(),
        )
    })?;

    Ok((StatusCode::CREATED, Json(saved)))
}

/// Get all patients
#[utoipa::path(
    get,
    path = "/api/patients",
    description = "Retrieves a list of all patients.",
    responses(
        (status = 200, description = "List of patients", body = Vec<Patient>),
        (status = 500, description = "Patients could not be loaded", body = ErrorResponse)
    ),
    tag = "Patient Management"
)]
pub async fn list_patients(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Patient>>, ErrorReply> {
    let patients = state.patients.get_all().await.map_err(|err| {
        error!(error = %err, "error listing patients");
        load_failure(err)
    })?;

    Ok(Json(patients))
}

/// Get a patient by ID
#[utoipa::path(
    get,
    path = "/api/patients/{id}",
    description = "Retrieves a patient using their ID.",
    params(("id" = i64, Path, description = "Patient ID")),
    responses(
        (status = 200, description = "Patient found", body = Patient),
        (status = 404, description = "Patient not found", body = ErrorResponse)
    ),
    tag = "Patient Management"
)]
pub async fn get_patient(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Patient>, ErrorReply> {
    let Path(id) = id.map_err(invalid_request)?;

    let patient = state.patients.get_by_id(id).await.map_err(|err| {
        error!(patient_id = id, error = %err, "patient not found");
        error_reply(StatusCode::NOT_FOUND, "Patient not found", err.to_string())
    })?;

    Ok(Json(patient))
}

/// Update a patient
#[utoipa::path(
    put,
    path = "/api/patients/{id}",
    description = "Updates an existing patient record.",
    params(("id" = i64, Path, description = "Patient ID")),
    request_body = Patient,
    responses(
        (status = 200, description = "Patient updated successfully", body = Patient),
        (status = 404, description = "Patient not found", body = ErrorResponse)
    ),
    tag = "Patient Management"
)]
pub async fn update_patient(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<Patient>, JsonRejection>,
) -> Result<Json<Patient>, ErrorReply> {
    let Path(id) = id.map_err(invalid_request)?;
    let Json(patient) = payload.map_err(invalid_request)?;

    let updated = state.patients.update(id, patient).await.map_err(|err| {
        error!(patient_id = id, error = %err, "error updating patient");
        error_reply(
            StatusCode::NOT_FOUND,
            "Failed to update patient",
            err.to_string(),
        )
    })?;

    Ok(Json(updated))
}

/// Delete a patient
#[utoipa::path(
    delete,
    path = "/api/patients/{id}",
    description = "Deletes a patient using their ID.",
    params(("id" = i64, Path, description = "Patient ID")),
    responses(
        (status = 204, description = "Patient deleted successfully"),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Patient Management"
)]
pub async fn delete_patient(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ErrorReply> {
    let Path(id) = id.map_err(invalid_request)?;

    state.patients.delete(id).await.map_err(|err| {
        error!(patient_id = id, error = %err, "error deleting patient");
        error_reply(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to delete patient",
            err.to_string(),
        )
    })?;

    Ok(StatusCode::NO_CONTENT)
}

/// Get patients by phone number
#[utoipa::path(
    get,
    path = "/api/patients/search1",
    description = "Retrieves patients using their phone number.",
    params(("phoneNumber" = String, Query, description = "Mobile number of the patient(s)")),
    responses(
        (status = 200, description = "Patients found", body = Vec<Patient>),
        (status = 404, description = "No patients found", body = ErrorResponse)
    ),
    tag = "Patient Management"
)]
pub async fn find_by_phone_number(
    State(state): State<Arc<AppState>>,
    query: Result<Query<PhoneNumberQuery>, QueryRejection>,
) -> Result<Json<Vec<Patient>>, ErrorReply> {
    let Query(query) = query.map_err(invalid_request)?;

    let patients = state
        .patients
        .get_by_phone_number(&query.phone_number)
        .await
        .map_err(|err| {
            error!(error = %err, "error searching patients by phone number");
            load_failure(err)
        })?;

    non_empty(patients, "No patients found with this mobile number")
}

/// Get patient by slot ID
#[utoipa::path(
    get,
    path = "/api/patients/slot/{slot_id}",
    description = "Retrieves a patient using their slot ID.",
    params(("slot_id" = i64, Path, description = "Slot ID associated with the patient")),
    responses(
        (status = 200, description = "Patient found", body = Patient),
        (status = 404, description = "Patient not found")
    ),
    tag = "Patient Management"
)]
pub async fn find_by_slot_id(
    State(state): State<Arc<AppState>>,
    slot_id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Patient>, Response> {
    let Path(slot_id) = slot_id.map_err(|r| invalid_request(r).into_response())?;

    match state.patients.get_by_slot_id(slot_id).await {
        Ok(Some(patient)) => Ok(Json(patient)),
        Ok(None) => Err(StatusCode::NOT_FOUND.into_response()),
        Err(err) => {
            error!(slot_id, error = %err, "error looking up patient by slot");
            Err(load_failure(err).into_response())
        }
    }
}

/// Get patients by doctor ID
#[utoipa::path(
    get,
    path = "/api/patients/doctor/{user_id}",
    description = "Retrieves patients associated with a doctor by their user ID.",
    params(("user_id" = i64, Path, description = "Doctor's user ID")),
    responses(
        (status = 200, description = "Patients found", body = Vec<Patient>),
        (status = 404, description = "No patients found", body = ErrorResponse)
    ),
    tag = "Patient Management"
)]
pub async fn find_by_doctor(
    State(state): State<Arc<AppState>>,
    user_id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Vec<Patient>>, ErrorReply> {
    let Path(user_id) = user_id.map_err(invalid_request)?;

    let patients = state
        .patients
        .get_by_doctor_user_id(user_id)
        .await
        .map_err(|err| {
            error!(user_id, error = %err, "error looking up patients by doctor");
            load_failure(err)
        })?;

    non_empty(patients, "No patients found for this doctor")
}

/// Get patients by doctor ID and date
///
/// Both a bad date and a failed lookup are reported as 400.
#[utoipa::path(
    get,
    path = "/api/patients/doctor/{user_id}/date/{date}",
    description = "Retrieves patients associated with a doctor by their user ID and date.",
    params(
        ("user_id" = i64, Path, description = "Doctor's user ID"),
        ("date" = String, Path, description = "Appointment date in ISO format (YYYY-MM-DD)")
    ),
    responses(
        (status = 200, description = "Patients found", body = Vec<Patient>),
        (status = 400, description = "Invalid date format", body = ErrorResponse),
        (status = 404, description = "No patients found", body = ErrorResponse)
    ),
    tag = "Patient Management"
)]
pub async fn find_by_doctor_and_date(
    State(state): State<Arc<AppState>>,
    path: Result<Path<(i64, String)>, PathRejection>,
) -> Result<Json<Vec<Patient>>, ErrorReply> {
    let Path((user_id, date)) = path.map_err(invalid_request)?;

    let patients = patients_on_date(&state, user_id, &date)
        .await
        .map_err(|detail| {
            error!(user_id, date = %date, error = %detail, "error parsing date");
            error_reply(StatusCode::BAD_REQUEST, "Invalid date format", detail)
        })?;

    non_empty(patients, "No patients found for this doctor on this date")
}

async fn patients_on_date(
    state: &AppState,
    user_id: i64,
    raw_date: &str,
) -> Result<Vec<Patient>, String> {
    let date = parse_iso_date(raw_date)?;
    state
        .patients
        .get_by_doctor_user_id_and_date(user_id, date)
        .await
        .map_err(|err| err.to_string())
}

// Accepts a `YYYY-MM-DD` calendar date, ignoring surrounding whitespace.
fn parse_iso_date(raw: &str) -> Result<NaiveDate, String> {
    let value = raw.trim();
    // chrono tolerates unpadded fields; the wire format does not.
    if value.len() != 10 {
        return Err(format!("text '{value}' is not a YYYY-MM-DD date"));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| format!("text '{value}' could not be parsed: {e}"))
}

// Fallback for paths no route matches.
pub async fn route_not_found() -> ErrorReply {
    error_reply(StatusCode::NOT_FOUND, "Resource not found", "")
}

// Fallback for known paths called with an unsupported method.
pub async fn method_not_allowed() -> ErrorReply {
    error_reply(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed", "")
}

fn non_empty(patients: Vec<Patient>, message: &str) -> Result<Json<Vec<Patient>>, ErrorReply> {
    if patients.is_empty() {
        return Err(error_reply(StatusCode::NOT_FOUND, message, ""));
    }
    Ok(Json(patients))
}

// Helper to build a JSON error response.
fn error_reply(status: StatusCode, message: &str, detail: impl Into<String>) -> ErrorReply {
    (status, Json(ErrorResponse::new(status, message, detail)))
}

fn load_failure(err: impl ToString) -> ErrorReply {
    error_reply(
        StatusCode::INTERNAL_SERVER_ERROR,
        "Failed to load patients",
        err.to_string(),
    )
}

// Extractor rejections that can be reported through the error envelope.
trait RequestRejection {
    fn status(&self) -> StatusCode;
    fn body_text(&self) -> String;
}

macro_rules! impl_request_rejection {
    ($($rejection:ty),*) => {
        $(
            impl RequestRejection for $rejection {
                fn status(&self) -> StatusCode {
                    <$rejection>::status(self)
                }

                fn body_text(&self) -> String {
                    <$rejection>::body_text(self)
                }
            }
        )*
    };
}

impl_request_rejection!(JsonRejection, PathRejection, QueryRejection);

fn invalid_request(rejection: impl RequestRejection) -> ErrorReply {
    error_reply(rejection.status(), "Invalid request", rejection.body_text())
}
