use crate::domain::entities::Patient;
use crate::interface_adapters::handlers;
use crate::interface_adapters::protocol::ErrorResponse;
use axum::Json;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Patient registration and management API",
        description = "APIs for registering and managing patients"
    ),
    paths(
        handlers::create_patient,
        handlers::list_patients,
        handlers::get_patient,
        handlers::update_patient,
        handlers::delete_patient,
        handlers::find_by_phone_number,
        handlers::find_by_slot_id,
        handlers::find_by_doctor,
        handlers::find_by_doctor_and_date,
    ),
    components(schemas(Patient, ErrorResponse)),
    tags((name = "Patient Management", description = "APIs for managing patients"))
)]
pub struct ApiDoc;

// Handler serving the generated OpenAPI document.
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
