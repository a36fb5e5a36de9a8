use crate::interface_adapters::handlers::{
    create_patient, delete_patient, find_by_doctor, find_by_doctor_and_date, find_by_phone_number,
    find_by_slot_id, get_patient, list_patients, method_not_allowed, route_not_found,
    update_patient,
};
use crate::interface_adapters::openapi::openapi_json;
use crate::interface_adapters::state::AppState;
use axum::{
    Router,
    http::{HeaderValue, Method},
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

pub fn app(state: Arc<AppState>, allowed_origin: HeaderValue) -> Router {
    // Wire the patient routes under /api/patients.
    Router::new()
        .route("/api/patients", get(list_patients))
        .route("/api/patients/", get(list_patients))
        .route("/api/patients/post", post(create_patient))
        .route("/api/patients/search1", get(find_by_phone_number))
        .route("/api/patients/slot/{slot_id}", get(find_by_slot_id))
        .route("/api/patients/doctor/{user_id}", get(find_by_doctor))
        .route(
            "/api/patients/doctor/{user_id}/date/{date}",
            get(find_by_doctor_and_date),
        )
        .route(
            "/api/patients/{id}",
            get(get_patient).put(update_patient).delete(delete_patient),
        )
        .route("/api-docs/openapi.json", get(openapi_json))
        .fallback(route_not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(cors_layer(allowed_origin))
        .with_state(state)
}

// Cross-origin access is granted to a single configured origin.
fn cors_layer(allowed_origin: HeaderValue) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(allowed_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any)
}
