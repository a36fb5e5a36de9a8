use crate::domain::ports::PatientService;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    // Any PatientService implementation can be injected here.
    pub patients: Arc<dyn PatientService>,
}
