use thiserror::Error;

// Domain-level errors for patient workflows.
#[derive(Debug, Error)]
pub enum PatientError {
    #[error("patient not found with id: {0}")]
    NotFound(i64),
    #[error("invalid patient: {0}")]
    Invalid(String),
    #[error("slot {0} is already booked by another patient")]
    SlotTaken(i64),
    #[error("storage error: {0}")]
    StorageFailure(String),
}

// Errors from repository writes that enforce slot ownership atomically.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("slot {0} is already booked by another patient")]
    SlotTaken(i64),
    #[error("{0}")]
    Failure(String),
}

impl From<StoreError> for PatientError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::SlotTaken(slot_id) => PatientError::SlotTaken(slot_id),
            StoreError::Failure(message) => PatientError::StorageFailure(message),
        }
    }
}
