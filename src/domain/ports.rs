use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::entities::Patient;
use crate::domain::errors::{PatientError, StoreError};

// Patient operations the HTTP layer depends on.
// Handlers hold this as a trait object so any implementation can be injected.
#[async_trait]
pub trait PatientService: Send + Sync {
    async fn save(&self, patient: Patient) -> Result<Patient, PatientError>;
    async fn get_all(&self) -> Result<Vec<Patient>, PatientError>;
    async fn get_by_id(&self, id: i64) -> Result<Patient, PatientError>;
    async fn update(&self, id: i64, patient: Patient) -> Result<Patient, PatientError>;
    async fn delete(&self, id: i64) -> Result<(), PatientError>;
    async fn get_by_phone_number(&self, phone_number: &str) -> Result<Vec<Patient>, PatientError>;
    async fn get_by_slot_id(&self, slot_id: i64) -> Result<Option<Patient>, PatientError>;
    async fn get_by_doctor_user_id(&self, user_id: i64) -> Result<Vec<Patient>, PatientError>;
    async fn get_by_doctor_user_id_and_date(
        &self,
        user_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<Patient>, PatientError>;
}

// Port for patient persistence used by the patient use cases.
// Every query returns rows ordered by id. Writes fail with `StoreError::SlotTaken`
// when another row already holds the slot; the check and the write are one step.
#[async_trait]
pub trait PatientRepository: Send + Sync {
    async fn insert(&self, patient: Patient) -> Result<Patient, StoreError>;
    async fn find_all(&self) -> Result<Vec<Patient>, String>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Patient>, String>;
    // Returns None when no row with `id` exists.
    async fn replace(&self, id: i64, patient: Patient) -> Result<Option<Patient>, StoreError>;
    async fn remove(&self, id: i64) -> Result<bool, String>;
    async fn find_by_phone_number(&self, phone_number: &str) -> Result<Vec<Patient>, String>;
    async fn find_by_slot_id(&self, slot_id: i64) -> Result<Option<Patient>, String>;
    async fn find_by_doctor_user_id(&self, user_id: i64) -> Result<Vec<Patient>, String>;
    async fn find_by_doctor_user_id_and_date(
        &self,
        user_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<Patient>, String>;
}
