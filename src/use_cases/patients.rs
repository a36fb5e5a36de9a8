use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::entities::Patient;
use crate::domain::errors::PatientError;
use crate::domain::ports::{PatientRepository, PatientService};

// Patient service backed by an injected repository.
pub struct PatientUseCases<R> {
    pub repository: R,
}

impl<R> PatientUseCases<R>
where
    R: PatientRepository,
{
    pub fn new(repository: R) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<R> PatientService for PatientUseCases<R>
where
    R: PatientRepository,
{
    async fn save(&self, patient: Patient) -> Result<Patient, PatientError> {
        let mut patient = validate_patient(patient)?;
        // Ids are always assigned by storage.
        patient.id = None;

        // Storage rejects a slot held by another patient.
        self.repository
            .insert(patient)
            .await
            .map_err(PatientError::from)
    }

    async fn get_all(&self) -> Result<Vec<Patient>, PatientError> {
        self.repository
            .find_all()
            .await
            .map_err(PatientError::StorageFailure)
    }

    async fn get_by_id(&self, id: i64) -> Result<Patient, PatientError> {
        self.repository
            .find_by_id(id)
            .await
            .map_err(PatientError::StorageFailure)?
            .ok_or(PatientError::NotFound(id))
    }

    async fn update(&self, id: i64, patient: Patient) -> Result<Patient, PatientError> {
        let mut patient = validate_patient(patient)?;
        patient.id = Some(id);

        let exists = self
            .repository
            .find_by_id(id)
            .await
            .map_err(PatientError::StorageFailure)?
            .is_some();
        if !exists {
            return Err(PatientError::NotFound(id));
        }

        self.repository
            .replace(id, patient)
            .await?
            .ok_or(PatientError::NotFound(id))
    }

    async fn delete(&self, id: i64) -> Result<(), PatientError> {
        let removed = self
            .repository
            .remove(id)
            .await
            .map_err(PatientError::StorageFailure)?;

        if removed {
            Ok(())
        } else {
            Err(PatientError::NotFound(id))
        }
    }

    async fn get_by_phone_number(&self, phone_number: &str) -> Result<Vec<Patient>, PatientError> {
        self.repository
            .find_by_phone_number(phone_number)
            .await
            .map_err(PatientError::StorageFailure)
    }

    async fn get_by_slot_id(&self, slot_id: i64) -> Result<Option<Patient>, PatientError> {
        self.repository
            .find_by_slot_id(slot_id)
            .await
            .map_err(PatientError::StorageFailure)
    }

    async fn get_by_doctor_user_id(&self, user_id: i64) -> Result<Vec<Patient>, PatientError> {
        self.repository
            .find_by_doctor_user_id(user_id)
            .await
            .map_err(PatientError::StorageFailure)
    }

    async fn get_by_doctor_user_id_and_date(
        &self,
        user_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<Patient>, PatientError> {
        self.repository
            .find_by_doctor_user_id_and_date(user_id, date)
            .await
            .map_err(PatientError::StorageFailure)
    }
}

fn validate_patient(mut patient: Patient) -> Result<Patient, PatientError> {
    const MAX_AGE: i32 = 150;

    let name = patient.patient_name.trim();
    if name.is_empty() {
        return Err(PatientError::Invalid("patient name is required".to_string()));
    }
    patient.patient_name = name.to_string();

    patient.phone_number = validate_phone_number(&patient.phone_number)?;

    if patient.age.is_some_and(|age| !(0..=MAX_AGE).contains(&age)) {
        return Err(PatientError::Invalid(format!(
            "age must be between 0 and {MAX_AGE}"
        )));
    }

    Ok(patient)
}

fn validate_phone_number(value: &str) -> Result<String, PatientError> {
    const MIN_DIGITS: usize = 7;
    const MAX_DIGITS: usize = 15;

    let value = value.trim();
    if value.is_empty() {
        return Err(PatientError::Invalid("phone number is required".to_string()));
    }

    let digits = value.strip_prefix('+').unwrap_or(value);
    if !(MIN_DIGITS..=MAX_DIGITS).contains(&digits.len())
        || !digits.chars().all(|c| c.is_ascii_digit())
    {
        return Err(PatientError::Invalid(format!(
            "phone number must contain {MIN_DIGITS} to {MAX_DIGITS} digits"
        )));
    }

    Ok(value.to_string())
}
