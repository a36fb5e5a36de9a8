use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::entities::Patient;
use crate::domain::errors::StoreError;
use crate::domain::ports::PatientRepository;

#[derive(Default)]
struct PatientTable {
    last_id: i64,
    rows: BTreeMap<i64, Patient>,
}

impl PatientTable {
    // Must run under the same guard as the write that follows it.
    fn claim_slot(&self, patient: &Patient, owner: Option<i64>) -> Result<(), StoreError> {
        let Some(slot_id) = patient.slot_id else {
            return Ok(());
        };
        let held_elsewhere = self
            .rows
            .values()
            .any(|row| row.slot_id == Some(slot_id) && row.id != owner);
        if held_elsewhere {
            return Err(StoreError::SlotTaken(slot_id));
        }
        Ok(())
    }
}

// In-memory patient store used when no database is configured.
#[derive(Clone, Default)]
pub struct InMemoryPatientRepository {
    table: Arc<Mutex<PatientTable>>,
}

impl InMemoryPatientRepository {
    pub fn new() -> Self {
        Self::default()
    }

    async fn select(&self, filter: impl Fn(&Patient) -> bool) -> Vec<Patient> {
        let table = self.table.lock().await;
        table.rows.values().filter(|p| filter(p)).cloned().collect()
    }
}

#[async_trait]
impl PatientRepository for InMemoryPatientRepository {
    async fn insert(&self, mut patient: Patient) -> Result<Patient, StoreError> {
        let mut table = self.table.lock().await;
        table.claim_slot(&patient, None)?;
        table.last_id += 1;
        let id = table.last_id;
        patient.id = Some(id);
        table.rows.insert(id, patient.clone());
        Ok(patient)
    }

    async fn find_all(&self) -> Result<Vec<Patient>, String> {
        Ok(self.select(|_| true).await)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Patient>, String> {
        let table = self.table.lock().await;
        Ok(table.rows.get(&id).cloned())
    }

    async fn replace(&self, id: i64, mut patient: Patient) -> Result<Option<Patient>, StoreError> {
        let mut table = self.table.lock().await;
        if !table.rows.contains_key(&id) {
            return Ok(None);
        }
        table.claim_slot(&patient, Some(id))?;
        let Some(row) = table.rows.get_mut(&id) else {
            return Ok(None);
        };
        patient.id = Some(id);
        *row = patient.clone();
        Ok(Some(patient))
    }

    async fn remove(&self, id: i64) -> Result<bool, String> {
        let mut table = self.table.lock().await;
        Ok(table.rows.remove(&id).is_some())
    }

    async fn find_by_phone_number(&self, phone_number: &str) -> Result<Vec<Patient>, String> {
        Ok(self.select(|p| p.phone_number == phone_number).await)
    }

    async fn find_by_slot_id(&self, slot_id: i64) -> Result<Option<Patient>, String> {
        Ok(self
            .select(|p| p.slot_id == Some(slot_id))
            .await
            .into_iter()
            .next())
    }

    async fn find_by_doctor_user_id(&self, user_id: i64) -> Result<Vec<Patient>, String> {
        Ok(self.select(|p| p.doctor_user_id == Some(user_id)).await)
    }

    async fn find_by_doctor_user_id_and_date(
        &self,
        user_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<Patient>, String> {
        Ok(self
            .select(|p| p.doctor_user_id == Some(user_id) && p.appointment_date == Some(date))
            .await)
    }
}

// Row shape of the `patients` table.
#[derive(sqlx::FromRow)]
struct PatientRow {
    id: i64,
    patient_name: String,
    age: Option<i32>,
    gender: Option<String>,
    phone_number: String,
    email: Option<String>,
    address: Option<String>,
    doctor_user_id: Option<i64>,
    slot_id: Option<i64>,
    appointment_date: Option<NaiveDate>,
}

impl From<PatientRow> for Patient {
    fn from(row: PatientRow) -> Self {
        Patient {
            id: Some(row.id),
            patient_name: row.patient_name,
            age: row.age,
            gender: row.gender,
            phone_number: row.phone_number,
            email: row.email,
            address: row.address,
            doctor_user_id: row.doctor_user_id,
            slot_id: row.slot_id,
            appointment_date: row.appointment_date,
        }
    }
}

fn into_patients(rows: Vec<PatientRow>) -> Vec<Patient> {
    rows.into_iter().map(Patient::from).collect()
}

// The partial unique index on slot_id is what serializes concurrent bookings.
fn write_error(err: sqlx::Error, slot_id: Option<i64>) -> StoreError {
    match (&err, slot_id) {
        (sqlx::Error::Database(db_err), Some(slot_id)) if db_err.is_unique_violation() => {
            StoreError::SlotTaken(slot_id)
        }
        _ => StoreError::Failure(err.to_string()),
    }
}

// PostgreSQL-backed patient store.
#[derive(Clone)]
pub struct PostgresPatientRepository {
    pub db: PgPool,
}

#[async_trait]
impl PatientRepository for PostgresPatientRepository {
    async fn insert(&self, patient: Patient) -> Result<Patient, StoreError> {
        let slot_id = patient.slot_id;
        let row = sqlx::query_as::<_, PatientRow>(
            r#"
            INSERT INTO patients (
                patient_name, age, gender, phone_number, email, address,
                doctor_user_id, slot_id, appointment_date
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, patient_name, age, gender, phone_number, email, address,
                      doctor_user_id, slot_id, appointment_date
            "#,
        )
        .bind(patient.patient_name)
        .bind(patient.age)
        .bind(patient.gender)
        .bind(patient.phone_number)
        .bind(patient.email)
        .bind(patient.address)
        .bind(patient.doctor_user_id)
        .bind(patient.slot_id)
        .bind(patient.appointment_date)
        .fetch_one(&self.db)
        .await
        .map_err(|e| write_error(e, slot_id))?;

        Ok(row.into())
    }

    async fn find_all(&self) -> Result<Vec<Patient>, String> {
        sqlx::query_as::<_, PatientRow>(
            r#"
            SELECT id, patient_name, age, gender, phone_number, email, address,
                   doctor_user_id, slot_id, appointment_date
            FROM patients
            ORDER BY id
            "#,
        )
        .fetch_all(&self.db)
        .await
        .map(into_patients)
        .map_err(|e| e.to_string())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Patient>, String> {
        sqlx::query_as::<_, PatientRow>(
            r#"
            SELECT id, patient_name, age, gender, phone_number, email, address,
                   doctor_user_id, slot_id, appointment_date
            FROM patients
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .map(|row| row.map(Patient::from))
        .map_err(|e| e.to_string())
    }

    async fn replace(&self, id: i64, patient: Patient) -> Result<Option<Patient>, StoreError> {
        let slot_id = patient.slot_id;
        sqlx::query_as::<_, PatientRow>(
            r#"
            UPDATE patients SET
                patient_name = $2,
                age = $3,
                gender = $4,
                phone_number = $5,
                email = $6,
                address = $7,
                doctor_user_id = $8,
                slot_id = $9,
                appointment_date = $10
            WHERE id = $1
            RETURNING id, patient_name, age, gender, phone_number, email, address,
                      doctor_user_id, slot_id, appointment_date
            "#,
        )
        .bind(id)
        .bind(patient.patient_name)
        .bind(patient.age)
        .bind(patient.gender)
        .bind(patient.phone_number)
        .bind(patient.email)
        .bind(patient.address)
        .bind(patient.doctor_user_id)
        .bind(patient.slot_id)
        .bind(patient.appointment_date)
        .fetch_optional(&self.db)
        .await
        .map(|row| row.map(Patient::from))
        .map_err(|e| write_error(e, slot_id))
    }

    async fn remove(&self, id: i64) -> Result<bool, String> {
        let result = sqlx::query("DELETE FROM patients WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .map_err(|e| e.to_string())?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_by_phone_number(&self, phone_number: &str) -> Result<Vec<Patient>, String> {
        sqlx::query_as::<_, PatientRow>(
            r#"
            SELECT id, patient_name, age, gender, phone_number, email, address,
                   doctor_user_id, slot_id, appointment_date
            FROM patients
            WHERE phone_number = $1
            ORDER BY id
            "#,
        )
        .bind(phone_number)
        .fetch_all(&self.db)
        .await
        .map(into_patients)
        .map_err(|e| e.to_string())
    }

    async fn find_by_slot_id(&self, slot_id: i64) -> Result<Option<Patient>, String> {
        sqlx::query_as::<_, PatientRow>(
            r#"
            SELECT id, patient_name, age, gender, phone_number, email, address,
                   doctor_user_id, slot_id, appointment_date
            FROM patients
            WHERE slot_id = $1
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(slot_id)
        .fetch_optional(&self.db)
        .await
        .map(|row| row.map(Patient::from))
        .map_err(|e| e.to_string())
    }

    async fn find_by_doctor_user_id(&self, user_id: i64) -> Result<Vec<Patient>, String> {
        sqlx::query_as::<_, PatientRow>(
            r#"
            SELECT id, patient_name, age, gender, phone_number, email, address,
                   doctor_user_id, slot_id, appointment_date
            FROM patients
            WHERE doctor_user_id = $1
            ORDER BY id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await
        .map(into_patients)
        .map_err(|e| e.to_string())
    }

    async fn find_by_doctor_user_id_and_date(
        &self,
        user_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<Patient>, String> {
        sqlx::query_as::<_, PatientRow>(
            r#"
            SELECT id, patient_name, age, gender, phone_number, email, address,
                   doctor_user_id, slot_id, appointment_date
            FROM patients
            WHERE doctor_user_id = $1 AND appointment_date = $2
            ORDER BY id
            "#,
        )
        .bind(user_id)
        .bind(date)
        .fetch_all(&self.db)
        .await
        .map(into_patients)
        .map_err(|e| e.to_string())
    }
}
