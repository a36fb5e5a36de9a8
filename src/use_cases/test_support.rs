use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::entities::Patient;
use crate::domain::errors::StoreError;
use crate::domain::ports::PatientRepository;

pub(crate) fn patient(name: &str, phone_number: &str) -> Patient {
    Patient {
        patient_name: name.to_string(),
        phone_number: phone_number.to_string(),
        ..Default::default()
    }
}

#[derive(Clone, Copy, Default)]
pub(crate) struct FailureFlags {
    pub insert: bool,
    pub find: bool,
    pub replace: bool,
    pub remove: bool,
}

#[derive(Default)]
struct Table {
    next_id: i64,
    rows: BTreeMap<i64, Patient>,
}

impl Table {
    fn check_slot(&self, patient: &Patient, owner: Option<i64>) -> Result<(), StoreError> {
        let Some(slot_id) = patient.slot_id else {
            return Ok(());
        };
        let taken = self
            .rows
            .values()
            .any(|row| row.slot_id == Some(slot_id) && row.id != owner);
        if taken {
            return Err(StoreError::SlotTaken(slot_id));
        }
        Ok(())
    }
}

// Repository fake that lets tests inspect rows and inject storage failures.
#[derive(Clone)]
pub(crate) struct RecordingRepository {
    table: Arc<Mutex<Table>>,
    failures: FailureFlags,
}

impl RecordingRepository {
    pub(crate) fn new() -> Self {
        Self {
            table: Arc::new(Mutex::new(Table::default())),
            failures: FailureFlags::default(),
        }
    }

    pub(crate) fn with_failures(mut self, failures: FailureFlags) -> Self {
        self.failures = failures;
        self
    }

    pub(crate) fn stored(&self, id: i64) -> Option<Patient> {
        let guard = self.table.lock().expect("table mutex poisoned");
        guard.rows.get(&id).cloned()
    }

    pub(crate) fn holders_of_slot(&self, slot_id: i64) -> usize {
        let guard = self.table.lock().expect("table mutex poisoned");
        guard
            .rows
            .values()
            .filter(|row| row.slot_id == Some(slot_id))
            .count()
    }

    fn select(&self, filter: impl Fn(&Patient) -> bool) -> Result<Vec<Patient>, String> {
        if self.failures.find {
            return Err("find failed".to_string());
        }

        let guard = self.table.lock().expect("table mutex poisoned");
        Ok(guard.rows.values().filter(|p| filter(p)).cloned().collect())
    }
}

#[async_trait]
impl PatientRepository for RecordingRepository {
    async fn insert(&self, mut patient: Patient) -> Result<Patient, StoreError> {
        if self.failures.insert {
            return Err(StoreError::Failure("insert failed".to_string()));
        }

        let mut guard = self.table.lock().expect("table mutex poisoned");
        guard.check_slot(&patient, None)?;
        guard.next_id += 1;
        let id = guard.next_id;
        patient.id = Some(id);
        guard.rows.insert(id, patient.clone());
        Ok(patient)
    }

    async fn find_all(&self) -> Result<Vec<Patient>, String> {
        self.select(|_| true)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Patient>, String> {
        Ok(self.select(|p| p.id == Some(id))?.into_iter().next())
    }

    async fn replace(&self, id: i64, patient: Patient) -> Result<Option<Patient>, StoreError> {
        if self.failures.replace {
            return Err(StoreError::Failure("replace failed".to_string()));
        }

        let mut guard = self.table.lock().expect("table mutex poisoned");
        guard.check_slot(&patient, Some(id))?;
        match guard.rows.get_mut(&id) {
            Some(row) => {
                *row = patient;
                Ok(Some(row.clone()))
            }
            None => Ok(None),
        }
    }

    async fn remove(&self, id: i64) -> Result<bool, String> {
        if self.failures.remove {
            return Err("remove failed".to_string());
        }

        let mut guard = self.table.lock().expect("table mutex poisoned");
        Ok(guard.rows.remove(&id).is_some())
    }

    async fn find_by_phone_number(&self, phone_number: &str) -> Result<Vec<Patient>, String> {
        self.select(|p| p.phone_number == phone_number)
    }

    async fn find_by_slot_id(&self, slot_id: i64) -> Result<Option<Patient>, String> {
        Ok(self.select(|p| p.slot_id == Some(slot_id))?.into_iter().next())
    }

    async fn find_by_doctor_user_id(&self, user_id: i64) -> Result<Vec<Patient>, String> {
        self.select(|p| p.doctor_user_id == Some(user_id))
    }

    async fn find_by_doctor_user_id_and_date(
        &self,
        user_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<Patient>, String> {
        self.select(|p| p.doctor_user_id == Some(user_id) && p.appointment_date == Some(date))
    }
}
