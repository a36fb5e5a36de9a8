use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// Registered patient record as exchanged with clients and storage.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct Patient {
    pub id: Option<i64>,
    pub patient_name: String,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub phone_number: String,
    pub email: Option<String>,
    pub address: Option<String>,
    // Doctor (user account) the appointment is booked with.
    pub doctor_user_id: Option<i64>,
    // Appointment slot held by this patient; at most one patient per slot.
    pub slot_id: Option<i64>,
    pub appointment_date: Option<NaiveDate>,
}
