//! Insertable rows for the clinic tables.
//!
//! The statistics reader only selects tuples, so these exist for writers: seeding, imports and
//! tests. Dates are passed as text in the formats [`crate::dates::parse_date`] accepts.

use diesel::prelude::*;

use crate::schema::*;

/// A staff member. Doctors are workers with `accepts_appointments` set.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = workers)]
pub struct NewWorker<'a> {
    pub name: &'a str,
    pub surname: &'a str,
    /// Unique account login.
    pub login: &'a str,
    pub salary: f64,
    pub created_on: &'a str,
    pub accepts_appointments: bool,
}

/// A patient; `card_created_on` is the medical card's creation date.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = patients)]
pub struct NewPatient<'a> {
    pub name: &'a str,
    pub surname: &'a str,
    pub card_created_on: &'a str,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = appointments)]
pub struct NewAppointment<'a> {
    pub doctor_id: i32,
    pub patient_id: i32,
    pub date: &'a str,
    /// `None` until the appointment has a result.
    pub result_price: Option<f64>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = rooms)]
pub struct NewRoom<'a> {
    pub number: &'a str,
    /// Free-form room kind; the configured bed-room kind decides which rooms hold beds.
    pub kind: &'a str,
}

/// A hospital stay. Open while `end_date` is `None`.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = hospitalizations)]
pub struct NewHospitalization<'a> {
    pub patient_id: i32,
    pub room_id: i32,
    pub start_date: &'a str,
    pub end_date: Option<&'a str>,
    pub price: f64,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = additional_payments)]
pub struct NewAdditionalPayment<'a> {
    pub hospitalization_id: i32,
    pub paid_on: &'a str,
    pub amount: f64,
}
