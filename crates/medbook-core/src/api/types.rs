//! Request and response shapes of the booking API.
//!
//! Every response field the server may omit is an `Option`, with display
//! fallbacks defined here instead of at each call site.

use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Placeholder shown for missing dates, times and names.
pub const MISSING: &str = "N/A";

/// Resource identifier as sent by the server.
///
/// The API emits numeric primary keys while persisted sessions store them as
/// strings; both decode into the same value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id(String);

impl Id {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Id {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<u64> for Id {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl Serialize for Id {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0.parse::<u64>() {
            Ok(number) => serializer.serialize_u64(number),
            Err(_) => serializer.serialize_str(&self.0),
        }
    }
}

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct IdVisitor;

        impl Visitor<'_> for IdVisitor {
            type Value = Id;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a string or integer identifier")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Id, E> {
                let trimmed = value.trim();
                if trimmed.is_empty() {
                    return Err(E::custom("identifier must not be empty"));
                }
                Ok(Id(trimmed.to_string()))
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<Id, E> {
                Ok(Id(value.to_string()))
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<Id, E> {
                Ok(Id(value.to_string()))
            }
        }

        deserializer.deserialize_any(IdVisitor)
    }
}

/// User role as reported by the login endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Patient,
    Doctor,
    Admin,
}

impl Role {
    /// Returns the wire string (`PATIENT`, `DOCTOR`, `ADMIN`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Patient => "PATIENT",
            Role::Doctor => "DOCTOR",
            Role::Admin => "ADMIN",
        }
    }

    /// Parses a wire role, case-insensitively.
    pub fn from_wire(value: &str) -> Option<Role> {
        match value.trim().to_ascii_uppercase().as_str() {
            "PATIENT" => Some(Role::Patient),
            "DOCTOR" => Some(Role::Doctor),
            "ADMIN" => Some(Role::Admin),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::Patient => "Patient",
            Role::Doctor => "Doctor",
            Role::Admin => "Admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Credentials posted to any of the login endpoints.
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Authentication payload returned by the login endpoints.
///
/// Every field is optional on the wire; the session store decides which
/// omissions are fatal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub access: Option<String>,
    #[serde(default)]
    pub refresh: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub user_id: Option<Id>,
    #[serde(default)]
    pub patient_id: Option<Id>,
    #[serde(default)]
    pub doctor_id: Option<Id>,
}

/// Body of `POST patient/register`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterPatient {
    pub full_name: String,
    pub age: u32,
    pub gender: String,
    pub phone: String,
    pub email: String,
    pub password: String,
    pub medical_history: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Doctor {
    pub id: Id,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub specialization: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl Doctor {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(MISSING)
    }

    pub fn display_specialization(&self) -> &str {
        self.specialization.as_deref().unwrap_or(MISSING)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Slot {
    pub id: Id,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
}

impl Slot {
    pub fn display_date(&self) -> &str {
        self.date.as_deref().unwrap_or(MISSING)
    }

    /// `start - end`, with `N/A` for whichever side is missing.
    pub fn display_range(&self) -> String {
        format_range(self.start_time.as_deref(), self.end_time.as_deref())
    }
}

/// Body of `POST slots/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewSlot {
    pub date: String,
    pub start_time: String,
    pub end_time: String,
}

/// Body of `POST appointments/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookAppointment {
    pub slot_id: Id,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AppointmentStatus {
    Pending,
    Approved,
    Rejected,
    #[serde(other)]
    Unknown,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "PENDING",
            AppointmentStatus::Approved => "APPROVED",
            AppointmentStatus::Rejected => "REJECTED",
            AppointmentStatus::Unknown => "UNKNOWN",
        }
    }
}

/// Slot summary nested in an appointment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AppointmentSlot {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
}

/// Doctor summary nested in an appointment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DoctorRef {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Appointment {
    #[serde(default)]
    pub id: Option<Id>,
    #[serde(default)]
    pub slot: Option<AppointmentSlot>,
    #[serde(default)]
    pub doctor: Option<DoctorRef>,
    #[serde(default)]
    pub patient: Option<String>,
    #[serde(default)]
    pub status: Option<AppointmentStatus>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Appointment {
    pub fn status(&self) -> AppointmentStatus {
        self.status.unwrap_or(AppointmentStatus::Unknown)
    }

    pub fn is_pending(&self) -> bool {
        self.status() == AppointmentStatus::Pending
    }

    pub fn display_id(&self) -> &str {
        self.id.as_ref().map_or(MISSING, Id::as_str)
    }

    pub fn display_date(&self) -> &str {
        self.slot
            .as_ref()
            .and_then(|slot| slot.date.as_deref())
            .unwrap_or(MISSING)
    }

    pub fn display_time(&self) -> String {
        let slot = self.slot.as_ref();
        format_range(
            slot.and_then(|s| s.start_time.as_deref()),
            slot.and_then(|s| s.end_time.as_deref()),
        )
    }

    pub fn display_doctor(&self) -> &str {
        self.doctor
            .as_ref()
            .and_then(|doctor| doctor.name.as_deref())
            .unwrap_or(MISSING)
    }

    pub fn display_patient(&self) -> &str {
        self.patient.as_deref().unwrap_or(MISSING)
    }
}

/// Query filters for `GET appointments/`. Empty values are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppointmentFilter {
    pub doctor_id: Option<String>,
    pub status: Option<String>,
    pub date: Option<String>,
}

impl AppointmentFilter {
    /// Returns the non-empty filters as query pairs.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        [
            ("doctor_id", &self.doctor_id),
            ("status", &self.status),
            ("date", &self.date),
        ]
        .into_iter()
        .filter_map(|(key, value)| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(|v| (key, v.to_string()))
        })
        .collect()
    }
}

/// Body of `POST admin/doctors/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewDoctor {
    pub name: String,
    pub email: String,
    pub password: String,
    pub specialization: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Row of `GET admin/patients`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PatientRecord {
    pub id: Id,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub medical_history: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

fn format_range(start: Option<&str>, end: Option<&str>) -> String {
    format!("{} - {}", start.unwrap_or(MISSING), end.unwrap_or(MISSING))
}
