//! Static screens: landing page and role dashboards.

use crate::api::types::Role;
use crate::routes::Route;

pub const LANDING_TITLE: &str = "Hospital Appointment Booking System";
pub const LANDING_SUBTITLE: &str = "Book and manage appointments between patients and doctors.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub label: &'static str,
    pub route: Route,
}

impl Link {
    fn new(label: &'static str, route: Route) -> Self {
        Self { label, route }
    }
}

/// Entry points shown on the landing page.
pub fn landing_links() -> Vec<Link> {
    vec![
        Link::new("Register as Patient", Route::PatientRegister),
        Link::new("Patient Login", Route::PatientLogin),
        Link::new("Doctor Login", Route::DoctorLogin),
        Link::new("Admin Login", Route::AdminLogin),
    ]
}

/// Sub-screens reachable from a role's dashboard.
pub fn dashboard_links(role: Role) -> Vec<Link> {
    match role {
        Role::Patient => vec![
            Link::new("Doctors", Route::PatientDoctors),
            Link::new("My Appointments", Route::PatientAppointments),
        ],
        Role::Doctor => vec![
            Link::new("My Slots", Route::DoctorSlots),
            Link::new("Appointments", Route::DoctorAppointments),
        ],
        Role::Admin => vec![
            Link::new("Manage Doctors", Route::AdminDoctors),
            Link::new("Appointments", Route::AdminAppointments),
            Link::new("Patients", Route::AdminPatients),
        ],
    }
}

pub fn dashboard_subtitle(role: Role) -> &'static str {
    match role {
        Role::Patient => "Browse doctors and manage your appointments.",
        Role::Doctor => "Manage your slots and review appointments.",
        Role::Admin => "Manage doctors and view appointments.",
    }
}
