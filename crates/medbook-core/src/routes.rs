//! Screen routes and the static route authorization table.

use std::fmt;

use crate::api::types::Role;

/// A screen the client can be on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    Landing,
    PatientLogin,
    PatientRegister,
    DoctorLogin,
    AdminLogin,
    PatientDashboard,
    PatientDoctors,
    PatientDoctorDetail(String),
    PatientAppointments,
    DoctorDashboard,
    DoctorSlots,
    DoctorAppointments,
    AdminDashboard,
    AdminDoctors,
    AdminAppointments,
    AdminPatients,
}

const PATIENT_ONLY: &[Role] = &[Role::Patient];
const DOCTOR_ONLY: &[Role] = &[Role::Doctor];
const ADMIN_ONLY: &[Role] = &[Role::Admin];

impl Route {
    /// Resolves a path to a route.
    ///
    /// Trailing slashes are ignored. Unknown paths resolve to `None`; callers
    /// treat that as the landing screen.
    pub fn parse(path: &str) -> Option<Route> {
        let trimmed = path.trim();
        let normalized = trimmed.trim_end_matches('/');
        let segments: Vec<&str> = normalized
            .trim_start_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        let route = match segments.as_slice() {
            [] => Route::Landing,
            ["patient", "login"] => Route::PatientLogin,
            ["patient", "register"] => Route::PatientRegister,
            ["doctor", "login"] => Route::DoctorLogin,
            ["admin", "login"] => Route::AdminLogin,
            ["patient", "dashboard"] => Route::PatientDashboard,
            ["patient", "doctors"] => Route::PatientDoctors,
            ["patient", "doctors", id] => Route::PatientDoctorDetail((*id).to_string()),
            ["patient", "appointments"] => Route::PatientAppointments,
            ["doctor", "dashboard"] => Route::DoctorDashboard,
            ["doctor", "slots"] => Route::DoctorSlots,
            ["doctor", "appointments"] => Route::DoctorAppointments,
            ["admin", "dashboard"] => Route::AdminDashboard,
            ["admin", "doctors"] => Route::AdminDoctors,
            ["admin", "appointments"] => Route::AdminAppointments,
            ["admin", "patients"] => Route::AdminPatients,
            _ => return None,
        };
        Some(route)
    }

    /// Canonical path of this route.
    pub fn path(&self) -> String {
        match self {
            Route::Landing => "/".to_string(),
            Route::PatientLogin => "/patient/login".to_string(),
            Route::PatientRegister => "/patient/register".to_string(),
            Route::DoctorLogin => "/doctor/login".to_string(),
            Route::AdminLogin => "/admin/login".to_string(),
            Route::PatientDashboard => "/patient/dashboard".to_string(),
            Route::PatientDoctors => "/patient/doctors".to_string(),
            Route::PatientDoctorDetail(id) => format!("/patient/doctors/{id}"),
            Route::PatientAppointments => "/patient/appointments".to_string(),
            Route::DoctorDashboard => "/doctor/dashboard".to_string(),
            Route::DoctorSlots => "/doctor/slots".to_string(),
            Route::DoctorAppointments => "/doctor/appointments".to_string(),
            Route::AdminDashboard => "/admin/dashboard".to_string(),
            Route::AdminDoctors => "/admin/doctors".to_string(),
            Route::AdminAppointments => "/admin/appointments".to_string(),
            Route::AdminPatients => "/admin/patients".to_string(),
        }
    }

    /// Roles permitted to render this route. Empty means public.
    pub fn required_roles(&self) -> &'static [Role] {
        match self {
            Route::Landing
            | Route::PatientLogin
            | Route::PatientRegister
            | Route::DoctorLogin
            | Route::AdminLogin => &[],
            Route::PatientDashboard
            | Route::PatientDoctors
            | Route::PatientDoctorDetail(_)
            | Route::PatientAppointments => PATIENT_ONLY,
            Route::DoctorDashboard | Route::DoctorSlots | Route::DoctorAppointments => {
                DOCTOR_ONLY
            }
            Route::AdminDashboard
            | Route::AdminDoctors
            | Route::AdminAppointments
            | Route::AdminPatients => ADMIN_ONLY,
        }
    }

    pub fn is_public(&self) -> bool {
        self.required_roles().is_empty()
    }

    /// Login and registration screens, where a 401 must not bounce the user.
    pub fn is_auth_screen(&self) -> bool {
        matches!(
            self,
            Route::PatientLogin | Route::PatientRegister | Route::DoctorLogin | Route::AdminLogin
        )
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Landing => "Hospital Booking",
            Route::PatientLogin => "Patient Login",
            Route::PatientRegister => "Patient Registration",
            Route::DoctorLogin => "Doctor Login",
            Route::AdminLogin => "Admin Login",
            Route::PatientDashboard => "Patient Dashboard",
            Route::PatientDoctors => "Doctors",
            Route::PatientDoctorDetail(_) => "Doctor Details",
            Route::PatientAppointments => "My Appointments",
            Route::DoctorDashboard => "Doctor Dashboard",
            Route::DoctorSlots => "My Slots",
            Route::DoctorAppointments => "Appointments",
            Route::AdminDashboard => "Admin Dashboard",
            Route::AdminDoctors => "Manage Doctors",
            Route::AdminAppointments => "Appointments Overview",
            Route::AdminPatients => "Patients",
        }
    }

    /// Home screen for a role.
    pub fn dashboard_for(role: Role) -> Route {
        match role {
            Role::Patient => Route::PatientDashboard,
            Role::Doctor => Route::DoctorDashboard,
            Role::Admin => Route::AdminDashboard,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
