//! Plain-text rendering of screens.

use comfy_table::{ContentArrangement, Table};
use medbook_core::api::types::{Appointment, Doctor, MISSING, PatientRecord, Role, Slot};
use medbook_core::routes::Route;
use medbook_core::screens::landing::{self, Link};

fn table(header: &[&str], rows: impl IntoIterator<Item = Vec<String>>) -> String {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header);
    for row in rows {
        table.add_row(row);
    }
    table.to_string()
}

fn or_missing(value: Option<&str>) -> String {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(MISSING)
        .to_string()
}

fn links(links: &[Link]) {
    for link in links {
        println!("  {:<22} medbook open {}", link.label, link.route);
    }
}

pub fn landing() {
    println!("{}", landing::LANDING_TITLE);
    println!("{}", landing::LANDING_SUBTITLE);
    println!();
    links(&landing::landing_links());
}

pub fn dashboard(role: Role) {
    println!("{}", Route::dashboard_for(role).title());
    println!("{}", landing::dashboard_subtitle(role));
    println!();
    links(&landing::dashboard_links(role));
}

pub fn heading(route: &Route) {
    println!("{}", route.title());
    println!();
}

pub fn doctors(doctors: &[Doctor]) {
    if doctors.is_empty() {
        println!("No doctors found");
        return;
    }
    let rows = doctors.iter().map(|d| {
        vec![
            d.id.to_string(),
            d.display_name().to_string(),
            d.display_specialization().to_string(),
            or_missing(d.phone.as_deref()),
            or_missing(d.email.as_deref()),
        ]
    });
    println!(
        "{}",
        table(&["ID", "Name", "Specialization", "Phone", "Email"], rows)
    );
}

pub fn slots(slots: &[Slot], empty: &str) {
    if slots.is_empty() {
        println!("{empty}");
        return;
    }
    let rows = slots.iter().map(|s| {
        vec![
            s.id.to_string(),
            s.display_date().to_string(),
            s.display_range(),
        ]
    });
    println!("{}", table(&["ID", "Date", "Time"], rows));
}

/// Which party columns an appointment table shows.
#[derive(Debug, Clone, Copy)]
pub struct Columns {
    pub doctor: bool,
    pub patient: bool,
}

pub fn appointments(items: &[Appointment], columns: Columns) {
    if items.is_empty() {
        println!("No appointments found");
        return;
    }

    let mut header = vec!["ID", "Date", "Time"];
    if columns.doctor {
        header.push("Doctor");
    }
    if columns.patient {
        header.push("Patient");
    }
    header.push("Status");

    let rows = items.iter().map(|a| {
        let mut row = vec![
            a.display_id().to_string(),
            a.display_date().to_string(),
            a.display_time(),
        ];
        if columns.doctor {
            row.push(a.display_doctor().to_string());
        }
        if columns.patient {
            row.push(a.display_patient().to_string());
        }
        row.push(a.status().as_str().to_string());
        row
    });
    println!("{}", table(&header, rows));
}

pub fn doctor_detail(doctor: Option<&Doctor>, available: &[Slot]) {
    if let Some(doctor) = doctor {
        println!("{}", doctor.display_name());
        println!("Specialization: {}", doctor.display_specialization());
        println!("Phone: {}", or_missing(doctor.phone.as_deref()));
        println!("Email: {}", or_missing(doctor.email.as_deref()));
        println!();
    }
    println!("Available Slots");
    slots(available, "No available slots");
}

pub fn patients(items: &[PatientRecord]) {
    if items.is_empty() {
        println!("No patients found");
        return;
    }
    let rows = items.iter().map(|p| {
        vec![
            p.id.to_string(),
            or_missing(p.full_name.as_deref()),
            p.age.map_or_else(|| MISSING.to_string(), |age| age.to_string()),
            or_missing(p.gender.as_deref()),
            or_missing(p.phone.as_deref()),
            or_missing(p.email.as_deref()),
            or_missing(p.medical_history.as_deref()),
        ]
    });
    println!(
        "{}",
        table(
            &["ID", "Name", "Age", "Gender", "Phone", "Email", "Medical History"],
            rows
        )
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_contains_cells() {
        let out = table(&["ID", "Name"], vec![vec!["1".to_string(), "Grey".to_string()]]);
        assert!(out.contains("Name"));
        assert!(out.contains("Grey"));
    }

    #[test]
    fn test_or_missing_blank() {
        assert_eq!(or_missing(Some("  ")), MISSING);
        assert_eq!(or_missing(None), MISSING);
        assert_eq!(or_missing(Some("x")), "x");
    }
}
