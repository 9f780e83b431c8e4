//! Session command handlers: login, logout, whoami, register.

use anyhow::Result;
use medbook_core::api::types::{Id, MISSING, Role};
use medbook_core::routes::Route;
use medbook_core::screens::auth::{self, RegistrationForm};

use super::{Client, read_secret};
use crate::render;

pub async fn login(client: &Client, role: Role, email: &str) -> Result<()> {
    client.enter(auth::login_route(role))?;
    let password = read_secret("Password")?;

    let view = auth::login(client.gateway(), role, email, &password).await;
    client.finish(&view, |dashboard| {
        if let Some(route) = dashboard {
            println!();
            match client.session().snapshot().role() {
                Some(role) => render::dashboard(role),
                None => render::heading(route),
            }
        }
    })
}

pub fn logout(client: &Client) -> Result<()> {
    let was_active = client.session().snapshot().is_active();
    client.session().logout()?;
    if was_active {
        println!("Logged out.");
    } else {
        println!("Not logged in.");
    }
    Ok(())
}

pub fn whoami(client: &Client) {
    let session = client.session().snapshot();
    let (Some(role), Some(identity)) = (session.role(), session.identity()) else {
        println!("Not logged in.");
        return;
    };

    let show = |id: Option<&Id>| id.map_or(MISSING, Id::as_str).to_string();
    println!("Role: {}", role.label());
    println!("User ID: {}", identity.user_id);
    match role {
        Role::Patient => println!("Patient ID: {}", show(identity.patient_id.as_ref())),
        Role::Doctor => println!("Doctor ID: {}", show(identity.doctor_id.as_ref())),
        Role::Admin => {}
    }
    println!("Home: {}", Route::dashboard_for(role));
}

pub struct RegisterArgs {
    pub full_name: String,
    pub age: String,
    pub gender: String,
    pub phone: String,
    pub email: String,
    pub medical_history: Option<String>,
}

pub async fn register(client: &Client, args: RegisterArgs) -> Result<()> {
    client.enter(Route::PatientRegister)?;
    let password = read_secret("Password")?;

    let form = RegistrationForm {
        full_name: args.full_name,
        age: args.age,
        gender: args.gender,
        phone: args.phone,
        email: args.email,
        password,
        medical_history: args.medical_history,
    };
    let view = auth::register(client.gateway(), &form).await;
    client.finish(&view, |_| {
        println!("Next: medbook login --patient --email {}", form.email.trim());
    })
}
