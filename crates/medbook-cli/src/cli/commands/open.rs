//! `medbook open <PATH>`: navigate by path, the way a browser would.

use anyhow::Result;
use medbook_core::api::types::Role;
use medbook_core::routes::Route;
use tracing::warn;

use super::{Client, admin, doctor, patient};
use crate::render;

pub async fn run(client: &Client, path: &str) -> Result<()> {
    let route = Route::parse(path).unwrap_or_else(|| {
        warn!(path, "unknown path, showing landing page");
        Route::Landing
    });

    match route {
        Route::Landing => {
            client.enter(Route::Landing)?;
            render::landing();
            Ok(())
        }
        Route::PatientLogin | Route::DoctorLogin | Route::AdminLogin => {
            let flag = match route {
                Route::DoctorLogin => "--doctor",
                Route::AdminLogin => "--admin",
                _ => "--patient",
            };
            client.enter(route.clone())?;
            render::heading(&route);
            println!("medbook login {flag} --email <EMAIL>   (password on stdin)");
            Ok(())
        }
        Route::PatientRegister => {
            client.enter(Route::PatientRegister)?;
            render::heading(&Route::PatientRegister);
            println!(
                "medbook register --full-name <NAME> --age <AGE> --gender <GENDER> \
                 --phone <PHONE> --email <EMAIL> [--medical-history <TEXT>]   (password on stdin)"
            );
            Ok(())
        }
        Route::PatientDashboard => dashboard(client, Role::Patient),
        Route::DoctorDashboard => dashboard(client, Role::Doctor),
        Route::AdminDashboard => dashboard(client, Role::Admin),
        Route::PatientDoctors => patient::doctors(client, None).await,
        Route::PatientDoctorDetail(id) => patient::doctor(client, &id).await,
        Route::PatientAppointments => patient::appointments(client).await,
        Route::DoctorSlots => doctor::slots(client).await,
        Route::DoctorAppointments => doctor::appointments(client).await,
        Route::AdminDoctors => admin::doctors(client).await,
        Route::AdminAppointments => admin::appointments(client, None, None, None).await,
        Route::AdminPatients => admin::patients(client).await,
    }
}

fn dashboard(client: &Client, role: Role) -> Result<()> {
    client.enter(Route::dashboard_for(role))?;
    render::dashboard(role);
    Ok(())
}
