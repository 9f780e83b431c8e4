//! CLI entry and dispatch.

use anyhow::{Context, Result};
use clap::Parser;
use medbook_core::api::types::Role;
use medbook_core::config::{self, API_BASE_URL_ENV};

use crate::logging;

mod commands;

#[derive(Parser)]
#[command(name = "medbook")]
#[command(version)]
#[command(about = "Hospital appointment booking client")]
struct Cli {
    /// API base URL (default: config `api_base_url`, then http://localhost:8000/api/)
    #[arg(long, global = true, value_name = "URL", env = API_BASE_URL_ENV)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    #[command(flatten)]
    Screen(ScreenCommands),

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

/// Commands that talk to the API.
#[derive(clap::Subcommand)]
enum ScreenCommands {
    /// Navigate to a screen by path (e.g. /doctor/slots)
    Open {
        #[arg(value_name = "PATH")]
        path: String,
    },

    /// Log in (password is read from stdin)
    Login {
        #[command(flatten)]
        role: RoleArgs,
        /// Account email
        #[arg(long)]
        email: String,
    },

    /// Log out and clear the saved session
    Logout,

    /// Show the current session
    Whoami,

    /// Register a patient account (password is read from stdin)
    Register {
        #[arg(long)]
        full_name: String,
        #[arg(long)]
        age: String,
        #[arg(long)]
        gender: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        medical_history: Option<String>,
    },

    /// Patient screens
    Patient {
        #[command(subcommand)]
        command: PatientCommands,
    },

    /// Doctor screens
    Doctor {
        #[command(subcommand)]
        command: DoctorCommands,
    },

    /// Admin screens
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },
}

#[derive(clap::Args, Debug, Clone, Copy)]
#[group(required = true, multiple = false)]
struct RoleArgs {
    /// Log in as a patient
    #[arg(long)]
    patient: bool,
    /// Log in as a doctor
    #[arg(long)]
    doctor: bool,
    /// Log in as an admin
    #[arg(long)]
    admin: bool,
}

impl RoleArgs {
    fn role(self) -> Role {
        if self.doctor {
            Role::Doctor
        } else if self.admin {
            Role::Admin
        } else {
            Role::Patient
        }
    }
}

#[derive(clap::Subcommand)]
enum PatientCommands {
    /// List doctors
    Doctors {
        /// Only doctors with this specialization
        #[arg(long)]
        specialization: Option<String>,
    },
    /// Show a doctor and their available slots
    Doctor {
        #[arg(value_name = "DOCTOR_ID")]
        id: String,
    },
    /// Request an appointment for a slot
    Book {
        #[arg(value_name = "DOCTOR_ID")]
        doctor_id: String,
        #[arg(value_name = "SLOT_ID")]
        slot_id: String,
    },
    /// List my appointments
    Appointments,
}

#[derive(clap::Subcommand)]
enum DoctorCommands {
    /// Manage my slots
    Slots {
        #[command(subcommand)]
        command: SlotCommands,
    },
    /// Review appointment requests
    Appointments {
        #[command(subcommand)]
        command: DecisionCommands,
    },
}

#[derive(clap::Subcommand)]
enum SlotCommands {
    /// List my slots
    List,
    /// Add a slot
    Add {
        /// Date (YYYY-MM-DD)
        #[arg(long)]
        date: String,
        /// Start time (HH:MM)
        #[arg(long)]
        start: String,
        /// End time (HH:MM)
        #[arg(long)]
        end: String,
    },
    /// Delete a slot
    Delete {
        #[arg(value_name = "SLOT_ID")]
        id: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[derive(clap::Subcommand)]
enum DecisionCommands {
    /// List appointments
    List,
    /// Approve a pending appointment
    Approve {
        #[arg(value_name = "APPOINTMENT_ID")]
        id: String,
    },
    /// Reject a pending appointment
    Reject {
        #[arg(value_name = "APPOINTMENT_ID")]
        id: String,
    },
}

#[derive(clap::Subcommand)]
enum AdminCommands {
    /// Manage doctors
    Doctors {
        #[command(subcommand)]
        command: AdminDoctorCommands,
    },
    /// Appointments overview
    Appointments {
        #[arg(long)]
        doctor_id: Option<String>,
        /// PENDING, APPROVED or REJECTED
        #[arg(long)]
        status: Option<String>,
        /// Date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
    },
    /// List patients
    Patients,
}

#[derive(clap::Subcommand)]
enum AdminDoctorCommands {
    /// List doctors
    List,
    /// Create a doctor account (password is read from stdin)
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        specialization: String,
        #[arg(long)]
        phone: Option<String>,
    },
    /// Delete a doctor
    Delete {
        #[arg(value_name = "DOCTOR_ID")]
        id: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
    /// Save the API base URL to the config file
    SetApiUrl {
        #[arg(value_name = "URL")]
        url: String,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let config = config::Config::load().context("load config")?;
    let _log_guard = logging::init(&config)?;

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;
    rt.block_on(async move { dispatch(cli, &config).await })
}

async fn dispatch(cli: Cli, config: &config::Config) -> Result<()> {
    let Cli { api_url, command } = cli;

    match command {
        // config commands must work even when the configured URL is broken
        Commands::Config { command } => run_config(command),
        Commands::Screen(command) => {
            let client = commands::Client::connect(config, api_url.as_deref())?;
            run_screen(&client, command).await
        }
    }
}

fn run_config(command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Path => {
            commands::config::path();
            Ok(())
        }
        ConfigCommands::Init => commands::config::init(),
        ConfigCommands::SetApiUrl { url } => commands::config::set_api_url(&url),
    }
}

async fn run_screen(client: &commands::Client, command: ScreenCommands) -> Result<()> {
    match command {
        ScreenCommands::Open { path } => commands::open::run(client, &path).await,
        ScreenCommands::Login { role, email } => {
            commands::auth::login(client, role.role(), &email).await
        }
        ScreenCommands::Logout => commands::auth::logout(client),
        ScreenCommands::Whoami => {
            commands::auth::whoami(client);
            Ok(())
        }
        ScreenCommands::Register {
            full_name,
            age,
            gender,
            phone,
            email,
            medical_history,
        } => {
            commands::auth::register(
                client,
                commands::auth::RegisterArgs {
                    full_name,
                    age,
                    gender,
                    phone,
                    email,
                    medical_history,
                },
            )
            .await
        }

        ScreenCommands::Patient { command } => match command {
            PatientCommands::Doctors { specialization } => {
                commands::patient::doctors(client, specialization.as_deref()).await
            }
            PatientCommands::Doctor { id } => commands::patient::doctor(client, &id).await,
            PatientCommands::Book { doctor_id, slot_id } => {
                commands::patient::book(client, &doctor_id, &slot_id).await
            }
            PatientCommands::Appointments => commands::patient::appointments(client).await,
        },

        ScreenCommands::Doctor { command } => match command {
            DoctorCommands::Slots { command } => match command {
                SlotCommands::List => commands::doctor::slots(client).await,
                SlotCommands::Add { date, start, end } => {
                    commands::doctor::add_slot(client, date, start, end).await
                }
                SlotCommands::Delete { id, yes } => {
                    commands::doctor::delete_slot(client, &id, yes).await
                }
            },
            DoctorCommands::Appointments { command } => match command {
                DecisionCommands::List => commands::doctor::appointments(client).await,
                DecisionCommands::Approve { id } => commands::doctor::approve(client, &id).await,
                DecisionCommands::Reject { id } => commands::doctor::reject(client, &id).await,
            },
        },

        ScreenCommands::Admin { command } => match command {
            AdminCommands::Doctors { command } => match command {
                AdminDoctorCommands::List => commands::admin::doctors(client).await,
                AdminDoctorCommands::Add {
                    name,
                    email,
                    specialization,
                    phone,
                } => {
                    commands::admin::add_doctor(client, name, email, specialization, phone)
                        .await
                }
                AdminDoctorCommands::Delete { id, yes } => {
                    commands::admin::delete_doctor(client, &id, yes).await
                }
            },
            AdminCommands::Appointments {
                doctor_id,
                status,
                date,
            } => commands::admin::appointments(client, doctor_id, status, date).await,
            AdminCommands::Patients => commands::admin::patients(client).await,
        },
    }
}
