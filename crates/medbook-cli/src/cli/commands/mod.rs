//! CLI command handlers.

pub mod admin;
pub mod auth;
pub mod config;
pub mod doctor;
pub mod open;
pub mod patient;

use std::io::{self, BufRead, IsTerminal, Write};

use anyhow::{Context, Result, bail};
use medbook_core::config::Config;
use medbook_core::gateway::{Gateway, SESSION_EXPIRED_MESSAGE};
use medbook_core::guard::{GuardDecision, RouteGuard};
use medbook_core::navigation::Navigator;
use medbook_core::routes::Route;
use medbook_core::screens::View;
use medbook_core::session::SessionStore;
use tracing::debug;

use crate::render;

/// Per-process wiring: restored session, navigator, guard and gateway.
pub struct Client {
    gateway: Gateway,
    guard: RouteGuard,
}

impl Client {
    pub fn connect(config: &Config, api_url: Option<&str>) -> Result<Self> {
        let base_url = config.resolve_api_base_url(api_url)?;
        debug!(%base_url, "using API");

        let session = SessionStore::file_backed();
        session.restore();
        let navigator = Navigator::default();

        let gateway = Gateway::new(
            base_url,
            config.request_timeout(),
            session.clone(),
            navigator.clone(),
        )?;
        let guard = RouteGuard::new(session, navigator);
        Ok(Self { gateway, guard })
    }

    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    pub fn session(&self) -> &SessionStore {
        self.gateway.session()
    }

    /// Enters `route` through the guard. A denied route renders the landing
    /// screen and fails.
    pub fn enter(&self, route: Route) -> Result<()> {
        match self.guard.enter(route.clone()) {
            GuardDecision::Render(_) => Ok(()),
            GuardDecision::Redirect(_) => {
                self.gateway.navigator().take_redirect();
                render::landing();
                let roles: Vec<&str> = route.required_roles().iter().map(|r| r.label()).collect();
                bail!(
                    "{} is restricted to {} accounts",
                    route.path(),
                    roles.join(" or ").to_lowercase()
                )
            }
        }
    }

    /// Renders a screen's outcome.
    ///
    /// If a request on this screen invalidated the session, the landing
    /// screen is shown instead and the command fails. A view with both a
    /// message and an error is a change that went through followed by a
    /// failed reload: both are printed and the command succeeds.
    pub fn finish<T>(&self, view: &View<T>, body: impl FnOnce(&T)) -> Result<()> {
        if self.gateway.navigator().take_redirect() {
            println!();
            render::landing();
            bail!(SESSION_EXPIRED_MESSAGE);
        }
        match (&view.message, &view.error) {
            (Some(message), Some(error)) => {
                println!("{message}");
                eprintln!("Error: {error}");
                Ok(())
            }
            (_, Some(error)) => bail!("{error}"),
            (message, None) => {
                if let Some(message) = message {
                    println!("{message}");
                }
                body(&view.data);
                Ok(())
            }
        }
    }
}

/// Reads one line of secret input from stdin.
///
/// Prompts on stderr only when stdin is a terminal.
pub fn read_secret(prompt: &str) -> Result<String> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        eprint!("{prompt}: ");
        io::stderr().flush()?;
    }
    let mut line = String::new();
    stdin
        .lock()
        .read_line(&mut line)
        .with_context(|| format!("read {} from stdin", prompt.to_lowercase()))?;
    let value = line.trim_end_matches(['\r', '\n']).to_string();
    if value.is_empty() {
        bail!("{prompt} cannot be empty");
    }
    Ok(value)
}

/// Asks a yes/no question; `assume_yes` skips the prompt.
pub fn confirm(prompt: &str, assume_yes: bool) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    print!("{prompt} [y/N] ");
    io::stdout().flush()?;

    let mut response = String::new();
    io::stdin().lock().read_line(&mut response)?;
    Ok(response.trim().eq_ignore_ascii_case("y"))
}
