//! Core medbook library (session, gateway, routing, screens, config).

pub mod api;
pub mod config;
pub mod gateway;
pub mod guard;
pub mod navigation;
pub mod routes;
pub mod screens;
pub mod session;
