//! MicroZaim - Microloan Demo Library
//!
//! A loan calculator, simulated sign-in, loan applications and a dashboard,
//! with a terminal front-end built on ratatui.

pub mod domain;
pub mod application;
pub mod config;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
pub use application::*;
