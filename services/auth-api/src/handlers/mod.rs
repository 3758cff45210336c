//! HTTP handlers

mod auth;
mod health;

pub use auth::{deactivate, join, login, logout, me, refresh, sessions};
pub use health::{health, ready};
