//! Request handlers organized by resource.

pub mod health;
pub mod redirect;
pub mod webhook;
