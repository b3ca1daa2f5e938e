pub mod admin;
pub mod appointments;
pub mod auth;
pub mod catalog;
pub mod payments;
pub mod support;
