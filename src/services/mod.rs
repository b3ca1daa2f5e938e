pub mod appointments;
pub mod catalog;
pub mod finance;
pub mod identity;
