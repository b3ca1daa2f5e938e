pub mod appointment;
pub mod product;
pub mod profile;
pub mod transaction;

pub use appointment::{Appointment, RepairItem};
pub use product::Product;
pub use profile::{Profile, Role};
pub use transaction::Transaction;
