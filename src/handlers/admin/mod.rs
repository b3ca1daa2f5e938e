pub mod appointments;
pub mod cashflow;
pub mod content;
pub mod revenue;
pub mod shipments;
