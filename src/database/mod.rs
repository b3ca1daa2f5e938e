pub mod models;
pub mod pool;
