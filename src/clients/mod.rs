pub mod dhl;
pub mod mailer;
pub mod openai;
pub mod stripe;
