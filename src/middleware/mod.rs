pub mod guard;
pub mod response;
pub mod session;

pub use guard::{require_back_office, require_repair_desk};
pub use response::{ApiResponse, ApiResult};
pub use session::SessionUser;
