pub mod branch_service;
pub mod choice_service;
pub mod session_service;

pub use branch_service::BranchService;
pub use choice_service::ChoiceService;
pub use session_service::SessionService;
