pub mod branch_repo;
pub mod node_repo;
pub mod session_repo;

pub use branch_repo::BranchRepository;
pub use node_repo::NodeRepository;
pub use session_repo::SessionRepository;
