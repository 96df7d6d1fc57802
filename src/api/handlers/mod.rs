pub mod branch;
pub mod choice;
pub mod session;

pub use branch::*;
pub use choice::*;
pub use session::*;
