pub mod branch;
pub mod character;
pub mod node;
pub mod path;
pub mod session;

pub use branch::{Branch, BranchPoint};
pub use character::{Character, GameState, Item, Quest};
pub use node::{Choice, NodeKind, StoryNode, can_make_choice};
pub use path::StoryPath;
pub use session::{BranchIndex, GameSession, PathHistory, SessionRecord, SessionStatus};
