//! Client-side model of a session's story timeline: step navigation with
//! undo/redo, the branch manager that loads and restores branches, and the
//! pan/zoom state of the branch-tree view.

pub mod branch_manager;
pub mod navigator;
pub mod tree;
pub mod viewport;

use std::future::Future;
use uuid::Uuid;

use crate::client::ClientResult;
use crate::domain::{BranchIndex, PathHistory};

pub use branch_manager::{BranchManager, LoadTicket, Snapshot};
pub use navigator::{TimelineKey, TimelineNavigator};
pub use tree::{BranchTree, TreeNode};
pub use viewport::{Offset, Viewport};

/// Backend operations the timeline needs.
pub trait TimelineSource {
    fn fetch_path_history(
        &self,
        session_id: Uuid,
    ) -> impl Future<Output = ClientResult<PathHistory>> + Send;

    fn fetch_branch_index(
        &self,
        session_id: Uuid,
    ) -> impl Future<Output = ClientResult<BranchIndex>> + Send;

    fn restore_branch(
        &self,
        session_id: Uuid,
        branch_id: Uuid,
    ) -> impl Future<Output = ClientResult<()>> + Send;
}
