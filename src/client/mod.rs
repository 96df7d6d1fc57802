pub mod error;
pub mod game_client;

pub use error::{ClientError, ClientResult};
pub use game_client::GameClient;
