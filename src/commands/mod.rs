//! CLI commands implementation

pub mod ask;
pub mod chat;
pub mod documents;
pub mod init;
pub mod status;
pub mod upload;

pub use ask::*;
pub use chat::*;
pub use documents::*;
pub use init::*;
pub use status::*;
pub use upload::*;
