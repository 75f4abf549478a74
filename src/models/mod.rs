pub mod auth;
pub mod diagnostics;
pub mod error;
pub mod files;
pub mod health;
pub mod messages;

pub use auth::*;
pub use diagnostics::*;
pub use error::*;
pub use files::*;
pub use health::*;
pub use messages::*;
