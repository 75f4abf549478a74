pub mod auth;
pub mod content;
pub mod diagnostics;
pub mod download;
pub mod editor_save;
pub mod files;
pub mod health;
pub mod manage;
pub mod pages;
pub mod upload;
pub mod zip;

pub use auth::*;
pub use content::*;
pub use diagnostics::*;
pub use download::*;
pub use editor_save::*;
pub use files::*;
pub use health::*;
pub use manage::*;
pub use pages::*;
pub use upload::*;
pub use zip::*;
