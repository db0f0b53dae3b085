pub mod config;
pub mod etag;
pub mod http;
pub mod mime;
pub mod pdf;
pub mod resolve;
pub mod server;
pub mod static_files;
pub mod token;

pub use config::Config;
pub use etag::etag_for;
pub use mime::content_type_for;
pub use resolve::{resolve_document, sanitize_id, Reject, ResolvedDocument};
pub use server::serve;
pub use token::is_valid_token;
