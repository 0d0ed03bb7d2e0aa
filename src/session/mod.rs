pub mod sessions;
pub mod token;

pub use sessions::{session_expired, Session, SessionRegistry};
pub use token::token_from_cookie_header;
