mod api_client;
mod session;

pub use api_client::{ApiClient, ApiError, RegisterRequest};
pub use session::{Session, SessionStore};
