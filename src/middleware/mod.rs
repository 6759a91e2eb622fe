/// Middleware module
///
/// Session guard for protected scopes and per-request logging.

mod request_logger;
mod session_guard;

pub use request_logger::RequestLogger;
pub use session_guard::SessionGuard;
