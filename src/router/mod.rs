pub use self::router::{Handler, Router, RouterError};
pub use self::router::RouterError::*;

pub mod matcher;
pub mod router;

pub fn map_error<E: std::fmt::Debug>(e: &E, msg: &str, error_code: u16) -> RouterError {
    log::info!("Got error: {:?}", e);
    HandlerError(error_code, format!("{}: {:?}", msg, e))
}
