mod error;
mod handlers;
mod middleware;

pub use error::AppError;
pub use handlers::{login, logout};
pub use middleware::{
    BackendConnector, CurrentUser, GuardState, guard_middleware, referer_path,
};
