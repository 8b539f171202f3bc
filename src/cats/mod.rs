pub mod client;
mod handlers;
pub mod projection;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
