pub mod accounts;
pub mod billing;
pub mod system;

use axum::Router;

pub fn router() -> Router {
    Router::new()
        .nest("/accounts", accounts::router())
        .nest("/billing", billing::router())
}
