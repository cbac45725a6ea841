//! HTTP surface of the item server.
//!
//! | Method   | Path             | Auth | Action                    |
//! |----------|------------------|------|---------------------------|
//! | `POST`   | `/auth/register` | no   | register a user           |
//! | `POST`   | `/auth/login`    | no   | issue a session token     |
//! | `GET`    | `/welcome`       | yes  | greet the token's subject |
//! | `GET`    | `/item`          | yes  | list all items            |
//! | `POST`   | `/item`          | yes  | insert an item            |
//! | `DELETE` | `/item`          | yes  | delete all items          |
//! | `GET`    | `/item/{id}`     | yes  | fetch one item            |
//! | `DELETE` | `/item/{id}`     | yes  | delete one item           |

pub mod error;
pub mod handlers;
pub mod middleware;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};

use crate::auth::AuthGate;
use crate::storage::ItemStore;

pub use error::ApiError;

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ItemStore>,
    pub gate: Arc<AuthGate>,
}

impl AppState {
    #[must_use]
    pub fn new(store: ItemStore, gate: AuthGate) -> Self {
        Self {
            store: Arc::new(store),
            gate: Arc::new(gate),
        }
    }
}

/// Build the application router.
///
/// Protected routes sit behind `require_auth` via `route_layer`, so unknown
/// paths still answer 404 rather than 401.
pub fn router(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login));

    let protected_routes = Router::new()
        .route("/welcome", get(handlers::welcome))
        .route(
            "/item",
            get(handlers::list_items)
                .post(handlers::add_item)
                .delete(handlers::delete_all),
        )
        .route(
            "/item/{id}",
            get(handlers::get_item).delete(handlers::delete_item),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::require_auth,
        ));

    Router::new()
        .nest("/auth", auth_routes)
        .merge(protected_routes)
        .layer(axum::middleware::from_fn(middleware::log_requests))
        .with_state(state)
}
