use axum::extract::FromRef;
use sqlx::PgPool;

/// Shared handler state. The pool is the only path to the `books` table.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
}

impl FromRef<AppState> for PgPool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}
