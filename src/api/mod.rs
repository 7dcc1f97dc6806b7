use crate::AppState;
use axum::Router;

pub mod external_requests;
mod home;
pub mod issues;

pub fn routes() -> Router<AppState> {
	Router::new()
		.merge(home::routes())
		.merge(issues::routes())
		.merge(external_requests::routes())
}
