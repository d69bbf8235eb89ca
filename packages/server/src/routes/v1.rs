use utoipa_axum::{router::OpenApiRouter, routes};

use crate::handlers;
use crate::state::AppState;

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/auth", auth_routes())
        .nest("/competitions", competition_routes())
        .nest("/credentials", credential_routes())
        .nest("/users", user_routes())
        .nest("/notifications", notification_routes())
}

fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::auth::register))
        .routes(routes!(handlers::auth::login))
        .routes(routes!(handlers::auth::me))
}

fn competition_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::competition::list_competitions,
            handlers::competition::create_competition
        ))
        .routes(routes!(handlers::competition::get_competition))
        .routes(routes!(handlers::competition::submit_competition))
        .routes(routes!(handlers::competition::review_competition))
        .routes(routes!(handlers::competition::update_competition_status))
        .routes(routes!(handlers::credential::submit_credential))
}

fn credential_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::credential::list_credentials_for_review))
        .routes(routes!(handlers::credential::reorder_credentials))
        .routes(routes!(handlers::credential::delete_credential))
        .routes(routes!(handlers::credential::review_credential))
}

fn user_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::credential::list_user_credentials))
        .routes(routes!(handlers::credential::get_user_credential))
        .routes(routes!(handlers::badge::list_user_badges))
}

fn notification_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::notification::list_notifications))
        .routes(routes!(handlers::notification::mark_notification_read))
        .routes(routes!(handlers::notification::mark_all_notifications_read))
}
