use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::{
    AppState, contractor_handlers, map_handlers, notification_handlers,
    photo_handlers, road_handlers, stats_handlers, user_handlers,
};

/// Create all v1 API routes
pub fn create_v1_router() -> Router<AppState> {
    Router::new()
        .merge(create_road_routes())
        .merge(create_contractor_routes())
        .merge(create_stats_routes())
        .merge(create_user_routes())
}

/// Road register: listing/search, details, mutations, and map output
fn create_road_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/roads",
            get(road_handlers::list_roads_handler)
                .post(road_handlers::create_road_handler),
        )
        .route("/roads/{id}", get(road_handlers::road_details_handler))
        .route(
            "/roads/{id}/progress",
            patch(road_handlers::update_progress_handler),
        )
        .route(
            "/roads/{id}/milestones",
            get(road_handlers::road_milestones_handler),
        )
        .route(
            "/roads/{id}/photos",
            post(photo_handlers::add_road_photo_handler),
        )
        .route("/photos", get(photo_handlers::list_photos_handler))
        .route("/map/roads", get(map_handlers::map_roads_handler))
}

fn create_contractor_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/contractors",
            get(contractor_handlers::list_contractors_handler)
                .post(contractor_handlers::create_contractor_handler),
        )
        .route(
            "/contractors/{id}",
            get(contractor_handlers::contractor_details_handler),
        )
}

/// Statistics snapshots: latest, history, and on-demand recomputation
fn create_stats_routes() -> Router<AppState> {
    Router::new()
        .route("/stats", get(stats_handlers::current_stats_handler))
        .route(
            "/stats/history",
            get(stats_handlers::stats_history_handler),
        )
        .route(
            "/stats/refresh",
            post(stats_handlers::refresh_stats_handler),
        )
}

fn create_user_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/users",
            get(user_handlers::list_users_handler)
                .post(user_handlers::create_user_handler),
        )
        .route("/users/me", get(user_handlers::current_user_handler))
        .route(
            "/users/{id}",
            patch(user_handlers::update_user_handler)
                .delete(user_handlers::delete_user_handler),
        )
        .route(
            "/notifications",
            get(notification_handlers::list_notifications_handler),
        )
}
