use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::{files, route_nodes, shipments, tasks};
use crate::state::SharedState;

/// Assembles the `/api/v2` surface, mirroring each REST resource to one
/// `handlers` submodule.
pub fn build_router(state: SharedState) -> Router<()> {
    let shipments_router = Router::new()
        .route("/stats", get(shipments::stats))
        .route("/search", get(shipments::search))
        .route("/", get(shipments::list).post(shipments::create))
        .route("/parse-bl", post(shipments::parse_bl))
        .route("/create-from-bl", post(shipments::create_from_bl))
        .route(
            "/:id",
            get(shipments::get).delete(shipments::delete),
        )
        .route("/:id/status", patch(shipments::update_status))
        .route("/:id/invoiced", patch(shipments::update_invoiced))
        .route("/:id/exception", patch(shipments::update_exception))
        .route("/:id/company", patch(shipments::update_company))
        .route("/:id/parties", patch(shipments::update_parties))
        .route("/:id/bl", patch(shipments::update_bl))
        .route(
            "/:id/tasks",
            get(tasks::list),
        )
        .route("/:id/tasks/:task_id", patch(tasks::update))
        .route(
            "/:id/route-nodes",
            get(route_nodes::list).put(route_nodes::replace),
        )
        .route("/:id/route-nodes/:sequence", patch(route_nodes::patch_one))
        .route(
            "/:id/files",
            get(files::list).post(files::upload),
        )
        .route("/:id/files/:file_id", patch(files::patch).delete(files::delete))
        .route("/:id/files/:file_id/download", get(files::download));

    let api = Router::new().nest("/shipments", shipments_router);

    let cors = tower_http::cors::CorsLayer::new()
        .allow_methods(tower_http::cors::AllowMethods::mirror_request())
        .allow_origin(tower_http::cors::AllowOrigin::mirror_request())
        .allow_headers(tower_http::cors::AllowHeaders::mirror_request());

    Router::new()
        .nest("/api/v2", api)
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
