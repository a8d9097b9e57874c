mod auth;
mod doc;
mod dtos;
mod error;
mod routes;
mod utils;

use crate::auth::Claims;
use crate::doc::ApiDoc;
use log::info;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_oauth2_resource_server::server::OAuth2ResourceServer;
use utoipa::OpenApi;
use utoipa_axum::{router::OpenApiRouter, routes};
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() {
    env_logger::init();
    dotenvy::dotenv().ok();

    let issuer_url = std::env::var("OIDC_ISSUER_URL").expect("OIDC_ISSUER_URL must be set");

    let oauth2_resource_server = OAuth2ResourceServer::<Claims>::builder()
        .issuer_url(issuer_url.as_str())
        .build()
        .await
        .expect("Failed to build OAuth2ResourceServer");

    // Liveness endpoints stay outside the JWT layer
    let (public, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .routes(routes!(routes::root::root))
        .routes(routes!(routes::health::health))
        .split_for_parts();

    let (protected, api) = OpenApiRouter::with_openapi(api)
        .routes(routes!(routes::closing::close_offering))
        .routes(routes!(routes::closing::reopen_offering))
        .routes(routes!(routes::evaluation::add_component))
        .routes(routes!(routes::evaluation::update_component))
        .routes(routes!(routes::evaluation::deactivate_component))
        .routes(routes!(routes::grades::get_weighted_grade))
        .routes(routes!(routes::grades::record_grade))
        .routes(routes!(routes::prerequisites::add_prerequisite))
        .routes(routes!(routes::prerequisites::check_prerequisites))
        .routes(routes!(routes::prerequisites::get_prerequisite_tree))
        .split_for_parts();

    let app = public
        .merge(protected.layer(ServiceBuilder::new().layer(oauth2_resource_server.into_layer())))
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", api))
        .layer(CompressionLayer::new());

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
    info!("Running axum on http://localhost:3000");

    axum::serve(listener, app)
        .with_graceful_shutdown(utils::shutdown::shutdown_signal())
        .await
        .unwrap();
}
