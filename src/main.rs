use anyhow::Result;
use axum::Router;
use lumina_crmservice::{app_state::AppState, bootstrap, routes};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<()> {
    bootstrap::init_tracing();
    bootstrap::init_env();

    let state = AppState::new();

    let routes = routes::auth::routes_with_openapi()
        .merge(routes::customers::routes_with_openapi())
        .merge(routes::orders::routes_with_openapi())
        .merge(routes::otp::routes_with_openapi())
        .merge(routes::catalog::routes_with_openapi())
        .merge(routes::staff::routes_with_openapi());

    let (router, mut openapi) = routes.split_for_parts();
    openapi.info = utoipa::openapi::InfoBuilder::new()
        .title("Lumina CRM Service API")
        .version("1.0.0")
        .build();
    openapi
        .components
        .get_or_insert_with(Default::default)
        .add_security_scheme(
            "bearerAuth",
            SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
        );

    let app = Router::new()
        .nest("/api", router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    bootstrap::serve(app).await
}
