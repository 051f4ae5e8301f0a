//! OpenAPI documentation configuration

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Racing Fence Installation Pricing API",
        version = "0.1.0",
        description = "Installation estimates for racing fences and an archive of saved quotes",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    nest(
        (path = "/api", api = domain_calculations::ApiDoc)
    )
)]
pub struct ApiDoc;
