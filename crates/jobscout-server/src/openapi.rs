use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "jobscout API",
        version = "0.1.0",
        description = "Search several job boards with one query."
    ),
    paths(
        crate::routes::search,
        crate::routes::list_sites,
        crate::routes::health,
    ),
    components(schemas(
        crate::dto::SearchRequest,
        crate::dto::SearchResponse,
        crate::dto::JobResponse,
        crate::dto::SiteReportResponse,
        crate::dto::SiteListResponse,
        crate::dto::SiteResponse,
        crate::dto::DirectoryEntryResponse,
        crate::dto::HealthResponse,
        crate::dto::ErrorResponse,
    )),
    tags(
        (name = "search", description = "Aggregated job search"),
        (name = "sites", description = "Configured job sites"),
        (name = "system", description = "Health and system status"),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Adds Bearer token security scheme to the OpenAPI document.
struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("token")
                        .description(Some(
                            "Admin token. Set via JOBSCOUT_ADMIN_TOKEN environment variable.",
                        ))
                        .build(),
                ),
            );
        }
    }
}
