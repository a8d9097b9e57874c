use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.as_mut().unwrap();
        components.add_security_scheme(
            "jwt",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// API Documentation
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    tags(
        (name = "Closing", description = "Section closing and reopening"),
        (name = "Evaluation", description = "Evaluation scheme management"),
        (name = "Grades", description = "Weighted grade ledger"),
        (name = "Prerequisites", description = "Prerequisite graph"),
        (name = "Health", description = "Liveness endpoints"),
    ),
    info(
        title = "Academic Records API",
        version = "1.0.0",
        description = "Enrollment, grading, and course-section lifecycle backend",
        license(
            name = "MIT OR Apache-2.0",
        )
    )
)]
pub struct ApiDoc;
