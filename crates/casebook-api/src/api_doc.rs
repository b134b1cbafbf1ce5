//! OpenAPI documentation.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::error;
use crate::handlers;
use casebook_core::models;

/// Returns the OpenAPI spec served at /api/openapi.json.
pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

/// Registers the bearer token scheme referenced by handler annotations.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Casebook API",
        version = "0.1.0",
        description = "Case-centric document registry for legal practices. Cases group uploaded documents; uploads write the blob to storage before committing metadata. All endpoints are versioned under /api/v1/."
    ),
    paths(
        // Cases
        handlers::cases::create_case,
        handlers::cases::list_cases,
        handlers::cases::list_case_summaries,
        handlers::cases::get_case,
        handlers::cases::update_case_status,
        // Documents
        handlers::documents::upload_document,
        handlers::documents::list_documents,
        handlers::documents::update_document_status,
        // Stats
        handlers::stats::get_stats,
    ),
    components(
        schemas(
            // Core models
            models::CaseResponse,
            models::CaseSummary,
            models::CaseDetailResponse,
            models::CaseStatus,
            models::DocumentResponse,
            models::DocumentStatus,
            models::StatsSnapshot,
            // Request bodies
            handlers::cases::CreateCaseRequest,
            handlers::cases::UpdateCaseStatusRequest,
            handlers::documents::UpdateDocumentStatusRequest,
            // Error
            error::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "cases", description = "Case registry operations"),
        (name = "documents", description = "Document upload and registry operations"),
        (name = "stats", description = "Derived registry statistics")
    )
)]
pub struct ApiDoc;
