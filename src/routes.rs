use crate::common::auth::header_identity_allowed;
use crate::common::state::AppState;
use crate::config::Config;
use crate::{batches, incubators, species, trays};
use anyhow::Context;
use axum::Router;
use axum_keycloak_auth::{Url, instance::KeycloakAuthInstance, instance::KeycloakConfig};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_scalar::{Scalar, Servable};

pub fn build_router(db: &DatabaseConnection, config: &Config) -> anyhow::Result<Router> {
    #[derive(OpenApi)]
    #[openapi(
        info(title = "Incubator API", description = "Incubators, trays, egg batches and species"),
        modifiers(&SecurityAddon),
        security(
            ("bearerAuth" = [])
        )
    )]
    struct ApiDoc;

    struct SecurityAddon;

    impl utoipa::Modify for SecurityAddon {
        fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
            if let Some(components) = openapi.components.as_mut() {
                components.add_security_scheme(
                    "bearerAuth",
                    utoipa::openapi::security::SecurityScheme::Http(
                        utoipa::openapi::security::HttpBuilder::new()
                            .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                            .bearer_format("JWT")
                            .build(),
                    ),
                );
            }
        }
    }

    let keycloak_instance: Option<Arc<KeycloakAuthInstance>> = if config.keycloak_url.is_empty() {
        if header_identity_allowed(&config.deployment) {
            tracing::warn!(
                deployment = %config.deployment,
                "KEYCLOAK_URL is empty, callers are identified by the X-User-Id header"
            );
        } else {
            tracing::error!(
                deployment = %config.deployment,
                "KEYCLOAK_URL is empty, every request needing a user will be rejected"
            );
        }
        None
    } else {
        let server = Url::parse(&config.keycloak_url)
            .with_context(|| format!("KEYCLOAK_URL is not a valid URL: {}", config.keycloak_url))?;
        Some(Arc::new(KeycloakAuthInstance::new(
            KeycloakConfig::builder()
                .server(server)
                .realm(String::from(&config.keycloak_realm))
                .build(),
        )))
    };

    let app_state: AppState = AppState::new(db.clone(), config.clone(), keycloak_instance);

    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(crate::common::views::router(&app_state))
        .nest("/api/incubators", incubators::views::router(&app_state))
        .nest("/api/trays", trays::views::router(&app_state))
        .nest("/api/batches", batches::views::router(&app_state))
        .nest("/api/species", species::views::router(&app_state))
        .split_for_parts();

    Ok(router.merge(Scalar::with_url("/api/docs", api)))
}
