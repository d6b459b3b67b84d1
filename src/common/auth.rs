use crate::common::errors::BusinessError;
use crate::common::state::AppState;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_keycloak_auth::decode::KeycloakToken;
use axum_keycloak_auth::{PassthroughMode, layer::KeycloakAuthLayer};
use utoipa_axum::router::OpenApiRouter;
use uuid::Uuid;

/// Realm role allowed to maintain species reference data
pub const ADMIN_ROLE: &str = "incubator-admin";

/// Header carrying the caller id when Keycloak is disabled (local runs, tests)
pub const USER_ID_HEADER: &str = "x-user-id";

/// Deployments allowed to identify callers by [`USER_ID_HEADER`]
const HEADER_IDENTITY_DEPLOYMENTS: [&str; 2] = ["local", "test"];

/// Whether callers of `deployment` may identify themselves by header when
/// Keycloak is not configured
pub fn header_identity_allowed(deployment: &str) -> bool {
    HEADER_IDENTITY_DEPLOYMENTS
        .iter()
        .any(|allowed| deployment.eq_ignore_ascii_case(allowed))
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Role {
    Administrator,
    Unknown(String),
}
impl axum_keycloak_auth::role::Role for Role {}
impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Administrator => f.write_str(ADMIN_ROLE),
            Role::Unknown(unknown) => f.write_fmt(format_args!("Unknown role: {unknown}")),
        }
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        if value == ADMIN_ROLE {
            Role::Administrator
        } else {
            Role::Unknown(value)
        }
    }
}

/// Puts `router` behind bearer-token verification when Keycloak is configured.
///
/// An empty `required_roles` admits any authenticated caller.
pub fn protect(
    router: OpenApiRouter,
    state: &AppState,
    required_roles: Vec<Role>,
    resource: &str,
) -> OpenApiRouter {
    if let Some(instance) = state.keycloak_auth_instance.clone() {
        router.layer(
            KeycloakAuthLayer::<Role>::builder()
                .instance(instance)
                .passthrough_mode(PassthroughMode::Block)
                .persist_raw_claims(false)
                .expected_audiences(vec![String::from("account")])
                .required_roles(required_roles)
                .build(),
        )
    } else {
        if !state.config.tests_running {
            tracing::warn!("routes of the {resource} router are not protected");
        }
        router
    }
}

/// The authenticated owner used to scope incubator queries.
///
/// Taken from the Keycloak token subject. Without a Keycloak instance the
/// `X-User-Id` header is trusted instead, in local and test deployments only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser(pub Uuid);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = BusinessError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let raw = if let Some(token) = parts.extensions.get::<KeycloakToken<Role>>() {
            token.subject.clone()
        } else if state.keycloak_auth_instance.is_none()
            && header_identity_allowed(&state.config.deployment)
        {
            parts
                .headers
                .get(USER_ID_HEADER)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string)
                .ok_or_else(|| BusinessError::Unauthorized {
                    message: format!("missing {USER_ID_HEADER} header"),
                })?
        } else {
            return Err(BusinessError::Unauthorized {
                message: "missing bearer token".to_string(),
            });
        };

        Uuid::parse_str(raw.trim())
            .map(CurrentUser)
            .map_err(|_| BusinessError::Unauthorized {
                message: format!("user id '{raw}' is not a UUID"),
            })
    }
}
