use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    components(schemas(axum_helpers::ErrorResponse)),
    info(
        title = "Doorshop API",
        version = "0.1.0",
        description = "Door catalog, user content, authentication and feedback forms"
    ),
    servers((url = "/api", description = "API base path")),
    modifiers(&BearerAuth),
    nest(
        (path = "/catalog", api = domain_catalog::ApiDoc),
        (path = "/content", api = domain_content::ApiDoc),
        (path = "/auth", api = domain_users::ApiDoc),
        (path = "/feedback", api = domain_notifications::ApiDoc)
    )
)]
pub struct ApiDoc;

/// Registers the `bearer_auth` scheme referenced by protected operations.
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domains_are_nested_under_their_prefixes() {
        let doc = ApiDoc::openapi();
        let paths: Vec<_> = doc.paths.paths.keys().cloned().collect();

        assert!(paths.iter().any(|p| p.starts_with("/catalog")));
        assert!(paths.iter().any(|p| p.starts_with("/content/texts")));
        assert!(paths.iter().any(|p| p == "/auth/sign-in"));
        assert!(paths.iter().any(|p| p == "/feedback/common"));
    }

    #[test]
    fn test_bearer_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.unwrap();
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
