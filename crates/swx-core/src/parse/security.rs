use indexmap::IndexMap;
use serde::Deserialize;

/// Location of an API key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiKeyLocation {
    Query,
    Header,
}

/// A security scheme definition from `securityDefinitions`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type")]
pub enum SecurityScheme {
    #[serde(rename = "apiKey")]
    ApiKey {
        name: String,
        #[serde(rename = "in")]
        location: ApiKeyLocation,
    },

    #[serde(rename = "basic")]
    Basic,

    #[serde(rename = "oauth2")]
    OAuth2 {
        flow: Option<String>,
        #[serde(rename = "authorizationUrl")]
        authorization_url: Option<String>,
        #[serde(rename = "tokenUrl")]
        token_url: Option<String>,
        #[serde(default)]
        scopes: IndexMap<String, String>,
    },

    /// Any other scheme kind; contributes no parameters.
    #[serde(other)]
    Other,
}

/// A security requirement: map of scheme name → required scopes.
pub type SecurityRequirement = IndexMap<String, Vec<String>>;

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_api_key_scheme() {
        let scheme: SecurityScheme =
            serde_json::from_value(json!({"type": "apiKey", "name": "X-Token", "in": "header"}))
                .unwrap();
        assert_eq!(
            scheme,
            SecurityScheme::ApiKey {
                name: "X-Token".to_string(),
                location: ApiKeyLocation::Header
            }
        );
    }

    #[test]
    fn test_basic_and_unknown_schemes() {
        let basic: SecurityScheme =
            serde_json::from_value(json!({"type": "basic", "description": "login"})).unwrap();
        assert_eq!(basic, SecurityScheme::Basic);

        let other: SecurityScheme =
            serde_json::from_value(json!({"type": "mutualTLS"})).unwrap();
        assert_eq!(other, SecurityScheme::Other);
    }
}
