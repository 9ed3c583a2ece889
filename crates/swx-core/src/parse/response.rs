use serde::Deserialize;

use super::schema::Schema;

/// A response definition.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Response {
    pub description: Option<String>,
    pub schema: Option<Schema>,
}
