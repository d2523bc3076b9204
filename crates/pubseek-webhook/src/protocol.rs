//! Wire types for the external search webhook.
//! The request shape mirrors what the collaborator's workflow expects,
//! including its dotted filter field name.

use serde::Serialize;

use pubseek_core::models::SearchParams;

#[derive(Debug, Serialize)]
pub struct SearchRequest {
    pub keywords: String,
    pub limit: u32,
    pub year_from: u16,

    /// The collaborator's name for the open-access filter.
    #[serde(rename = "open_access.any_repository_has_fulltext")]
    pub open_access: bool,
}

// Response is a JSON array whose first element is
// pubseek_core::models::SearchResults (deserialized directly).

impl From<&SearchParams> for SearchRequest {
    fn from(params: &SearchParams) -> Self {
        Self {
            keywords: params.keywords.clone(),
            limit: params.limit,
            year_from: params.year_from,
            open_access: params.open_access,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_uses_collaborator_field_names() {
        let params = SearchParams {
            keywords: "neural networks".to_string(),
            limit: 10,
            year_from: 2020,
            open_access: true,
        };

        let body = serde_json::to_value(SearchRequest::from(&params)).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "keywords": "neural networks",
                "limit": 10,
                "year_from": 2020,
                "open_access.any_repository_has_fulltext": true
            })
        );
    }
}
