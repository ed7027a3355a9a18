//! Wire types of the auth and users API

use portal_core::TokenBundle;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Registration request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Password reset email request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

/// New password for a reset token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetPasswordRequest {
    pub password: String,
}

/// Account as returned by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub is_email_verified: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Login and register response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: User,
    pub tokens: TokenBundle,
}

/// Account created by an administrator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    /// `user` or `admin`
    pub role: String,
}

/// Partial account update; unset fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// Page size echoed back by list endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PageLimit {
    Count(i64),
    /// `"all"` when the request disabled paging
    Label(String),
}

/// One page of a list endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub results: Vec<T>,
    pub page: u32,
    pub limit: PageLimit,
    pub total_pages: u32,
    pub total_results: u64,
}

/// Filters for `GET /v1/users`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserQuery {
    pub page: Option<u32>,
    /// `-1` returns every row
    pub limit: Option<i64>,
    /// `field:asc` or `field:desc`
    pub sort_by: Option<String>,
    pub search: Option<String>,
    /// Which field `search` matches: `name`, `email`, `role`, `id` or `all`
    pub scope: Option<String>,
    pub role: Option<String>,
}

impl UserQuery {
    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn sort_by(mut self, sort: impl Into<String>) -> Self {
        self.sort_by = Some(sort.into());
        self
    }

    pub fn search(mut self, term: impl Into<String>, scope: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self.scope = Some(scope.into());
        self
    }

    pub fn role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Query string pairs, in the order the backend documents them
    pub fn pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(page) = self.page {
            pairs.push(("page".to_string(), page.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        let text = [
            ("sortBy", &self.sort_by),
            ("search", &self.search),
            ("scope", &self.scope),
            ("role", &self.role),
        ];
        for (key, value) in text {
            if let Some(value) = value {
                pairs.push((key.to_string(), value.clone()));
            }
        }
        pairs
    }
}

/// Error body `{"code": ..., "message": ...}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub code: Option<u16>,
    /// A string, or a map of field name to message
    #[serde(default)]
    pub message: Option<JsonValue>,
}

impl ApiErrorBody {
    /// Human readable text of `message`; field maps become `field: msg` pairs
    pub fn message_text(&self) -> Option<String> {
        match self.message.as_ref()? {
            JsonValue::String(s) => Some(s.clone()),
            JsonValue::Object(fields) => {
                let parts: Vec<String> = fields
                    .iter()
                    .map(|(field, msg)| match msg {
                        JsonValue::String(s) => format!("{field}: {s}"),
                        other => format!("{field}: {other}"),
                    })
                    .collect();
                Some(parts.join(", "))
            }
            JsonValue::Null => None,
            other => Some(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_paginated_users_with_numeric_limit() {
        let page: Paginated<User> = serde_json::from_value(json!({
            "results": [{"id": "u1", "name": "Ada", "email": "ada@example.com", "role": "admin"}],
            "page": 2,
            "limit": 5,
            "totalPages": 3,
            "totalResults": 11
        }))
        .unwrap();

        assert_eq!(page.results.len(), 1);
        assert_eq!(page.results[0].role, "admin");
        assert_eq!(page.page, 2);
        assert_eq!(page.limit, PageLimit::Count(5));
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.total_results, 11);
    }

    #[test]
    fn test_paginated_unlimited_page() {
        let page: Paginated<User> = serde_json::from_value(json!({
            "results": [],
            "page": 1,
            "limit": "all",
            "totalPages": 1,
            "totalResults": 0
        }))
        .unwrap();

        assert_eq!(page.limit, PageLimit::Label("all".to_string()));
        assert!(page.results.is_empty());
    }

    #[test]
    fn test_update_request_omits_unset_fields() {
        let request = UpdateUserRequest {
            name: Some("New Name".to_string()),
            ..UpdateUserRequest::default()
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"name": "New Name"})
        );
    }

    #[test]
    fn test_user_query_pairs() {
        let query = UserQuery::default()
            .page(1)
            .limit(5)
            .sort_by("name:asc")
            .role("user");
        assert_eq!(
            query.pairs(),
            vec![
                ("page".to_string(), "1".to_string()),
                ("limit".to_string(), "5".to_string()),
                ("sortBy".to_string(), "name:asc".to_string()),
                ("role".to_string(), "user".to_string()),
            ]
        );
        assert!(UserQuery::default().pairs().is_empty());
    }
}
