//! User administration API client methods

use super::{ClientError, RequestGateway, RequestOptions};
use crate::types::{CreateUserRequest, Paginated, UpdateUserRequest, User, UserQuery};

impl RequestGateway {
    /// One page of users, `limit` of `-1` for all of them
    pub async fn list_users(
        &self,
        page: u32,
        limit: i64,
    ) -> Result<Paginated<User>, ClientError> {
        self.search_users(&UserQuery::default().page(page).limit(limit)).await
    }

    /// Users matching `query`
    pub async fn search_users(&self, query: &UserQuery) -> Result<Paginated<User>, ClientError> {
        let mut options = RequestOptions::get();
        for (key, value) in query.pairs() {
            options = options.query(key, value);
        }
        self.execute("/v1/users", options).await
    }

    /// Get a user by ID
    pub async fn get_user(&self, id: &str) -> Result<User, ClientError> {
        self.execute(&format!("/v1/users/{id}"), RequestOptions::get()).await
    }

    /// Create a user with an explicit role
    pub async fn create_user(&self, request: &CreateUserRequest) -> Result<User, ClientError> {
        let user: User = self
            .execute("/v1/users", RequestOptions::post().json(request)?)
            .await?;
        tracing::info!(user_id = %user.id, role = %user.role, "Created user");
        Ok(user)
    }

    /// Update the fields set in `request`
    pub async fn update_user(
        &self,
        id: &str,
        request: &UpdateUserRequest,
    ) -> Result<User, ClientError> {
        self.execute(
            &format!("/v1/users/{id}"),
            RequestOptions::patch().json(request)?,
        )
        .await
    }

    /// Permanently delete a user
    pub async fn delete_user(&self, id: &str) -> Result<(), ClientError> {
        self.execute_empty(&format!("/v1/users/{id}"), RequestOptions::delete()).await?;
        tracing::info!(user_id = %id, "Deleted user");
        Ok(())
    }
}
