// GitHub API endpoint functions.
// Provides typed methods for the user search, profile, and repository endpoints.

use crate::error::Result;
use crate::request::RequestGuard;

use super::client::GitHubClient;
use super::types::{Repository, SearchUsersResponse, UserProfile, UserSuggestion};

impl GitHubClient {
    /// Search users matching `query`, best matches first.
    pub async fn search_users(
        &self,
        query: &str,
        per_page: u32,
        guard: &RequestGuard,
    ) -> Result<Vec<UserSuggestion>> {
        let params = [("q", query), ("per_page", &per_page.to_string())];
        let response = self.get_with_params("/search/users", &params, guard).await?;
        let wrapper: SearchUsersResponse = response.json().await?;
        Ok(wrapper.items)
    }

    /// Get the full profile for `login`.
    pub async fn get_user(&self, login: &str, guard: &RequestGuard) -> Result<UserProfile> {
        let response = self.get(&format!("/users/{}", login), guard).await?;
        let profile: UserProfile = response.json().await?;
        Ok(profile)
    }

    /// Get the most recently updated public repositories for `login`.
    pub async fn get_user_repos(
        &self,
        login: &str,
        per_page: u32,
        guard: &RequestGuard,
    ) -> Result<Vec<Repository>> {
        let params = [
            ("sort", "updated"),
            ("type", "public"),
            ("per_page", &per_page.to_string()),
        ];
        let response = self
            .get_with_params(&format!("/users/{}/repos", login), &params, guard)
            .await?;
        let repos: Vec<Repository> = response.json().await?;
        Ok(repos)
    }
}
