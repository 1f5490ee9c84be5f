// GitHub API response types.
// Defines structs for deserializing GitHub REST API responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account type discriminator (user, organization, or bot).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum UserType {
    #[default]
    User,
    Organization,
    Bot,
    #[serde(other)]
    Unknown,
}

impl UserType {
    pub fn label(&self) -> &'static str {
        match self {
            UserType::User => "user",
            UserType::Organization => "org",
            UserType::Bot => "bot",
            UserType::Unknown => "unknown",
        }
    }
}

/// A single hit from the user search endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSuggestion {
    pub id: u64,
    pub login: String,
    pub avatar_url: Option<String>,
    #[serde(rename = "type", default)]
    pub user_type: UserType,
    /// Relevance score assigned by the search index.
    #[serde(default)]
    pub score: f64,
}

/// Envelope returned by `/search/users`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchUsersResponse {
    pub total_count: u64,
    #[serde(default)]
    pub incomplete_results: bool,
    pub items: Vec<UserSuggestion>,
}

/// Full user profile from `/users/<login>`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub login: String,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub followers: u64,
    pub following: u64,
    pub public_repos: u64,
    pub created_at: DateTime<Utc>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub blog: Option<String>,
    pub twitter_username: Option<String>,
    pub email: Option<String>,
    pub hireable: Option<bool>,
}

/// Repository record from `/users/<login>/repos`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Repository {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    pub html_url: String,
    pub homepage: Option<String>,
    pub language: Option<String>,
    pub stargazers_count: u64,
    pub forks_count: u64,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub topics: Vec<String>,
}

/// Rate limit information from response headers.
#[derive(Debug, Clone, Copy, Default)]
pub struct RateLimit {
    pub limit: u64,
    pub remaining: u64,
    pub reset: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_response_deserializes() {
        let json = serde_json::json!({
            "total_count": 2,
            "incomplete_results": false,
            "items": [
                {
                    "id": 583231,
                    "login": "octocat",
                    "avatar_url": "https://avatars.githubusercontent.com/u/583231?v=4",
                    "type": "User",
                    "score": 1.0
                },
                {
                    "id": 9919,
                    "login": "github",
                    "avatar_url": null,
                    "type": "Organization",
                    "score": 0.5
                }
            ]
        });

        let parsed: SearchUsersResponse = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.total_count, 2);
        assert_eq!(parsed.items.len(), 2);
        assert_eq!(parsed.items[0].login, "octocat");
        assert_eq!(parsed.items[0].user_type, UserType::User);
        assert!(parsed.items[1].avatar_url.is_none());
        assert_eq!(parsed.items[1].user_type, UserType::Organization);
    }

    #[test]
    fn test_unknown_user_type_tolerated() {
        let json = serde_json::json!({
            "id": 1,
            "login": "mannequin",
            "avatar_url": null,
            "type": "Mannequin"
        });

        let parsed: UserSuggestion = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.user_type, UserType::Unknown);
        assert_eq!(parsed.score, 0.0);
    }

    #[test]
    fn test_profile_with_null_fields() {
        let json = serde_json::json!({
            "login": "octocat",
            "name": "The Octocat",
            "avatar_url": "https://avatars.githubusercontent.com/u/583231?v=4",
            "followers": 9001,
            "following": 9,
            "public_repos": 8,
            "created_at": "2011-01-25T18:44:36Z",
            "company": "@github",
            "location": "San Francisco",
            "bio": null,
            "blog": "https://github.blog",
            "twitter_username": null,
            "email": null,
            "hireable": null
        });

        let parsed: UserProfile = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.login, "octocat");
        assert_eq!(parsed.followers, 9001);
        assert!(parsed.bio.is_none());
        assert!(parsed.hireable.is_none());
        assert_eq!(parsed.created_at.format("%Y").to_string(), "2011");
    }

    #[test]
    fn test_repository_without_topics() {
        let json = serde_json::json!({
            "id": 1296269,
            "name": "Hello-World",
            "full_name": "octocat/Hello-World",
            "description": "My first repository on GitHub!",
            "html_url": "https://github.com/octocat/Hello-World",
            "homepage": null,
            "language": null,
            "stargazers_count": 80,
            "forks_count": 9,
            "updated_at": "2024-01-26T19:01:12Z"
        });

        let parsed: Repository = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.full_name, "octocat/Hello-World");
        assert!(parsed.topics.is_empty());
        assert!(parsed.language.is_none());
    }
}
