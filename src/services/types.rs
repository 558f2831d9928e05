//! Wire types for the dashboard's REST resources.
//!
//! All payloads are camelCase JSON. Timestamps stay as the server's
//! ISO-8601 strings; nothing in the client does date arithmetic.

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 10;

// =============================================================================
// PAGINATION
// =============================================================================

/// One page of a list resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub page_size: u32,
    pub total_items: u64,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

impl<T> Page<T> {
    #[must_use]
    pub fn total_pages(&self) -> u64 {
        if self.page_size == 0 {
            return 0;
        }
        self.total_items.div_ceil(u64::from(self.page_size))
    }
}

/// Which page to ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

impl PageRequest {
    /// Pages are 1-based; zero values are clamped to 1.
    #[must_use]
    pub fn new(page: u32, page_size: u32) -> Self {
        Self { page: page.max(1), page_size: page_size.max(1) }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: DEFAULT_PAGE, page_size: DEFAULT_PAGE_SIZE }
    }
}

// =============================================================================
// AUTH
// =============================================================================

#[derive(Clone, Serialize, Deserialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Roles allowed into the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    SuperAdmin,
}

impl Role {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::SuperAdmin => "super_admin",
        }
    }

    /// Parse a role name, rejecting anything without admin privileges.
    ///
    /// # Errors
    ///
    /// Returns a `403 FORBIDDEN_ROLE` error for non-admin roles.
    pub fn parse_admin(raw: &str) -> Result<Self, ApiError> {
        match raw.trim() {
            "admin" => Ok(Self::Admin),
            "super_admin" => Ok(Self::SuperAdmin),
            _ => Err(ApiError::local(403, "FORBIDDEN_ROLE", "Unauthorized: Admin access required")),
        }
    }
}

#[must_use]
pub fn is_admin_role(role: &str) -> bool {
    Role::parse_admin(role).is_ok()
}

// =============================================================================
// RESOURCES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Admin {
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Brand {
    pub id: u64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website_url: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    Draft,
    Active,
    Paused,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: u64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub brand_id: u64,
    pub start_date: String,
    pub end_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,
    pub status: CampaignStatus,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Influencer {
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub followers_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Filters for `GET /influencers/search`. Unset fields are left out of the query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InfluencerSearch {
    pub query: Option<String>,
    pub platform: Option<String>,
    pub category: Option<String>,
    pub min_followers: Option<u64>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl InfluencerSearch {
    /// Query pairs in wire order, skipping unset filters.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(q) = &self.query {
            pairs.push(("query", q.clone()));
        }
        if let Some(p) = &self.platform {
            pairs.push(("platform", p.clone()));
        }
        if let Some(c) = &self.category {
            pairs.push(("category", c.clone()));
        }
        if let Some(n) = self.min_followers {
            pairs.push(("minFollowers", n.to_string()));
        }
        if let Some(n) = self.page {
            pairs.push(("page", n.to_string()));
        }
        if let Some(n) = self.page_size {
            pairs.push(("pageSize", n.to_string()));
        }
        pairs
    }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
