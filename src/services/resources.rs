//! CRUD services for the dashboard's list/detail resources.
//!
//! Each resource is a [`Collection`] over its entity type. Campaigns and
//! influencers add their extra list queries as inherent impls.

use std::marker::PhantomData;

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::http::{ApiRequest, Dispatcher};

use super::types::{Admin, Brand, Campaign, Influencer, InfluencerSearch, Page, PageRequest};

/// An entity served under a fixed collection path.
pub trait Resource: DeserializeOwned {
    const PATH: &'static str;
}

impl Resource for Admin {
    const PATH: &'static str = "/admins";
}

impl Resource for Brand {
    const PATH: &'static str = "/brands";
}

impl Resource for Campaign {
    const PATH: &'static str = "/campaigns";
}

impl Resource for Influencer {
    const PATH: &'static str = "/influencers";
}

pub type AdminsService = Collection<Admin>;
pub type BrandsService = Collection<Brand>;
pub type CampaignsService = Collection<Campaign>;
pub type InfluencersService = Collection<Influencer>;

/// Typed CRUD access to one resource collection.
pub struct Collection<T> {
    dispatcher: Dispatcher,
    _entity: PhantomData<fn() -> T>,
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self { dispatcher: self.dispatcher.clone(), _entity: PhantomData }
    }
}

impl<T: Resource> Collection<T> {
    #[must_use]
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher, _entity: PhantomData }
    }

    /// `GET <path>?page=<n>&pageSize=<m>`
    ///
    /// # Errors
    ///
    /// Returns a normalized [`ApiError`] on any failure.
    pub async fn list(&self, page: PageRequest) -> Result<Page<T>, ApiError> {
        let path = with_query(T::PATH, &page_pairs(page));
        self.dispatcher.get(&path).await
    }

    /// # Errors
    ///
    /// Returns a normalized [`ApiError`] on any failure.
    pub async fn get(&self, id: u64) -> Result<T, ApiError> {
        self.dispatcher.get(&item_path::<T>(id)).await
    }

    /// # Errors
    ///
    /// Returns a normalized [`ApiError`] on any failure.
    pub async fn create(&self, data: &impl Serialize) -> Result<T, ApiError> {
        self.dispatcher.post(T::PATH, Some(data)).await
    }

    /// Partial update via `PATCH`.
    ///
    /// # Errors
    ///
    /// Returns a normalized [`ApiError`] on any failure.
    pub async fn update(&self, id: u64, data: &impl Serialize) -> Result<T, ApiError> {
        self.dispatcher.patch(&item_path::<T>(id), data).await
    }

    /// Any success body (empty, `{"message": ...}`, the deleted record) is
    /// discarded.
    ///
    /// # Errors
    ///
    /// Returns a normalized [`ApiError`] on any failure.
    pub async fn delete(&self, id: u64) -> Result<(), ApiError> {
        let request = ApiRequest::new(Method::DELETE, item_path::<T>(id), None);
        self.dispatcher.send(request).await.map(drop)
    }
}

impl Collection<Campaign> {
    /// `GET /campaigns?brandId=<id>&page=<n>&pageSize=<m>`
    ///
    /// # Errors
    ///
    /// Returns a normalized [`ApiError`] on any failure.
    pub async fn list_by_brand(&self, brand_id: u64, page: PageRequest) -> Result<Page<Campaign>, ApiError> {
        let mut pairs = vec![("brandId", brand_id.to_string())];
        pairs.extend(page_pairs(page));
        self.dispatcher.get(&with_query(Campaign::PATH, &pairs)).await
    }
}

impl Collection<Influencer> {
    /// `GET /influencers/search?...` with only the filters that are set.
    ///
    /// # Errors
    ///
    /// Returns a normalized [`ApiError`] on any failure.
    pub async fn search(&self, params: &InfluencerSearch) -> Result<Page<Influencer>, ApiError> {
        let path = format!("{}/search", Influencer::PATH);
        self.dispatcher.get(&with_query(&path, &params.query_pairs())).await
    }
}

fn item_path<T: Resource>(id: u64) -> String {
    format!("{}/{id}", T::PATH)
}

fn page_pairs(page: PageRequest) -> Vec<(&'static str, String)> {
    vec![("page", page.page.to_string()), ("pageSize", page.page_size.to_string())]
}

/// Append form-encoded query pairs to `path`.
pub(crate) fn with_query(path: &str, pairs: &[(&str, String)]) -> String {
    if pairs.is_empty() {
        return path.to_owned();
    }
    let Ok(mut scratch) = reqwest::Url::parse("http://query.invalid/") else {
        return path.to_owned();
    };
    scratch
        .query_pairs_mut()
        .extend_pairs(pairs.iter().map(|(k, v)| (*k, v.as_str())));
    format!("{path}?{}", scratch.query().unwrap_or_default())
}

#[cfg(test)]
#[path = "resources_test.rs"]
mod tests;
