//! Typed services the dashboard views call into. Every service wraps the
//! same [`Dispatcher`](crate::http::Dispatcher), so they all share one
//! refresh coordinator.

pub mod auth;
pub mod resources;
pub mod types;

pub use auth::AuthService;
pub use resources::{AdminsService, BrandsService, CampaignsService, Collection, InfluencersService, Resource};
pub use types::{
    Admin, Brand, Campaign, CampaignStatus, Influencer, InfluencerSearch, LoginCredentials, Page, PageRequest, Role,
    is_admin_role,
};
