//! One handle bundling every service over a shared dispatcher.

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{Dispatcher, Transport};
use crate::services::{AdminsService, AuthService, BrandsService, CampaignsService, InfluencersService};
use crate::session::SessionManager;

#[derive(Clone)]
pub struct AdminClient {
    pub dispatcher: Dispatcher,
    pub auth: AuthService,
    pub session: SessionManager,
    pub admins: AdminsService,
    pub brands: BrandsService,
    pub campaigns: CampaignsService,
    pub influencers: InfluencersService,
}

impl AdminClient {
    /// # Errors
    ///
    /// Returns an `UNKNOWN_ERROR` if the HTTP client cannot be built.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        Ok(Self::with_dispatcher(Dispatcher::from_config(config)?))
    }

    #[must_use]
    pub fn with_transport(transport: impl Transport + 'static, refresh_path: &str) -> Self {
        Self::with_dispatcher(Dispatcher::new(transport, refresh_path))
    }

    #[must_use]
    pub fn with_dispatcher(dispatcher: Dispatcher) -> Self {
        let auth = AuthService::new(dispatcher.clone());
        Self {
            session: SessionManager::new(auth.clone()),
            auth,
            admins: AdminsService::new(dispatcher.clone()),
            brands: BrandsService::new(dispatcher.clone()),
            campaigns: CampaignsService::new(dispatcher.clone()),
            influencers: InfluencersService::new(dispatcher.clone()),
            dispatcher,
        }
    }
}
