//! HTTP handlers.
//!
//! `public` needs no token; everything in `protected` runs behind
//! `jwt_auth_middleware` and receives the `CurrentUser` extension.

pub mod protected;
pub mod public;

use serde::Deserialize;

use crate::error::ApiError;
use crate::services::Page;
use crate::state::AppState;

/// `skip`/`limit` query parameters shared by list endpoints.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageParams {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

impl PageParams {
    /// Default and cap `limit` from configuration, then validate the window.
    pub fn resolve(self, state: &AppState) -> Result<Page, ApiError> {
        Ok(Page::new(self.skip.unwrap_or(0), state.config.page_limit(self.limit))?)
    }
}
