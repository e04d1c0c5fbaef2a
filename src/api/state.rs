use std::sync::Arc;

use crate::config::AppConfig;
use crate::upstream::FaceitApi;

#[derive(Clone)]
pub struct AppState {
    pub api: FaceitApi,
    pub config: Arc<AppConfig>,
}
