use std::sync::Arc;

use crate::backend::BackendClient;
use crate::session::CookieSettings;

#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn BackendClient>,
    pub cookies: CookieSettings,
}
