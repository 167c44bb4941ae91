use std::sync::Arc;

use villa_core::repository::ReservationStore;
use villa_store::app_config::BookingRules;
use villa_store::{DbClient, PgUserRepository};

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub expiration: u64,
}

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DbClient>,
    pub reservations: Arc<dyn ReservationStore>,
    pub users: Arc<PgUserRepository>,
    pub auth: AuthConfig,
    pub booking: BookingRules,
    pub frontend_dir: String,
}
