pub mod app_config;
pub mod database;
pub mod reservation_repo;
pub mod user_repo;

pub use database::DbClient;
pub use reservation_repo::PgReservationStore;
pub use user_repo::{PgUserRepository, UserStoreError};
