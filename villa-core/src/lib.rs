pub mod authority;
pub mod identity;
pub mod repository;
pub mod stay;

pub use authority::{reserve, ReserveError};
pub use repository::{Reservation, ReservationStore, StoreError};
pub use stay::{parse_stay_date, validate_stay, StayError, StayRange};
