pub mod gateway;
pub mod selector;

pub use gateway::{GatewayResponse, NetworkError, ReservationGateway};
pub use selector::{StaySelector, SubmitFeedback, Summary};
