pub mod event;
pub mod user;
pub mod venue;

pub use event::{Event, EventVenue, EventWithVenues, SPORT_TYPES};
pub use user::User;
pub use venue::Venue;
