pub mod flight;
pub mod trip;

pub use flight::{FlightLeg, FlightOption};
pub use trip::{Activity, DayPlan, Itinerary, TimeOfDay, TripRequest};
