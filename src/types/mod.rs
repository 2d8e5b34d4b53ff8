pub mod itinerary_types;
pub mod request;
pub mod response;
pub mod trip;

pub use itinerary_types::{Activity, DayPlan, Itinerary};
pub use request::{ChatMessage, Envelope, Mode, RelayRequest, RequestKind, Role};
pub use response::{parse_structured_text, strip_code_fences, RelayFailure, RelaySuccess};
pub use trip::TripPreferences;
