pub mod attendee;
pub mod event;
pub mod location;
pub mod session;
pub mod user;

pub use attendee::{Attendee, ListedAttendee, NewAttendee};
pub use event::{Event, EventInput};
pub use location::{Location, LocationInput};
pub use session::Session;
pub use user::{User, UserInput};
