pub mod booking;
pub mod conflict;
pub mod lifecycle;

pub use booking::AppointmentBookingService;
pub use conflict::{is_available, ConflictDetectionService, APPOINTMENT_LENGTH_MINUTES};
pub use lifecycle::AppointmentLifecycleService;
