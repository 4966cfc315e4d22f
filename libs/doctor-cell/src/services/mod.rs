pub mod doctor;
pub mod slots;

pub use doctor::DoctorService;
pub use slots::{available_slots, day_schedule, working_day, AvailableSlots};
