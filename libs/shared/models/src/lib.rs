pub mod appointment;
pub mod doctor;
pub mod error;
pub mod patient;

pub use appointment::{
    Appointment, AppointmentChanges, AppointmentFilter, AppointmentStatus, NewAppointment,
};
pub use doctor::{Doctor, NewDoctor};
pub use patient::{NewPatient, Patient};
