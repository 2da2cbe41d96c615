//! Domain models for bookings

pub mod booking;

pub use booking::{
    BookingConfiguration, BookingDraft, ContactDetails, FieldErrors, RoomChoice, UnknownRoomChoice,
    WizardStep, PACKAGES,
};
