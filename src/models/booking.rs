//! Booking models shared by the wizard, the admin booking form and the pricing engine.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Bookable venue space.
///
/// Serialized with the labels the booking wizard stores; the short slugs are
/// accepted on input so query strings stay readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RoomChoice {
    #[serde(rename = "Function Room (max 100 guests)", alias = "function_room")]
    FunctionRoom,
    #[serde(rename = "Lounge (max 50 guests)", alias = "lounge")]
    Lounge,
}

impl RoomChoice {
    pub const ALL: [RoomChoice; 2] = [RoomChoice::FunctionRoom, RoomChoice::Lounge];

    /// Label as stored in `pricing_rules.room_choice` and on bookings
    pub fn label(&self) -> &'static str {
        match self {
            RoomChoice::FunctionRoom => "Function Room (max 100 guests)",
            RoomChoice::Lounge => "Lounge (max 50 guests)",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            RoomChoice::FunctionRoom => "function_room",
            RoomChoice::Lounge => "lounge",
        }
    }

    /// Maximum number of guests the room holds
    pub fn capacity(&self) -> u32 {
        match self {
            RoomChoice::FunctionRoom => 100,
            RoomChoice::Lounge => 50,
        }
    }

    /// Packages are only sold for the Function Room; the wizard skips the
    /// package step for the Lounge.
    pub fn offers_packages(&self) -> bool {
        matches!(self, RoomChoice::FunctionRoom)
    }
}

impl fmt::Display for RoomChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown room choice: {0}")]
pub struct UnknownRoomChoice(pub String);

impl FromStr for RoomChoice {
    type Err = UnknownRoomChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RoomChoice::ALL
            .into_iter()
            .find(|room| room.label() == s || room.slug() == s)
            .ok_or_else(|| UnknownRoomChoice(s.to_string()))
    }
}

/// Named packages offered in the wizard's package picker.
pub const PACKAGES: [&str; 6] = [
    "Package 1 - Day",
    "Package 1 - Evening",
    "Package 2 - Day",
    "Package 2 - Evening",
    "Wedding Package 1",
    "Wedding Package 2",
];

/// The selections that drive a quote.
///
/// Built fresh by the caller for every quote request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingConfiguration {
    pub room_choice: Option<RoomChoice>,
    pub package: Option<String>,
    pub guests: u32,
    pub late_bar: bool,
    pub resident_dj: bool,
    pub food_required: bool,
}

impl BookingConfiguration {
    pub fn new(room_choice: RoomChoice) -> Self {
        Self {
            room_choice: Some(room_choice),
            ..Self::default()
        }
    }

    pub fn with_package(mut self, package: impl Into<String>) -> Self {
        self.package = Some(package.into());
        self
    }

    pub fn with_guests(mut self, guests: u32) -> Self {
        self.guests = guests;
        self
    }

    /// Package name, ignoring blank selections
    pub fn selected_package(&self) -> Option<&str> {
        self.package.as_deref().filter(|p| !p.trim().is_empty())
    }
}

/// Field name -> validation messages
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(pub BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    fn merge(&mut self, other: FieldErrors) {
        for (field, messages) in other.0 {
            self.0.entry(field).or_default().extend(messages);
        }
    }

    fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl From<validator::ValidationErrors> for FieldErrors {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut out = FieldErrors::default();
        for (field, errs) in errors.field_errors() {
            for err in errs.iter() {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| err.code.to_string());
                out.add(&field.to_string(), message);
            }
        }
        out
    }
}

/// Contact step of the wizard
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ContactDetails {
    #[validate(length(min = 1, message = "Forename is required"))]
    pub forename: String,
    #[validate(length(min = 1, message = "Surname is required"))]
    pub surname: String,
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Phone number is required"))]
    pub phone: String,
}

/// The eight steps of the public booking wizard, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum WizardStep {
    EventType,
    RoomChoice,
    Package,
    DateGuests,
    AddOns,
    Details,
    Contact,
    Review,
}

impl WizardStep {
    pub const COUNT: u8 = 8;

    pub fn number(&self) -> u8 {
        match self {
            WizardStep::EventType => 1,
            WizardStep::RoomChoice => 2,
            WizardStep::Package => 3,
            WizardStep::DateGuests => 4,
            WizardStep::AddOns => 5,
            WizardStep::Details => 6,
            WizardStep::Contact => 7,
            WizardStep::Review => 8,
        }
    }
}

impl TryFrom<u8> for WizardStep {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(WizardStep::EventType),
            2 => Ok(WizardStep::RoomChoice),
            3 => Ok(WizardStep::Package),
            4 => Ok(WizardStep::DateGuests),
            5 => Ok(WizardStep::AddOns),
            6 => Ok(WizardStep::Details),
            7 => Ok(WizardStep::Contact),
            8 => Ok(WizardStep::Review),
            other => Err(format!(
                "wizard step must be between 1 and {}, got {}",
                WizardStep::COUNT,
                other
            )),
        }
    }
}

impl From<WizardStep> for u8 {
    fn from(step: WizardStep) -> Self {
        step.number()
    }
}

/// Typed state of the booking wizard, validated at each step boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingDraft {
    pub event_types: Vec<String>,
    pub room_choice: Option<RoomChoice>,
    pub package: Option<String>,
    pub event_date: Option<NaiveDate>,
    pub guests: u32,
    pub late_bar: bool,
    pub resident_dj: bool,
    pub food_required: bool,
    pub further_details: Option<String>,
    pub contact: ContactDetails,
    pub food_safety_accepted: bool,
    pub conditions_accepted: bool,
}

impl BookingDraft {
    /// Check the fields owned by `step`. The review step checks everything.
    pub fn validate_step(&self, step: WizardStep) -> Result<(), FieldErrors> {
        match step {
            WizardStep::EventType => self.check_event_types().into_result(),
            WizardStep::RoomChoice => self.check_room().into_result(),
            WizardStep::DateGuests => self.check_date_and_guests().into_result(),
            WizardStep::Contact => self.check_contact().into_result(),
            WizardStep::Package | WizardStep::AddOns | WizardStep::Details => Ok(()),
            WizardStep::Review => {
                let mut errors = self.check_event_types();
                errors.merge(self.check_room());
                errors.merge(self.check_date_and_guests());
                errors.merge(self.check_contact());
                if !self.food_safety_accepted {
                    errors.add(
                        "food_safety_accepted",
                        "You must accept the food safety disclaimer",
                    );
                }
                if !self.conditions_accepted {
                    errors.add(
                        "conditions_accepted",
                        "You must accept the conditions of hire",
                    );
                }
                errors.into_result()
            }
        }
    }

    /// Project the draft onto the pricing input
    pub fn configuration(&self) -> BookingConfiguration {
        BookingConfiguration {
            room_choice: self.room_choice,
            package: self.package.clone(),
            guests: self.guests,
            late_bar: self.late_bar,
            resident_dj: self.resident_dj,
            food_required: self.food_required,
        }
    }

    fn check_event_types(&self) -> FieldErrors {
        let mut errors = FieldErrors::default();
        if self.event_types.is_empty() {
            errors.add("event_types", "Please select at least one event type");
        }
        errors
    }

    fn check_room(&self) -> FieldErrors {
        let mut errors = FieldErrors::default();
        if self.room_choice.is_none() {
            errors.add("room_choice", "Please select a room");
        }
        errors
    }

    fn check_date_and_guests(&self) -> FieldErrors {
        let mut errors = FieldErrors::default();
        if self.event_date.is_none() {
            errors.add("event_date", "Event date is required");
        }
        if self.guests == 0 {
            errors.add("guests", "Number of guests is required");
        } else if let Some(room) = self.room_choice {
            if self.guests > room.capacity() {
                errors.add(
                    "guests",
                    "Number of guests exceeds maximum capacity of selected room",
                );
            }
        }
        errors
    }

    fn check_contact(&self) -> FieldErrors {
        match self.contact.validate() {
            Ok(()) => FieldErrors::default(),
            Err(e) => e.into(),
        }
    }
}
