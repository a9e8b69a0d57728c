//! Draft appointment record and its field vocabulary

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Pet gender as accepted by the scheduling service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PetGender {
    Male,
    Female,
    Other,
}

impl PetGender {
    pub const ALL: [PetGender; 3] = [Self::Male, Self::Female, Self::Other];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "MALE",
            Self::Female => "FEMALE",
            Self::Other => "OTHER",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Other => "Other",
        }
    }
}

impl FromStr for PetGender {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|g| g.as_str() == s).ok_or(())
    }
}

/// Payment method chosen for the visit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    CreditCard,
    Paypal,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 3] = [Self::Cash, Self::CreditCard, Self::Paypal];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::CreditCard => "credit_card",
            Self::Paypal => "paypal",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Cash => "Cash",
            Self::CreditCard => "Credit card",
            Self::Paypal => "PayPal",
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|m| m.as_str() == s).ok_or(())
    }
}

/// Appointment status. New bookings are always created as pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    #[default]
    Pending,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
        }
    }
}

/// Editable fields of a draft, keyed by their wire names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DraftField {
    CustomerName,
    CustomerPhone,
    AppointmentTime,
    VetDoctor,
    PetName,
    PetType,
    PetAge,
    PetBreed,
    PetGender,
    PaymentMethod,
    Note,
}

impl DraftField {
    /// Form order
    pub const ALL: [DraftField; 11] = [
        Self::CustomerName,
        Self::CustomerPhone,
        Self::AppointmentTime,
        Self::VetDoctor,
        Self::PetName,
        Self::PetType,
        Self::PetAge,
        Self::PetBreed,
        Self::PetGender,
        Self::PaymentMethod,
        Self::Note,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Self::CustomerName => "customerName",
            Self::CustomerPhone => "customerPhone",
            Self::AppointmentTime => "appointmentTime",
            Self::VetDoctor => "vetDoctor",
            Self::PetName => "petName",
            Self::PetType => "petType",
            Self::PetAge => "petAge",
            Self::PetBreed => "petBreed",
            Self::PetGender => "petGender",
            Self::PaymentMethod => "paymentMethod",
            Self::Note => "note",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::CustomerName => "Customer name",
            Self::CustomerPhone => "Phone number",
            Self::AppointmentTime => "Appointment time",
            Self::VetDoctor => "Doctor",
            Self::PetName => "Pet name",
            Self::PetType => "Pet type",
            Self::PetAge => "Age",
            Self::PetBreed => "Breed",
            Self::PetGender => "Gender",
            Self::PaymentMethod => "Payment method",
            Self::Note => "Note",
        }
    }

    pub fn is_required(&self) -> bool {
        !matches!(self, Self::Note)
    }

    /// Fields whose value must come from a fixed option set
    pub fn is_choice(&self) -> bool {
        matches!(self, Self::VetDoctor | Self::PetGender | Self::PaymentMethod)
    }
}

impl fmt::Display for DraftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for DraftField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.key() == s)
            .ok_or_else(|| s.to_string())
    }
}

/// A value that does not belong to an enum field's option set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidChoice {
    pub field: DraftField,
    pub value: String,
}

/// In-progress appointment record. Text values are kept verbatim as entered.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DraftAppointment {
    pub customer_name: String,
    pub customer_phone: String,
    pub appointment_time: String,
    pub vet_doctor: String,
    pub status: AppointmentStatus,
    pub note: String,
    pub pet_name: String,
    pub pet_type: String,
    pub pet_age: String,
    pub pet_breed: String,
    pub pet_gender: Option<PetGender>,
    pub payment_method: Option<PaymentMethod>,
}

impl DraftAppointment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value of a field; unselected choices read as the empty string
    pub fn value(&self, field: DraftField) -> &str {
        match field {
            DraftField::CustomerName => &self.customer_name,
            DraftField::CustomerPhone => &self.customer_phone,
            DraftField::AppointmentTime => &self.appointment_time,
            DraftField::VetDoctor => &self.vet_doctor,
            DraftField::PetName => &self.pet_name,
            DraftField::PetType => &self.pet_type,
            DraftField::PetAge => &self.pet_age,
            DraftField::PetBreed => &self.pet_breed,
            DraftField::PetGender => self.pet_gender.map(|g| g.as_str()).unwrap_or(""),
            DraftField::PaymentMethod => self.payment_method.map(|m| m.as_str()).unwrap_or(""),
            DraftField::Note => &self.note,
        }
    }

    /// Store a value. Enum fields only accept their wire values or the empty
    /// string, which clears the selection; a rejected value leaves the field
    /// untouched.
    pub fn set(&mut self, field: DraftField, value: String) -> Result<(), InvalidChoice> {
        match field {
            DraftField::CustomerName => self.customer_name = value,
            DraftField::CustomerPhone => self.customer_phone = value,
            DraftField::AppointmentTime => self.appointment_time = value,
            DraftField::VetDoctor => self.vet_doctor = value,
            DraftField::PetName => self.pet_name = value,
            DraftField::PetType => self.pet_type = value,
            DraftField::PetAge => self.pet_age = value,
            DraftField::PetBreed => self.pet_breed = value,
            DraftField::Note => self.note = value,
            DraftField::PetGender => {
                self.pet_gender = parse_choice(field, value)?;
            }
            DraftField::PaymentMethod => {
                self.payment_method = parse_choice(field, value)?;
            }
        }
        Ok(())
    }
}

fn parse_choice<T: FromStr>(field: DraftField, value: String) -> Result<Option<T>, InvalidChoice> {
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse()
        .map(Some)
        .map_err(|_| InvalidChoice { field, value })
}
