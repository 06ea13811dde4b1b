//! Canned reply texts and the booking confirmation template.

pub const FALLBACK: &str = "I’m sorry, I didn’t understand that. Can you elaborate?";
pub const GREETING: &str = "Hello! I am your healthcare assistant. How can I help you today?";
pub const FEVER: &str = "Fever can indicate infection. How long have you had the fever?";
pub const HEADACHE: &str = "A headache could be due to various factors such as stress or dehydration. On a scale of 1-10, how severe is your headache?";
pub const SORE_THROAT: &str = "Sore throat could be a sign of a viral infection. Drink warm fluids. If it persists, you might need a checkup.";
pub const COVID: &str = "COVID-19 symptoms include fever, cough, and loss of taste or smell. Please get tested if you think you have been exposed.";
pub const FEVER_PRESCRIPTION: &str = "For fever, you can take Paracetamol (Tylenol) or Ibuprofen (Advil). Be sure to rest and stay hydrated. If symptoms persist, see a doctor.";
pub const HEADACHE_PRESCRIPTION: &str = "For headaches, you can take over-the-counter medications like Ibuprofen (Advil) or Acetaminophen (Tylenol). Make sure to relax and stay hydrated.";
pub const EMERGENCY: &str = "If this is a medical emergency, please call 911 or visit the nearest emergency room.";
pub const APPOINTMENT_REQUEST: &str = "I can help you book an appointment. Please provide your preferred date and time.";
pub const GOODBYE: &str = "Goodbye! Take care and stay healthy!";

/// Reply selected by the rule cascade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Fallback,
    Greeting,
    Fever,
    Headache,
    SoreThroat,
    Covid,
    FeverPrescription,
    HeadachePrescription,
    Emergency,
    AppointmentRequest,
    AppointmentConfirmed { date: String, time: String },
    Goodbye,
}

impl Reply {
    /// Text sent back to the patient.
    pub fn text(&self) -> String {
        match self {
            Reply::Fallback => FALLBACK.to_string(),
            Reply::Greeting => GREETING.to_string(),
            Reply::Fever => FEVER.to_string(),
            Reply::Headache => HEADACHE.to_string(),
            Reply::SoreThroat => SORE_THROAT.to_string(),
            Reply::Covid => COVID.to_string(),
            Reply::FeverPrescription => FEVER_PRESCRIPTION.to_string(),
            Reply::HeadachePrescription => HEADACHE_PRESCRIPTION.to_string(),
            Reply::Emergency => EMERGENCY.to_string(),
            Reply::AppointmentRequest => APPOINTMENT_REQUEST.to_string(),
            Reply::AppointmentConfirmed { date, time } => appointment_confirmation(date, time),
            Reply::Goodbye => GOODBYE.to_string(),
        }
    }
}

/// Confirmation sent once a booking has been recorded.
pub fn appointment_confirmation(date: &str, time: &str) -> String {
    format!(
        "Your appointment has been scheduled for {date} at {time}. Would you like to provide any additional details?"
    )
}
