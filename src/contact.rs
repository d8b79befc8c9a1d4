use std::rc::Rc;

use log::info;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::notification::manager::Notifier;
use crate::notification::severity::Severity;
use crate::scheduler::Scheduler;

/// Delay of the simulated network round trip.
pub const SUBMIT_DELAY_MS: u32 = 2000;

pub const SENT_MESSAGE: &str = "تم إرسال الرسالة بنجاح! سنتواصل معك قريباً";

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// Display strings double as the notices shown to the visitor.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("يرجى ملء جميع الحقول المطلوبة")]
    MissingField,
    #[error("يرجى إدخال بريد إلكتروني صحيح")]
    InvalidEmail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserType {
    Patient,
    Specialist,
    Other,
}

impl UserType {
    pub fn from_value(value: &str) -> Option<Self> {
        match value {
            "patient" => Some(UserType::Patient),
            "specialist" => Some(UserType::Specialist),
            "other" => Some(UserType::Other),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            UserType::Patient => "مريض",
            UserType::Specialist => "متخصص",
            UserType::Other => "مستخدم آخر",
        }
    }
}

/// Raw values read from the contact form.
#[derive(Debug, Clone, Default)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
    pub user_type: String,
}

impl ContactForm {
    pub fn validate(&self) -> Result<(), FormError> {
        let email = self.email.trim();
        if self.name.trim().is_empty() || email.is_empty() || self.message.trim().is_empty() {
            return Err(FormError::MissingField);
        }
        if !is_valid_email(email) {
            return Err(FormError::InvalidEmail);
        }
        Ok(())
    }

    /// Notice shown while the message is "sending".
    pub fn sending_message(&self) -> String {
        match UserType::from_value(self.user_type.trim()) {
            Some(kind) => format!("جاري إرسال رسالتك ({})...", kind.label()),
            None => "جاري إرسال رسالتك...".to_string(),
        }
    }
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Simulated submission. Validation failures become an error toast; a valid
/// form gets an info toast now, then a success toast and `on_sent` after
/// `SUBMIT_DELAY_MS`.
pub fn submit(
    form: &ContactForm,
    notifier: &Notifier,
    scheduler: &Rc<dyn Scheduler>,
    on_sent: Box<dyn FnOnce()>,
) -> Result<(), FormError> {
    if let Err(err) = form.validate() {
        info!("contact form rejected: {:?}", err);
        notifier.notify(err.to_string(), Severity::Error);
        return Err(err);
    }

    notifier.notify(form.sending_message(), Severity::Info);
    let weak = notifier.downgrade();
    scheduler.schedule(
        SUBMIT_DELAY_MS,
        Box::new(move || {
            if let Some(notifier) = weak.upgrade() {
                notifier.notify(SENT_MESSAGE, Severity::Success);
            }
            on_sent();
        }),
    );
    Ok(())
}
