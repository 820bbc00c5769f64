use crate::domain::FormField;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid CPF")]
    InvalidCpf,
    #[error("area code must have 2 digits")]
    InvalidAreaCode,
    #[error("phone must have 8 or 9 digits")]
    InvalidPhone,
    #[error("ticket type is required")]
    MissingTicketType,
    #[error("unknown ticket type: {0}")]
    UnknownTicketType(String),
    #[error("invalid price: {0}")]
    InvalidPrice(String),
    #[error("invalid payment link: {0}")]
    InvalidLink(String),
}

impl CoreError {
    /// The form field a validation failure points at, if any.
    pub fn field(&self) -> Option<FormField> {
        match self {
            CoreError::InvalidCpf => Some(FormField::Cpf),
            CoreError::InvalidAreaCode => Some(FormField::AreaCode),
            CoreError::InvalidPhone => Some(FormField::Phone),
            CoreError::MissingTicketType => Some(FormField::TicketType),
            CoreError::UnknownTicketType(_)
            | CoreError::InvalidPrice(_)
            | CoreError::InvalidLink(_) => None,
        }
    }
}
