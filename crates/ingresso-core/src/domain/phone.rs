use crate::domain::digits::{only_digits, truncated_digits};
use crate::error::CoreError;
use serde::{Deserialize, Serialize};

pub const AREA_CODE_LEN: usize = 2;
pub const PHONE_MIN_LEN: usize = 8;
pub const PHONE_MAX_LEN: usize = 9;

/// Two-digit DDD.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AreaCode(String);

impl AreaCode {
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let digits = only_digits(raw);
        if digits.len() != AREA_CODE_LEN {
            return Err(CoreError::InvalidAreaCode);
        }
        Ok(Self(digits))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Local number without the area code: 8 digits for landlines, 9 for mobiles.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let digits = only_digits(raw);
        if !(PHONE_MIN_LEN..=PHONE_MAX_LEN).contains(&digits.len()) {
            return Err(CoreError::InvalidPhone);
        }
        Ok(Self(digits))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

pub fn format_area_code(raw: &str) -> String {
    truncated_digits(raw, AREA_CODE_LEN)
}

pub fn format_phone(raw: &str) -> String {
    truncated_digits(raw, PHONE_MAX_LEN)
}
