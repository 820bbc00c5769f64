use crate::domain::digits::{only_digits, truncated_digits};
use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const CPF_LEN: usize = 11;

const INVALID_CPF_HINT: &str = "CPF inválido";

/// A CPF whose length and both check digits have been verified.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cpf(String);

impl Cpf {
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let digits = only_digits(raw);
        if !checksum_matches(&digits) {
            return Err(CoreError::InvalidCpf);
        }
        Ok(Self(digits))
    }

    /// The eleven bare digits.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cpf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_cpf(&self.0))
    }
}

pub fn is_valid_cpf(input: &str) -> bool {
    checksum_matches(&only_digits(input))
}

/// Re-renders whatever digits are present as `XXX.XXX.XXX-XX`, dropping
/// anything past the eleventh digit.
pub fn format_cpf(raw: &str) -> String {
    let digits = truncated_digits(raw, CPF_LEN);
    let mut out = String::with_capacity(CPF_LEN + 3);
    for (idx, ch) in digits.chars().enumerate() {
        match idx {
            3 | 6 => out.push('.'),
            9 => out.push('-'),
            _ => {}
        }
        out.push(ch);
    }
    out
}

/// Message to attach to the CPF field when it loses focus holding a full
/// but invalid number. Partial input is left alone.
pub fn cpf_blur_hint(raw: &str) -> Option<&'static str> {
    let digits = only_digits(raw);
    if digits.len() == CPF_LEN && !checksum_matches(&digits) {
        Some(INVALID_CPF_HINT)
    } else {
        None
    }
}

fn checksum_matches(digits: &str) -> bool {
    if digits.len() != CPF_LEN {
        return false;
    }
    let values: Vec<u32> = digits.chars().filter_map(|ch| ch.to_digit(10)).collect();
    if values.len() != CPF_LEN {
        return false;
    }
    if values.iter().all(|value| *value == values[0]) {
        return false;
    }

    check_digit(&values[..9]) == values[9] && check_digit(&values[..10]) == values[10]
}

// Weights run from len+1 down to 2.
fn check_digit(prefix: &[u32]) -> u32 {
    let top = prefix.len() as u32 + 1;
    let sum: u32 = prefix
        .iter()
        .enumerate()
        .map(|(idx, value)| value * (top - idx as u32))
        .sum();
    let remainder = (sum * 10) % 11;
    if remainder >= 10 {
        0
    } else {
        remainder
    }
}
