use crate::domain::cpf::Cpf;
use crate::domain::phone::{AreaCode, PhoneNumber};
use crate::domain::ticket::TicketSelection;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    Name,
    Cpf,
    AreaCode,
    Phone,
    Email,
    TicketType,
}

impl FormField {
    /// Id of the page element backing this field.
    pub fn element_id(&self) -> &'static str {
        match self {
            FormField::Name => "nome",
            FormField::Cpf => "cpf",
            FormField::AreaCode => "ddd",
            FormField::Phone => "telefone",
            FormField::Email => "email",
            FormField::TicketType => "tipo",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.element_id())
    }
}

/// Raw field values as read from the page at submit time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormInput {
    pub name: String,
    pub cpf: String,
    pub area_code: String,
    pub phone: String,
    pub email: String,
    pub ticket_type: String,
}

/// Output of `validate_form`. Fields are only reachable through accessors,
/// so a value of this type always holds checked data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedForm {
    pub(crate) name: String,
    pub(crate) cpf: Cpf,
    pub(crate) area_code: AreaCode,
    pub(crate) phone: PhoneNumber,
    pub(crate) email: String,
    pub(crate) ticket: TicketSelection,
}

impl ValidatedForm {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cpf(&self) -> &Cpf {
        &self.cpf
    }

    pub fn area_code(&self) -> &AreaCode {
        &self.area_code
    }

    pub fn phone(&self) -> &PhoneNumber {
        &self.phone
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn ticket(&self) -> &TicketSelection {
        &self.ticket
    }
}
