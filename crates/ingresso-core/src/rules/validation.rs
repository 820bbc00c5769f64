use crate::domain::{AreaCode, Cpf, FormInput, PhoneNumber, TicketSelection, ValidatedForm};
use crate::error::CoreError;

/// Checks the form in page order (CPF, DDD, phone, ticket type) and stops at
/// the first failure.
pub fn validate_form(input: &FormInput) -> Result<ValidatedForm, CoreError> {
    let cpf = Cpf::parse(&input.cpf)?;
    let area_code = AreaCode::parse(&input.area_code)?;
    let phone = PhoneNumber::parse(&input.phone)?;
    let ticket = TicketSelection::parse(&input.ticket_type).ok_or(CoreError::MissingTicketType)?;

    Ok(ValidatedForm {
        name: input.name.trim().to_string(),
        cpf,
        area_code,
        phone,
        email: input.email.trim().to_string(),
        ticket,
    })
}

/// Alert text shown on the page for a failed check.
pub fn rejection_message(err: &CoreError) -> &'static str {
    match err {
        CoreError::InvalidCpf => "Por favor informe um CPF válido.",
        CoreError::InvalidAreaCode => "Por favor informe o DDD com 2 dígitos.",
        CoreError::InvalidPhone => {
            "Por favor informe um telefone com 8 ou 9 dígitos (ex: 912345678)."
        }
        CoreError::MissingTicketType | CoreError::UnknownTicketType(_) => {
            "Por favor escolha um tipo de ingresso."
        }
        CoreError::InvalidPrice(_) | CoreError::InvalidLink(_) => {
            "Erro na criação do pagamento. Tente novamente."
        }
    }
}
