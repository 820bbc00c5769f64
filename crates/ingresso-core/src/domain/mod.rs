pub mod cpf;
pub mod digits;
pub mod form;
pub mod phone;
pub mod ticket;

pub use cpf::{cpf_blur_hint, format_cpf, is_valid_cpf, Cpf, CPF_LEN};
pub use digits::only_digits;
pub use form::{FormField, FormInput, ValidatedForm};
pub use phone::{format_area_code, format_phone, AreaCode, PhoneNumber};
pub use ticket::{Price, TicketCatalog, TicketOffer, TicketSelection, TicketType};
