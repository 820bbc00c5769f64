use crate::domain::{Price, TicketCatalog, ValidatedForm};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};

/// Body posted to the webhook. Only built from a `ValidatedForm` and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedPayload {
    #[serde(rename = "nome")]
    name: String,
    cpf: String,
    #[serde(rename = "ddd")]
    area_code: String,
    #[serde(rename = "telefone")]
    phone: String,
    email: String,
    #[serde(rename = "tipo")]
    ticket_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    price: Option<Price>,
    #[serde(skip)]
    payment_link: Option<String>,
    #[serde(serialize_with = "serialize_timestamp")]
    timestamp: DateTime<Utc>,
}

impl NormalizedPayload {
    pub fn build(form: ValidatedForm, catalog: &TicketCatalog, now: DateTime<Utc>) -> Self {
        let offer = catalog.offer_for(&form.ticket);
        let price = offer.price();
        let payment_link = offer.payment_link().map(str::to_string);
        Self {
            name: form.name,
            cpf: form.cpf.as_str().to_string(),
            area_code: form.area_code.as_str().to_string(),
            phone: form.phone.as_str().to_string(),
            email: form.email,
            ticket_type: form.ticket.as_str().to_string(),
            price,
            payment_link,
            timestamp: now,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cpf(&self) -> &str {
        &self.cpf
    }

    pub fn area_code(&self) -> &str {
        &self.area_code
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn ticket_type(&self) -> &str {
        &self.ticket_type
    }

    pub fn price(&self) -> Option<Price> {
        self.price
    }

    /// Checkout link from the ticket table, used when the webhook response
    /// does not carry one.
    pub fn payment_link(&self) -> Option<&str> {
        self.payment_link.as_deref()
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

fn serialize_timestamp<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
}
