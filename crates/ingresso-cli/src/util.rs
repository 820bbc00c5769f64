use chrono::Utc;
use ingresso_core::TicketOffer;

pub fn now_utc_ms() -> i64 {
    Utc::now().timestamp_millis()
}

pub fn offer_label(offer: &TicketOffer) -> String {
    match offer {
        TicketOffer::Price(price) => price.to_string(),
        TicketOffer::Link(link) => link.clone(),
    }
}
