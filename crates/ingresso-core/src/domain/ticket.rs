use crate::error::CoreError;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use url::{Host, Url};

const MAX_PRICE_CENTS: u64 = 10_000_000_000;
const DEFAULT_PRICE_CENTS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TicketType {
    PistaIndividual,
    PistaCasadinha,
    BackstageIndividual,
    BackstageCasadinha,
    EarlyEntryPista,
    EarlyEntryBackstage,
}

impl TicketType {
    pub const ALL: [TicketType; 6] = [
        TicketType::PistaIndividual,
        TicketType::PistaCasadinha,
        TicketType::BackstageIndividual,
        TicketType::BackstageCasadinha,
        TicketType::EarlyEntryPista,
        TicketType::EarlyEntryBackstage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TicketType::PistaIndividual => "pista-individual",
            TicketType::PistaCasadinha => "pista-casadinha",
            TicketType::BackstageIndividual => "backstage-individual",
            TicketType::BackstageCasadinha => "backstage-casadinha",
            TicketType::EarlyEntryPista => "early-entry-pista",
            TicketType::EarlyEntryBackstage => "early-entry-backstage",
        }
    }
}

impl fmt::Display for TicketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TicketType {
    type Err = CoreError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        TicketType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == trimmed)
            .ok_or_else(|| CoreError::UnknownTicketType(trimmed.to_string()))
    }
}

/// What the user picked in the `tipo` selector. Unknown values are kept
/// verbatim so the payload reports exactly what was submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TicketSelection {
    Known(TicketType),
    Unknown(String),
}

impl TicketSelection {
    /// Returns `None` for a blank selection. Only an exact slug is known;
    /// anything else, surrounding whitespace included, is kept as given.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.trim().is_empty() {
            return None;
        }
        Some(
            match TicketType::ALL.into_iter().find(|kind| kind.as_str() == raw) {
                Some(kind) => TicketSelection::Known(kind),
                None => TicketSelection::Unknown(raw.to_string()),
            },
        )
    }

    pub fn as_str(&self) -> &str {
        match self {
            TicketSelection::Known(kind) => kind.as_str(),
            TicketSelection::Unknown(raw) => raw,
        }
    }

    pub fn known(&self) -> Option<TicketType> {
        match self {
            TicketSelection::Known(kind) => Some(*kind),
            TicketSelection::Unknown(_) => None,
        }
    }
}

/// Price in centavos. On the wire it is a number of reais.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price {
    cents: u64,
}

impl Price {
    pub const ZERO: Price = Price { cents: 0 };

    pub fn from_cents(cents: u64) -> Self {
        Self { cents }
    }

    pub fn from_reais(value: f64) -> Result<Self, CoreError> {
        if !value.is_finite() || value < 0.0 {
            return Err(CoreError::InvalidPrice(value.to_string()));
        }
        let cents = (value * 100.0).round();
        if cents > MAX_PRICE_CENTS as f64 {
            return Err(CoreError::InvalidPrice(value.to_string()));
        }
        Ok(Self {
            cents: cents as u64,
        })
    }

    pub fn cents(&self) -> u64 {
        self.cents
    }

    pub fn as_reais(&self) -> f64 {
        self.cents as f64 / 100.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R$ {},{:02}", self.cents / 100, self.cents % 100)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_reais())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketOffer {
    Price(Price),
    Link(String),
}

impl TicketOffer {
    /// Accepts an absolute `http`/`https` URL with a host.
    pub fn link(raw: &str) -> Result<Self, CoreError> {
        let trimmed = raw.trim();
        let invalid = || CoreError::InvalidLink(trimmed.to_string());
        let url = Url::parse(trimmed).map_err(|_| invalid())?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid());
        }
        let host_ok = match url.host() {
            Some(Host::Domain(domain)) => {
                !domain.is_empty()
                    && domain
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.')
            }
            Some(Host::Ipv4(_)) | Some(Host::Ipv6(_)) => true,
            None => false,
        };
        if !host_ok {
            return Err(invalid());
        }
        Ok(TicketOffer::Link(trimmed.to_string()))
    }

    pub fn price(&self) -> Option<Price> {
        match self {
            TicketOffer::Price(price) => Some(*price),
            TicketOffer::Link(_) => None,
        }
    }

    pub fn payment_link(&self) -> Option<&str> {
        match self {
            TicketOffer::Price(_) => None,
            TicketOffer::Link(link) => Some(link),
        }
    }
}

/// Immutable ticket table. Built once and shared read-only by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketCatalog {
    offers: BTreeMap<TicketType, TicketOffer>,
    fallback: TicketOffer,
}

impl TicketCatalog {
    pub fn new(offers: BTreeMap<TicketType, TicketOffer>, fallback: TicketOffer) -> Self {
        Self { offers, fallback }
    }

    pub fn offer_for(&self, selection: &TicketSelection) -> &TicketOffer {
        selection
            .known()
            .and_then(|kind| self.offers.get(&kind))
            .unwrap_or(&self.fallback)
    }

    pub fn get(&self, kind: TicketType) -> Option<&TicketOffer> {
        self.offers.get(&kind)
    }

    pub fn fallback(&self) -> &TicketOffer {
        &self.fallback
    }

    pub fn iter(&self) -> impl Iterator<Item = (TicketType, &TicketOffer)> {
        self.offers.iter().map(|(kind, offer)| (*kind, offer))
    }
}

impl Default for TicketCatalog {
    fn default() -> Self {
        let offers = TicketType::ALL
            .into_iter()
            .map(|kind| (kind, TicketOffer::Price(Price::from_cents(DEFAULT_PRICE_CENTS))))
            .collect();
        Self::new(offers, TicketOffer::Price(Price::ZERO))
    }
}

#[cfg(test)]
mod tests {
    use super::{Price, TicketCatalog, TicketOffer, TicketSelection, TicketType};
    use std::collections::BTreeMap;

    #[test]
    fn ticket_type_round_trips_through_slug() {
        for kind in TicketType::ALL {
            assert_eq!(kind.as_str().parse::<TicketType>().expect("parse"), kind);
        }
        assert!("vip".parse::<TicketType>().is_err());
    }

    #[test]
    fn selection_keeps_unknown_values() {
        assert_eq!(TicketSelection::parse("  "), None);
        assert_eq!(
            TicketSelection::parse("pista-casadinha"),
            Some(TicketSelection::Known(TicketType::PistaCasadinha))
        );
        let unknown = TicketSelection::parse("camarote").expect("selection");
        assert_eq!(unknown.as_str(), "camarote");
        assert_eq!(unknown.known(), None);
    }

    #[test]
    fn selection_is_kept_verbatim() {
        let padded = TicketSelection::parse(" camarote ").expect("selection");
        assert_eq!(padded.as_str(), " camarote ");
        let padded_known = TicketSelection::parse("pista-individual ").expect("selection");
        assert_eq!(padded_known.as_str(), "pista-individual ");
        assert_eq!(padded_known.known(), None);
    }

    #[test]
    fn price_from_reais_rounds_to_centavos() {
        assert_eq!(Price::from_reais(0.10).expect("price").cents(), 10);
        assert_eq!(Price::from_reais(149.9).expect("price").cents(), 14990);
        assert!(Price::from_reais(-1.0).is_err());
        assert!(Price::from_reais(f64::NAN).is_err());
    }

    #[test]
    fn price_displays_in_reais() {
        assert_eq!(Price::from_cents(10).to_string(), "R$ 0,10");
        assert_eq!(Price::from_cents(14990).to_string(), "R$ 149,90");
    }

    #[test]
    fn default_catalog_prices_every_type() {
        let catalog = TicketCatalog::default();
        for kind in TicketType::ALL {
            assert_eq!(
                catalog.get(kind),
                Some(&TicketOffer::Price(Price::from_cents(10)))
            );
        }
        assert_eq!(catalog.fallback(), &TicketOffer::Price(Price::ZERO));
    }

    #[test]
    fn unknown_or_missing_types_use_fallback() {
        let mut offers = BTreeMap::new();
        offers.insert(
            TicketType::BackstageIndividual,
            TicketOffer::link("https://pay.example.com/backstage").expect("link"),
        );
        let fallback = TicketOffer::link("https://pay.example.com/geral").expect("link");
        let catalog = TicketCatalog::new(offers, fallback.clone());

        let backstage = TicketSelection::Known(TicketType::BackstageIndividual);
        assert_eq!(
            catalog.offer_for(&backstage).payment_link(),
            Some("https://pay.example.com/backstage")
        );
        let pista = TicketSelection::Known(TicketType::PistaIndividual);
        assert_eq!(catalog.offer_for(&pista), &fallback);
        let unknown = TicketSelection::Unknown("camarote".to_string());
        assert_eq!(catalog.offer_for(&unknown), &fallback);
    }

    #[test]
    fn link_offer_requires_http_url() {
        assert!(TicketOffer::link("ftp://example.com").is_err());
        assert!(TicketOffer::link("https://").is_err());
        assert!(TicketOffer::link("obrigado.html").is_err());
    }

    #[test]
    fn link_offer_rejects_malformed_urls() {
        for raw in [
            "https://exa mple.com/pay",
            "https://:::",
            "http://[bad",
            "https://a\"b",
            "mailto:pay@example.com",
        ] {
            assert!(TicketOffer::link(raw).is_err(), "accepted {raw:?}");
        }
        assert_eq!(
            TicketOffer::link(" https://pay.example.com/pista ")
                .expect("link")
                .payment_link(),
            Some("https://pay.example.com/pista")
        );
        assert!(TicketOffer::link("http://127.0.0.1:8080/pay").is_ok());
    }
}
