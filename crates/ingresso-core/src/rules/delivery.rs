use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const WEBHOOK_TIMEOUT_MS: u64 = 2_500;
pub const PAYMENT_LINK_TIMEOUT_MS: u64 = 7_000;
pub const MAX_TIMEOUT_MS: u64 = 60_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeliveryMode {
    /// Fire the payload at an automation webhook and move on.
    Webhook,
    /// Ask the remote side for a checkout link and send the buyer there.
    PaymentLink,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SuccessCriterion {
    Status2xx,
    PaymentLink,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RedirectPolicy {
    /// Send the buyer to the thank-you page even when delivery failed.
    Always,
    /// Halt with an alert unless delivery succeeded.
    OnSuccess,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryPolicy {
    pub timeout: Duration,
    pub success: SuccessCriterion,
    pub fallback_enabled: bool,
    pub redirect: RedirectPolicy,
}

impl DeliveryPolicy {
    pub fn preset(mode: DeliveryMode) -> Self {
        match mode {
            DeliveryMode::Webhook => Self {
                timeout: Duration::from_millis(WEBHOOK_TIMEOUT_MS),
                success: SuccessCriterion::Status2xx,
                fallback_enabled: true,
                redirect: RedirectPolicy::Always,
            },
            DeliveryMode::PaymentLink => Self {
                timeout: Duration::from_millis(PAYMENT_LINK_TIMEOUT_MS),
                success: SuccessCriterion::PaymentLink,
                fallback_enabled: false,
                redirect: RedirectPolicy::OnSuccess,
            },
        }
    }
}

pub fn validate_timeout_ms(value: u64) -> Option<Duration> {
    if value == 0 || value > MAX_TIMEOUT_MS {
        None
    } else {
        Some(Duration::from_millis(value))
    }
}

#[cfg(test)]
mod tests {
    use super::{validate_timeout_ms, DeliveryMode, DeliveryPolicy, RedirectPolicy, SuccessCriterion};
    use std::time::Duration;

    #[test]
    fn presets_match_the_two_page_flows() {
        let webhook = DeliveryPolicy::preset(DeliveryMode::Webhook);
        assert_eq!(webhook.timeout, Duration::from_millis(2_500));
        assert!(webhook.fallback_enabled);
        assert_eq!(webhook.redirect, RedirectPolicy::Always);

        let payment = DeliveryPolicy::preset(DeliveryMode::PaymentLink);
        assert_eq!(payment.timeout, Duration::from_millis(7_000));
        assert_eq!(payment.success, SuccessCriterion::PaymentLink);
        assert!(!payment.fallback_enabled);
        assert_eq!(payment.redirect, RedirectPolicy::OnSuccess);
    }

    #[test]
    fn timeout_bounds() {
        assert!(validate_timeout_ms(0).is_none());
        assert!(validate_timeout_ms(60_001).is_none());
        assert_eq!(validate_timeout_ms(1), Some(Duration::from_millis(1)));
    }
}
