pub mod countdown;
pub mod delivery;
pub mod validation;

pub use countdown::{countdown_until, Countdown, EXPIRED_BANNER};
pub use delivery::{
    validate_timeout_ms, DeliveryMode, DeliveryPolicy, RedirectPolicy, SuccessCriterion,
};
pub use validation::{rejection_message, validate_form};
