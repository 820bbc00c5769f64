use serde::Serialize;

pub const EXPIRED_BANNER: &str = "O tempo acabou!";

const SECOND_MS: i64 = 1_000;
const MINUTE_MS: i64 = 60 * SECOND_MS;
const HOUR_MS: i64 = 60 * MINUTE_MS;
const DAY_MS: i64 = 24 * HOUR_MS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Countdown {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl Countdown {
    /// `HH:MM:SS`; days are reported separately.
    pub fn clock(&self) -> String {
        format!("{:02}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
    }
}

/// Time left until `deadline_ms`, or `None` once it has passed.
pub fn countdown_until(deadline_ms: i64, now_ms: i64) -> Option<Countdown> {
    let distance = deadline_ms.checked_sub(now_ms)?;
    if distance < 0 {
        return None;
    }
    Some(Countdown {
        days: distance / DAY_MS,
        hours: (distance % DAY_MS) / HOUR_MS,
        minutes: (distance % HOUR_MS) / MINUTE_MS,
        seconds: (distance % MINUTE_MS) / SECOND_MS,
    })
}
