use std::time::Duration;
use anyhow::{anyhow, bail, Result};

const MINUTE: u64 = 60;
const HOUR: u64 = 60 * MINUTE;
const DAY: u64 = 24 * HOUR;

pub enum TimeUnit {
    MilliSecond,
    Second,
    Minute,
    Hour,
    Day,
}

impl TimeUnit {
    pub fn to_duration(&self, n: u64) -> Duration {
        match self {
            TimeUnit::MilliSecond => Duration::from_millis(n),
            TimeUnit::Second => Duration::from_secs(n),
            TimeUnit::Minute => Duration::from_secs(MINUTE.saturating_mul(n)),
            TimeUnit::Hour => Duration::from_secs(HOUR.saturating_mul(n)),
            TimeUnit::Day => Duration::from_secs(DAY.saturating_mul(n)),
        }
    }

    pub fn from(s: &str) -> Result<Self> {
        match s {
            "d" | "D" => Ok(Self::Day),
            "h" | "H" => Ok(Self::Hour),
            "m" | "M" => Ok(Self::Minute),
            "s" | "S" => Ok(Self::Second),
            "ms" => Ok(Self::MilliSecond),
            "" => bail!("missing time unit"),
            _ => bail!("{} is an invalid time unit", s),
        }
    }
}

/// Parses durations such as `250ms`, `5s` or `1h15m10s`.
pub fn parse(s: &str) -> Result<Duration> {
    let s = s.trim();
    if s.is_empty() {
        bail!("empty duration");
    }

    let mut res = Duration::ZERO;
    let mut chars = s.chars().peekable();

    while chars.peek().is_some() {
        let mut num = String::new();
        while let Some(ch) = chars.next_if(|ch| ch.is_ascii_digit()) {
            num.push(ch);
        }

        let mut unit = String::new();
        while let Some(ch) = chars.next_if(|ch| !ch.is_ascii_digit()) {
            unit.push(ch);
        }

        if num.is_empty() {
            bail!("{} is an invalid duration", s);
        }

        let part = TimeUnit::from(&unit)?.to_duration(num.parse()?);
        res = res
            .checked_add(part)
            .ok_or_else(|| anyhow!("{} is too long", s))?;
    }

    Ok(res)
}
