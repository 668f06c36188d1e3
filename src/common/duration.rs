use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct Duration {
    pub years: u64,
    pub months: u64,
    pub weeks: u64,
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl Duration {
    pub fn new(string: &str) -> Duration {
        debug!("Parsing duration: {}", string);
        let mut duration = Duration::default();

        lazy_static! {
            static ref DURATION_REGEX: Regex = Regex::new(r"(\d+)\s*(y|mo|w|d|h|m|s)").unwrap();
        }

        for capture in DURATION_REGEX.captures_iter(&string.to_lowercase()) {
            let value = match capture.get(1) {
                Some(value) => match value.as_str().parse::<u64>() {
                    Ok(value) => value,
                    Err(_) => return duration,
                },
                None => return duration,
            };

            let unit = match capture.get(2) {
                Some(unit) => unit.as_str(),
                None => return duration,
            };

            match unit {
                "y" => duration.years = value,
                "mo" => duration.months = value,
                "w" => duration.weeks = value,
                "d" => duration.days = value,
                "h" => duration.hours = value,
                "m" => duration.minutes = value,
                "s" => duration.seconds = value,
                _ => {}
            }
        }

        debug!("Parsed duration: {:?}", duration);
        duration
    }

    pub fn to_std(&self) -> std::time::Duration {
        std::time::Duration::from_secs(
            self.seconds
                + (self.minutes * 60)
                + (self.hours * 60 * 60)
                + (self.days * 60 * 60 * 24)
                + (self.weeks * 60 * 60 * 24 * 7)
                + (self.months * 60 * 60 * 24 * 30)
                + (self.years * 60 * 60 * 24 * 365),
        )
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration as StdDuration;

    use super::Duration;

    #[test]
    fn parses_a_single_unit() {
        assert_eq!(Duration::new("1d").to_std(), StdDuration::from_secs(86_400));
        assert_eq!(Duration::new("10m").to_std(), StdDuration::from_secs(600));
        assert_eq!(Duration::new("45s").to_std(), StdDuration::from_secs(45));
    }

    #[test]
    fn parses_combined_units() {
        assert_eq!(
            Duration::new("2h30m").to_std(),
            StdDuration::from_secs(9_000)
        );
        assert_eq!(
            Duration::new("1w2d").to_std(),
            StdDuration::from_secs(9 * 86_400)
        );
    }

    #[test]
    fn is_case_insensitive() {
        assert_eq!(Duration::new("1D").to_std(), StdDuration::from_secs(86_400));
    }

    #[test]
    fn months_come_before_minutes() {
        assert_eq!(
            Duration::new("1mo").to_std(),
            StdDuration::from_secs(30 * 86_400)
        );
    }

    #[test]
    fn garbage_parses_to_zero() {
        assert!(Duration::new("soon").to_std().is_zero());
        assert!(Duration::new("").to_std().is_zero());
        assert!(Duration::new("0m").to_std().is_zero());
    }
}
