use core::fmt;

use super::clock::Millis;

/// Whole seconds between two instants, rendered as `"<n>s"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Elapsed(u64);

impl Elapsed {
    /// Floors to whole seconds. A `now` earlier than `since` counts as zero.
    pub fn between(since: Millis, now: Millis) -> Self {
        let millis = now.saturating_sub(since).max(0);
        Self(millis as u64 / 1000)
    }

    pub const fn zero() -> Self {
        Self(0)
    }
}

impl fmt::Display for Elapsed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

impl From<Elapsed> for String {
    fn from(value: Elapsed) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::Elapsed;
    use pretty_assertions::assert_eq;

    macro_rules! test_elapsed {
        ($($name:ident: $since:expr, $now:expr => $text:literal),+$(,)?) => {
            $(
                #[test]
                fn $name() {
                    assert_eq!(Elapsed::between($since, $now).to_string(), $text)
                }
            )+
        };
    }

    test_elapsed! {
        same_instant: 0, 0 => "0s",
        just_under_a_second: 0, 999 => "0s",
        floors_not_rounds: 0, 2_500 => "2s",
        exact_seconds: 1_000, 4_000 => "3s",
        large_offsets: 1_700_000_000_000, 1_700_000_061_999 => "61s",
        clock_went_backwards: 5_000, 1_000 => "0s",
    }
}
