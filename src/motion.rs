//! Timed effects: skill-bar widths, stat counters and the typewriter.
//!
//! Everything here is clock-free. The browser layer feeds elapsed time or
//! timer ticks in and writes the returned text back to the page.

pub const COUNTER_DURATION_MS: f64 = 1_500.0;
pub const MILLIONS_THRESHOLD: f64 = 1_000_000.0;

pub const TYPE_DELAY_MS: u32 = 120;
pub const DELETE_DELAY_MS: u32 = 80;
pub const HOLD_DELAY_MS: u32 = 1_200;

pub const DEFAULT_ROLES: [&str; 5] = [
    "Leader",
    "Entrepreneur",
    "Visionary",
    "Trailblazer",
    "Strategist",
];

fn parse_number(raw: Option<&str>) -> Option<f64> {
    raw.map(str::trim)
        .and_then(|value| value.parse::<f64>().ok())
        .filter(|value| value.is_finite())
}

/// CSS width for a progress bar from its `data-percent` attribute.
pub fn skill_bar_width(percent: Option<&str>) -> Option<String> {
    let percent = parse_number(percent)?.clamp(0.0, 100.0);
    Some(format!("{percent}%"))
}

#[derive(Clone, Debug, PartialEq)]
pub struct CounterSpec {
    pub target: f64,
    pub multiplier: f64,
    pub suffix: String,
}

impl CounterSpec {
    /// Reads the raw `data-target`, `data-multiplier` and `data-suffix`
    /// values. A missing, unparsable or zero target counts as 0 and a
    /// missing, unparsable or zero multiplier counts as 1.
    pub fn from_attributes(
        target: Option<&str>,
        multiplier: Option<&str>,
        suffix: Option<&str>,
    ) -> Self {
        let target = parse_number(target).unwrap_or(0.0);
        let multiplier = parse_number(multiplier)
            .filter(|value| *value != 0.0)
            .unwrap_or(1.0);

        Self {
            target,
            multiplier,
            suffix: suffix.unwrap_or_default().to_string(),
        }
    }

    pub fn final_value(&self) -> f64 {
        self.target * self.multiplier
    }

    pub fn format(&self, current: f64) -> String {
        let display = if self.multiplier >= MILLIONS_THRESHOLD {
            let millions = current / MILLIONS_THRESHOLD;
            to_fixed(millions, if millions < 10.0 { 1 } else { 0 })
        } else {
            format!("{}", current as i64)
        };

        format!("{display}{}", self.suffix)
    }
}

/// Fixed-point formatting with browser `toFixed` rounding: nearest from the
/// exact binary value, exact halves away from zero.
fn to_fixed(value: f64, digits: usize) -> String {
    // An exact half at `digits` places is an odd multiple of 2^-(digits + 1).
    let halves = value * 2f64.powi(digits as i32 + 1);
    let exact_tie = halves.fract() == 0.0 && halves.rem_euclid(2.0) == 1.0;

    let value = if exact_tie {
        let scale = 10f64.powi(digits as i32);
        (value * scale).round() / scale
    } else {
        value
    };

    format!("{:.*}", digits, value + 0.0)
}

#[derive(Clone, Debug, PartialEq)]
pub struct CounterFrame {
    pub text: String,
    pub finished: bool,
}

#[derive(Clone, Debug)]
pub struct CounterAnimation {
    spec: CounterSpec,
    final_value: f64,
}

impl CounterAnimation {
    pub fn new(spec: CounterSpec) -> Self {
        let final_value = spec.final_value();
        Self { spec, final_value }
    }

    pub fn progress(elapsed_ms: f64) -> f64 {
        (elapsed_ms / COUNTER_DURATION_MS).clamp(0.0, 1.0)
    }

    pub fn frame(&self, elapsed_ms: f64) -> CounterFrame {
        let progress = Self::progress(elapsed_ms);
        let current = (progress * self.final_value).floor();

        CounterFrame {
            text: self.spec.format(current),
            finished: progress >= 1.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypewriterStep {
    pub text: String,
    pub delay_ms: u32,
}

/// Character-by-character type/hold/delete cycle over a fixed word list.
#[derive(Clone, Debug)]
pub struct Typewriter {
    words: Vec<Vec<char>>,
    word_index: usize,
    char_index: usize,
    deleting: bool,
}

impl Typewriter {
    /// Empty words are dropped; returns `None` when nothing is left to type.
    pub fn new<I, S>(words: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words: Vec<Vec<char>> = words
            .into_iter()
            .map(|word| word.as_ref().chars().collect::<Vec<_>>())
            .filter(|word| !word.is_empty())
            .collect();

        if words.is_empty() {
            return None;
        }

        Some(Self {
            words,
            word_index: 0,
            char_index: 0,
            deleting: false,
        })
    }

    #[cfg(test)]
    fn word_index(&self) -> usize {
        self.word_index
    }

    #[cfg(test)]
    fn word_count(&self) -> usize {
        self.words.len()
    }

    /// Advances one character and returns the text to show plus the delay
    /// before the next tick.
    pub fn tick(&mut self) -> TypewriterStep {
        let word = &self.words[self.word_index];

        if !self.deleting {
            self.char_index += 1;
            let text = word[..self.char_index].iter().collect();

            if self.char_index == word.len() {
                self.deleting = true;
                return TypewriterStep {
                    text,
                    delay_ms: HOLD_DELAY_MS,
                };
            }

            return TypewriterStep {
                text,
                delay_ms: TYPE_DELAY_MS,
            };
        }

        self.char_index -= 1;
        let text = word[..self.char_index].iter().collect();

        if self.char_index == 0 {
            self.deleting = false;
            self.word_index = (self.word_index + 1) % self.words.len();
            return TypewriterStep {
                text,
                delay_ms: TYPE_DELAY_MS,
            };
        }

        TypewriterStep {
            text,
            delay_ms: DELETE_DELAY_MS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skill_bar_width_uses_the_percent_attribute() {
        assert_eq!(skill_bar_width(Some("85")).as_deref(), Some("85%"));
        assert_eq!(skill_bar_width(Some(" 72.5 ")).as_deref(), Some("72.5%"));
    }

    #[test]
    fn skill_bar_width_clamps_and_skips_garbage() {
        assert_eq!(skill_bar_width(Some("140")).as_deref(), Some("100%"));
        assert_eq!(skill_bar_width(Some("-3")).as_deref(), Some("0%"));
        assert_eq!(skill_bar_width(Some("lots")), None);
        assert_eq!(skill_bar_width(None), None);
    }

    #[test]
    fn counter_in_millions_ends_with_one_decimal() {
        let spec = CounterSpec::from_attributes(Some("5"), Some("1000000"), Some("+"));
        let animation = CounterAnimation::new(spec);

        let frame = animation.frame(COUNTER_DURATION_MS);
        assert_eq!(frame.text, "5.0+");
        assert!(frame.finished);
    }

    #[test]
    fn plain_counter_ends_on_the_raw_integer() {
        let spec = CounterSpec::from_attributes(Some("250"), Some("1"), Some("+"));
        let animation = CounterAnimation::new(spec);

        assert_eq!(animation.frame(2_000.0).text, "250+");
    }

    #[test]
    fn counter_interpolates_linearly_and_floors() {
        let spec = CounterSpec::from_attributes(Some("250"), None, None);
        let animation = CounterAnimation::new(spec);

        let start = animation.frame(0.0);
        assert_eq!(start.text, "0");
        assert!(!start.finished);

        assert_eq!(animation.frame(750.0).text, "125");
        assert_eq!(animation.frame(1.0).text, "0");
    }

    #[test]
    fn millions_at_ten_or_more_drop_the_decimal() {
        let spec = CounterSpec::from_attributes(Some("12"), Some("1000000"), Some("M+"));
        let animation = CounterAnimation::new(spec);

        assert_eq!(animation.frame(COUNTER_DURATION_MS).text, "12M+");
        assert_eq!(animation.frame(750.0).text, "6.0M+");
    }

    #[test]
    fn millions_round_exact_halves_away_from_zero() {
        let spec = CounterSpec::from_attributes(Some("1"), Some("1000000"), None);
        assert_eq!(spec.format(250_000.0), "0.3");
        assert_eq!(spec.format(1_250_000.0), "1.3");
        assert_eq!(spec.format(0.0), "0.0");
    }

    #[test]
    fn millions_round_from_the_stored_value_not_the_scaled_one() {
        let spec = CounterSpec::from_attributes(Some("1"), Some("1000000"), None);

        // 0.15 and 0.35 are stored just below the half.
        assert_eq!(spec.format(150_000.0), "0.1");
        assert_eq!(spec.format(350_000.0), "0.3");
        assert_eq!(spec.format(9_950_000.0), "9.9");
        assert_eq!(spec.format(9_960_000.0), "10.0");
    }

    #[test]
    fn whole_millions_round_exact_halves_up() {
        let spec = CounterSpec::from_attributes(Some("20"), Some("1000000"), None);

        assert_eq!(spec.format(12_500_000.0), "13");
        assert_eq!(spec.format(12_499_999.0), "12");
    }

    #[test]
    fn counter_attribute_fallbacks() {
        let spec = CounterSpec::from_attributes(Some("n/a"), Some("0"), None);
        assert_eq!(spec.target, 0.0);
        assert_eq!(spec.multiplier, 1.0);
        assert_eq!(spec.suffix, "");
    }

    #[test]
    fn typewriter_types_holds_then_deletes() {
        let mut typewriter = Typewriter::new(["Hi", "Yo"]).expect("words");

        assert_eq!(
            typewriter.tick(),
            TypewriterStep { text: "H".into(), delay_ms: TYPE_DELAY_MS }
        );
        assert_eq!(
            typewriter.tick(),
            TypewriterStep { text: "Hi".into(), delay_ms: HOLD_DELAY_MS }
        );
        assert_eq!(
            typewriter.tick(),
            TypewriterStep { text: "H".into(), delay_ms: DELETE_DELAY_MS }
        );
        assert_eq!(
            typewriter.tick(),
            TypewriterStep { text: "".into(), delay_ms: TYPE_DELAY_MS }
        );
        assert_eq!(typewriter.word_index(), 1);
        assert_eq!(typewriter.tick().text, "Y");
    }

    #[test]
    fn full_cycle_returns_to_empty_before_first_word() {
        let mut typewriter = Typewriter::new(DEFAULT_ROLES).expect("words");
        let ticks_per_word: Vec<usize> = DEFAULT_ROLES
            .iter()
            .map(|word| word.chars().count() * 2)
            .collect();

        let mut last = TypewriterStep { text: String::new(), delay_ms: 0 };
        for ticks in ticks_per_word {
            for _ in 0..ticks {
                last = typewriter.tick();
            }
        }

        assert_eq!(last.text, "");
        assert_eq!(typewriter.word_index(), 0);
        assert_eq!(typewriter.tick().text, "L");
    }

    #[test]
    fn typewriter_counts_characters_not_bytes() {
        let mut typewriter = Typewriter::new(["né"]).expect("words");
        assert_eq!(typewriter.tick().text, "n");
        assert_eq!(typewriter.tick().text, "né");
    }

    #[test]
    fn typewriter_skips_empty_words() {
        assert!(Typewriter::new(Vec::<String>::new()).is_none());
        assert!(Typewriter::new([""]).is_none());
        assert_eq!(Typewriter::new(["", "A"]).map(|t| t.word_count()), Some(1));
    }
}
