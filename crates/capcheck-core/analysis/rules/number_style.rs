//! Number style rule
//!
//! House style spells out small numbers and numbers that open a sentence,
//! and writes everything else as digits:
//!
//! - `5 people` should read `five people`
//! - `Twelve people` at a sentence start is fine
//! - `we saw twenty-five birds` should read `25 birds`
//!
//! Times (`3:30`), ages (`5-year-old`, `5 year old`), percentages and
//! tokens glued to letters or symbols are left alone.

use crate::{
    analysis::{
        context::RuleContext,
        metric::{Metric, MetricKind, NumberForm, NumberStyleMetric},
        Rule,
    },
    utils::text::is_english_like,
};

/// Flags numbers written in the wrong form
pub struct NumberStyleRule;

impl Rule for NumberStyleRule {
    fn id(&self) -> &'static str {
        "number-style"
    }

    fn name(&self) -> &'static str {
        "Number Style"
    }

    fn description(&self) -> &'static str {
        "Flags small numbers in digits and large numbers in words"
    }

    fn kind(&self) -> MetricKind {
        MetricKind::NumberStyle
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Vec<Metric> {
        ctx.text_lines()
            .into_iter()
            .filter(|(_, text)| is_english_like(text))
            .flat_map(|(line_index, text)| {
                check_line(text).into_iter().map(move |issue| {
                    Metric::NumberStyle(NumberStyleMetric {
                        line_index,
                        token: issue.token,
                        value: issue.value,
                        found: issue.found,
                        expected: issue.expected,
                        column: issue.column,
                    })
                })
            })
            .collect()
    }
}

/// One style issue within a line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberIssue {
    pub token: String,
    pub value: u64,
    pub found: NumberForm,
    pub expected: NumberForm,
    pub column: usize,
}

/// Whitespace-delimited word with its alphanumeric core
#[derive(Debug, Clone, Copy)]
struct Word<'a> {
    prefix: &'a str,
    core: &'a str,
    suffix: &'a str,
    /// Character column of `core`
    column: usize,
}

impl<'a> Word<'a> {
    fn split(raw: &'a str, column: usize) -> Self {
        let start = raw
            .char_indices()
            .find(|(_, c)| c.is_alphanumeric())
            .map_or(raw.len(), |(i, _)| i);
        let end = raw
            .char_indices()
            .rev()
            .find(|(_, c)| c.is_alphanumeric())
            .map_or(start, |(i, c)| i + c.len_utf8());
        let end = end.max(start);
        Self {
            prefix: &raw[..start],
            core: &raw[start..end],
            suffix: &raw[end..],
            column: column + raw[..start].chars().count(),
        }
    }

    fn lower(&self) -> String {
        self.core.to_ascii_lowercase()
    }

    /// Whether the word closes a sentence
    fn ends_sentence(&self) -> bool {
        let tail = self
            .suffix
            .trim_end_matches(['"', '\'', '\u{201D}', '\u{2019}', ')', ']']);
        tail.ends_with(['.', '!', '?', '\u{2026}'])
    }
}

fn words(line: &str) -> Vec<Word<'_>> {
    let mut words = Vec::new();
    let mut column = 0;
    let mut start: Option<(usize, usize)> = None;
    for (byte, c) in line.char_indices() {
        if c.is_whitespace() {
            if let Some((from, col)) = start.take() {
                words.push(Word::split(&line[from..byte], col));
            }
        } else if start.is_none() {
            start = Some((byte, column));
        }
        column += 1;
    }
    if let Some((from, col)) = start {
        words.push(Word::split(&line[from..], col));
    }
    words
}

/// Check one line of English text
#[must_use]
pub fn check_line(line: &str) -> Vec<NumberIssue> {
    let words = words(line);
    let mut issues = Vec::new();
    let mut index = 0;

    while index < words.len() {
        let word = words[index];
        let sentence_start = index == 0 || words[index - 1].ends_sentence();

        if let Some(value) = digit_value(word.core) {
            if digits_are_standalone(&word) && !is_excluded_follow_on(&words, index + 1) {
                if value <= 10 || sentence_start {
                    issues.push(NumberIssue {
                        token: word.core.to_string(),
                        value,
                        found: NumberForm::Digits,
                        expected: NumberForm::Words,
                        column: word.column,
                    });
                }
            }
            index += 1;
            continue;
        }

        let run_len = word_number_run(&words[index..]);
        if run_len == 0 {
            index += 1;
            continue;
        }
        let run = &words[index..index + run_len];
        let value = parse_number_words(run.iter().map(|w| w.lower()));
        let excluded = run[0].prefix.contains([':', '-'])
            || run[run_len - 1].suffix.starts_with([':', '-'])
            || is_excluded_follow_on(&words, index + run_len);
        if let Some(value) = value {
            if value > 10 && !sentence_start && !excluded {
                let token = run.iter().map(|w| w.core).collect::<Vec<_>>().join(" ");
                issues.push(NumberIssue {
                    token,
                    value,
                    found: NumberForm::Words,
                    expected: NumberForm::Digits,
                    column: word.column,
                });
            }
        }
        index += run_len;
    }

    issues
}

/// Value of a plain or comma-grouped digit token
fn digit_value(core: &str) -> Option<u64> {
    if core.is_empty() {
        return None;
    }
    let plain = core.bytes().all(|b| b.is_ascii_digit());
    let grouped = !plain && {
        let mut groups = core.split(',');
        let head = groups.next().unwrap_or_default();
        (1..=3).contains(&head.len())
            && head.bytes().all(|b| b.is_ascii_digit())
            && groups.all(|g| g.len() == 3 && g.bytes().all(|b| b.is_ascii_digit()))
    };
    if !plain && !grouped {
        return None;
    }
    core.replace(',', "").parse().ok()
}

/// Digits not glued to a time colon, hyphen, percent sign or symbol
fn digits_are_standalone(word: &Word<'_>) -> bool {
    let prefix_ok = word
        .prefix
        .chars()
        .all(|c| matches!(c, '"' | '\'' | '\u{201C}' | '\u{2018}' | '(' | '['));
    let suffix_ok = !word.suffix.starts_with([':', '-', '%', '\u{2013}', '\u{2014}']);
    prefix_ok && suffix_ok
}

/// `percent`, `per cent` or an age pattern starting at `index`
fn is_excluded_follow_on(words: &[Word<'_>], index: usize) -> bool {
    let lower = |offset: usize| words.get(index + offset).map(Word::lower);
    match lower(0).as_deref() {
        Some("percent" | "percentage" | "%") => true,
        Some("per") => lower(1).as_deref() == Some("cent"),
        Some("year" | "years") => {
            words[index].suffix.starts_with('-') || lower(1).as_deref() == Some("old")
        }
        Some(other) => other.starts_with("year-old") || other.starts_with("years-old"),
        None => false,
    }
}

fn unit_value(word: &str) -> Option<u64> {
    let value = match word {
        "zero" => 0,
        "one" => 1,
        "two" => 2,
        "three" => 3,
        "four" => 4,
        "five" => 5,
        "six" => 6,
        "seven" => 7,
        "eight" => 8,
        "nine" => 9,
        "ten" => 10,
        "eleven" => 11,
        "twelve" => 12,
        "thirteen" => 13,
        "fourteen" => 14,
        "fifteen" => 15,
        "sixteen" => 16,
        "seventeen" => 17,
        "eighteen" => 18,
        "nineteen" => 19,
        "twenty" => 20,
        "thirty" => 30,
        "forty" => 40,
        "fifty" => 50,
        "sixty" => 60,
        "seventy" => 70,
        "eighty" => 80,
        "ninety" => 90,
        _ => return None,
    };
    Some(value)
}

fn scale_value(word: &str) -> Option<u64> {
    match word {
        "thousand" => Some(1_000),
        "million" => Some(1_000_000),
        "billion" => Some(1_000_000_000),
        _ => None,
    }
}

fn is_number_word(word: &str) -> bool {
    word == "hundred"
        || scale_value(word).is_some()
        || unit_value(word).is_some()
        || word
            .split_once('-')
            .is_some_and(|(tens, ones)| unit_value(tens).is_some() && unit_value(ones).is_some())
}

/// Length of the greedy number-word run at the head of `words`
///
/// A run opens on a unit word, may contain `and` between number words, and
/// ends after a word carrying trailing punctuation.
fn word_number_run(words: &[Word<'_>]) -> usize {
    let Some(first) = words.first() else {
        return 0;
    };
    let head = first.lower();
    if !is_number_word(&head) || head == "hundred" || scale_value(&head).is_some() {
        return 0;
    }

    let mut len = 1;
    while len < words.len() && words[len - 1].suffix.is_empty() {
        let lower = words[len].lower();
        if is_number_word(&lower) {
            len += 1;
        } else if lower == "and"
            && words[len].suffix.is_empty()
            && words
                .get(len + 1)
                .is_some_and(|next| is_number_word(&next.lower()))
        {
            len += 2;
        } else {
            break;
        }
    }
    len
}

/// Short-scale value of a run of number words
///
/// # Example
///
/// ```rust
/// use capcheck_core::analysis::rules::number_style::parse_number_words;
///
/// let words = ["two", "hundred", "and", "forty-five", "thousand"];
/// assert_eq!(parse_number_words(words.iter().map(|w| w.to_string())), Some(245_000));
/// ```
pub fn parse_number_words<I: IntoIterator<Item = String>>(words: I) -> Option<u64> {
    let mut total: u64 = 0;
    let mut current: u64 = 0;
    let mut any = false;

    for word in words {
        if word == "and" {
            continue;
        }
        any = true;
        if word == "hundred" {
            current = current.max(1).checked_mul(100)?;
        } else if let Some(scale) = scale_value(&word) {
            total = total.checked_add(current.max(1).checked_mul(scale)?)?;
            current = 0;
        } else if let Some(value) = unit_value(&word) {
            current = current.checked_add(value)?;
        } else {
            let (tens, ones) = word.split_once('-')?;
            current = current.checked_add(unit_value(tens)? + unit_value(ones)?)?;
        }
    }

    total.checked_add(current).filter(|_| any)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::test_support::check_lines;

    fn tokens(line: &str) -> Vec<(String, NumberForm)> {
        check_line(line)
            .into_iter()
            .map(|issue| (issue.token, issue.expected))
            .collect()
    }

    #[test]
    fn small_digits_should_be_words() {
        let issues = check_line("This is 5 examples.");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].token, "5");
        assert_eq!(issues[0].found, NumberForm::Digits);
        assert_eq!(issues[0].expected, NumberForm::Words);
        assert_eq!(issues[0].column, 8);
    }

    #[test]
    fn time_of_day_is_excluded() {
        assert!(check_line("It happened at 3:30 yesterday.").is_empty());
        assert!(check_line("Meet me at 3: sharp").is_empty());
    }

    #[test]
    fn large_digits_are_fine_mid_sentence() {
        assert!(check_line("We counted 42 boats.").is_empty());
        assert!(check_line("About 1,500 people came.").is_empty());
    }

    #[test]
    fn sentence_start_digits_should_be_words() {
        assert_eq!(
            tokens("42 boats arrived. 12 left."),
            vec![
                ("42".to_string(), NumberForm::Words),
                ("12".to_string(), NumberForm::Words)
            ]
        );
        assert_eq!(
            tokens("He said \"Stop.\" 20 men ran."),
            vec![("20".to_string(), NumberForm::Words)]
        );
    }

    #[test]
    fn age_patterns_are_excluded() {
        assert!(check_line("A 5-year-old boy").is_empty());
        assert!(check_line("The boy is 5 years old").is_empty());
        assert!(check_line("The boy is 5 year old").is_empty());
        assert!(check_line("she is twenty years old").is_empty());
    }

    #[test]
    fn percent_and_symbols_are_excluded() {
        assert!(check_line("Only 5% agreed").is_empty());
        assert!(check_line("Only 5 percent agreed").is_empty());
        assert!(check_line("It cost $5 today").is_empty());
        assert!(check_line("Now on COVID-19 and 5G networks").is_empty());
    }

    #[test]
    fn large_word_numbers_should_be_digits() {
        let issues = check_line("We saw twenty-five birds");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].token, "twenty-five");
        assert_eq!(issues[0].value, 25);
        assert_eq!(issues[0].expected, NumberForm::Digits);

        let issues = check_line("there were two hundred and forty people");
        assert_eq!(issues[0].token, "two hundred and forty");
        assert_eq!(issues[0].value, 240);
    }

    #[test]
    fn small_or_leading_word_numbers_are_fine() {
        assert!(check_line("We saw three birds").is_empty());
        assert!(check_line("Twenty birds flew off.").is_empty());
        assert!(check_line("a thousand reasons").is_empty());
    }

    #[test]
    fn short_scale_composition() {
        let parse = |text: &str| parse_number_words(text.split(' ').map(str::to_string));
        assert_eq!(parse("one million two hundred thousand"), Some(1_200_000));
        assert_eq!(parse("nineteen"), Some(19));
        assert_eq!(parse("three hundred"), Some(300));
        assert_eq!(parse("banana"), None);
    }

    #[test]
    fn overflowing_run_has_no_value() {
        let words = "one hundred eighty hundred hundred hundred hundred billion \
                     hundred hundred hundred hundred hundred hundred hundred hundred hundred";
        assert_eq!(
            parse_number_words(words.split_whitespace().map(str::to_string)),
            None
        );
        assert!(check_line(&format!("we had {words} apples")).is_empty());
    }

    #[test]
    fn non_english_lines_are_skipped() {
        assert!(check_lines(&NumberStyleRule, "第 5 集").is_empty());
        assert_eq!(check_lines(&NumberStyleRule, "This is 5 examples.").len(), 1);
    }
}
