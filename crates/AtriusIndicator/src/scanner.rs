//! Streaming copy-and-replace over formula text.
//!
//! Every stage of the engine (validation, description, total expansion,
//! value substitution) is a sequence of *passes*. A pass scans the current
//! text left to right for non-overlapping matches of a single grammar and
//! produces a new text: untouched spans are copied verbatim exactly once,
//! each match is replaced by a pass-specific replacement. Passes never
//! interleave - pass N+1 runs over the complete output of pass N.
//!
//! Scanning is pure and total: text that matches no grammar is not an
//! error here, it flows through literally.

use regex::{Captures, Regex};

/// Rewrite every match of `pattern`, propagating the first replacement
/// error.
///
/// The replacement closure receives the capture groups of each match in
/// order of appearance. On error the partial output is discarded.
pub fn try_rewrite<E, F>(text: &str, pattern: &Regex, mut replacement: F) -> Result<String, E>
where
    F: FnMut(&Captures<'_>) -> Result<String, E>,
{
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for caps in pattern.captures_iter(text) {
        let matched = caps.get(0).expect("capture group 0 always present");
        out.push_str(&text[last..matched.start()]);
        out.push_str(&replacement(&caps)?);
        last = matched.end();
    }
    out.push_str(&text[last..]);
    Ok(out)
}

/// Rewrite every match of `pattern` with an infallible replacement.
pub fn rewrite<F>(text: &str, pattern: &Regex, mut replacement: F) -> String
where
    F: FnMut(&Captures<'_>) -> String,
{
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for caps in pattern.captures_iter(text) {
        let matched = caps.get(0).expect("capture group 0 always present");
        out.push_str(&text[last..matched.start()]);
        out.push_str(&replacement(&caps));
        last = matched.end();
    }
    out.push_str(&text[last..]);
    out
}

/// Collect a value per match without rewriting.
pub fn collect<T, F>(text: &str, pattern: &Regex, mut f: F) -> Vec<T>
where
    F: FnMut(&Captures<'_>) -> T,
{
    pattern.captures_iter(text).map(|caps| f(&caps)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::{CONSTANT_PATTERN, OPERAND_PATTERN};

    #[test]
    fn non_match_spans_pass_through_verbatim() {
        let out = rewrite("1 + #{deA.cocA} * 2", &OPERAND_PATTERN, |_| "9".to_string());
        assert_eq!(out, "1 + 9 * 2");
    }

    #[test]
    fn matches_are_replaced_left_to_right_without_overlap() {
        let out = rewrite("#{a}+#{b}+#{c}", &OPERAND_PATTERN, |caps| {
            caps[1].to_uppercase()
        });
        assert_eq!(out, "A+B+C");
    }

    #[test]
    fn text_without_matches_is_returned_unchanged() {
        let text = "(1+2)*3/4";
        assert_eq!(rewrite(text, &CONSTANT_PATTERN, |_| unreachable!()), text);
    }

    #[test]
    fn try_rewrite_propagates_the_first_error() {
        let result: Result<String, String> =
            try_rewrite("#{a}+#{b}", &OPERAND_PATTERN, |caps| {
                if &caps[1] == "b" {
                    Err("b is bad".to_string())
                } else {
                    Ok("1".to_string())
                }
            });
        assert_eq!(result, Err("b is bad".to_string()));
    }
}
