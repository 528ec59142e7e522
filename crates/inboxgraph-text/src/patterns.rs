//! Compiled redaction patterns, in pipeline order.

use std::sync::LazyLock;

use regex::Regex;

#[allow(clippy::expect_used)] // literal patterns
fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static pattern compiles")
}

/// Redaction tags emitted by the pipeline.
pub const TAGS: &[&str] = &[
    "<meta>", "<email>", "<url>", "<weekday>", "<weekend>", "<month>", "<time>", "<date>",
    "<money>", "<number>",
];

/// Whole redaction tags (kept) or any other angle bracket (dropped).
pub static ANGLE: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"<(?:meta|email|url|weekday|weekend|month|time|date|money|number)>|[<>]")
});

/// Header lines at line start.
pub static HEADER: LazyLock<Regex> = LazyLock::new(|| {
    compile(
        r"(?m)(^to:.*)|(^from: .*)|(^cc:.*)|(^bcc:.*)|(^subject:.*)|(^sent:.*)|(^sent by:.*)|(^when:.*)|(^where:.*)",
    )
});

/// `-----original message-----` separators.
pub static ORIGINAL: LazyLock<Regex> = LazyLock::new(|| compile(r"-{5}original .*?-{5}"));

/// Decoration line through the next header block.
pub static DECORATION_TO_META: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?ms)^[^a-z0-9 \n]{6,}?$.*?(<meta>)"));

/// Decoration line through the end of text.
pub static DECORATION_TO_END: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?ms)^[^a-z0-9 \n]{6,}?$.*"));

/// Email addresses.
pub static EMAIL: LazyLock<Regex> = LazyLock::new(|| compile(r"[^@ ]+@[^@ ]+\.[^@ ]+"));

/// Plain http links.
pub static URL_HTTP: LazyLock<Regex> = LazyLock::new(|| compile(r"http://[^ \n]+"));

/// TLS links.
pub static URL_HTTPS: LazyLock<Regex> = LazyLock::new(|| compile(r"https://[^ \n]+"));

/// Scheme-less links.
pub static URL_WWW: LazyLock<Regex> = LazyLock::new(|| compile(r"www\.[^ \n]+"));

/// Weekday names between non-letters.
pub static WEEKDAY: LazyLock<Regex> = LazyLock::new(|| {
    compile(
        r"(?m)([^a-z]|^)(monday|mon|tuesday|tue|wednesday|wed|thursday|thu|friday|fri)([^a-z]|$)",
    )
});

/// Weekend names between non-letters.
pub static WEEKEND: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?m)([^a-z]|^)(saturday|sunday)([^a-z]|$)"));

/// Month names between non-letters.
pub static MONTH: LazyLock<Regex> = LazyLock::new(|| {
    compile(
        r"(?m)([^a-z]|^)(january|jan|february|feb|march|april|apr|june|jun|july|jul|august|aug|september|sept|october|oct|november|nov|december|dec)([^a-z]|$)",
    )
});

/// Clock times.
pub static TIME: LazyLock<Regex> = LazyLock::new(|| {
    compile(
        r"([0-9]{1,2}:[0-9]{2}( ?)(am|pm|noon|afternoon|evening|morning|night)?)|([0-9]{1,2}( ?)(am|pm|noon|afternoon|evening|morning|night))",
    )
});

/// Numeric and month-tag dates. The month stage pads its tag with a
/// trailing space, so the gap before the day is one or more spaces.
pub static DATE: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(dd/mm/yy)|([0-9]+/[0-9]+/[0-9]+)|(<month> +[0-9]{1,2}(st|nd|rd|th)?)")
});

/// Dollar and rupee amounts.
pub static MONEY: LazyLock<Regex> = LazyLock::new(|| compile(r"(\$|rs\.?)( ?)[0-9]+"));

/// Integers between non-letters. Not multiline: `^`/`$` anchor the text.
pub static NUMBER: LazyLock<Regex> = LazyLock::new(|| compile(r"([^a-z]|^)[0-9]+([^a-z]|$)"));

/// Anything that cannot appear in a token.
pub static NON_TOKEN: LazyLock<Regex> = LazyLock::new(|| compile(r"[^a-zA-Z<>_\-]"));

/// Runs of hyphens or underscores.
pub static RUNS: LazyLock<Regex> = LazyLock::new(|| compile(r"-{2,}|_{2,}"));

/// Hyphens next to something other than a letter or tag bracket.
pub static STRAY_HYPHEN: LazyLock<Regex> = LazyLock::new(|| compile(r"-[^a-z<>]|[^a-z<>]-"));

/// Patterns removing one sign-off block.
#[derive(Debug, Clone)]
pub struct SignaturePatterns {
    /// Sign-off line through the next header block.
    pub to_meta: Regex,
    /// Sign-off line through the end of text.
    pub to_end: Regex,
}

impl SignaturePatterns {
    /// Compiles the patterns for one sign-off phrase.
    ///
    /// # Errors
    ///
    /// Returns the regex error if the compiled pattern exceeds size limits.
    pub fn new(phrase: &str) -> Result<Self, regex::Error> {
        let phrase = regex::escape(phrase);
        Ok(Self {
            to_meta: Regex::new(&format!(r"(?ims)^{phrase},[^a-z]*?$.*?(<meta>)"))?,
            to_end: Regex::new(&format!(r"(?ims)^{phrase},([^a-z]*?)$.*"))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_patterns_compile() {
        for re in [
            &ANGLE,
            &HEADER,
            &ORIGINAL,
            &DECORATION_TO_META,
            &DECORATION_TO_END,
            &EMAIL,
            &URL_HTTP,
            &URL_HTTPS,
            &URL_WWW,
            &WEEKDAY,
            &WEEKEND,
            &MONTH,
            &TIME,
            &DATE,
            &MONEY,
            &NUMBER,
            &NON_TOKEN,
            &RUNS,
            &STRAY_HYPHEN,
        ] {
            assert!(!re.as_str().is_empty());
        }
    }

    #[test]
    fn test_tags_survive_angle_pass() {
        for tag in TAGS {
            assert_eq!(ANGLE.replace_all(tag, " "), *tag);
        }
        assert_eq!(ANGLE.replace_all("<bob@x.com>", " "), " bob@x.com ");
    }

    #[test]
    fn test_tags_untouched_by_name_patterns() {
        for tag in TAGS {
            assert!(!WEEKDAY.is_match(tag), "{tag}");
            assert!(!WEEKEND.is_match(tag), "{tag}");
            assert!(!MONTH.is_match(tag), "{tag}");
        }
    }

    #[test]
    fn test_signature_phrase_is_escaped() {
        assert!(SignaturePatterns::new("a.b (c)").is_ok());
    }
}
