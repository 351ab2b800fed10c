//! Rule syntax patterns.
//!
//! A rule syntax is literal class-name text mixed with placeholder slots:
//!
//! | Slot  | Meaning                | Accepted text |
//! |-------|------------------------|---------------|
//! | `[U]` | unit token             | `[0-9dp]+`    |
//! | `[C]` | color (theme) name     | `[a-z]+`      |
//! | `[N]` | integer, color order   | `[0-9]+`      |
//! | `[A]` | alpha digits           | `[0-9]+`      |
//!
//! The syntax is parsed once into a [`SyntaxPattern`], which yields both the
//! lookup key of the rule and an anchored matcher with one named group per slot.

use crate::error::{AcssError, Result};
use bitflags::bitflags;
use nom::{
    IResult,
    branch::alt,
    bytes::complete::is_not,
    character::complete::{char, satisfy},
    combinator::map,
    multi::many0,
    sequence::delimited,
};
use regex::Regex;
use std::fmt;

bitflags! {
    /// The set of placeholder slots used by a syntax.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Placeholders: u8 {
        const UNIT = 0b0001;
        const COLOR = 0b0010;
        const NUMBER = 0b0100;
        const ALPHA = 0b1000;
    }
}

/// One piece of a rule syntax.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Unit,
    Color,
    Number,
    Alpha,
}

impl Segment {
    /// Returns the slot flag, or `None` for literal text.
    pub fn placeholder(&self) -> Option<Placeholders> {
        match self {
            Segment::Literal(_) => None,
            Segment::Unit => Some(Placeholders::UNIT),
            Segment::Color => Some(Placeholders::COLOR),
            Segment::Number => Some(Placeholders::NUMBER),
            Segment::Alpha => Some(Placeholders::ALPHA),
        }
    }

    /// Regex fragment matching this segment.
    fn to_regex_fragment(&self) -> String {
        match self {
            Segment::Literal(text) => regex::escape(text),
            Segment::Unit => "(?P<U>[0-9dp]+)".to_string(),
            Segment::Color => "(?P<C>[a-z]+)".to_string(),
            Segment::Number => "(?P<N>[0-9]+)".to_string(),
            Segment::Alpha => "(?P<A>[0-9]+)".to_string(),
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Literal(text) => f.write_str(text),
            Segment::Unit => f.write_str("[U]"),
            Segment::Color => f.write_str("[C]"),
            Segment::Number => f.write_str("[N]"),
            Segment::Alpha => f.write_str("[A]"),
        }
    }
}

/// A parsed rule syntax.
///
/// # Examples
///
/// ```rust
/// use acss::rule::SyntaxPattern;
///
/// let pattern = SyntaxPattern::parse("text-[C]-[N]").unwrap();
/// assert!(pattern.is_dynamic());
/// assert_eq!(pattern.key(), "text-");
///
/// let matcher = pattern.to_regex().unwrap();
/// let caps = matcher.captures("text-red-2").unwrap();
/// assert_eq!(&caps["C"], "red");
/// assert_eq!(&caps["N"], "2");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxPattern {
    segments: Vec<Segment>,
    placeholders: Placeholders,
}

impl SyntaxPattern {
    /// Parses a syntax string, failing on unknown, repeated or unbalanced placeholders.
    pub fn parse(syntax: &str) -> Result<Self> {
        if syntax.is_empty() {
            return Err(invalid(syntax, "syntax is empty"));
        }

        let (remaining, segments) =
            parse_segments(syntax).map_err(|e| invalid(syntax, &e.to_string()))?;

        if !remaining.is_empty() {
            let reason = if remaining.starts_with(']') {
                "unbalanced `]`".to_string()
            } else if let Some(end) = remaining.find(']') {
                format!("unknown placeholder `{}`", &remaining[..=end])
            } else {
                "unbalanced `[`".to_string()
            };
            return Err(invalid(syntax, &reason));
        }

        let mut placeholders = Placeholders::empty();
        for segment in &segments {
            if let Some(flag) = segment.placeholder() {
                if placeholders.contains(flag) {
                    return Err(invalid(
                        syntax,
                        &format!("placeholder `{}` is used more than once", segment),
                    ));
                }
                placeholders |= flag;
            }
        }

        Ok(Self {
            segments,
            placeholders,
        })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn placeholders(&self) -> Placeholders {
        self.placeholders
    }

    /// True when the syntax contains at least one placeholder slot.
    pub fn is_dynamic(&self) -> bool {
        !self.placeholders.is_empty()
    }

    /// The lookup key of the rule.
    ///
    /// Static syntaxes are their own key. Dynamic syntaxes are keyed by the
    /// literal text that precedes the first slot (`px-[U]` becomes `px-`).
    pub fn key(&self) -> String {
        if !self.is_dynamic() {
            return self.to_string();
        }
        self.segments
            .iter()
            .map_while(|segment| match segment {
                Segment::Literal(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Compiles an anchored matcher with named groups `U`, `C`, `N` and `A`.
    pub fn to_regex(&self) -> Result<Regex> {
        let body: String = self
            .segments
            .iter()
            .map(Segment::to_regex_fragment)
            .collect();
        Ok(Regex::new(&format!("^{}$", body))?)
    }
}

impl fmt::Display for SyntaxPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

fn invalid(syntax: &str, reason: &str) -> AcssError {
    AcssError::InvalidSyntax {
        syntax: syntax.to_string(),
        reason: reason.to_string(),
    }
}

/// Parses a placeholder slot such as `[U]`.
fn parse_placeholder(input: &str) -> IResult<&str, Segment> {
    delimited(
        char('['),
        map(satisfy(|c| matches!(c, 'U' | 'C' | 'N' | 'A')), |c| match c {
            'U' => Segment::Unit,
            'C' => Segment::Color,
            'N' => Segment::Number,
            _ => Segment::Alpha,
        }),
        char(']'),
    )(input)
}

/// Parses a run of literal text up to the next bracket.
fn parse_literal(input: &str) -> IResult<&str, Segment> {
    map(is_not("[]"), |text: &str| Segment::Literal(text.to_string()))(input)
}

fn parse_segments(input: &str) -> IResult<&str, Vec<Segment>> {
    many0(alt((parse_placeholder, parse_literal)))(input)
}
