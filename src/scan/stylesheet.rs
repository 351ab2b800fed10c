//! Class names declared by a stylesheet.
//!
//! Only top-level rules are read. A selector counts when it is exactly one
//! class selector (`.mt-2`); compound and descendant selectors are skipped.
//! Of the `@` rules only named blocks (`@keyframes spin`, `@font-face`) are
//! recorded, by their prelude with whitespace collapsed.

use nom::{
    IResult,
    branch::alt,
    bytes::complete::{tag, take_till, take_until, take_while1},
    character::complete::{char, multispace1},
    combinator::{all_consuming, map, recognize, value},
    multi::many0,
    sequence::{delimited, preceded, terminated},
};
use std::collections::HashSet;

#[derive(Clone)]
enum Item<'a> {
    Rule(&'a str),
    AtBlock(&'a str),
    Skipped,
}

/// `@` rules whose block is referenced by name from rule dependencies.
const NAMED_BLOCKS: [&str; 3] = ["@keyframes", "@-webkit-keyframes", "@font-face"];

fn comment(input: &str) -> IResult<&str, ()> {
    value((), delimited(tag("/*"), take_until("*/"), tag("*/")))(input)
}

fn trivia(input: &str) -> IResult<&str, ()> {
    value((), many0(alt((value((), multispace1), comment))))(input)
}

/// Takes a `{ ... }` block including nested blocks. An unterminated block
/// runs to the end of the input.
fn block(input: &str) -> IResult<&str, &str> {
    if !input.starts_with('{') {
        return Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Char,
        )));
    }
    let mut depth = 0usize;
    for (i, c) in input.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok((&input[i + 1..], &input[..i + 1]));
                }
            }
            _ => {}
        }
    }
    Ok(("", input))
}

fn at_rule(input: &str) -> IResult<&str, Item<'_>> {
    let (input, prelude) =
        recognize(preceded(char('@'), take_till(|c| c == ';' || c == '{')))(input)?;
    alt((
        value(Item::Skipped, char(';')),
        map(block, move |_| Item::AtBlock(prelude)),
    ))(input)
}

fn block_name(prelude: &str) -> Option<String> {
    let words: Vec<&str> = prelude.split_whitespace().collect();
    let keyword = words.first()?;
    NAMED_BLOCKS
        .contains(keyword)
        .then(|| words.join(" "))
}

fn rule(input: &str) -> IResult<&str, Item<'_>> {
    map(terminated(take_till(|c| c == '{'), block), Item::Rule)(input)
}

fn class_selector(input: &str) -> IResult<&str, &str> {
    all_consuming(preceded(
        char('.'),
        take_while1(|c: char| c.is_alphanumeric() || c == '-' || c == '_'),
    ))(input)
}

fn single_class(selector: &str) -> Option<&str> {
    class_selector(selector).ok().map(|(_, name)| name)
}

/// Returns the distinct single-class selector names, in source order.
pub fn parse_class_selectors(source: &str) -> Vec<String> {
    scan_names(source, false)
}

/// Returns the distinct single-class selector names and named `@` blocks,
/// in source order.
pub fn parse_declared_names(source: &str) -> Vec<String> {
    scan_names(source, true)
}

fn scan_names(source: &str, with_blocks: bool) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut input = source;

    loop {
        let rest = match trivia(input) {
            Ok((rest, _)) => rest,
            Err(_) => input,
        };
        if rest.is_empty() {
            break;
        }
        let Ok((rest, item)) = alt((at_rule, rule))(rest) else {
            log::debug!("stop reading stylesheet at {:.20}", rest);
            break;
        };
        match item {
            Item::Rule(prelude) => {
                for selector in prelude.split(',').filter_map(|s| single_class(s.trim())) {
                    if seen.insert(selector.to_string()) {
                        names.push(selector.to_string());
                    }
                }
            }
            Item::AtBlock(prelude) if with_blocks => {
                if let Some(name) = block_name(prelude) {
                    if seen.insert(name.clone()) {
                        names.push(name);
                    }
                }
            }
            _ => {}
        }
        input = rest;
    }

    names
}
