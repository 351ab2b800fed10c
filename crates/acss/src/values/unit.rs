//! Unit tokens and their conversion to CSS lengths.
//!
//! | Token   | Meaning                        | With `{1, 7.5, 3, vmin}` |
//! |---------|--------------------------------|--------------------------|
//! | `0`     | dimensionless zero             | `0`                      |
//! | `full`  | full extent                    | `100%`                   |
//! | `20`    | design units                   | `2.667vmin`              |
//! | `d5`    | `0.5` design units             | `0.067vmin`              |
//! | `d`     | `0` design units               | `0vmin`                  |
//! | `p50`   | literal percentage             | `50%`                    |

use crate::error::{AcssError, Result};
use nom::{
    IResult,
    branch::alt,
    bytes::complete::tag,
    character::complete::{char, digit0, digit1},
    combinator::{all_consuming, map, map_res, opt, recognize},
    sequence::{pair, preceded},
};
use serde::{Deserialize, Serialize};

/// Alias token for a full-extent length.
pub const FULL_ALIAS: &str = "full";

/// Ratio between design units and the emitted CSS unit: one design unit is
/// `from / to` of `unit`, rounded to `precision` decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitValueDeclaration {
    pub from: f64,
    pub to: f64,
    pub precision: u32,
    pub unit: String,
}

impl Default for UnitValueDeclaration {
    fn default() -> Self {
        Self {
            from: 1.0,
            to: 7.5,
            precision: 3,
            unit: "vmin".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum UnitToken<'a> {
    Zero,
    Full,
    Number(f64),
    Percent(&'a str),
}

fn parse_numeral(input: &str) -> IResult<&str, f64> {
    map_res(
        recognize(pair(digit1, opt(pair(char('.'), digit1)))),
        |s: &str| s.parse::<f64>(),
    )(input)
}

/// `d5` is `0.5`, `d05` is `0.05`, a bare `d` is `0`.
fn parse_decimal(input: &str) -> IResult<&str, f64> {
    map_res(preceded(char('d'), digit0), |digits: &str| {
        if digits.is_empty() {
            Ok(0.0)
        } else {
            format!("0.{}", digits).parse::<f64>()
        }
    })(input)
}

fn parse_unit_token(input: &str) -> IResult<&str, UnitToken<'_>> {
    alt((
        map(all_consuming(tag("0")), |_| UnitToken::Zero),
        map(all_consuming(tag(FULL_ALIAS)), |_| UnitToken::Full),
        map(all_consuming(parse_decimal), UnitToken::Number),
        map(all_consuming(parse_numeral), UnitToken::Number),
        map(all_consuming(preceded(char('p'), digit1)), UnitToken::Percent),
    ))(input)
}

/// Converts a unit token into a CSS length.
///
/// # Examples
///
/// ```rust
/// use acss::values::{calc_unit_value, UnitValueDeclaration};
///
/// let one = UnitValueDeclaration::default();
/// assert_eq!(calc_unit_value("0", &one).unwrap(), "0");
/// assert_eq!(calc_unit_value("d5", &one).unwrap(), "0.067vmin");
/// assert_eq!(calc_unit_value("p50", &one).unwrap(), "50%");
/// assert!(calc_unit_value("x1", &one).is_err());
/// ```
pub fn calc_unit_value(token: &str, one: &UnitValueDeclaration) -> Result<String> {
    let (_, parsed) =
        parse_unit_token(token).map_err(|_| AcssError::InvalidUnit(token.to_string()))?;

    match parsed {
        UnitToken::Zero => Ok("0".to_string()),
        UnitToken::Full => Ok("100%".to_string()),
        UnitToken::Percent(digits) => Ok(format!("{}%", digits)),
        UnitToken::Number(value) => {
            let scale = 10f64.powi(one.precision as i32);
            let rounded = (value * one.from * scale / one.to).round() / scale;
            if !rounded.is_finite() {
                return Err(AcssError::InvalidUnitDeclaration {
                    token: token.to_string(),
                    from: one.from,
                    to: one.to,
                });
            }
            Ok(format!("{}{}", rounded, one.unit))
        }
    }
}

/// Numeric sort key of a unit token.
///
/// Every `d` becomes `0.` and every `p` becomes `0.000`, then the leading
/// number is read. Tokens without a leading number sort last.
pub fn unit_sort_key(token: &str) -> f64 {
    let replaced = token.replace('d', "0.").replace('p', "0.000");
    let leading: IResult<&str, &str> =
        recognize(pair(digit1, opt(pair(char('.'), digit0))))(replaced.as_str());
    leading
        .ok()
        .and_then(|(_, number)| number.parse::<f64>().ok())
        .unwrap_or(f64::INFINITY)
}

/// Sorts unit tokens ascending by [`unit_sort_key`]; ties keep lexical order.
pub fn sort_units(units: &mut [String]) {
    units.sort();
    units.sort_by(|left, right| unit_sort_key(left).total_cmp(&unit_sort_key(right)));
}
