// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Plan text parser
//!
//! Text-to-plan services answer with free text that embeds an array literal
//! of 6-tuples:
//!
//! ```text
//! [
//!   ["A1", "A2", "External wall 1", "wall", 4000, 0],
//!   ["A2", "A3", "Front door", "door", 900, 90],
//! ]
//! ```
//!
//! Tuple fields are `[startId, endId, name, kind, length_mm, angle_degrees]`.
//! Strings may use single or double quotes, or be bare words; numbers may be
//! quoted. A trailing comma is accepted after the last tuple.

use crate::error::{Error, Result};
use crate::types::{Segment, ShapeKind};
use nom::{
    branch::alt,
    bytes::complete::{is_not, take_while1},
    character::complete::{char, multispace0},
    combinator::{map, opt},
    multi::separated_list0,
    number::complete::double,
    sequence::{delimited, terminated, tuple},
    IResult,
};

/// Raw tuple fields before kind resolution
type RawTuple<'a> = (&'a str, &'a str, &'a str, &'a str, f64, f64);

/// Parse a plan text blob into segments.
///
/// The first `[` that opens a well-formed plan array starts the plan; text
/// before it and after its closing `]` is ignored, brackets in the trailing
/// prose included. Text with no parseable array is reported as
/// [`Error::MalformedPlan`] rather than an empty plan.
pub fn parse_plan(text: &str) -> Result<Vec<Segment>> {
    let mut first_error = None;

    for (start, _) in text.match_indices('[') {
        let body = &text[start..];
        match plan_array(body) {
            Ok((_, raw)) => return Ok(raw.into_iter().map(to_segment).collect()),
            Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
                if first_error.is_none() {
                    let offset = start + body.len() - e.input.len();
                    let snippet: String = e.input.chars().take(24).collect();
                    first_error = Some(format!("unexpected input at offset {}: {:?}", offset, snippet));
                }
            }
            Err(nom::Err::Incomplete(_)) => {
                first_error.get_or_insert_with(|| "unexpected end of input".to_string());
            }
        }
    }

    Err(Error::MalformedPlan(
        first_error.unwrap_or_else(|| "no opening bracket found".to_string()),
    ))
}

fn to_segment((start, end, name, kind, length, angle): RawTuple<'_>) -> Segment {
    let kind = kind.parse::<ShapeKind>().unwrap_or_else(|_| {
        tracing::warn!(kind, segment = name, "unknown segment kind, drawing as wall");
        ShapeKind::Wall
    });
    Segment::new(start, end, name, kind, length, angle)
}

fn ws<'a, O, F>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(multispace0, inner, multispace0)
}

fn quoted(input: &str) -> IResult<&str, &str> {
    alt((
        delimited(
            char('"'),
            map(opt(is_not("\"")), |s: Option<&str>| s.unwrap_or("")),
            char('"'),
        ),
        delimited(
            char('\''),
            map(opt(is_not("'")), |s: Option<&str>| s.unwrap_or("")),
            char('\''),
        ),
    ))(input)
}

fn bare_word(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '_' || c == '-')(input)
}

fn text_field(input: &str) -> IResult<&str, &str> {
    ws(alt((quoted, bare_word)))(input)
}

fn number_field(input: &str) -> IResult<&str, f64> {
    ws(alt((
        double,
        delimited(char('"'), ws(double), char('"')),
        delimited(char('\''), ws(double), char('\'')),
    )))(input)
}

fn comma(input: &str) -> IResult<&str, char> {
    ws(char(','))(input)
}

fn segment_tuple(input: &str) -> IResult<&str, RawTuple<'_>> {
    map(
        delimited(
            ws(char('[')),
            tuple((
                text_field,
                comma,
                text_field,
                comma,
                text_field,
                comma,
                text_field,
                comma,
                number_field,
                comma,
                number_field,
                opt(comma),
            )),
            ws(char(']')),
        ),
        |(start, _, end, _, name, _, kind, _, length, _, angle, _)| {
            (start, end, name, kind, length, angle)
        },
    )(input)
}

fn plan_array(input: &str) -> IResult<&str, Vec<RawTuple<'_>>> {
    delimited(
        ws(char('[')),
        terminated(separated_list0(comma, segment_tuple), opt(comma)),
        ws(char(']')),
    )(input)
}
