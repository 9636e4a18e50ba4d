// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! The archive selection sublanguage.
//!
//! A selection string picks a subset of an ordered search result by
//! position or range:
//!
//! ```text
//! selection := option ("," option)*
//! option    := INTEGER | INTEGER ".." INTEGER
//! ```
//!
//! Positions are 1-based in user input; internally every option becomes a
//! half-open 0-based [`Interval`]. `n` denotes `[n-1, n)` and `a..b`
//! denotes `[a-1, b)`, inclusive of position `a` through position `b`.
//! A string that does not match the grammar is rejected whole; there is
//! no partial parse.

use std::io::{BufRead, Write};

use crate::error::Error;

/// A half-open `[start, end)` index range over the ordered search result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub start: usize,
    pub end: usize,
}

/// What to do with intervals that are inverted or reach past the end of
/// the result list. `Lenient` lets them through to yield empty slices
/// when applied; `Strict` rejects them at parse time against a known
/// result length. The interactive prompt uses `Strict`.
#[derive(Debug, Clone, Copy)]
pub enum RangePolicy {
    Lenient,
    Strict { len: usize },
}

/// Parses a selection string into intervals under the given range policy.
///
/// # Errors
///
/// * [`Error::Syntax`] when the string does not match the grammar.
/// * [`Error::InvalidInterval`] when the policy is strict and an interval
///   is inverted or out of range.
pub fn parse_selection(input: &str, policy: RangePolicy) -> Result<Vec<Interval>, Error> {
    let intervals: Vec<Interval> = input
        .split(',')
        .map(parse_option)
        .collect::<Result<_, _>>()?;

    if let RangePolicy::Strict { len } = policy {
        for interval in &intervals {
            if interval.start >= interval.end {
                return Err(Error::InvalidInterval(format!(
                    "{}..{} is inverted",
                    interval.start + 1,
                    interval.end
                )));
            }
            if interval.end > len {
                return Err(Error::InvalidInterval(format!(
                    "position {} is beyond the last result ({len})",
                    interval.end
                )));
            }
        }
    }

    Ok(intervals)
}

/// Parses one option: a bare position or a `a..b` range.
fn parse_option(option: &str) -> Result<Interval, Error> {
    match option.split_once("..") {
        Some((start, end)) => {
            let start = parse_position(start, option)?;
            let end = parse_position(end, option)?;
            Ok(Interval {
                start: start - 1,
                end,
            })
        }
        None => {
            let position = parse_position(option, option)?;
            Ok(Interval {
                start: position - 1,
                end: position,
            })
        }
    }
}

/// Parses a 1-based position. Zero is not a position, and anything
/// non-numeric (including an empty option from `"1,,2"`) fails the whole
/// selection.
fn parse_position(text: &str, option: &str) -> Result<usize, Error> {
    let position: usize = text
        .parse()
        .map_err(|_| Error::Syntax(format!("expected a number, got {option:?}")))?;
    if position == 0 {
        return Err(Error::Syntax("positions are 1-based".into()));
    }
    Ok(position)
}

/// Rejects interval lists whose members intersect.
///
/// Intervals are sorted by start (stably, preserving original order on
/// ties) and adjacent pairs are scanned. Touching endpoints, e.g.
/// `[0,3)` and `[3,5)`, do not overlap.
pub fn check_overlap(intervals: &[Interval]) -> Result<(), Error> {
    let mut sorted = intervals.to_vec();
    sorted.sort_by_key(|interval| interval.start);

    for pair in sorted.windows(2) {
        if pair[1].start < pair[0].end {
            return Err(Error::Overlap);
        }
    }

    Ok(())
}

/// Reads selection strings from `input` until one parses and passes the
/// overlap check, re-prompting on every recoverable error.
///
/// `max_attempts` is the injectable retry budget: `None` loops until
/// valid input or end of input, `Some(n)` gives up with
/// [`Error::RetriesExhausted`] after `n` invalid entries. End of input
/// also exhausts the prompt, so a non-interactive caller can never hang.
pub fn prompt_selection<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    policy: RangePolicy,
    max_attempts: Option<u32>,
) -> Result<Vec<Interval>, Error> {
    let mut attempts = 0u32;

    loop {
        write!(output, "> ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Err(Error::RetriesExhausted);
        }

        let parsed = parse_selection(line.trim(), policy)
            .and_then(|intervals| check_overlap(&intervals).map(|()| intervals));

        match parsed {
            Ok(intervals) => return Ok(intervals),
            Err(err @ (Error::Syntax(_) | Error::Overlap | Error::InvalidInterval(_))) => {
                writeln!(
                    output,
                    "{err}. Syntax: Opt,Opt,... where Opt = <number> or <number>..<number>. Try again."
                )?;
                attempts += 1;
                if let Some(max) = max_attempts
                    && attempts >= max
                {
                    return Err(Error::RetriesExhausted);
                }
            }
            Err(err) => return Err(err),
        }
    }
}
