//! # GridKit Constraints
//!
//! GridKit-owned tokenizer/parser for the textual constraint grammar.
//! Turns axis descriptions like `"[80][10,grow]:[25]"` and placement
//! strings like `"0 2 2 1, mid, top, fill-width=pref*1.5"` into validated
//! [`AxisBlock`] and [`Placement`] records.
//!
//! ## Grammar
//!
//! Axis descriptions are a run of bracketed blocks, optionally split by a
//! `:` into the explicit prefix and the repeating tail:
//!
//! ```text
//! [10,50] [grow] [25px] : [0,grow]
//! ```
//!
//! Each block holds `grow`, a single size (`min` = `max`), or a `min` and a
//! `max` separated by a comma and/or whitespace, where the `max` may be
//! `grow`. Sizes take an optional `px` suffix.
//!
//! Placements start with the column and row, optionally followed by the
//! span, then up to four comma-separated clauses in this order: horizontal
//! alignment (`left`/`mid`/`right` or a fraction), vertical alignment
//! (`top`/`mid`/`bottom` or a fraction), width fill and height fill
//! (`complete`/`full`, `max[imum]`, `pref[erred]`, `min[imum]`, each with
//! an optional `*factor`). Every clause may also be introduced explicitly
//! with `xalign=`, `yalign=`, `fill-width=` or `fill-height=`.
//!
//! Integers accept `0x` hexadecimal, `0b` binary, leading-`0` octal and
//! decimal notation; fractions may use a decimal point. Everything is
//! case-insensitive.
//!
//! Semantic validation stays with the engine types: whatever this parser
//! produces went through their factories, so a parsed record never violates
//! the layout invariants.

use gridkit_layout::{AxisBlock, FillKind, FillMode, LayoutError, Placement, SizeBound};
use thiserror::Error;

/// Errors from the constraint grammar.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// The input diverges from the grammar at `offset`.
    #[error("unexpected input at offset {offset} in {input:?}")]
    Unexpected { input: String, offset: usize },

    /// A numeric token that does not parse in any supported base.
    #[error("invalid number {text:?} in {input:?}")]
    InvalidNumber { input: String, text: String },

    /// Grammatically fine, but the engine types refused the values.
    #[error("{source} (parsing {input:?})")]
    Rejected {
        input: String,
        #[source]
        source: LayoutError,
    },
}

/// Parse a full axis description: explicit blocks, optionally followed by
/// `:` and the repeating tail.
pub fn parse_axis(input: &str) -> Result<(Vec<AxisBlock>, Vec<AxisBlock>), ParseError> {
    match input.split_once(':') {
        Some((head, tail)) => Ok((parse_blocks(head)?, parse_blocks(tail)?)),
        None => Ok((parse_blocks(input)?, Vec::new())),
    }
}

/// Parse a run of bracketed blocks: `"[10,50][grow]"`.
///
/// Whitespace between blocks is allowed; an empty (or all-whitespace) input
/// yields no blocks.
pub fn parse_blocks(input: &str) -> Result<Vec<AxisBlock>, ParseError> {
    let mut scanner = Scanner::new(input);
    let mut blocks = Vec::new();
    scanner.skip_ws();
    while !scanner.at_end() {
        scanner.expect('[')?;
        blocks.push(parse_block_body(&mut scanner)?);
        scanner.expect(']')?;
        scanner.skip_ws();
    }
    Ok(blocks)
}

/// Parse a placement: `"COL ROW [W H] [, clauses…]"`.
pub fn parse_placement(input: &str) -> Result<Placement, ParseError> {
    let mut scanner = Scanner::new(input);
    scanner.skip_ws();
    let col = scanner.parse_int()?;
    scanner.skip_ws();
    let row = scanner.parse_int()?;
    let mut placement = Placement::at(col, row);
    scanner.skip_ws();
    if matches!(scanner.peek(), Some(c) if c.is_ascii_digit()) {
        let col_span = scanner.parse_int()?;
        scanner.skip_ws();
        let row_span = scanner.parse_int()?;
        placement = placement.spanning(col_span, row_span);
        scanner.skip_ws();
    }
    // Clause slots are positional: 0 xalign, 1 yalign, 2 fill-width,
    // 3 fill-height. A clause fills the first slot its content fits.
    let mut slot = 0usize;
    while scanner.peek() == Some(',') {
        scanner.bump();
        scanner.skip_ws();
        parse_clause(&mut scanner, &mut placement, &mut slot)?;
        scanner.skip_ws();
    }
    if !scanner.at_end() {
        return Err(scanner.unexpected());
    }
    placement.validate().map_err(|e| scanner.reject(e))?;
    Ok(placement)
}

fn parse_block_body(scanner: &mut Scanner) -> Result<AxisBlock, ParseError> {
    scanner.skip_ws();
    if scanner.eat_keyword("grow") {
        scanner.skip_ws();
        return Ok(AxisBlock::grow());
    }
    let min = scanner.parse_size()?;
    scanner.skip_ws();
    if scanner.peek() == Some(',') {
        scanner.bump();
        scanner.skip_ws();
    }
    if scanner.peek() == Some(']') || scanner.at_end() {
        return AxisBlock::new(SizeBound::Px(min), SizeBound::Px(min))
            .map_err(|e| scanner.reject(e));
    }
    let max = if scanner.eat_keyword("grow") {
        SizeBound::Unbounded
    } else {
        SizeBound::Px(scanner.parse_size()?)
    };
    scanner.skip_ws();
    AxisBlock::new(SizeBound::Px(min), max).map_err(|e| scanner.reject(e))
}

fn parse_clause(
    scanner: &mut Scanner,
    placement: &mut Placement,
    slot: &mut usize,
) -> Result<(), ParseError> {
    if *slot == 0 && scanner.eat_key("xalign") {
        placement.x_align = parse_align(scanner, false)?;
        *slot = 1;
        return Ok(());
    }
    if *slot <= 1 && scanner.eat_key("yalign") {
        placement.y_align = parse_align(scanner, true)?;
        *slot = 2;
        return Ok(());
    }
    if *slot <= 2 && scanner.eat_key("fill-width") {
        placement.width_fill = parse_fill(scanner)?;
        *slot = 3;
        return Ok(());
    }
    if *slot <= 3 && scanner.eat_key("fill-height") {
        placement.height_fill = parse_fill(scanner)?;
        *slot = 4;
        return Ok(());
    }

    if matches!(scanner.peek(), Some(c) if c.is_ascii_digit() || c == '.') {
        let value = scanner.parse_float()?;
        match *slot {
            0 => {
                placement.x_align = value;
                *slot = 1;
            }
            1 => {
                placement.y_align = value;
                *slot = 2;
            }
            _ => return Err(scanner.unexpected()),
        }
        return Ok(());
    }

    let at = scanner.position();
    let word = scanner.take_word()?;
    match word.as_str() {
        "left" | "right" if *slot == 0 => {
            placement.x_align = if word == "left" { 0.0 } else { 1.0 };
            *slot = 1;
        }
        "mid" if *slot <= 1 => {
            if *slot == 0 {
                placement.x_align = 0.5;
                *slot = 1;
            } else {
                placement.y_align = 0.5;
                *slot = 2;
            }
        }
        "top" | "bottom" if *slot <= 1 => {
            placement.y_align = if word == "top" { 0.0 } else { 1.0 };
            *slot = 2;
        }
        "complete" | "full" | "max" | "maximum" | "pref" | "preferred" | "min" | "minimum" => {
            let fill = finish_fill(scanner, &word)?;
            if *slot <= 2 {
                placement.width_fill = fill;
                *slot = 3;
            } else if *slot == 3 {
                placement.height_fill = fill;
                *slot = 4;
            } else {
                return Err(scanner.unexpected_at(at));
            }
        }
        _ => return Err(scanner.unexpected_at(at)),
    }
    Ok(())
}

fn parse_align(scanner: &mut Scanner, vertical: bool) -> Result<f32, ParseError> {
    if matches!(scanner.peek(), Some(c) if c.is_ascii_alphabetic()) {
        let at = scanner.position();
        let word = scanner.take_word()?;
        match (word.as_str(), vertical) {
            ("left", false) | ("top", true) => Ok(0.0),
            ("mid", _) => Ok(0.5),
            ("right", false) | ("bottom", true) => Ok(1.0),
            _ => Err(scanner.unexpected_at(at)),
        }
    } else {
        scanner.parse_float()
    }
}

fn parse_fill(scanner: &mut Scanner) -> Result<FillMode, ParseError> {
    let at = scanner.position();
    let word = scanner.take_word()?;
    match word.as_str() {
        "complete" | "full" | "max" | "maximum" | "pref" | "preferred" | "min" | "minimum" => {
            finish_fill(scanner, &word)
        }
        _ => Err(scanner.unexpected_at(at)),
    }
}

/// Map a fill keyword to its kind and parse the optional `*factor`.
fn finish_fill(scanner: &mut Scanner, word: &str) -> Result<FillMode, ParseError> {
    let kind = match word {
        "complete" | "full" => FillKind::Complete,
        "max" | "maximum" => FillKind::Maximum,
        "pref" | "preferred" => FillKind::Preferred,
        _ => FillKind::Minimum,
    };
    scanner.skip_ws();
    let factor = if scanner.peek() == Some('*') {
        scanner.bump();
        scanner.skip_ws();
        scanner.parse_float()?
    } else {
        1.0
    };
    FillMode::scaled(kind, factor).map_err(|e| scanner.reject(e))
}

/// Cursor over the raw input.
struct Scanner<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn position(&self) -> usize {
        self.pos
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
    }

    fn expect(&mut self, want: char) -> Result<(), ParseError> {
        if self.peek() == Some(want) {
            self.bump();
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    /// Case-insensitive keyword, not followed by another word character.
    fn eat_keyword(&mut self, keyword: &str) -> bool {
        let rest = &self.input[self.pos..];
        if rest.len() >= keyword.len() && rest[..keyword.len()].eq_ignore_ascii_case(keyword) {
            let after = rest[keyword.len()..].chars().next();
            if !matches!(after, Some(c) if c.is_ascii_alphanumeric()) {
                self.pos += keyword.len();
                return true;
            }
        }
        false
    }

    /// `keyword` followed by `=`, consumed as one unit; rewinds on a miss.
    fn eat_key(&mut self, keyword: &str) -> bool {
        let start = self.pos;
        if !self.eat_keyword(keyword) {
            return false;
        }
        self.skip_ws();
        if self.peek() == Some('=') {
            self.bump();
            self.skip_ws();
            true
        } else {
            self.pos = start;
            false
        }
    }

    /// Lower-cased run of word characters (letters, digits, `-`).
    fn take_word(&mut self) -> Result<String, ParseError> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || c == '-') {
            self.bump();
        }
        if self.pos == start {
            return Err(self.unexpected());
        }
        Ok(self.input[start..self.pos].to_ascii_lowercase())
    }

    fn parse_int(&mut self) -> Result<u32, ParseError> {
        let start = self.pos;
        let word = self.number_word()?;
        int_from(&word).ok_or_else(|| self.invalid_number(start))
    }

    /// Integer with an optional `px` suffix.
    fn parse_size(&mut self) -> Result<u32, ParseError> {
        let start = self.pos;
        let word = self.number_word()?;
        let digits = word.strip_suffix("px").unwrap_or(&word);
        int_from(digits).ok_or_else(|| self.invalid_number(start))
    }

    fn parse_float(&mut self) -> Result<f32, ParseError> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || c == '.') {
            self.bump();
        }
        if self.pos == start {
            return Err(self.unexpected());
        }
        let word = self.input[start..self.pos].to_ascii_lowercase();
        float_from(&word).ok_or_else(|| self.invalid_number(start))
    }

    fn number_word(&mut self) -> Result<String, ParseError> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric()) {
            self.bump();
        }
        if self.pos == start {
            return Err(self.unexpected());
        }
        Ok(self.input[start..self.pos].to_ascii_lowercase())
    }

    fn unexpected(&self) -> ParseError {
        self.unexpected_at(self.pos)
    }

    fn unexpected_at(&self, offset: usize) -> ParseError {
        ParseError::Unexpected {
            input: self.input.to_string(),
            offset,
        }
    }

    fn invalid_number(&self, start: usize) -> ParseError {
        ParseError::InvalidNumber {
            input: self.input.to_string(),
            text: self.input[start..self.pos].to_string(),
        }
    }

    fn reject(&self, source: LayoutError) -> ParseError {
        ParseError::Rejected {
            input: self.input.to_string(),
            source,
        }
    }
}

fn int_from(text: &str) -> Option<u32> {
    if let Some(hex) = text.strip_prefix("0x") {
        u32::from_str_radix(hex, 16).ok()
    } else if let Some(bin) = text.strip_prefix("0b") {
        u32::from_str_radix(bin, 2).ok()
    } else if text.len() > 1 && text.starts_with('0') {
        u32::from_str_radix(text, 8).ok()
    } else {
        text.parse().ok()
    }
}

fn float_from(text: &str) -> Option<f32> {
    if text.contains('.') {
        text.parse().ok()
    } else {
        int_from(text).map(|v| v as f32)
    }
}
