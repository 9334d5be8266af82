//! Reader: source bytes to code-as-data
//!
//! The reader turns source text into a [`Seq`] of top-level forms. Lists
//! become `Seq` values, symbols become `Text`, string literals become
//! literal `Text`, numbers become `Int` or `Float`. The quote shorthand
//! `'x` is desugared into a call of the built-in quote macro, placed in the
//! tree as a `Callable` value.

use num_traits::{CheckedAdd, CheckedMul, CheckedSub, Zero};
use tracing::trace;

use crate::error::{ErrorKind, ErrorValue};
use crate::native;
use crate::seq::Seq;
use crate::text::Text;
use crate::value::{Callable, Float, Int, Value};

/// Bytes that end a symbol and never appear inside one.
pub const RESERVED: &[u8] = b"'\"();";

/// Deepest nesting of lists and quotes the reader accepts.
pub const MAX_NESTING: usize = 128;

fn is_whitespace(byte: u8) -> bool {
    matches!(byte, 9..=13 | b' ')
}

fn is_delimiter(byte: u8) -> bool {
    is_whitespace(byte) || RESERVED.contains(&byte)
}

/// Read every top-level form of `source`.
///
/// The input must be valid UTF-8 as a whole; the first malformed form
/// aborts the read.
pub fn read(source: &[u8]) -> Result<Seq, ErrorValue> {
    let source = std::str::from_utf8(source).map_err(|e| {
        ErrorValue::new(
            ErrorKind::EncodingError,
            format!("invalid UTF-8 sequence at byte {}", e.valid_up_to()),
        )
    })?;
    Reader::new(source).read_all()
}

pub fn read_str(source: &str) -> Result<Seq, ErrorValue> {
    Reader::new(source).read_all()
}

/// The two-element call `(quote! form)`.
pub fn quote_form(form: Value) -> Value {
    Value::Seq(Seq::from(vec![
        Value::Callable(Callable::macro_(native::quote)),
        form,
    ]))
}

// ============================================================================
// Reader
// ============================================================================

struct Reader<'a> {
    input: &'a [u8],
    position: usize,
    depth: usize,
}

impl<'a> Reader<'a> {
    fn new(input: &'a str) -> Self {
        Reader {
            input: input.as_bytes(),
            position: 0,
            depth: 0,
        }
    }

    fn current(&self) -> Option<u8> {
        self.input.get(self.position).copied()
    }

    fn advance(&mut self) {
        if self.position < self.input.len() {
            self.position += 1;
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(byte) = self.current() {
            if is_whitespace(byte) {
                self.advance();
            } else if byte == b';' {
                while self.current().is_some_and(|b| b != b'\n') {
                    self.advance();
                }
            } else {
                break;
            }
        }
    }

    fn read_all(mut self) -> Result<Seq, ErrorValue> {
        let mut forms = Seq::new();
        loop {
            self.skip_whitespace();
            if self.current().is_none() {
                break;
            }
            forms.push(self.read_form()?);
        }
        trace!(forms = forms.len(), "read");
        Ok(forms)
    }

    fn read_form(&mut self) -> Result<Value, ErrorValue> {
        match self.current() {
            Some(b'\'') => self.nested(Self::read_quote),
            Some(b'"') => self.read_string(),
            Some(b'(') => self.nested(Self::read_list),
            Some(b')') => Err(ErrorValue::syntax("unexpected ')'")),
            Some(_) => self.read_atom(),
            None => Err(ErrorValue::syntax("unexpected end of input")),
        }
    }

    fn nested(
        &mut self,
        read: fn(&mut Self) -> Result<Value, ErrorValue>,
    ) -> Result<Value, ErrorValue> {
        if self.depth >= MAX_NESTING {
            return Err(ErrorValue::new(
                ErrorKind::StackError,
                format!("nesting exceeds the limit of {MAX_NESTING}"),
            ));
        }
        self.depth += 1;
        let form = read(self);
        self.depth -= 1;
        form
    }

    fn read_quote(&mut self) -> Result<Value, ErrorValue> {
        self.advance();
        self.skip_whitespace();
        match self.current() {
            None | Some(b')') => Err(ErrorValue::syntax("nothing to quote")),
            Some(_) => Ok(quote_form(self.read_form()?)),
        }
    }

    fn read_string(&mut self) -> Result<Value, ErrorValue> {
        self.advance();
        let start = self.position;
        let len = self.input[start..]
            .iter()
            .position(|&b| b == b'"')
            .ok_or_else(|| ErrorValue::syntax("unclosed string"))?;
        self.position = start + len + 1;
        Ok(Value::Text(Text::literal(&self.input[start..start + len])))
    }

    fn read_list(&mut self) -> Result<Value, ErrorValue> {
        self.advance();
        let mut items = Seq::new();
        loop {
            self.skip_whitespace();
            match self.current() {
                None => return Err(ErrorValue::syntax("unclosed list")),
                Some(b')') => {
                    self.advance();
                    return Ok(Value::Seq(items));
                }
                Some(_) => items.push(self.read_form()?),
            }
        }
    }

    fn read_atom(&mut self) -> Result<Value, ErrorValue> {
        let start = self.position;
        while self.current().is_some_and(|b| !is_delimiter(b)) {
            self.advance();
        }
        let token = &self.input[start..self.position];
        match parse_number(token) {
            Some(number) => number,
            None => Ok(Value::Text(Text::from(token))),
        }
    }
}

// ============================================================================
// Numbers
// ============================================================================

/// `0` or a digit run without a leading zero.
fn is_integer_digits(digits: &[u8]) -> bool {
    match digits {
        [] => false,
        [b'0'] => true,
        [b'0', ..] => false,
        _ => digits.iter().all(u8::is_ascii_digit),
    }
}

/// Parse a complete token as a number, or `None` if it is a symbol.
fn parse_number(token: &[u8]) -> Option<Result<Value, ErrorValue>> {
    let (negative, unsigned) = match token.strip_prefix(b"-") {
        Some(rest) => (true, rest),
        None => (false, token),
    };
    let (whole, fraction) = match unsigned.iter().position(|&b| b == b'.') {
        Some(dot) => (&unsigned[..dot], Some(&unsigned[dot + 1..])),
        None => (unsigned, None),
    };
    if !is_integer_digits(whole) {
        return None;
    }
    match fraction {
        None => Some(
            accumulate::<Int>(whole, negative)
                .map(Value::Int)
                .map_err(|kind| {
                    let bound = if negative { "below" } else { "above" };
                    ErrorValue::new(
                        kind,
                        format!(
                            "integer literal {} is {bound} the Int range",
                            String::from_utf8_lossy(token)
                        ),
                    )
                }),
        ),
        Some(digits) if !digits.is_empty() && digits.iter().all(u8::is_ascii_digit) => {
            let parsed = std::str::from_utf8(token).ok()?.parse::<Float>().ok()?;
            Some(Ok(Value::Float(parsed)))
        }
        Some(_) => None,
    }
}

/// Accumulate decimal digits with checked arithmetic.
///
/// Negative literals subtract each digit so the most negative value of
/// `T` is reachable.
fn accumulate<T>(digits: &[u8], negative: bool) -> Result<T, ErrorKind>
where
    T: Zero + CheckedMul + CheckedAdd + CheckedSub + From<u8>,
{
    let ten = T::from(10u8);
    digits.iter().try_fold(T::zero(), |acc, &byte| {
        let digit = T::from(byte - b'0');
        let shifted = acc.checked_mul(&ten);
        if negative {
            shifted
                .and_then(|n| n.checked_sub(&digit))
                .ok_or(ErrorKind::UnderflowError)
        } else {
            shifted
                .and_then(|n| n.checked_add(&digit))
                .ok_or(ErrorKind::OverflowError)
        }
    })
}
