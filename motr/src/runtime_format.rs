/* Copyright (C) 2018 Olivier Goffart <ogoffart@woboq.com>

Permission is hereby granted, free of charge, to any person obtaining a copy of this software and
associated documentation files (the "Software"), to deal in the Software without restriction,
including without limitation the rights to use, copy, modify, merge, publish, distribute, sublicense,
and/or sell copies of the Software, and to permit persons to whom the Software is furnished to do so,
subject to the following conditions:

The above copyright notice and this permission notice shall be included in all copies or substantial
portions of the Software.

THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING BUT
NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES
OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN
CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.
*/

//! printf-like formatter for translated strings.
//!
//! Catalog strings use C format placeholders: `%s`, `%d`, ... consume the arguments from left to
//! right, and `%2$s` picks the second argument explicitly, which lets a translation reorder
//! them. Flags (`-`, `+`, `0`, space, `'c`), a width and a `.precision` may precede the
//! conversion letter. `%%` is a literal percent sign.

use std::borrow::Cow;

use crate::error::FormatError;

/// Widths and precisions beyond this are rejected: templates come from catalog files.
const MAX_WIDTH: usize = 4096;

/// One argument passed to [`crate::Catalog::translate`].
///
/// Conversions are lenient: a string used with `%d` is read from its leading digits, and a
/// number used with `%s` is displayed as usual.
///
/// Integers are stored as `i64`: converting a `u64` or `usize` above `i64::MAX` saturates to
/// `i64::MAX`.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Int(i64),
    Float(f64),
    Str(String),
}

impl Arg {
    /// The plural count this argument stands for, if it is an integer.
    pub fn as_count(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }

    fn as_int(&self) -> i64 {
        match self {
            Self::Int(value) => *value,
            Self::Float(value) => *value as i64,
            Self::Str(string) => leading_number(string, false).parse().unwrap_or(0),
        }
    }

    fn as_float(&self) -> f64 {
        match self {
            Self::Int(value) => *value as f64,
            Self::Float(value) => *value,
            Self::Str(string) => leading_number(string, true).parse().unwrap_or(0.0),
        }
    }
}

/// The numeric prefix of `string`, like C's `strtol`/`strtod` would consume it.
fn leading_number(string: &str, fraction: bool) -> &str {
    let string = string.trim_start();
    let bytes = string.as_bytes();
    let mut end = usize::from(matches!(bytes.first(), Some(b'-' | b'+')));
    end += bytes[end..].iter().take_while(|c| c.is_ascii_digit()).count();
    if fraction && bytes.get(end) == Some(&b'.') {
        end += 1 + bytes[end + 1..].iter().take_while(|c| c.is_ascii_digit()).count();
    }
    &string[..end]
}

impl std::fmt::Display for Arg {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Int(value) => std::fmt::Display::fmt(value, f),
            Self::Float(value) => std::fmt::Display::fmt(value, f),
            Self::Str(string) => f.write_str(string),
        }
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {$(
        impl From<$t> for Arg {
            fn from(value: $t) -> Self {
                Self::Int(value.into())
            }
        }
    )*};
}
impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for Arg {
    fn from(value: u64) -> Self {
        Self::Int(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<usize> for Arg {
    fn from(value: usize) -> Self {
        Self::Int(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<isize> for Arg {
    fn from(value: isize) -> Self {
        Self::Int(value as i64)
    }
}

impl From<f32> for Arg {
    fn from(value: f32) -> Self {
        Self::Float(value.into())
    }
}

impl From<f64> for Arg {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Arg {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

impl From<String> for Arg {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<&String> for Arg {
    fn from(value: &String) -> Self {
        Self::Str(value.clone())
    }
}

impl From<Cow<'_, str>> for Arg {
    fn from(value: Cow<'_, str>) -> Self {
        Self::Str(value.into_owned())
    }
}

/// A parsed placeholder, from the `%` to the conversion letter.
#[derive(Debug)]
struct Spec {
    argnum: Option<usize>,
    left: bool,
    plus: bool,
    pad: char,
    width: usize,
    precision: Option<usize>,
    conversion: u8,
}

impl Spec {
    /// Parses the placeholder starting at the `%` at `start`. Returns it and the offset after it.
    fn parse(template: &str, start: usize) -> Result<(Self, usize), FormatError> {
        let bytes = template.as_bytes();
        let invalid = |reason| FormatError::InvalidPlaceholder {
            position: start,
            reason,
        };
        let digits = |i: usize| bytes[i..].iter().take_while(|c| c.is_ascii_digit()).count();
        let number = |i: usize, n: usize, reason| {
            template[i..i + n]
                .parse::<usize>()
                .ok()
                .filter(|value| *value <= MAX_WIDTH)
                .ok_or_else(|| invalid(reason))
        };

        let mut spec = Spec {
            argnum: None,
            left: false,
            plus: false,
            pad: ' ',
            width: 0,
            precision: None,
            conversion: b's',
        };
        let mut i = start + 1;

        let n = digits(i);
        if n > 0 && bytes.get(i + n) == Some(&b'$') {
            let index = number(i, n, "argument number too large")?;
            if index == 0 {
                return Err(invalid("argument number must be greater than zero"));
            }
            spec.argnum = Some(index);
            i += n + 1;
        }

        loop {
            match bytes.get(i) {
                Some(b'-') => spec.left = true,
                Some(b'+') => spec.plus = true,
                Some(b' ') => spec.pad = ' ',
                Some(b'0') => spec.pad = '0',
                Some(b'\'') => {
                    let pad = template[i + 1..]
                        .chars()
                        .next()
                        .ok_or_else(|| invalid("missing padding character"))?;
                    spec.pad = pad;
                    i += pad.len_utf8();
                }
                _ => break,
            }
            i += 1;
        }

        let n = digits(i);
        if n > 0 {
            spec.width = number(i, n, "width too large")?;
            i += n;
        }

        if bytes.get(i) == Some(&b'.') {
            i += 1;
            let n = digits(i);
            spec.precision = Some(if n > 0 {
                number(i, n, "precision too large")?
            } else {
                0
            });
            i += n;
        }

        spec.conversion = match bytes.get(i) {
            Some(c) if b"bcdeEfFgGiosuxX".contains(c) => *c,
            Some(_) => return Err(invalid("unknown conversion")),
            None => return Err(invalid("missing conversion")),
        };
        Ok((spec, i + 1))
    }

    fn render(&self, arg: &Arg, out: &mut String) {
        let sign_of = |negative: bool| match (negative, self.plus) {
            (true, _) => "-",
            (false, true) => "+",
            (false, false) => "",
        };
        let (sign, body) = match self.conversion {
            b's' => {
                let text = arg.to_string();
                let body = match self.precision {
                    Some(precision) => text.chars().take(precision).collect(),
                    None => text,
                };
                ("", body)
            }
            b'd' | b'i' => {
                let value = arg.as_int();
                (sign_of(value < 0), value.unsigned_abs().to_string())
            }
            b'u' => ("", (arg.as_int() as u64).to_string()),
            b'c' => {
                let c = u32::try_from(arg.as_int()).ok().and_then(char::from_u32);
                ("", c.map(String::from).unwrap_or_default())
            }
            b'f' | b'F' => {
                let value = arg.as_float();
                let precision = self.precision.unwrap_or(6);
                (sign_of(value < 0.0), format!("{:.*}", precision, value.abs()))
            }
            b'e' | b'E' => {
                let value = arg.as_float();
                let precision = self.precision.unwrap_or(6);
                let body = exponent(value.abs(), precision, self.conversion == b'E');
                (sign_of(value < 0.0), body)
            }
            b'g' | b'G' => {
                let value = arg.as_float();
                let body = general(value.abs(), self.precision, self.conversion == b'G');
                (sign_of(value < 0.0), body)
            }
            b'x' => ("", format!("{:x}", arg.as_int() as u64)),
            b'X' => ("", format!("{:X}", arg.as_int() as u64)),
            b'o' => ("", format!("{:o}", arg.as_int() as u64)),
            _ => ("", format!("{:b}", arg.as_int() as u64)),
        };

        let fill = self
            .width
            .saturating_sub(sign.len() + body.chars().count());
        if self.left {
            let pad = if self.pad == '0' { ' ' } else { self.pad };
            out.push_str(sign);
            out.push_str(&body);
            out.extend(std::iter::repeat(pad).take(fill));
        } else if self.pad == '0' {
            out.push_str(sign);
            out.extend(std::iter::repeat('0').take(fill));
            out.push_str(&body);
        } else {
            out.extend(std::iter::repeat(self.pad).take(fill));
            out.push_str(sign);
            out.push_str(&body);
        }
    }
}

/// `1.5e+3` notation, with the exponent sign always present.
fn exponent(value: f64, precision: usize, upper: bool) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let formatted = format!("{:.*e}", precision, value);
    let (mantissa, exp) = formatted.split_once('e').unwrap_or((formatted.as_str(), "0"));
    let mut result = String::with_capacity(formatted.len() + 2);
    result.push_str(mantissa);
    result.push(if upper { 'E' } else { 'e' });
    if !exp.starts_with('-') {
        result.push('+');
    }
    result.push_str(exp);
    result
}

/// `%g`: `precision` significant digits, in exponent notation when the exponent is below -4 or
/// not below the precision. Trailing zeros are removed.
fn general(value: f64, precision: Option<usize>, upper: bool) -> String {
    if !value.is_finite() {
        let body = value.to_string();
        return if upper { body.to_uppercase() } else { body };
    }
    let precision = precision.unwrap_or(6).max(1);
    let exp = if value == 0.0 {
        0
    } else {
        let rounded = format!("{:.*e}", precision - 1, value);
        rounded
            .split_once('e')
            .and_then(|(_, exp)| exp.parse::<i64>().ok())
            .unwrap_or(0)
    };
    if exp < -4 || exp >= precision as i64 {
        let formatted = exponent(value, precision - 1, upper);
        let marker = if upper { 'E' } else { 'e' };
        match formatted.split_once(marker) {
            Some((mantissa, exp)) => format!("{}{}{}", strip_zeros(mantissa), marker, exp),
            None => formatted,
        }
    } else {
        let decimals = (precision as i64 - 1 - exp) as usize;
        strip_zeros(&format!("{:.*}", decimals, value)).to_owned()
    }
}

fn strip_zeros(number: &str) -> &str {
    if number.contains('.') {
        number.trim_end_matches('0').trim_end_matches('.')
    } else {
        number
    }
}

/// Substitutes `args` into the placeholders of `template`.
///
/// Fails when a placeholder is malformed or refers to an argument that was not supplied.
/// Unused arguments are ignored.
pub fn sprintf(template: &str, args: &[Arg]) -> Result<String, FormatError> {
    let mut out = String::with_capacity(template.len());
    let mut next_arg = 0;
    let mut pos = 0;
    while let Some(p) = template[pos..].find('%') {
        let p = p + pos;
        out.push_str(&template[pos..p]);

        // Escaped %
        if template[p + 1..].starts_with('%') {
            out.push('%');
            pos = p + 2;
            continue;
        }

        let (spec, end) = Spec::parse(template, p)?;
        let index = spec.argnum.unwrap_or_else(|| {
            next_arg += 1;
            next_arg
        });
        let arg = args.get(index - 1).ok_or(FormatError::MissingArgument {
            index,
            supplied: args.len(),
        })?;
        spec.render(arg, &mut out);
        pos = end;
    }
    out.push_str(&template[pos..]);
    Ok(out)
}
