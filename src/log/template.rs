//! Portable percent-style template substitution.
//!
//! Placeholders are consumed left to right, one [`LogArg`] each:
//!
//! | conversion      | accepts                          |
//! |-----------------|----------------------------------|
//! | `%d` `%i`       | signed integers, bools, chars    |
//! | `%u` `%x` `%X` `%o` | integers (negatives wrap to 64 bits) |
//! | `%f` `%F` `%e` `%E` `%g` `%G` | floats and integers |
//! | `%c`            | chars, code points               |
//! | `%s` `%@`       | anything, through `Display`      |
//!
//! Flags `-`, `0`, `+`, space and `#`, a field width and a `.precision` are
//! honoured. Length modifiers (`l`, `ll`, `h`, `z`, `q`, `j`, `t`, `L`) are
//! accepted and ignored, so templates written for C-style loggers keep working.
//! `%%` emits a literal percent sign.

use std::{iter::Peekable, str::Chars};

use crate::log::{log_arg::LogArg, log_error::FormatError};

const DEFAULT_FLOAT_PRECISION: usize = 6;

/// Upper bound for field widths and precisions.
pub const MAX_FIELD_WIDTH: usize = u16::MAX as usize;

const CONVERSIONS: &[char] = &[
    'd', 'i', 'u', 'x', 'X', 'o', 'f', 'F', 'e', 'E', 'g', 'G', 'c', 's', '@', '%',
];

/// Substitutes `args` into `template`.
///
/// # Errors
///
/// Returns a [`FormatError`] when the template is malformed, when a
/// placeholder has no matching argument, or when an argument cannot be
/// rendered by its conversion. Extra arguments are ignored.
pub fn render_template(template: &str, args: &[LogArg]) -> Result<String, FormatError> {
    let mut out = String::with_capacity(template.len() + args.len() * 8);
    let mut chars = template.chars().peekable();
    let mut next_arg = 0usize;

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }

        let spec = Placeholder::parse(&mut chars)?;
        if spec.conversion == '%' {
            out.push('%');
            continue;
        }

        let position = next_arg + 1;
        let arg = args
            .get(next_arg)
            .ok_or(FormatError::MissingArgument { position })?;
        next_arg += 1;

        let body = spec.convert(arg, position)?;
        spec.pad_into(&mut out, &body);
    }

    Ok(out)
}

#[derive(Debug, Default)]
struct Placeholder {
    left: bool,
    zero: bool,
    plus: bool,
    space: bool,
    alternate: bool,
    width: usize,
    precision: Option<usize>,
    conversion: char,
}

impl Placeholder {
    fn parse(chars: &mut Peekable<Chars<'_>>) -> Result<Self, FormatError> {
        let mut spec = Placeholder::default();

        while let Some(&c) = chars.peek() {
            match c {
                '-' => spec.left = true,
                '0' => spec.zero = true,
                '+' => spec.plus = true,
                ' ' => spec.space = true,
                '#' => spec.alternate = true,
                _ => break,
            }
            chars.next();
        }

        spec.width = read_number(chars);
        if spec.width > MAX_FIELD_WIDTH {
            return Err(FormatError::WidthTooLarge(spec.width));
        }

        if chars.peek() == Some(&'.') {
            chars.next();
            let precision = read_number(chars);
            if precision > MAX_FIELD_WIDTH {
                return Err(FormatError::WidthTooLarge(precision));
            }
            spec.precision = Some(precision);
        }

        while matches!(chars.peek(), Some('h' | 'l' | 'q' | 'z' | 'j' | 't' | 'L')) {
            chars.next();
        }

        spec.conversion = chars.next().ok_or(FormatError::DanglingPercent)?;
        if !CONVERSIONS.contains(&spec.conversion) {
            return Err(FormatError::UnknownConversion(spec.conversion));
        }
        Ok(spec)
    }

    fn convert(&self, arg: &LogArg, position: usize) -> Result<String, FormatError> {
        let mismatch = FormatError::TypeMismatch {
            position,
            conversion: self.conversion,
        };

        let body = match self.conversion {
            'd' | 'i' => {
                let n = arg.as_i128().ok_or(mismatch)?;
                self.signed(n >= 0, n.unsigned_abs().to_string())
            }
            'u' => wrap_unsigned(arg.as_i128().ok_or(mismatch)?).to_string(),
            'x' | 'X' | 'o' => {
                let n = wrap_unsigned(arg.as_i128().ok_or(mismatch)?);
                match self.conversion {
                    'x' => self.prefixed("0x", format!("{n:x}")),
                    'X' => self.prefixed("0X", format!("{n:X}")),
                    _ => self.prefixed("0", format!("{n:o}")),
                }
            }
            'f' | 'F' => {
                let v = arg.as_f64().ok_or(mismatch)?;
                let precision = self.precision.unwrap_or(DEFAULT_FLOAT_PRECISION);
                self.signed(v.is_sign_positive(), format!("{:.*}", precision, v.abs()))
            }
            'e' | 'E' => {
                let v = arg.as_f64().ok_or(mismatch)?;
                let precision = self.precision.unwrap_or(DEFAULT_FLOAT_PRECISION);
                self.signed(
                    v.is_sign_positive(),
                    c_exponent(v.abs(), precision, self.conversion == 'E'),
                )
            }
            'g' | 'G' => {
                let v = arg.as_f64().ok_or(mismatch)?;
                let text = format!("{}", v.abs());
                let text = if self.conversion == 'G' {
                    text.to_uppercase()
                } else {
                    text
                };
                self.signed(v.is_sign_positive(), text)
            }
            'c' => arg.as_char().ok_or(mismatch)?.to_string(),
            's' | '@' => {
                let text = arg.to_string();
                match self.precision {
                    Some(max) => text.chars().take(max).collect(),
                    None => text,
                }
            }
            other => return Err(FormatError::UnknownConversion(other)),
        };

        Ok(body)
    }

    fn signed(&self, non_negative: bool, digits: String) -> String {
        if !non_negative {
            format!("-{digits}")
        } else if self.plus {
            format!("+{digits}")
        } else if self.space {
            format!(" {digits}")
        } else {
            digits
        }
    }

    fn prefixed(&self, prefix: &str, digits: String) -> String {
        if self.alternate && digits != "0" {
            format!("{prefix}{digits}")
        } else {
            digits
        }
    }

    fn is_numeric(&self) -> bool {
        matches!(
            self.conversion,
            'd' | 'i' | 'u' | 'x' | 'X' | 'o' | 'f' | 'F' | 'e' | 'E' | 'g' | 'G'
        )
    }

    fn pad_into(&self, out: &mut String, body: &str) {
        let len = body.chars().count();
        if len >= self.width {
            out.push_str(body);
            return;
        }
        let fill = self.width - len;

        if self.left {
            out.push_str(body);
            out.extend(std::iter::repeat_n(' ', fill));
        } else if self.zero && self.is_numeric() {
            // zeros go between the sign / radix prefix and the digits
            let split = sign_prefix_len(body);
            out.push_str(&body[..split]);
            out.extend(std::iter::repeat_n('0', fill));
            out.push_str(&body[split..]);
        } else {
            out.extend(std::iter::repeat_n(' ', fill));
            out.push_str(body);
        }
    }
}

fn read_number(chars: &mut Peekable<Chars<'_>>) -> usize {
    let mut n = 0usize;
    while let Some(d) = chars.peek().and_then(|c| c.to_digit(10)) {
        n = n.saturating_mul(10).saturating_add(d as usize);
        chars.next();
    }
    n
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn wrap_unsigned(n: i128) -> u64 {
    if n < 0 { n as i64 as u64 } else { n as u64 }
}

fn sign_prefix_len(body: &str) -> usize {
    let sign = usize::from(body.starts_with(['-', '+', ' ']));
    let rest = &body[sign..];
    if rest.starts_with("0x") || rest.starts_with("0X") {
        sign + 2
    } else {
        sign
    }
}

/// C-style exponent notation: mantissa, `e`, explicit sign, two-digit exponent.
fn c_exponent(v: f64, precision: usize, upper: bool) -> String {
    let raw = format!("{:.*e}", precision, v);
    if !v.is_finite() {
        return raw;
    }
    let (mantissa, exp) = raw.split_once('e').unwrap_or((raw.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);
    let marker = if upper { 'E' } else { 'e' };
    let sign = if exp < 0 { '-' } else { '+' };
    format!("{mantissa}{marker}{sign}{:02}", exp.unsigned_abs())
}
