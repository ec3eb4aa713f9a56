//! src/semantics/literal.rs

use crate::ast::{Literal, LiteralKind};
use crate::error::EvalError;

const BAD_RUNE: &str = "cannot parse character literal";

/// Turns an integer or rune literal into its numeric value.
///
/// Integers are read as base-10 signed numbers. Runes are unquoted and must
/// decode to exactly one valid Unicode scalar, whose code point is returned.
pub fn convert_literal(literal: &Literal) -> Result<i64, EvalError> {
    match literal.kind {
        LiteralKind::Int => literal
            .text
            .parse::<i64>()
            .map_err(|e| {
                EvalError::conversion(&literal.text, format!("not a base-10 integer ({})", e))
            }),
        LiteralKind::Char => convert_rune(&literal.text),
        LiteralKind::Float | LiteralKind::Imag | LiteralKind::String => Err(
            EvalError::conversion(&literal.text, "unsupported literal kind"),
        ),
    }
}

fn convert_rune(text: &str) -> Result<i64, EvalError> {
    let bytes = unquote_rune(text).ok_or_else(|| EvalError::conversion(text, BAD_RUNE))?;
    let decoded = std::str::from_utf8(&bytes)
        .map_err(|_| EvalError::conversion(text, "invalid UTF-8 encoding"))?;

    let mut chars = decoded.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c as i64),
        _ => Err(EvalError::conversion(
            text,
            "character literal must contain exactly one character",
        )),
    }
}

/// Decodes a single-quoted Go rune literal into raw bytes. `\x` and octal
/// escapes produce single bytes, which is how `'\x80'` ends up as invalid
/// UTF-8 rather than U+0080.
fn unquote_rune(text: &str) -> Option<Vec<u8>> {
    let inner = text.strip_prefix('\'')?.strip_suffix('\'')?;
    let mut chars = inner.chars().peekable();
    let mut out = Vec::new();

    match chars.next()? {
        '\\' => match chars.next()? {
            'a' => out.push(0x07),
            'b' => out.push(0x08),
            'f' => out.push(0x0C),
            'n' => out.push(b'\n'),
            'r' => out.push(b'\r'),
            't' => out.push(b'\t'),
            'v' => out.push(0x0B),
            '\\' => out.push(b'\\'),
            '\'' => out.push(b'\''),
            'x' => out.push(read_hex(&mut chars, 2)? as u8),
            'u' => push_scalar(&mut out, read_hex(&mut chars, 4)?)?,
            'U' => push_scalar(&mut out, read_hex(&mut chars, 8)?)?,
            first @ '0'..='7' => {
                let mut value = first.to_digit(8)?;
                for _ in 0..2 {
                    value = value * 8 + chars.next()?.to_digit(8)?;
                }
                if value > 0xFF {
                    return None;
                }
                out.push(value as u8);
            }
            _ => return None,
        },
        '\'' | '\n' => return None,
        c => push_scalar(&mut out, c as u32)?,
    }

    // A rune literal holds one character; anything left over is malformed.
    if chars.next().is_some() {
        return None;
    }
    Some(out)
}

fn read_hex(chars: &mut std::iter::Peekable<std::str::Chars<'_>>, digits: usize) -> Option<u32> {
    let mut value = 0u32;
    for _ in 0..digits {
        value = value * 16 + chars.next()?.to_digit(16)?;
    }
    Some(value)
}

/// Surrogates and out-of-range code points are rejected here.
fn push_scalar(out: &mut Vec<u8>, code_point: u32) -> Option<()> {
    let c = char::from_u32(code_point)?;
    let mut buf = [0u8; 4];
    out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
    Some(())
}
