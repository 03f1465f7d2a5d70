//! Decoding of literal lexemes into values
//!
//! The scanner only guarantees the shape of a literal; these helpers turn
//! the lexeme into the value the analyzer works with. Integer bases follow
//! the scanner: `0x`/`0X` is hexadecimal, a leading `0` is octal, anything
//! else is decimal.

/// Error produced while decoding a literal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LiteralError {
    OutOfRange(String),
    Malformed(String),
}

impl std::fmt::Display for LiteralError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LiteralError::OutOfRange(s) => write!(f, "integer literal out of range: {}", s),
            LiteralError::Malformed(s) => write!(f, "malformed literal: {}", s),
        }
    }
}

pub fn parse_int(s: &str) -> Result<i64, LiteralError> {
    let (digits, radix) = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        (hex, 16)
    } else if s.len() > 1 && s.starts_with('0') {
        (&s[1..], 8)
    } else {
        (s, 10)
    };
    i64::from_str_radix(digits, radix).map_err(|e| match e.kind() {
        std::num::IntErrorKind::PosOverflow => LiteralError::OutOfRange(s.to_string()),
        _ => LiteralError::Malformed(s.to_string()),
    })
}

pub fn parse_real(s: &str) -> Result<f64, LiteralError> {
    s.parse().map_err(|_| LiteralError::Malformed(s.to_string()))
}

/// Character code of a quoted char literal such as `'a'` or `'\n'`
pub fn parse_char(s: &str) -> Result<u8, LiteralError> {
    let inner = s
        .strip_prefix('\'')
        .and_then(|rest| rest.strip_suffix('\''))
        .ok_or_else(|| LiteralError::Malformed(s.to_string()))?;
    let decoded = unescape(inner).ok_or_else(|| LiteralError::Malformed(s.to_string()))?;
    match decoded.as_slice() {
        [c] => Ok(*c),
        _ => Err(LiteralError::Malformed(s.to_string())),
    }
}

/// Contents of a quoted string literal with escapes resolved
pub fn parse_string(s: &str) -> Result<String, LiteralError> {
    let inner = s
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .ok_or_else(|| LiteralError::Malformed(s.to_string()))?;
    let bytes = unescape(inner).ok_or_else(|| LiteralError::Malformed(s.to_string()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Resolve `\a \b \f \n \r \t \v \' \" \\ \0`; any other escape is rejected
fn unescape(s: &str) -> Option<Vec<u8>> {
    let mut out = Vec::with_capacity(s.len());
    let mut bytes = s.bytes();
    while let Some(b) = bytes.next() {
        if b != b'\\' {
            out.push(b);
            continue;
        }
        let escaped = match bytes.next()? {
            b'a' => 0x07,
            b'b' => 0x08,
            b'f' => 0x0C,
            b'n' => b'\n',
            b'r' => b'\r',
            b't' => b'\t',
            b'v' => 0x0B,
            b'\'' => b'\'',
            b'"' => b'"',
            b'\\' => b'\\',
            b'0' => 0,
            _ => return None,
        };
        out.push(escaped);
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_bases() {
        assert_eq!(parse_int("42"), Ok(42));
        assert_eq!(parse_int("0"), Ok(0));
        assert_eq!(parse_int("0x1F"), Ok(31));
        assert_eq!(parse_int("0XfF"), Ok(255));
        assert_eq!(parse_int("017"), Ok(15));
        assert!(matches!(parse_int("99999999999999999999"), Err(LiteralError::OutOfRange(_))));
    }

    #[test]
    fn test_char_codes() {
        assert_eq!(parse_char("'a'"), Ok(b'a'));
        assert_eq!(parse_char("'\\n'"), Ok(b'\n'));
        assert_eq!(parse_char("'\\0'"), Ok(0));
        assert_eq!(parse_char("'\\''"), Ok(b'\''));
        assert_eq!(parse_char("'\\v'"), Ok(0x0B));
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(parse_string("\"a\\tb\"").unwrap(), "a\tb");
        assert_eq!(parse_string("\"\"").unwrap(), "");
        assert_eq!(parse_string("\"say \\\"hi\\\"\"").unwrap(), "say \"hi\"");
        assert!(parse_string("\"\\q\"").is_err());
    }

    #[test]
    fn test_real() {
        assert_eq!(parse_real("2.5e1"), Ok(25.0));
    }
}
