//! Escape-sequence decoding for quoted literals.
//!
//! The grammar admits `\\ \" \' \r \n \t`, `\xHH`, and `\uHHHH`; this module
//! turns the matched source text into the character it denotes.

use bbnf_core::EvalError;

/// Decode one whole escape sequence, backslash included.
pub(crate) fn decode(text: &str) -> Result<char, EvalError> {
    let mut chars = text.chars();
    let (Some('\\'), Some(selector)) = (chars.next(), chars.next()) else {
        return Err(EvalError::handler(format!("malformed escape sequence `{text}`")));
    };
    match selector {
        '\\' | '"' | '\'' => Ok(selector),
        'r' => Ok('\r'),
        'n' => Ok('\n'),
        't' => Ok('\t'),
        'x' | 'u' => {
            let digits = chars.as_str();
            let code = u32::from_str_radix(digits, 16)
                .map_err(|_| EvalError::handler(format!("malformed escape sequence `{text}`")))?;
            char::from_u32(code).ok_or_else(|| {
                EvalError::handler(format!("escape denotes an invalid code point: `{text}`"))
            })
        }
        _ => Err(EvalError::handler(format!("unknown escape sequence `{text}`"))),
    }
}
