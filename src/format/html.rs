//! HTML character reference decoding.
//!
//! Numeric references are resolved here so the replacement rules for NUL,
//! surrogates, out-of-range values and the C1 block hold exactly. Named
//! references go through `html_escape`'s entity table.

use std::borrow::Cow;

const REPLACEMENT: char = '\u{FFFD}';

/// Windows-1252 code points for references in `0x80..=0x9F`. Zero means the
/// C1 control itself is kept.
const C1_REMAP: [u32; 32] = [
    0x20AC, 0, 0x201A, 0x0192, 0x201E, 0x2026, 0x2020, 0x2021, //
    0x02C6, 0x2030, 0x0160, 0x2039, 0x0152, 0, 0x017D, 0, //
    0, 0x2018, 0x2019, 0x201C, 0x201D, 0x2022, 0x2013, 0x2014, //
    0x02DC, 0x2122, 0x0161, 0x203A, 0x0153, 0, 0x017E, 0x0178,
];

/// Decodes HTML character references into literal text.
///
/// Mirrors reading back the value of a `<textarea>` whose markup content was
/// `html`: line breaks are normalized to `\n`, NUL becomes U+FFFD, numeric
/// references follow the HTML replacement rules (with or without the closing
/// `;`), and tags and unknown references pass through untouched.
///
/// Named references are decoded from the full entity table. Legacy names
/// written without a trailing `;` are left to that table and may not match a
/// browser in every case.
pub fn decode_html(html: &str) -> String {
    let text = normalize_input(html);
    let mut out = String::with_capacity(text.len());
    let mut rest: &str = &text;

    while let Some(at) = rest.find("&#") {
        out.push_str(&html_escape::decode_html_entities(&rest[..at]));
        let reference = &rest[at..];
        match numeric_reference(reference) {
            Some((ch, consumed)) => {
                out.push(ch);
                rest = &reference[consumed..];
            }
            None => {
                out.push_str("&#");
                rest = &reference[2..];
            }
        }
    }
    out.push_str(&html_escape::decode_html_entities(rest));
    out
}

fn normalize_input(html: &str) -> Cow<'_, str> {
    if !html.contains(['\r', '\0']) {
        return Cow::Borrowed(html);
    }
    Cow::Owned(html.replace("\r\n", "\n").replace('\r', "\n").replace('\0', "\u{FFFD}"))
}

/// Parses `&#...` at the start of `s`. Returns the decoded character and the
/// number of bytes consumed, or `None` when no digits follow.
fn numeric_reference(s: &str) -> Option<(char, usize)> {
    let body = &s[2..];
    let (radix, start) = match body.as_bytes().first() {
        Some(b'x' | b'X') => (16, 3),
        _ => (10, 2),
    };

    let digits = s[start..]
        .bytes()
        .take_while(|b| (*b as char).is_digit(radix))
        .count();
    if digits == 0 {
        return None;
    }

    let value = s[start..start + digits]
        .chars()
        .filter_map(|c| c.to_digit(radix))
        .fold(0u32, |acc, d| acc.saturating_mul(radix).saturating_add(d));

    let mut consumed = start + digits;
    if s[consumed..].starts_with(';') {
        consumed += 1;
    }
    Some((resolve_code_point(value), consumed))
}

fn resolve_code_point(value: u32) -> char {
    match value {
        0 => REPLACEMENT,
        0x80..=0x9F => {
            let mapped = C1_REMAP[(value - 0x80) as usize];
            char::from_u32(if mapped == 0 { value } else { mapped }).unwrap_or(REPLACEMENT)
        }
        // Surrogates and anything past U+10FFFF are rejected by from_u32
        _ => char::from_u32(value).unwrap_or(REPLACEMENT),
    }
}
