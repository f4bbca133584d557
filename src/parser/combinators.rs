// The combinator algebra: sequence, longest-match alternation, empty,
// end-of-input, plus the handful of lexical primitives the grammar is
// built from. Every combinator here has the shape
// `Fn(&str, Cursor) -> ParseResult<T>` and is a pure function of its
// arguments — there is no implicit cursor; state flows purely through
// arguments and return values rather than interior mutability.
//
// Whitespace (space, tab, newline) is skipped before every atomic match,
// never inside a multi-character lexeme.

use crate::error::ParseError;

pub type Cursor = usize;
pub type ParseResult<T> = Result<(T, Cursor), ParseError>;
pub type BoxParser<'a, T> = Box<dyn Fn(&str, Cursor) -> ParseResult<T> + 'a>;

fn is_whitespace(b: u8) -> bool {
    b == b' ' || b == b'\t' || b == b'\n'
}

/// Advance past whitespace; never fails, never reports a cursor on its own.
pub fn skip_ws(text: &str, cursor: Cursor) -> Cursor {
    let bytes = text.as_bytes();
    let mut c = cursor;
    while c < bytes.len() && is_whitespace(bytes[c]) {
        c += 1;
    }
    c
}

/// Matches the empty string unconditionally. Consumes nothing.
pub fn empty(_text: &str, cursor: Cursor) -> ParseResult<()> {
    Ok(((), cursor))
}

/// Matches iff no non-whitespace character remains.
pub fn end_of_input(text: &str, cursor: Cursor) -> ParseResult<()> {
    if skip_ws(text, cursor) >= text.len() {
        Ok(((), cursor))
    } else {
        Err(ParseError::NoMatch { rule: "end_of_input", cursor })
    }
}

fn match_literal(text: &str, cursor: Cursor, literal: &'static str, rule: &'static str) -> ParseResult<()> {
    let c = skip_ws(text, cursor);
    if text[c..].starts_with(literal) {
        Ok(((), c + literal.len()))
    } else {
        Err(ParseError::NoMatch { rule, cursor })
    }
}

/// Matches a literal keyword (e.g. `def`) after whitespace skipping.
pub fn keyword(word: &'static str) -> impl Fn(&str, Cursor) -> ParseResult<()> {
    move |text, cursor| match_literal(text, cursor, word, "keyword")
}

/// Matches a literal punctuation string (e.g. `(`, `+`) after whitespace
/// skipping. Distinguished from `keyword` only by the rule name it reports
/// on failure, mirroring the distinct token kinds in the grammar.
pub fn punct(symbol: &'static str) -> impl Fn(&str, Cursor) -> ParseResult<()> {
    move |text, cursor| match_literal(text, cursor, symbol, "punct")
}

/// One alphabetical or underscore character, then zero or more alphanumeric
/// or underscore characters.
pub fn identifier(text: &str, cursor: Cursor) -> ParseResult<String> {
    let c = skip_ws(text, cursor);
    let bytes = text.as_bytes();
    if c >= bytes.len() || !(bytes[c].is_ascii_alphabetic() || bytes[c] == b'_') {
        return Err(ParseError::NoMatch { rule: "identifier", cursor });
    }
    let mut end = c + 1;
    while end < bytes.len() && (bytes[end].is_ascii_alphanumeric() || bytes[end] == b'_') {
        end += 1;
    }
    Ok((text[c..end].to_string(), end))
}

/// A greedy run of digits, parsed as a signed 64-bit integer.
pub fn integer_literal(text: &str, cursor: Cursor) -> ParseResult<i64> {
    let c = skip_ws(text, cursor);
    let bytes = text.as_bytes();
    let mut end = c;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == c {
        return Err(ParseError::NoMatch { rule: "integer_literal", cursor });
    }
    text[c..end]
        .parse::<i64>()
        .map(|v| (v, end))
        .map_err(|_| ParseError::NoMatch { rule: "integer_literal", cursor })
}

/// Digits, a mandatory dot, digits — either digit run may be empty.
pub fn float_literal(text: &str, cursor: Cursor) -> ParseResult<f64> {
    let c = skip_ws(text, cursor);
    let bytes = text.as_bytes();
    let mut end = c;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end >= bytes.len() || bytes[end] != b'.' {
        return Err(ParseError::NoMatch { rule: "float_literal", cursor });
    }
    end += 1;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    text[c..end]
        .parse::<f64>()
        .map(|v| (v, end))
        .map_err(|_| ParseError::NoMatch { rule: "float_literal", cursor })
}

/// Runs two sub-parsers left to right. Any failure restores the cursor
/// `sequence` itself was called with and propagates.
pub fn seq2<'a, A: 'a, B: 'a>(
    p1: impl Fn(&str, Cursor) -> ParseResult<A> + 'a,
    p2: impl Fn(&str, Cursor) -> ParseResult<B> + 'a,
) -> impl Fn(&str, Cursor) -> ParseResult<(A, B)> + 'a {
    move |text, cursor| {
        let (a, c) = p1(text, cursor).map_err(|e| e.with_cursor(cursor))?;
        let (b, c) = p2(text, c).map_err(|e| e.with_cursor(cursor))?;
        Ok(((a, b), c))
    }
}

pub fn seq3<'a, A: 'a, B: 'a, C: 'a>(
    p1: impl Fn(&str, Cursor) -> ParseResult<A> + 'a,
    p2: impl Fn(&str, Cursor) -> ParseResult<B> + 'a,
    p3: impl Fn(&str, Cursor) -> ParseResult<C> + 'a,
) -> impl Fn(&str, Cursor) -> ParseResult<(A, B, C)> + 'a {
    move |text, cursor| {
        let (a, c) = p1(text, cursor).map_err(|e| e.with_cursor(cursor))?;
        let (b, c) = p2(text, c).map_err(|e| e.with_cursor(cursor))?;
        let (d, c) = p3(text, c).map_err(|e| e.with_cursor(cursor))?;
        Ok(((a, b, d), c))
    }
}

pub fn seq4<'a, A: 'a, B: 'a, C: 'a, D: 'a>(
    p1: impl Fn(&str, Cursor) -> ParseResult<A> + 'a,
    p2: impl Fn(&str, Cursor) -> ParseResult<B> + 'a,
    p3: impl Fn(&str, Cursor) -> ParseResult<C> + 'a,
    p4: impl Fn(&str, Cursor) -> ParseResult<D> + 'a,
) -> impl Fn(&str, Cursor) -> ParseResult<(A, B, C, D)> + 'a {
    move |text, cursor| {
        let (a, c) = p1(text, cursor).map_err(|e| e.with_cursor(cursor))?;
        let (b, c) = p2(text, c).map_err(|e| e.with_cursor(cursor))?;
        let (d, c) = p3(text, c).map_err(|e| e.with_cursor(cursor))?;
        let (f, c) = p4(text, c).map_err(|e| e.with_cursor(cursor))?;
        Ok(((a, b, d, f), c))
    }
}

/// Attempts every alternative from the same starting cursor and retains
/// the match whose new cursor is strictly largest; ties go to whichever
/// parser appears earliest in `alternatives`.
/// Failures are ignored; if every alternative fails, the whole combinator
/// fails with `cursor` unchanged (§8 property 4).
pub fn longest_alternative<'a, T>(
    rule: &'static str,
    alternatives: Vec<BoxParser<'a, T>>,
) -> impl Fn(&str, Cursor) -> ParseResult<T> + 'a
where
    T: 'a,
{
    move |text, cursor| {
        let mut best: Option<(T, Cursor)> = None;
        for alt in &alternatives {
            if let Ok((token, new_cursor)) = alt(text, cursor) {
                let keep = match &best {
                    None => true,
                    Some((_, best_cursor)) => new_cursor > *best_cursor,
                };
                if keep {
                    best = Some((token, new_cursor));
                }
            }
        }
        best.ok_or(ParseError::NoMatch { rule, cursor })
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// A parser that consumes exactly `n` characters if that many remain,
    /// used to give `longest_alternative` alternatives of an arbitrary,
    /// controlled match length.
    fn consume_exactly(n: usize) -> impl Fn(&str, Cursor) -> ParseResult<usize> {
        move |text, cursor| {
            if cursor + n <= text.len() {
                Ok((n, cursor + n))
            } else {
                Err(ParseError::NoMatch { rule: "consume_exactly", cursor })
            }
        }
    }

    proptest! {
        // Property 4 (spec.md §8): every combinator failure restores the
        // cursor it was called with. Exercised over every lexical
        // primitive and over `seq2`, each fed arbitrary printable input.
        #[test]
        fn combinator_failure_never_consumes_input(
            s in "[ -~]{0,24}",
            offset in 0usize..8,
        ) {
            let cursor = offset.min(s.len());
            if let Err(e) = identifier(&s, cursor) {
                prop_assert_eq!(e.cursor(), cursor);
            }
            if let Err(e) = integer_literal(&s, cursor) {
                prop_assert_eq!(e.cursor(), cursor);
            }
            if let Err(e) = float_literal(&s, cursor) {
                prop_assert_eq!(e.cursor(), cursor);
            }
            if let Err(e) = keyword("def")(&s, cursor) {
                prop_assert_eq!(e.cursor(), cursor);
            }
            if let Err(e) = punct("(")(&s, cursor) {
                prop_assert_eq!(e.cursor(), cursor);
            }
            if let Err(e) = seq2(keyword("def"), identifier)(&s, cursor) {
                prop_assert_eq!(e.cursor(), cursor);
            }
            if let Err(e) = end_of_input(&s, cursor) {
                prop_assert_eq!(e.cursor(), cursor);
            }
        }

        // Property 5 (spec.md §8): among alternatives sharing a starting
        // cursor, `longest_alternative` keeps the one with the strictly
        // greatest resulting cursor, breaking ties by declaration order.
        #[test]
        fn longest_alternative_always_picks_the_farthest_match(
            len_a in 0usize..20,
            len_b in 0usize..20,
        ) {
            let text = "x".repeat(20);
            let alternatives: Vec<BoxParser<'_, usize>> =
                vec![Box::new(consume_exactly(len_a)), Box::new(consume_exactly(len_b))];
            let (value, cursor) = longest_alternative("test", alternatives)(&text, 0).unwrap();
            if len_a >= len_b {
                prop_assert_eq!(value, len_a);
                prop_assert_eq!(cursor, len_a);
            } else {
                prop_assert_eq!(value, len_b);
                prop_assert_eq!(cursor, len_b);
            }
        }
    }
}
