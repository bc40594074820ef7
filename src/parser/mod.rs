//! Recursive-descent parser: turns action text into an `ActionRef` tree.
//!
//! Grounded in distilled spec §4.5 and `src/actions/parser.c`. The grammar
//! is exactly the distilled spec's production rules; the only production
//! left unresolved there (the range-parameter's left-hand side) is
//! resolved per SPEC_FULL.md §4.5: any parameter expression (a literal, a
//! bare constant such as a PST name, or a nested action) may be followed by
//! a comparator and a float literal, e.g. `mode("LEFT" >= 0.5, ...)`.

mod tokenizer;

use std::iter::Peekable;
use std::slice::Iter;

use crate::action::{construct, ActionRef};
use crate::constants;
use crate::error::ActionError;
use crate::parameter::{Parameter, RangeCmp};
use crate::param_checker::ABS_CNT;
use tokenizer::{tokenize, Token};

/// Parses one action-text expression into a tree, consuming every token.
/// Trailing, unconsumed input is a parse error.
pub fn parse(text: &str) -> Result<ActionRef, ActionError> {
    let tokens = tokenize(text)?;
    let mut cursor = tokens.iter().peekable();
    let action = parse_sequence(&mut cursor)?;
    if cursor.peek().is_some() {
        return Err(ActionError::Parse(format!(
            "Unexpected trailing input after '{}'",
            action.to_text()
        )));
    }
    Ok(action)
}

type Cursor<'a> = Peekable<Iter<'a, Token>>;

/// `action := keyword args? (';' action | 'and' action)?`, generalized to
/// a left-associative chain so `a; b; c` and `a and b and c` both parse
/// without unbounded recursion depth.
fn parse_sequence(cursor: &mut Cursor) -> Result<ActionRef, ActionError> {
    let mut result = parse_single_action(cursor)?;
    loop {
        match cursor.peek() {
            Some(Token::Semicolon) => {
                cursor.next();
                let next = parse_single_action(cursor)?;
                result = construct(
                    ";",
                    vec![Parameter::action(result), Parameter::action(next)],
                )?;
            }
            Some(Token::Word(w)) if w == "and" => {
                cursor.next();
                let next = parse_single_action(cursor)?;
                result = construct(
                    "and",
                    vec![Parameter::action(result), Parameter::action(next)],
                )?;
            }
            _ => break,
        }
    }
    Ok(result)
}

/// `keyword args?` — one call, no `;`/`and` continuation.
fn parse_single_action(cursor: &mut Cursor) -> Result<ActionRef, ActionError> {
    let keyword = expect_keyword_word(cursor)?;
    let params = if matches!(cursor.peek(), Some(Token::LParen)) {
        parse_args(cursor)?
    } else {
        Vec::new()
    };
    construct(&keyword, params)
}

fn expect_keyword_word(cursor: &mut Cursor) -> Result<String, ActionError> {
    match cursor.next() {
        Some(Token::Word(w)) => Ok(w.clone()),
        Some(other) => Err(ActionError::Parse(format!("Unexpected token, expected a keyword: {other:?}"))),
        None => Err(ActionError::Parse("Unexpected end of input, expected a keyword".to_string())),
    }
}

/// `args := '(' (param (',' param)*)? ')'`
fn parse_args(cursor: &mut Cursor) -> Result<Vec<Parameter>, ActionError> {
    cursor.next(); // consume '('
    let mut params = Vec::new();
    if matches!(cursor.peek(), Some(Token::RParen)) {
        cursor.next();
        return Ok(params);
    }
    loop {
        params.push(parse_param(cursor)?);
        match cursor.next() {
            Some(Token::Comma) => continue,
            Some(Token::RParen) => break,
            Some(other) => {
                return Err(ActionError::Parse(format!(
                    "Unexpected token inside argument list: {other:?}"
                )))
            }
            None => return Err(ActionError::Parse("Unexpected end of input inside argument list".to_string())),
        }
    }
    Ok(params)
}

/// One parameter: a literal, a (possibly prefixed) constant name, a nested
/// action, or any of the above followed by a range comparator.
fn parse_param(cursor: &mut Cursor) -> Result<Parameter, ActionError> {
    let base = match cursor.next() {
        Some(Token::Str(s)) => Parameter::string(s.clone()),
        Some(Token::Word(w)) => parse_word_param(cursor, w)?,
        Some(other) => return Err(ActionError::Parse(format!("Unexpected token, expected a parameter: {other:?}"))),
        None => return Err(ActionError::Parse("Unexpected end of input, expected a parameter".to_string())),
    };
    match cursor.peek() {
        Some(Token::Lt) | Some(Token::Le) | Some(Token::Gt) | Some(Token::Ge) => {
            let cmp = match cursor.next().unwrap() {
                Token::Lt => RangeCmp::Lt,
                Token::Le => RangeCmp::Le,
                Token::Gt => RangeCmp::Gt,
                Token::Ge => RangeCmp::Ge,
                _ => unreachable!(),
            };
            let rhs = expect_float_literal(cursor)?;
            Ok(Parameter::range(base, cmp, rhs))
        }
        _ => Ok(base),
    }
}

fn expect_float_literal(cursor: &mut Cursor) -> Result<f64, ActionError> {
    match cursor.next() {
        Some(Token::Word(w)) => w
            .parse::<f64>()
            .map_err(|_| ActionError::Parse(format!("Invalid number: expected a float literal, got '{w}'"))),
        Some(other) => Err(ActionError::Parse(format!(
            "Unexpected token, expected a float literal for a range's right-hand side: {other:?}"
        ))),
        None => Err(ActionError::Parse(
            "Unexpected end of input, expected a range's right-hand side".to_string(),
        )),
    }
}

/// Classifies a bare word token as `None`, an int/hex/float literal, a
/// nested action (word followed by `(`), or a (possibly prefixed) constant
/// name.
fn parse_word_param(cursor: &mut Cursor, word: &str) -> Result<Parameter, ActionError> {
    if word == "None" {
        return Ok(Parameter::None);
    }
    if matches!(cursor.peek(), Some(Token::LParen)) {
        let params = parse_args(cursor)?;
        let action = construct(word, params)?;
        return Ok(Parameter::action(action));
    }
    if let Some(i) = parse_int_literal(word) {
        return Ok(Parameter::int(i));
    }
    // A float literal (`0.5`) also contains a `.`, so it must be tried
    // before the `Prefix.NAME` back-compat form (distilled spec §4.5 rule
    // 4) is assumed.
    if let Ok(f) = word.parse::<f64>() {
        return Ok(Parameter::float(f));
    }
    let name = match word.rsplit_once('.') {
        Some((_prefix, suffix)) => suffix,
        None => word,
    };
    resolve_constant(name).ok_or_else(|| ActionError::Parse(format!("Unknown constant name '{word}'")))
}

fn parse_int_literal(word: &str) -> Option<i64> {
    if let Some(hex) = word.strip_prefix("0x").or_else(|| word.strip_prefix("0X")) {
        return i64::from_str_radix(hex, 16).ok();
    }
    if word.contains('.') {
        return None;
    }
    word.parse::<i64>().ok()
}

/// Resolves a bare constant name to the `Parameter` it denotes, trying each
/// constant table in turn, per distilled spec §4.2/§4.5.
fn resolve_constant(name: &str) -> Option<Parameter> {
    if let Some(key) = constants::get_int_constant(name) {
        return Some(Parameter::const_int(
            constants::get_key_name(key),
            constants::evdev_code(key) as i64,
        ));
    }
    if let Some(axis) = constants::string_to_axis(name) {
        return Some(Parameter::const_string(constants::axis_name(axis)));
    }
    if let Some(button) = constants::string_to_button(name) {
        return Some(Parameter::const_string(constants::button_to_string(button)));
    }
    if let Some(pst) = constants::string_to_pst(name) {
        return Some(Parameter::const_string(constants::what_to_string(pst)));
    }
    match name {
        "DEFAULT" => Some(Parameter::const_string("DEFAULT")),
        "SAME" => Some(Parameter::const_string("SAME")),
        "ALWAYS" => Some(Parameter::const_string("ALWAYS")),
        "ABS_CNT" => Some(Parameter::const_int("ABS_CNT", ABS_CNT)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_button_call() {
        let a = parse("button(KEY_A)").unwrap();
        assert_eq!(a.to_text(), "button(KEY_A)");
    }

    #[test]
    fn parses_none_singleton() {
        let a = parse("None").unwrap();
        assert_eq!(a.kind(), "None");
    }

    #[test]
    fn semicolon_chain_builds_a_macro() {
        let a = parse("button(KEY_A); button(KEY_B)").unwrap();
        assert_eq!(a.kind(), "macro");
        assert_eq!(a.get_children().len(), 2);
    }

    #[test]
    fn and_chain_builds_a_multiaction() {
        let a = parse("button(KEY_A) and button(KEY_B)").unwrap();
        assert_eq!(a.kind(), "and");
    }

    #[test]
    fn prefixed_constant_strips_prefix() {
        let a = parse("button(Keys.KEY_A)").unwrap();
        assert_eq!(a.to_text(), "button(KEY_A)");
    }

    #[test]
    fn unknown_keyword_reports_parse_error() {
        let err = parse("bogus_keyword()").unwrap_err();
        match err {
            ActionError::UnknownKeyword(k) => assert_eq!(k, "bogus_keyword"),
            other => panic!("expected UnknownKeyword, got {other:?}"),
        }
    }

    #[test]
    fn nested_action_parses_as_parameter() {
        let a = parse("hold(button(KEY_A), button(KEY_B), 0.3)").unwrap();
        assert_eq!(a.kind(), "hold");
    }

    #[test]
    fn range_parameter_parses_with_comparator() {
        let a = parse("mode(A >= 0.5, button(KEY_A))").unwrap();
        assert_eq!(a.kind(), "mode");
    }
}
