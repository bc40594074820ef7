//! The value domain: `Parameter`, the tagged value every action constructor
//! and every parsed argument list is built from.
//!
//! Grounded in `include/scc/parameter.h`. The original packs a type tag and a
//! manual retain/release pair into every parameter; here the tag is simply
//! the enum discriminant and retain/release is `Clone`/`Drop` on `Rc`.

use std::fmt;
use std::rc::Rc;

use crate::action::ActionRef;

/// Comparator used by a range parameter (a mode-shift condition).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeCmp {
    Lt,
    Le,
    Gt,
    Ge,
}

impl RangeCmp {
    pub fn apply(self, lhs: f64, rhs: f64) -> bool {
        match self {
            RangeCmp::Lt => lhs < rhs,
            RangeCmp::Le => lhs <= rhs,
            RangeCmp::Gt => lhs > rhs,
            RangeCmp::Ge => lhs >= rhs,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            RangeCmp::Lt => "<",
            RangeCmp::Le => "<=",
            RangeCmp::Gt => ">",
            RangeCmp::Ge => ">=",
        }
    }
}

/// A tagged value: the universal currency between the parser, the
/// ParamChecker, and action constructors.
///
/// Reference counting is `Rc::clone`; there is no separate ref-count header
/// to inspect, and no non-reference-counted "singleton" special case is
/// needed for `None` (cloning a unit variant is free).
#[derive(Clone)]
pub enum Parameter {
    /// The literal `None` parameter, distinct from "no parameter supplied".
    None,
    Int(i64),
    Float(f64),
    Str(Rc<str>),
    /// An int that remembers the symbolic name it was parsed from, so
    /// `to_string` renders the name (`"KEY_A"`) rather than the number.
    ConstInt(&'static str, i64),
    /// A string constant that renders as its own name (`LEFT`, `RIGHT`, ...).
    ConstStr(&'static str),
    Action(ActionRef),
    Tuple(Rc<[Parameter]>),
    Range(Box<Parameter>, RangeCmp, f64),
}

impl Parameter {
    pub fn int(i: i64) -> Self {
        Parameter::Int(i)
    }

    pub fn float(f: f64) -> Self {
        Parameter::Float(f)
    }

    pub fn string(s: impl Into<Rc<str>>) -> Self {
        Parameter::Str(s.into())
    }

    pub fn const_int(name: &'static str, value: i64) -> Self {
        Parameter::ConstInt(name, value)
    }

    pub fn const_string(name: &'static str) -> Self {
        Parameter::ConstStr(name)
    }

    pub fn action(a: ActionRef) -> Self {
        Parameter::Action(a)
    }

    pub fn tuple(children: Vec<Parameter>) -> Self {
        Parameter::Tuple(children.into())
    }

    pub fn range(lhs: Parameter, cmp: RangeCmp, rhs: f64) -> Self {
        Parameter::Range(Box::new(lhs), cmp, rhs)
    }

    /// Coerces to an integer. Out-of-contract coercion (calling this on a
    /// parameter whose schema slot was not an int-like type) is a
    /// programmer error, matching the original's "abort is acceptable"
    /// contract; callers must consult the ParamChecker-validated type first.
    pub fn as_int(&self) -> i64 {
        match self {
            Parameter::Int(i) => *i,
            Parameter::ConstInt(_, i) => *i,
            other => panic!("Parameter::as_int called on non-int parameter: {other:?}"),
        }
    }

    pub fn as_float(&self) -> f64 {
        match self {
            Parameter::Float(f) => *f,
            Parameter::Int(i) => *i as f64,
            Parameter::ConstInt(_, i) => *i as f64,
            other => panic!("Parameter::as_float called on non-float parameter: {other:?}"),
        }
    }

    pub fn as_string(&self) -> &str {
        match self {
            Parameter::Str(s) => s,
            Parameter::ConstStr(name) => name,
            other => panic!("Parameter::as_string called on non-string parameter: {other:?}"),
        }
    }

    pub fn as_action(&self) -> ActionRef {
        match self {
            Parameter::Action(a) => Rc::clone(a),
            other => panic!("Parameter::as_action called on non-action parameter: {other:?}"),
        }
    }

    pub fn as_tuple(&self) -> &[Parameter] {
        match self {
            Parameter::Tuple(items) => items,
            other => panic!("Parameter::as_tuple called on non-tuple parameter: {other:?}"),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Parameter::None)
    }

    /// Renders this parameter as canonical action-text, matching the
    /// original's quoting/escaping rules for strings and the "render as
    /// name" rule for constants.
    pub fn to_text(&self) -> String {
        match self {
            Parameter::None => "None".to_string(),
            Parameter::Int(i) => i.to_string(),
            Parameter::Float(f) => format_float(*f),
            Parameter::Str(s) => quote_string(s),
            Parameter::ConstInt(name, _) => (*name).to_string(),
            Parameter::ConstStr(name) => (*name).to_string(),
            Parameter::Action(a) => a.to_text(),
            Parameter::Tuple(items) => {
                let parts: Vec<String> = items.iter().map(Parameter::to_text).collect();
                parts.join(", ")
            }
            Parameter::Range(lhs, cmp, rhs) => {
                format!("{} {} {}", lhs.to_text(), cmp.as_str(), format_float(*rhs))
            }
        }
    }
}

impl fmt::Debug for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Parameter({})", self.to_text())
    }
}

/// Formats a float using `.` as the decimal separator, independent of host
/// locale. Rust's `{}` formatting for `f64` is already locale-independent,
/// so this is a direct, un-hacked satisfaction of the original's explicit
/// "lock to C locale" requirement (distilled spec §9).
fn format_float(f: f64) -> String {
    if f.fract() == 0.0 && f.is_finite() {
        format!("{f:.1}")
    } else {
        format!("{f}")
    }
}

/// Single-quotes and backslash-escapes a string per the original's rule for
/// `\ ' " \n \t \r`.
fn quote_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out.push('\'');
    out
}

/// Renders a parameter list as the comma-space separated form used inside
/// `keyword(...)` calls.
pub fn params_to_text(params: &[Parameter]) -> String {
    params
        .iter()
        .map(Parameter::to_text)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_round_trips_to_text() {
        assert_eq!(Parameter::int(42).to_text(), "42");
    }

    #[test]
    fn const_int_renders_as_name() {
        assert_eq!(Parameter::const_int("KEY_A", 30).to_text(), "KEY_A");
    }

    #[test]
    fn string_is_quoted_and_escaped() {
        assert_eq!(Parameter::string("a'b\nc").to_text(), "'a\\'b\\nc'");
    }

    #[test]
    fn float_with_integral_value_keeps_decimal_point() {
        assert_eq!(Parameter::float(7.0).to_text(), "7.0");
        assert_eq!(Parameter::float(0.5).to_text(), "0.5");
    }

    #[test]
    fn tuple_joins_with_comma_space() {
        let t = Parameter::tuple(vec![Parameter::float(0.5), Parameter::float(7.0)]);
        assert_eq!(t.to_text(), "0.5, 7.0");
    }

    #[test]
    fn range_renders_with_comparator() {
        let r = Parameter::range(Parameter::const_string("A"), RangeCmp::Ge, 0.5);
        assert_eq!(r.to_text(), "A >= 0.5");
    }

    #[test]
    #[should_panic]
    fn as_int_on_string_panics() {
        Parameter::string("x").as_int();
    }
}
