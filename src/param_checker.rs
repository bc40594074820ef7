//! Compiled per-keyword parameter schema: validates, fills defaults for,
//! and strips defaults from a parameter list.
//!
//! Grounded in `src/actions/param_checker/{init.c,check.c,default.c}`. The
//! schema language is exactly distilled spec §4.3's grammar table; the
//! three original source files collapse here into one module since Rust's
//! enum + `match` replaces the C file-per-concern split without losing
//! clarity.

use crate::constants::{string_to_button, string_to_pst};
use crate::error::ActionError;
use crate::parameter::Parameter;

/// One schema slot's expected shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SlotType {
    /// `s` — any string.
    Str,
    /// `B` — a string naming a button.
    Button,
    /// `A` — a string naming a pad/stick/trigger.
    Pst,
    /// `i`, with optional `i8`/`i16`/`i32` width restriction.
    Int { bits: u8 },
    /// `c` — keycode, int in `[1, 0x7FFF]`.
    Keycode,
    /// `b` — int in `[0, 1]`.
    Bool01,
    /// `x` — axis id, int in `[0, ABS_MAX]`.
    AxisId,
    /// `f` — float (an int literal also satisfies this slot).
    Float,
    /// `a` — a nested action.
    Action,
    /// `r` — a range parameter.
    Range,
    /// `.` — anything that isn't an error.
    Any,
}

/// One compiled schema slot.
#[derive(Debug, Clone)]
pub struct Slot {
    pub ty: SlotType,
    pub optional: bool,
    pub repeating: bool,
    /// `+` after `i16`/`i32`/`f`: restrict to non-negative values.
    pub non_negative: bool,
    /// `+` after `x`/`B`/`A`: accept the sentinel keyword
    /// (`ABS_CNT`/`DEFAULT`/`SAME`/`ALWAYS`) in addition to the normal set.
    pub allow_sentinel: bool,
    /// `(min,max)` override of the slot's default numeric bound.
    pub bound: Option<(f64, f64)>,
}

impl Slot {
    fn simple(ty: SlotType) -> Self {
        Slot {
            ty,
            optional: false,
            repeating: false,
            non_negative: false,
            allow_sentinel: false,
            bound: None,
        }
    }
}

pub const ABS_MAX: i64 = 63;
pub const ABS_CNT: i64 = 64;
const KEYCODE_MAX: i64 = 0x7FFF;

/// A compiled schema plus its configured default values.
#[derive(Debug, Clone, Default)]
pub struct ParamChecker {
    slots: Vec<Slot>,
    /// Defaults in schema order, one per optional non-repeating slot.
    defaults: Vec<Parameter>,
}

impl ParamChecker {
    /// Compiles a schema string per distilled spec §4.3's grammar table.
    pub fn compile(schema: &str) -> Self {
        let mut slots: Vec<Slot> = Vec::new();
        let chars: Vec<char> = schema.chars().filter(|c| !c.is_whitespace()).collect();
        let mut i = 0;
        while i < chars.len() {
            let c = chars[i];
            match c {
                's' => {
                    slots.push(Slot::simple(SlotType::Str));
                    i += 1;
                }
                'B' => {
                    slots.push(Slot::simple(SlotType::Button));
                    i += 1;
                }
                'A' => {
                    slots.push(Slot::simple(SlotType::Pst));
                    i += 1;
                }
                'i' => {
                    let mut bits = 64u8;
                    if chars[i + 1..].starts_with(&['8']) {
                        bits = 8;
                        i += 1;
                    } else if chars[i + 1..].starts_with(&['1', '6']) {
                        bits = 16;
                        i += 2;
                    } else if chars[i + 1..].starts_with(&['3', '2']) {
                        bits = 32;
                        i += 2;
                    }
                    slots.push(Slot::simple(SlotType::Int { bits }));
                    i += 1;
                }
                'c' => {
                    slots.push(Slot::simple(SlotType::Keycode));
                    i += 1;
                }
                'b' => {
                    slots.push(Slot::simple(SlotType::Bool01));
                    i += 1;
                }
                'x' => {
                    slots.push(Slot::simple(SlotType::AxisId));
                    i += 1;
                }
                'f' => {
                    slots.push(Slot::simple(SlotType::Float));
                    i += 1;
                }
                'a' => {
                    slots.push(Slot::simple(SlotType::Action));
                    i += 1;
                }
                'r' => {
                    slots.push(Slot::simple(SlotType::Range));
                    i += 1;
                }
                '.' => {
                    slots.push(Slot::simple(SlotType::Any));
                    i += 1;
                }
                '?' => {
                    slots.last_mut().expect("'?' with no preceding slot").optional = true;
                    i += 1;
                }
                '*' => {
                    if let Some(last) = slots.last_mut() {
                        last.optional = true;
                        last.repeating = true;
                    }
                    i += 1;
                }
                '+' => {
                    if let Some(last) = slots.last_mut() {
                        match last.ty {
                            SlotType::Int { .. } | SlotType::Float => last.non_negative = true,
                            SlotType::AxisId | SlotType::Button | SlotType::Pst => {
                                last.allow_sentinel = true
                            }
                            _ => {}
                        }
                    }
                    i += 1;
                }
                '(' => {
                    let close = chars[i..]
                        .iter()
                        .position(|c| *c == ')')
                        .expect("unterminated bound in schema")
                        + i;
                    let inner: String = chars[i + 1..close].iter().collect();
                    let mut parts = inner.splitn(2, ',');
                    let min: f64 = parts.next().unwrap().trim().parse().expect("bad bound min");
                    let max: f64 = parts.next().unwrap().trim().parse().expect("bad bound max");
                    if let Some(last) = slots.last_mut() {
                        last.bound = Some((min, max));
                    }
                    i = close + 1;
                }
                _ => panic!("unrecognized schema character '{c}' in \"{schema}\""),
            }
        }
        ParamChecker {
            slots,
            defaults: Vec::new(),
        }
    }

    /// Registers default values for this schema's optional, non-repeating
    /// slots, in schema order. Called once per keyword at registration time.
    pub fn with_defaults(mut self, defaults: Vec<Parameter>) -> Self {
        self.defaults = defaults;
        self
    }

    fn default_slot_indices(&self) -> Vec<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.optional && !s.repeating)
            .map(|(i, _)| i)
            .collect()
    }

    fn slot_bound(slot: &Slot) -> (f64, f64) {
        if let Some(b) = slot.bound {
            return b;
        }
        match slot.ty {
            SlotType::Int { bits: 8 } => (i8::MIN as f64, i8::MAX as f64),
            SlotType::Int { bits: 16 } => {
                if slot.non_negative {
                    (0.0, i16::MAX as f64)
                } else {
                    (i16::MIN as f64, i16::MAX as f64)
                }
            }
            SlotType::Int { bits: 32 } => {
                if slot.non_negative {
                    (0.0, i32::MAX as f64)
                } else {
                    (i32::MIN as f64, i32::MAX as f64)
                }
            }
            SlotType::Int { .. } => (i64::MIN as f64, i64::MAX as f64),
            SlotType::Keycode => (1.0, KEYCODE_MAX as f64),
            SlotType::Bool01 => (0.0, 1.0),
            SlotType::AxisId => (0.0, if slot.allow_sentinel { ABS_CNT as f64 } else { ABS_MAX as f64 }),
            SlotType::Float => {
                if slot.non_negative {
                    (0.0, f64::MAX)
                } else {
                    (f64::MIN, f64::MAX)
                }
            }
            _ => (f64::MIN, f64::MAX),
        }
    }

    fn matches_type(slot: &Slot, p: &Parameter) -> bool {
        match slot.ty {
            SlotType::Str => matches!(p, Parameter::Str(_) | Parameter::ConstStr(_)),
            SlotType::Button => match p {
                Parameter::Str(s) => string_to_button(s).is_some() || Self::is_sentinel(slot, s),
                Parameter::ConstStr(s) => string_to_button(s).is_some() || Self::is_sentinel(slot, s),
                _ => false,
            },
            SlotType::Pst => match p {
                Parameter::Str(s) => string_to_pst(s).is_some() || Self::is_sentinel(slot, s),
                Parameter::ConstStr(s) => string_to_pst(s).is_some() || Self::is_sentinel(slot, s),
                _ => false,
            },
            SlotType::Int { .. } | SlotType::Keycode | SlotType::Bool01 | SlotType::AxisId => {
                matches!(p, Parameter::Int(_) | Parameter::ConstInt(_, _))
            }
            SlotType::Float => matches!(
                p,
                Parameter::Float(_) | Parameter::Int(_) | Parameter::ConstInt(_, _)
            ),
            SlotType::Action => matches!(p, Parameter::Action(_)),
            SlotType::Range => matches!(p, Parameter::Range(_, _, _)),
            SlotType::Any => !matches!(p, Parameter::None) || true,
        }
    }

    fn is_sentinel(slot: &Slot, s: &str) -> bool {
        slot.allow_sentinel && matches!(s, "DEFAULT" | "SAME" | "ALWAYS")
    }

    fn check_bounds(
        &self,
        keyword: &str,
        index: usize,
        slot: &Slot,
        p: &Parameter,
    ) -> Result<(), ActionError> {
        let numeric = matches!(
            slot.ty,
            SlotType::Int { .. } | SlotType::Keycode | SlotType::Bool01 | SlotType::AxisId | SlotType::Float
        );
        if !numeric {
            return Ok(());
        }
        if (matches!(slot.ty, SlotType::AxisId) && Self::is_sentinel_int(p))
            || (matches!(slot.ty, SlotType::Button | SlotType::Pst))
        {
            return Ok(());
        }
        let value = p.as_float();
        let (min, max) = Self::slot_bound(slot);
        if value < min || value > max {
            return Err(ActionError::OutOfRange {
                keyword: keyword.to_string(),
                index,
                detail: format!("{value} not in [{min}, {max}]"),
            });
        }
        Ok(())
    }

    fn is_sentinel_int(p: &Parameter) -> bool {
        matches!(p, Parameter::Int(v) if *v == ABS_CNT) || matches!(p, Parameter::ConstInt(_, v) if *v == ABS_CNT)
    }

    /// Validates `params` against this schema, producing exactly one error
    /// kind on failure: invalid arity, invalid type (with ordinal), or
    /// out-of-range.
    pub fn check(&self, keyword: &str, params: &[Parameter]) -> Result<(), ActionError> {
        let mut si = 0usize;
        let mut di = 0usize;
        while di < self.slots.len() {
            let slot = &self.slots[di];
            if slot.repeating {
                while si < params.len() && Self::matches_type(slot, &params[si]) {
                    self.check_bounds(keyword, si, slot, &params[si])?;
                    si += 1;
                }
                di += 1;
                continue;
            }
            if si >= params.len() {
                if slot.optional {
                    di += 1;
                    continue;
                }
                return Err(ActionError::InvalidArity {
                    keyword: keyword.to_string(),
                });
            }
            let p = &params[si];
            if Self::matches_type(slot, p) {
                self.check_bounds(keyword, si, slot, p)?;
                si += 1;
                di += 1;
            } else if slot.optional {
                // Lookahead: this optional slot is skipped, try matching
                // the same parameter against the next schema slot.
                di += 1;
            } else {
                return Err(ActionError::InvalidType {
                    keyword: keyword.to_string(),
                    index: si,
                    detail: format!("{p:?} does not match expected {:?}", slot.ty),
                });
            }
        }
        if si < params.len() {
            return Err(ActionError::InvalidArity {
                keyword: keyword.to_string(),
            });
        }
        Ok(())
    }

    /// Returns a new parameter list with every ungiven optional slot
    /// replaced by its registered default. Repeating slots never draw from
    /// defaults; they contribute exactly the items supplied.
    pub fn fill_defaults(&self, params: &[Parameter]) -> Vec<Parameter> {
        let default_slots = self.default_slot_indices();
        let mut out = Vec::with_capacity(self.slots.len());
        let mut si = 0usize;
        let mut default_cursor = 0usize;
        for (di, slot) in self.slots.iter().enumerate() {
            if slot.repeating {
                while si < params.len() && Self::matches_type(slot, &params[si]) {
                    out.push(params[si].clone());
                    si += 1;
                }
                continue;
            }
            let supplied = si < params.len() && Self::matches_type(slot, &params[si]);
            if supplied {
                out.push(params[si].clone());
                si += 1;
            } else if slot.optional {
                let default_index = default_slots.iter().position(|&d| d == di);
                if let Some(pos) = default_index {
                    if let Some(default_value) = self.defaults.get(pos) {
                        out.push(default_value.clone());
                    } else {
                        out.push(Parameter::None);
                    }
                } else {
                    out.push(Parameter::None);
                }
                default_cursor += 1;
            }
        }
        let _ = default_cursor;
        out
    }

    /// Inverse of `fill_defaults`: drops a trailing optional parameter
    /// whose value equals its default, recursively, so `to_string` produces
    /// the shortest equivalent textual form.
    pub fn strip_defaults(&self, params: &[Parameter]) -> Vec<Parameter> {
        let mut out = params.to_vec();
        let default_slots = self.default_slot_indices();
        // Walk schema slots back-to-front; only trailing optionals can be
        // stripped without creating arity ambiguity.
        for (pos, &di) in default_slots.iter().enumerate().rev() {
            if di >= out.len() {
                continue;
            }
            if pos >= self.defaults.len() {
                continue;
            }
            if out.len() != di + 1 {
                // Not the current trailing slot; stop (later positions must
                // strip first to avoid changing the meaning of this one).
                break;
            }
            if parameters_equal(&out[di], &self.defaults[pos]) {
                out.pop();
            } else {
                break;
            }
        }
        out
    }
}

fn parameters_equal(a: &Parameter, b: &Parameter) -> bool {
    match (a, b) {
        (Parameter::None, Parameter::None) => true,
        (Parameter::Int(x), Parameter::Int(y)) => x == y,
        (Parameter::ConstInt(_, x), Parameter::Int(y)) | (Parameter::Int(y), Parameter::ConstInt(_, x)) => x == y,
        (Parameter::ConstInt(_, x), Parameter::ConstInt(_, y)) => x == y,
        (Parameter::Float(x), Parameter::Float(y)) => (x - y).abs() < f64::EPSILON,
        (Parameter::Str(x), Parameter::Str(y)) => x == y,
        (Parameter::ConstStr(x), Parameter::ConstStr(y)) => x == y,
        (Parameter::Str(x), Parameter::ConstStr(y)) | (Parameter::ConstStr(y), Parameter::Str(x)) => {
            x.as_ref() == *y
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_required_schema_rejects_missing_param() {
        let pc = ParamChecker::compile("cc");
        let err = pc.check("button", &[Parameter::int(30)]).unwrap_err();
        assert!(matches!(err, ActionError::InvalidArity { .. }));
    }

    #[test]
    fn optional_trailing_param_may_be_omitted() {
        let pc = ParamChecker::compile("cc?");
        assert!(pc.check("button", &[Parameter::int(30)]).is_ok());
        assert!(pc
            .check("button", &[Parameter::int(30), Parameter::int(31)])
            .is_ok());
    }

    #[test]
    fn keycode_out_of_range_is_rejected() {
        let pc = ParamChecker::compile("c");
        let err = pc.check("button", &[Parameter::int(0)]).unwrap_err();
        assert!(matches!(err, ActionError::OutOfRange { .. }));
    }

    #[test]
    fn fill_defaults_uses_registered_default() {
        let pc = ParamChecker::compile("c?f?").with_defaults(vec![Parameter::int(1), Parameter::float(1.0)]);
        let filled = pc.fill_defaults(&[]);
        assert_eq!(filled.len(), 2);
        assert_eq!(filled[0].as_int(), 1);
        assert_eq!(filled[1].as_float(), 1.0);
    }

    #[test]
    fn strip_defaults_drops_trailing_default_value() {
        let pc = ParamChecker::compile("c?f?").with_defaults(vec![Parameter::int(1), Parameter::float(1.0)]);
        let stripped = pc.strip_defaults(&[Parameter::int(1), Parameter::float(1.0)]);
        assert!(stripped.is_empty());
    }

    #[test]
    fn strip_defaults_keeps_non_default_value() {
        let pc = ParamChecker::compile("c?f?").with_defaults(vec![Parameter::int(1), Parameter::float(1.0)]);
        let stripped = pc.strip_defaults(&[Parameter::int(5), Parameter::float(1.0)]);
        assert_eq!(stripped.len(), 2);
    }

    #[test]
    fn repeating_slot_consumes_all_matching_trailing_actions() {
        use crate::action::noaction::no_action;
        let pc = ParamChecker::compile("a*");
        let params = vec![
            Parameter::action(no_action()),
            Parameter::action(no_action()),
        ];
        assert!(pc.check("and", &params).is_ok());
    }
}
