//! The Action tree: a closed algebra of ~40 node kinds behind one shared
//! trait, dispatched polymorphically over five event shapes plus haptic/
//! sensitivity/change side channels.
//!
//! Grounded in `include/scc/action.h` and distilled spec §3/§4.4/§9.
//! The original's inlined per-instance dispatch table (function pointers
//! defaulting to a warn-and-drop stub) is replaced by a sum type over kinds
//! whose variants implement this trait, with every slot defaulted to a
//! no-op (distilled spec §9: "a reimplementation should use a sum type...
//! with trait methods defaulted to no-op").

pub mod flags;
pub mod kinds;
pub mod noaction;
pub mod registry;

use std::rc::Rc;

use crate::error::ActionError;
use crate::mapper::{GyroInput, Mapper};
use crate::parameter::Parameter;

pub use flags::ActionFlags;
pub use registry::construct;

/// Shared, reference-counted handle to any action node. Composite actions
/// own their children through this; the engine never needs a cyclic
/// reference because ownership is strictly downward (distilled spec §5).
pub type ActionRef = Rc<dyn Action>;

/// An ordered, ref-counted sequence of actions: macro steps, `and` children,
/// or the result of `get_children`.
pub type ActionList = Vec<ActionRef>;

/// Merge-relevant fields of a `hold`/`doubleclick` node, returned by
/// `Action::hold_dblclick_parts` so the compressor can fold two colocated
/// modifiers into one (distilled spec §4.4).
pub struct HoldDblClickParts {
    pub hold_action: ActionRef,
    pub dblclick_action: ActionRef,
    pub default_action: ActionRef,
    pub timeout_ticks: u64,
}

/// The context a human-readable `describe()` string is being rendered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescribeContext {
    Osd,
    Pad,
    Stick,
    Plain,
}

/// The shared contract every action kind implements.
///
/// Every dispatch method defaults to a rate-limited warning and otherwise
/// does nothing, matching the distilled spec's "unused slots resolve to
/// rate-limited warnings rather than errors" (§3).
pub trait Action {
    /// The keyword this action was constructed from (`"button"`, `"mode"`,
    /// ...). Used for `describe`/`to_text` fallbacks and for the structural
    /// test oracle that a compressed tree contains no `"name"`/`"sens"`/
    /// `"feedback"` node.
    fn kind(&self) -> &'static str;

    fn action_flags(&self) -> ActionFlags {
        ActionFlags::default()
    }

    // -- Primary dispatch -----------------------------------------------

    fn button_press(&self, m: &mut dyn Mapper) {
        let _ = m;
        warn_unhandled(self.kind(), "button_press");
    }

    fn button_release(&self, m: &mut dyn Mapper) {
        let _ = m;
        warn_unhandled(self.kind(), "button_release");
    }

    fn axis(&self, m: &mut dyn Mapper, value: i64, what: crate::constants::Pst) {
        let _ = (m, value, what);
        warn_unhandled(self.kind(), "axis");
    }

    fn trigger(&self, m: &mut dyn Mapper, old_pos: i64, pos: i64, what: crate::constants::Pst) {
        let _ = (m, old_pos, pos, what);
        warn_unhandled(self.kind(), "trigger");
    }

    fn whole(&self, m: &mut dyn Mapper, x: i64, y: i64, what: crate::constants::Pst) {
        let _ = (m, x, y, what);
        warn_unhandled(self.kind(), "whole");
    }

    fn gyro(&self, m: &mut dyn Mapper, value: &GyroInput) {
        let _ = (m, value);
        warn_unhandled(self.kind(), "gyro");
    }

    // -- Extended slots ---------------------------------------------------

    fn set_sensitivity(&self, x: f64, y: f64, z: f64) {
        let _ = (x, y, z);
    }

    fn set_haptic(&self, amplitude: f64, frequency: f64, period: f64) {
        let _ = (amplitude, frequency, period);
    }

    fn change(&self, m: &mut dyn Mapper, dx: f64, dy: f64) {
        let _ = (m, dx, dy);
    }

    fn get_child(&self) -> Option<ActionRef> {
        None
    }

    fn get_children(&self) -> ActionList {
        Vec::new()
    }

    fn get_property(&self, name: &str) -> Option<Parameter> {
        let _ = name;
        None
    }

    /// Sets whether a `macro`/`;` node loops back to its first step once its
    /// last step finishes, instead of stopping. Every kind but `macro`
    /// defaults to no-op; `repeat` is the only caller, grounded in
    /// `src/actions/repeat_sleep.c`'s `macro_set_repeat`.
    fn set_repeat(&self, value: bool) {
        let _ = value;
    }

    /// Exposes this node's merge-relevant fields when it is a `hold`/
    /// `doubleclick` node, so compression can fold two colocated modifiers
    /// targeting the same button into one. Every other kind defaults to
    /// `None`. Grounded in `hold_doubleclick.c`'s `mergable`/`merge`.
    fn hold_dblclick_parts(&self) -> Option<HoldDblClickParts> {
        None
    }

    // -- Meta slots --------------------------------------------------------

    /// Renders canonical action text. Every concrete kind must implement
    /// this; there is no sensible default.
    fn to_text(&self) -> String;

    fn describe(&self, ctx: DescribeContext) -> String {
        let _ = ctx;
        self.kind().to_string()
    }

    /// Rewrites this node into its compressed form. Default: identity (no
    /// rewrite needed) — correct for every leaf, and the structural test
    /// oracle "for any leaf action `a`, `compress(a) == a`" depends on it.
    ///
    /// Composite kinds override this to first compress their children (via
    /// `compress_tree`) and then optionally rewrite themselves, possibly
    /// discarding the wrapper and returning a child instead (distilled spec
    /// §4.6: "may return itself, return one of its children..., or return a
    /// different but equivalent node").
    ///
    /// Takes `self_rc` — this node's own `Rc` handle — explicitly rather
    /// than as a `Rc<Self>` receiver, so the method stays object-safe and
    /// callable through a type-erased `ActionRef`.
    fn compress(&self, self_rc: &ActionRef) -> ActionRef {
        Rc::clone(self_rc)
    }
}

/// Compresses one node of the tree. Leaves return themselves unchanged;
/// composites recurse into their own children before rewriting.
pub fn compress_tree(action: ActionRef) -> ActionRef {
    action.compress(&action)
}

/// Logs a rate-limited warning for an action kind/slot combination the
/// action does not implement. Distilled spec §7: missing capability is a
/// warning, not an error, and repeated warnings are throttled to once per
/// ~5 seconds per call site.
pub(crate) fn warn_unhandled(kind: &'static str, slot: &'static str) {
    crate::logging::rate_limited_warn(
        kind,
        slot,
        &format!("action '{kind}' does not implement '{slot}'; event dropped"),
    );
}
