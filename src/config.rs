//! Profile loader: maps input identifiers to parsed, compressed actions.
//!
//! The original system's profile is JSON, assembled by a layer this crate
//! does not implement; here a `Profile` is a small `serde`/TOML document so
//! this crate owns a complete, loadable configuration format end to end.
//! Grounded in distilled spec §6 "Profile files (JSON)" and §7's "a
//! malformed profile... leaves the previous configuration untouched and
//! surfaces a single human-readable line per error", and in SPEC_FULL.md
//! §4.9.

use std::collections::HashMap;

use serde::Deserialize;

use crate::action::{compress_tree, ActionRef};
use crate::error::ActionError;
use crate::parser;

/// On-disk shape: each key is an input identifier (a button name, a
/// pad/stick/trigger/gyro identifier, reusing the `constants` names) and
/// each value is action text in the textual format the `parser` module
/// accepts.
#[derive(Debug, Deserialize)]
pub struct ProfileDocument {
    #[serde(flatten)]
    bindings: HashMap<String, String>,
}

/// A loaded profile: every binding that parsed successfully, already
/// compressed and ready to dispatch against.
pub struct Profile {
    pub bindings: HashMap<String, ActionRef>,
}

impl Profile {
    pub fn get(&self, input_id: &str) -> Option<&ActionRef> {
        self.bindings.get(input_id)
    }
}

/// Parses `text` as a `Profile` TOML document, then parses and compresses
/// every binding's action text.
///
/// Never fails outright on a bad binding: each failing entry is collected
/// into the returned error list, keyed by its input identifier, and loading
/// continues with the rest (distilled spec §7). A malformed *document* (bad
/// TOML, not a flat string table) is its own, single error.
pub fn load_profile(text: &str) -> Result<(Profile, Vec<(String, ActionError)>), ActionError> {
    let doc: ProfileDocument = toml::from_str(text)
        .map_err(|e| ActionError::Parse(format!("Invalid profile document: {e}")))?;

    let mut bindings = HashMap::with_capacity(doc.bindings.len());
    let mut errors = Vec::new();
    for (input_id, action_text) in doc.bindings {
        match parser::parse(&action_text) {
            Ok(action) => {
                bindings.insert(input_id, compress_tree(action));
            }
            Err(e) => {
                log::warn!("profile entry '{input_id}' did not parse: {e}");
                errors.push((input_id, e));
            }
        }
    }
    Ok((Profile { bindings }, errors))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_every_well_formed_binding() {
        let text = r#"
            A = "button(KEY_A)"
            B = "button(KEY_B)"
        "#;
        let (profile, errors) = load_profile(text).unwrap();
        assert!(errors.is_empty());
        assert_eq!(profile.get("A").unwrap().to_text(), "button(KEY_A)");
        assert_eq!(profile.get("B").unwrap().to_text(), "button(KEY_B)");
    }

    #[test]
    fn malformed_entry_is_collected_without_aborting_the_rest() {
        let text = r#"
            A = "button(KEY_A)"
            B = "not_a_real_keyword()"
        "#;
        let (profile, errors) = load_profile(text).unwrap();
        assert!(profile.get("A").is_some());
        assert!(profile.get("B").is_none());
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].0, "B");
    }

    #[test]
    fn bindings_are_compressed_on_load() {
        let text = r#"hold_a = "hold(button(KEY_A), button(KEY_B), 0.3)""#;
        let (profile, errors) = load_profile(text).unwrap();
        assert!(errors.is_empty());
        assert!(profile.get("hold_a").is_some());
    }

    #[test]
    fn invalid_toml_document_is_a_single_error() {
        let err = load_profile("this is not = valid toml [[[").unwrap_err();
        match err {
            ActionError::Parse(_) => {}
            other => panic!("expected Parse, got {other:?}"),
        }
    }
}
