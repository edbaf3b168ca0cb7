//! Identifier generation for synthesized tool-call and completion IDs.
//!
//! Downstream consumers expect two fixed shapes: tool-call IDs are `call_`
//! followed by 24 alphanumeric characters, completion IDs are `chatcmpl-`
//! followed by 29 alphanumeric characters. Backend-supplied tool-call IDs
//! that already match the shape are kept; everything else is regenerated.

use rand::Rng;
use rand::distributions::Alphanumeric;

/// Prefix for tool-call IDs.
pub const TOOL_CALL_ID_PREFIX: &str = "call_";
/// Prefix for completion IDs.
pub const COMPLETION_ID_PREFIX: &str = "chatcmpl-";

const TOOL_CALL_SUFFIX_LEN: usize = 24;
const COMPLETION_SUFFIX_LEN: usize = 29;

fn alphanumeric(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Generate a fresh tool-call ID (`call_` + 24 alphanumerics).
pub fn tool_call_id() -> String {
    format!("{TOOL_CALL_ID_PREFIX}{}", alphanumeric(TOOL_CALL_SUFFIX_LEN))
}

/// Generate a fresh completion ID (`chatcmpl-` + 29 alphanumerics).
pub fn completion_id() -> String {
    format!("{COMPLETION_ID_PREFIX}{}", alphanumeric(COMPLETION_SUFFIX_LEN))
}

/// Whether `id` already matches the canonical tool-call ID shape.
pub fn is_canonical_tool_call_id(id: &str) -> bool {
    id.strip_prefix(TOOL_CALL_ID_PREFIX).is_some_and(|rest| {
        rest.len() == TOOL_CALL_SUFFIX_LEN && rest.chars().all(|c| c.is_ascii_alphanumeric())
    })
}

/// Return `id` unchanged when it is already canonical, otherwise a fresh
/// canonical tool-call ID.
pub fn canonical_tool_call_id(id: Option<&str>) -> String {
    match id {
        Some(id) if is_canonical_tool_call_id(id) => id.to_string(),
        _ => tool_call_id(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_call_ids_match_the_expected_shape() {
        let id = tool_call_id();
        assert!(is_canonical_tool_call_id(&id), "unexpected id: {id}");
        assert_eq!(id.len(), TOOL_CALL_ID_PREFIX.len() + 24);
    }

    #[test]
    fn completion_ids_match_the_expected_shape() {
        let id = completion_id();
        let rest = id.strip_prefix(COMPLETION_ID_PREFIX).expect("prefix");
        assert_eq!(rest.len(), 29);
        assert!(rest.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn generated_ids_are_distinct() {
        assert_ne!(tool_call_id(), tool_call_id());
        assert_ne!(completion_id(), completion_id());
    }

    #[test]
    fn canonical_ids_are_preserved() {
        let id = tool_call_id();
        assert_eq!(canonical_tool_call_id(Some(&id)), id);
    }

    #[test]
    fn non_canonical_ids_are_regenerated() {
        for id in [None, Some(""), Some("call_short"), Some("tool-1"), Some("call_AAAAAAAAAAAAAAAAAAAAAAA!")] {
            let out = canonical_tool_call_id(id);
            assert!(is_canonical_tool_call_id(&out), "not canonical: {out}");
            if let Some(id) = id {
                assert_ne!(out, id);
            }
        }
    }
}
