//! Reserved names shared with hosts and UIs. These strings are part of the
//! public contract and must not change.

/// Suffix appended to a source action name to form its baked action.
pub const BAKED_SUFFIX: &str = "_Exp";

/// Name of the synchronizer-owned timeline track.
pub const GENERATED_TRACK: &str = "AutoGen";

/// `Walk` -> `Walk_Exp`.
pub fn baked_action_name(source: &str) -> String {
    format!("{source}{BAKED_SUFFIX}")
}

/// True for `Walk_Exp` and for host duplicates such as `Walk_Exp.001`.
pub fn is_baked_action_name(name: &str) -> bool {
    if name.ends_with(BAKED_SUFFIX) {
        return true;
    }
    match name.rsplit_once('.') {
        Some((stem, dup)) => {
            !dup.is_empty() && dup.bytes().all(|b| b.is_ascii_digit()) && stem.ends_with(BAKED_SUFFIX)
        }
        None => false,
    }
}

/// Name of the baked action an export entry refers to: entries that already
/// name a baked action are used as-is, source names get the suffix.
pub fn resolve_baked_name(exported: &str) -> String {
    if is_baked_action_name(exported) {
        exported.to_string()
    } else {
        baked_action_name(exported)
    }
}
