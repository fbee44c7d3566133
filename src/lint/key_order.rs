//! Declaration order of important keys.
//!
//! Two rules, each reported at most once per mapping:
//!
//! - identity keys (`package`, `version`, `tag` at top level; `version`,
//!   `tag` inside an override) keep that relative order;
//! - `requires` comes before `build_requires`.
//!
//! Only declaration order is looked at. Values are the schema's business, and
//! this rule reports independently of whatever the schema finds.

use crate::header::{DeclaredKey, ParsedHeader, PathSegment};
use crate::lint::rule::{HeaderContext, HeaderRule};
use crate::lint::{Checker, Diagnostic, Severity};

/// Code for ordering violations.
pub const KEY_ORDER_CODE: &str = "ali:key-order";

/// Identity keys of a recipe, in required order.
pub const RECIPE_IDENTITY: &[&str] = &["package", "version", "tag"];

/// Identity keys of an override entry, in required order.
pub const OVERRIDE_IDENTITY: &[&str] = &["version", "tag"];

fn order_diagnostic(key: &DeclaredKey, severity: Severity, message: String) -> Diagnostic {
    Diagnostic::new(Checker::Headerlint, severity, KEY_ORDER_CODE, message).at(key.position)
}

/// First identity key declared after one it must precede.
///
/// Returns the offending key and the key it should have come before.
pub fn identity_violation<'a>(
    keys: &'a [DeclaredKey],
    identity: &[&str],
) -> Option<(&'a DeclaredKey, &'a DeclaredKey)> {
    let mut latest: Option<(usize, &DeclaredKey)> = None;
    for key in keys {
        let Some(rank) = identity.iter().position(|name| *name == key.name) else {
            continue;
        };
        match latest {
            Some((seen_rank, seen)) if rank < seen_rank => return Some((key, seen)),
            Some((seen_rank, _)) if rank == seen_rank => {}
            _ => latest = Some((rank, key)),
        }
    }
    None
}

/// `requires` declared after `build_requires`.
pub fn requires_violation(keys: &[DeclaredKey]) -> Option<&DeclaredKey> {
    let position = |name: &str| keys.iter().position(|k| k.name == name);
    match (position("requires"), position("build_requires")) {
        (Some(requires), Some(build_requires)) if requires > build_requires => {
            Some(&keys[requires])
        }
        _ => None,
    }
}

/// Check one mapping's declarations. `scope` prefixes messages for nested
/// mappings such as `overrides.ROOT`.
pub fn check_declarations(
    keys: &[DeclaredKey],
    identity: &[&str],
    scope: Option<&str>,
    severity: Severity,
) -> Vec<Diagnostic> {
    let prefix = scope.map(|s| format!("{}: ", s)).unwrap_or_default();
    let mut diagnostics = Vec::new();

    if let Some((key, before)) = identity_violation(keys, identity) {
        diagnostics.push(order_diagnostic(
            key,
            severity,
            format!(
                "{}{} must be declared before {} (expected order: {})",
                prefix,
                key.name,
                before.name,
                identity.join(", ")
            ),
        ));
    }
    if let Some(key) = requires_violation(keys) {
        diagnostics.push(order_diagnostic(
            key,
            severity,
            format!("{}requires must come before build_requires", prefix),
        ));
    }

    diagnostics
}

/// Check the top level and every override entry.
pub fn check_key_order(header: &ParsedHeader, severity: Severity) -> Vec<Diagnostic> {
    let mut diagnostics = check_declarations(header.keys(), RECIPE_IDENTITY, None, severity);

    if let Some(overrides) = header.get("overrides").and_then(|v| v.as_mapping()) {
        for (name, entry) in overrides {
            let (Some(name), Some(entry)) = (name.as_str(), entry.as_mapping()) else {
                continue;
            };
            let path = [PathSegment::key("overrides"), PathSegment::key(name)];
            let keys = header.declared_keys_of(entry, &path);
            let scope = format!("overrides.{}", name);
            diagnostics.extend(check_declarations(&keys, OVERRIDE_IDENTITY, Some(&scope), severity));
        }
    }

    diagnostics
}

/// Checks declaration order of identity and dependency keys.
pub struct KeyOrderRule;

impl HeaderRule for KeyOrderRule {
    fn code(&self) -> &'static str {
        KEY_ORDER_CODE
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, ctx: &HeaderContext<'_>) -> Vec<Diagnostic> {
        check_key_order(ctx.header, self.default_severity())
    }
}
