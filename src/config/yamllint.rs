//! yamllint rule configuration for recipe headers.
//!
//! See <https://yamllint.readthedocs.io/en/stable/configuration.html>.

use serde_json::{json, Value};

/// The rule set recipe headers are held to.
pub fn default_yamllint_config() -> Value {
    json!({
        "extends": "default",
        "rules": {
            // Embedded scripts such as incremental_recipe run long.
            "line-length": {"max": 120, "level": "warning"},
            // The default only checks consistency within one file.
            "indentation": {"spaces": 2, "level": "warning"},
            "colons": {"level": "warning"},
            // Headers have no leading '---'.
            "document-start": "disable",
            // Empty values are null.
            "empty-values": "enable",
            "braces": {"forbid": "non-empty"},
            // Bare on/off/yes/no are errors, not warnings.
            "truthy": {"level": "error"},
            "octal-values": {
                "forbid-implicit-octal": true,
                "forbid-explicit-octal": false
            }
        }
    })
}
