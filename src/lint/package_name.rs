//! Package name validation.
//!
//! The build tool looks recipes up by file name, so `package` must match the
//! file name case-insensitively, without the `.sh` extension. A mismatch is
//! a schema violation on `package`.

use std::path::Path;

use super::validate::Violation;
use crate::header::{ParsedHeader, PathSegment};

/// Check `package` against the recipe file name.
///
/// A missing `package` is left to the required-key check; a non-string one
/// is reported here, since it cannot match any file name.
pub fn package_name_violation(header: &ParsedHeader, file_name: &str) -> Option<Violation> {
    let package = header.get("package")?;
    let path = [PathSegment::key("package")];
    let basename = Path::new(file_name)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_name.to_string());

    let Some(package) = package.as_str() else {
        return (!package.is_null()).then(|| Violation::at(&path, "must be a string"));
    };
    if format!("{}.sh", package.to_lowercase()) == basename {
        return None;
    }
    Some(Violation::at(
        &path,
        format!(
            "must match the file name {:?} case-insensitively, excluding the .sh",
            basename
        ),
    ))
}
