/// Resolve the version constraint for the bootstrap dev dependency.
///
/// A non-empty override is used verbatim. Otherwise the source manifest's
/// own `version` becomes a caret constraint, and without one the fallback
/// applies.
pub fn resolve_version(override_version: Option<&str>, manifest_version: Option<&str>, fallback: &str) -> String {
  if let Some(version) = override_version.filter(|v| !v.is_empty()) {
    return version.to_string();
  }

  match manifest_version.filter(|v| !v.is_empty()) {
    Some(version) => format!("^{}", version),
    None => fallback.to_string(),
  }
}
