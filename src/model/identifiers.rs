//! SPDX identifier derivation and string sanitizing.

/// Sentinel for absent or unknown SPDX values.
pub const NOASSERTION: &str = "NOASSERTION";

/// Prefix of every component package identifier.
pub const PACKAGE_ID_PREFIX: &str = "SPDXRef-Package-";

/// Identifier of the document itself.
pub const DOCUMENT_ID: &str = "SPDXRef-DOCUMENT";

/// Make a string safe for use inside an SPDX identifier.
///
/// Strips `; : ! * ( ) / ,` as well as spaces and dots, then maps `@` to
/// `-at-` and `_` to `uu`.
#[must_use]
pub fn clean_for_spdx(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 8);
    for c in name.chars() {
        match c {
            ';' | ':' | '!' | '*' | '(' | ')' | '/' | ',' | ' ' | '.' => {}
            '@' => out.push_str("-at-"),
            '_' => out.push_str("uu"),
            other => out.push(other),
        }
    }
    out
}

/// Remove single and double quote characters.
#[must_use]
pub fn strip_quotes(value: &str) -> String {
    value.chars().filter(|c| !matches!(c, '"' | '\'')).collect()
}

/// Package identifier for a component at a version.
///
/// Deterministic in `(name, version)`, so two BOM entries with the same
/// pair share one identifier.
#[must_use]
pub fn package_id(name: &str, version: &str) -> String {
    clean_for_spdx(&format!("{PACKAGE_ID_PREFIX}{name}-{version}"))
}

/// Reference id for a custom license, from its display name.
#[must_use]
pub fn license_ref(display_name: &str) -> String {
    format!("LicenseRef-{}", clean_for_spdx(display_name))
}
