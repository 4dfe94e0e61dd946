/// Headers whose values embed package names.
///
/// Matched case-sensitively against the header name as written.
pub const SELECTED_HEADERS: [&str; 7] = [
    "DynamicImport-Package",
    "Export-Package",
    "Import-Package",
    "Subsystem-Content",
    "IBM-API-Package",
    "Provide-Capability",
    "Require-Capability",
];

pub fn selects(header: &str) -> bool {
    SELECTED_HEADERS.contains(&header)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selected_headers() {
        assert!(selects("Import-Package"));
        assert!(selects("Require-Capability"));
        assert!(!selects("import-package"));
        assert!(!selects("Bundle-SymbolicName"));
        assert!(!selects("Private-Package"));
    }
}
