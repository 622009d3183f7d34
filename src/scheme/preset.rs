//! Built-in scheme definitions selectable by name

/// Scheme name that defers to an explicit `scheme_definition`
pub const CUSTOM: &str = "custom";

const PRESETS: &[(&str, &str)] = &[
    ("semantic", "major.minor[.build]"),
    ("org_semantic", "major.minor.build"),
];

/// Returns the scheme definition registered under `name`
pub fn preset_definition(name: &str) -> Option<&'static str> {
    PRESETS
        .iter()
        .find(|(preset, _)| *preset == name)
        .map(|(_, definition)| *definition)
}

/// Names of all built-in presets
pub fn preset_names() -> impl Iterator<Item = &'static str> {
    PRESETS.iter().map(|(name, _)| *name)
}
