//! Domain types mirrored from the code-quality platform's v3 API.

use serde::{Deserialize, Serialize};

/// Languages enabled on every coding standard this tool creates.
///
/// The platform rejects creation requests naming languages it does not
/// know, so this list tracks the full supported set.
pub const SUPPORTED_LANGUAGES: &[&str] = &[
    "CSharp",
    "Java",
    "Go",
    "Kotlin",
    "Ruby",
    "Scala",
    "Python",
    "TypeScript",
    "Javascript",
    "CoffeeScript",
    "Swift",
    "JSP",
    "VisualBasic",
    "PHP",
    "PLSQL",
    "SQL",
    "TSQL",
    "Crystal",
    "Haskell",
    "Elixir",
    "Groovy",
    "Apex",
    "VisualForce",
    "Velocity",
    "CSS",
    "HTML",
    "LESS",
    "SASS",
    "Dockerfile",
    "Terraform",
    "Shell",
    "JSON",
    "XML",
    "Perl",
    "Lua",
    "Powershell",
    "YAML",
    "Cobol",
    "Rust",
    "Erlang",
    "ABAP",
    "Objective C",
    "Markdown",
    "Julia",
    "Scratch",
    "FSharp",
    "Lisp",
    "Prolog",
    "R",
    "Solidity",
    "Elm",
    "Fortran",
    "Dart",
    "OCaml",
    "Clojure",
    "C",
    "CPP",
];

// ---------------------------------------------------------------------------
// StandardId
// ---------------------------------------------------------------------------

/// Numeric identifier the platform assigns to a coding standard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StandardId(pub i64);

impl std::fmt::Display for StandardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// CodingStandard
// ---------------------------------------------------------------------------

/// A coding standard as reported by the platform.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodingStandard {
    /// Platform-assigned identifier.
    pub id: StandardId,
    /// Human-readable name.
    pub name: String,
    /// Whether this standard is the organization default.
    #[serde(default)]
    pub is_default: bool,
    /// Whether this standard is still a draft (not yet promoted).
    #[serde(default)]
    pub is_draft: bool,
}

// ---------------------------------------------------------------------------
// Tools and patterns
// ---------------------------------------------------------------------------

/// An analysis tool from the platform catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct Tool {
    /// Stable tool identifier used in configuration endpoints.
    #[serde(default)]
    pub uuid: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
}

impl Tool {
    /// Catalog entries occasionally arrive without a uuid or name; those
    /// cannot be configured and are skipped.
    pub fn is_well_formed(&self) -> bool {
        !self.uuid.trim().is_empty() && !self.name.trim().is_empty()
    }
}

/// One analysis rule belonging to a tool, as listed for a coding standard.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pattern {
    /// The rule definition this entry configures.
    pub pattern_definition: PatternDefinition,
    /// Whether the rule is currently active in the standard.
    #[serde(default)]
    pub enabled: bool,
}

/// Definition of an analysis rule.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternDefinition {
    /// Rule identifier used in update payloads.
    pub id: String,
    /// Severity bucket as a free-form string from the platform.
    #[serde(default)]
    pub severity_level: String,
}

impl PatternDefinition {
    /// Severity buckets the tool suppresses. Matching is case-insensitive;
    /// the platform has been seen emitting both `Info` and `info`.
    pub fn is_minor(&self) -> bool {
        matches!(
            self.severity_level.to_ascii_lowercase().as_str(),
            "info" | "minor"
        )
    }
}

/// Mutation payload item toggling a single pattern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternUpdate {
    /// Rule identifier.
    pub id: String,
    /// Desired enablement state.
    pub enabled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_list_is_complete() {
        assert_eq!(SUPPORTED_LANGUAGES.len(), 57);
        assert!(SUPPORTED_LANGUAGES.contains(&"Rust"));
        assert!(SUPPORTED_LANGUAGES.contains(&"Objective C"));
    }

    #[test]
    fn minor_severity_matching_is_case_insensitive() {
        let mut def = PatternDefinition {
            id: "ESLint_no-console".into(),
            severity_level: "Info".into(),
        };
        assert!(def.is_minor());

        def.severity_level = "minor".into();
        assert!(def.is_minor());

        def.severity_level = "Warning".into();
        assert!(!def.is_minor());

        def.severity_level = String::new();
        assert!(!def.is_minor());
    }

    #[test]
    fn pattern_deserializes_from_api_shape() {
        let json = r#"{
            "patternDefinition": {
                "id": "PyLint_C0111",
                "severityLevel": "Info",
                "category": "CodeStyle"
            },
            "enabled": true
        }"#;
        let pattern: Pattern = serde_json::from_str(json).expect("parse pattern");
        assert_eq!(pattern.pattern_definition.id, "PyLint_C0111");
        assert!(pattern.pattern_definition.is_minor());
        assert!(pattern.enabled);
    }

    #[test]
    fn coding_standard_deserializes_with_defaults() {
        let json = r#"{"id": 4182, "name": "org-wide"}"#;
        let standard: CodingStandard = serde_json::from_str(json).expect("parse standard");
        assert_eq!(standard.id, StandardId(4182));
        assert!(!standard.is_default);
        assert!(!standard.is_draft);
    }

    #[test]
    fn incomplete_tool_is_rejected() {
        let tool: Tool = serde_json::from_str(r#"{"name": "ESLint"}"#).expect("parse tool");
        assert!(!tool.is_well_formed());

        let tool: Tool =
            serde_json::from_str(r#"{"uuid": "cf05f3aa-fd23-4586-8cce-5368917ec3e5", "name": "ESLint"}"#)
                .expect("parse tool");
        assert!(tool.is_well_formed());
    }
}
