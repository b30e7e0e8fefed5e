use crate::config::SOURCE_EXT;

/// Immutable description of one recognized configuration directive.
#[derive(Debug, Clone, Copy)]
pub struct DirectiveSpec {
    /// Identifier written after `~` in the directive file.
    pub name: &'static str,

    /// Whether the directive must be set once the file is fully parsed.
    pub mandatory: bool,

    /// Placeholder shown between the quotes in the usage form.
    pub value_hint: &'static str,

    /// Human-readable description used in the help text.
    pub description: &'static str,
}

/// Every directive the parser accepts. Names are unique.
pub(crate) const DIRECTIVES: &[DirectiveSpec] = &[
    DirectiveSpec {
        name: "workpath",
        mandatory: true,
        value_hint: "path",
        description: "sets the working directory scanned for source files",
    },
    DirectiveSpec {
        name: "result",
        mandatory: true,
        value_hint: "suffix",
        description: "sets the suffix appended to a source path to name its generated file",
    },
    DirectiveSpec {
        name: "include",
        mandatory: false,
        value_hint: "path",
        description: "sets the directory whose files are included in every processed file",
    },
];

/// Looks up a directive by name.
pub(crate) fn lookup(name: &str) -> Option<&'static DirectiveSpec> {
    DIRECTIVES.iter().find(|spec| spec.name == name)
}

/// Renders the full help message from the directive table.
///
/// The same text is printed for a `--- help` comment and appended to
/// directive syntax errors, so every parse failure is self-documenting.
#[must_use]
pub fn render_help() -> String {
    let mut out = String::from("------ help message ------\n");
    out.push_str(&format!(
        "a {SOURCE_EXT} file contains directives (~directive \"value\") and comments (--- comment).\n"
    ));
    out.push_str("write \"--- help\" in the file to print this message.\n");

    out.push_str("\nMandatory\n");
    for spec in DIRECTIVES.iter().filter(|spec| spec.mandatory) {
        out.push_str(&usage_entry(spec));
    }

    out.push_str("\nOptional\n");
    for spec in DIRECTIVES.iter().filter(|spec| !spec.mandatory) {
        out.push_str(&usage_entry(spec));
    }

    out
}

fn usage_entry(spec: &DirectiveSpec) -> String {
    format!(
        "  - {}\n  ~{} \"{}\"\n",
        spec.description, spec.name, spec.value_hint
    )
}
