use crate::config::Config;
use crate::scanner::SourceFile;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// External macro engine binary.
pub(crate) const ENGINE: &str = "gpp";

/// Invariant flag template passed to every engine invocation.
///
/// `-U` maps the inline `~name: value~` substitution idiom onto ordinary
/// macro call syntax, `-M` does the same for the `~name` line form, `+c`
/// strips `---` comment lines, and `+sqqq` selects the quoting mode.
/// `\W` and `\n` are literal two-character sequences in the engine's own
/// meta-syntax, not escapes.
const BASE_TEMPLATE: &[&str] = &[
    "-U", "'", "", r"(\W", r"\W,\W", r"\W)", r"(\W", r"\W)", "~", "",
    "-M", "~", r"\n", r"(\W", r"\W:\W", r"\W)", r"(\W", r"\W)",
    "+c", "---", r"\n",
    "+sqqq", "~(", ")~", "",
];

/// Fully resolved engine call for one source file.
#[derive(Debug, Clone)]
pub struct InvocationPlan {
    /// Argument vector, excluding the program name.
    pub args: Vec<OsString>,

    /// Path of the file the engine writes.
    pub output_path: PathBuf,

    /// Directory the engine runs in, so its own relative includes resolve
    /// from the source file's location.
    pub workdir: PathBuf,
}

/// Builds per-file invocation plans around the fixed template.
pub(crate) struct CommandBuilder {
    program: String,
    base_args: Vec<OsString>,
    result: String,
}

impl CommandBuilder {
    /// Captures the invariant argv prefix once: the flag template plus one
    /// `--include <path>` pair per include file.
    pub(crate) fn new(config: &Config, includes: &[PathBuf]) -> Self {
        let mut base_args: Vec<OsString> = BASE_TEMPLATE.iter().map(OsString::from).collect();
        for include in includes {
            base_args.push(OsString::from("--include"));
            base_args.push(include.clone().into_os_string());
        }

        Self {
            program: ENGINE.to_string(),
            base_args,
            result: config.result.clone(),
        }
    }

    /// Replaces the engine binary, keeping the argument template.
    #[must_use]
    pub(crate) fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// The engine binary invoked per source file.
    pub(crate) fn program(&self) -> &str {
        &self.program
    }

    /// Produces the concrete argument vector for `file`: the shared prefix,
    /// then `-o <path><result>` and the source path itself.
    pub(crate) fn plan(&self, file: &SourceFile) -> InvocationPlan {
        let output_path = append_suffix(&file.path, &self.result);

        let mut args = self.base_args.clone();
        args.push(OsString::from("-o"));
        args.push(output_path.clone().into_os_string());
        args.push(file.path.clone().into_os_string());

        InvocationPlan {
            args,
            output_path,
            workdir: file.invoke_dir.clone(),
        }
    }
}

/// Appends a textual suffix to a path, `a/b/x.mcs` + `.out` -> `a/b/x.mcs.out`.
pub(crate) fn append_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut os = path.as_os_str().to_os_string();
    os.push(suffix);
    PathBuf::from(os)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(result: &str) -> Config {
        Config {
            workpath: PathBuf::from("/work"),
            result: result.to_string(),
            include: None,
        }
    }

    fn test_source(path: &str) -> SourceFile {
        let path = PathBuf::from(path);
        let invoke_dir = path.parent().unwrap().to_path_buf();
        SourceFile {
            display_path: path.clone(),
            path,
            invoke_dir,
        }
    }

    #[test]
    fn test_template_prefix_is_fixed() {
        let builder = CommandBuilder::new(&test_config(".out"), &[]);
        let plan = builder.plan(&test_source("/work/x.mcs"));

        let prefix: Vec<OsString> = BASE_TEMPLATE.iter().map(OsString::from).collect();
        assert_eq!(&plan.args[..prefix.len()], &prefix[..]);
    }

    #[test]
    fn test_includes_appended_pairwise() {
        let includes = vec![PathBuf::from("/inc/a.h"), PathBuf::from("/inc/b.h")];
        let builder = CommandBuilder::new(&test_config(".out"), &includes);
        let plan = builder.plan(&test_source("/work/x.mcs"));

        let args: Vec<&OsString> = plan.args.iter().collect();
        let first = args.iter().position(|a| *a == "--include").unwrap();
        assert_eq!(args[first + 1], "/inc/a.h");
        assert_eq!(args[first + 2], "--include");
        assert_eq!(args[first + 3], "/inc/b.h");
    }

    #[test]
    fn test_plan_output_and_input() {
        let builder = CommandBuilder::new(&test_config(".out"), &[]);
        let plan = builder.plan(&test_source("/work/a/b/x.mcs"));

        assert_eq!(plan.output_path, PathBuf::from("/work/a/b/x.mcs.out"));
        assert_eq!(plan.workdir, PathBuf::from("/work/a/b"));

        let n = plan.args.len();
        assert_eq!(plan.args[n - 3], "-o");
        assert_eq!(plan.args[n - 2], "/work/a/b/x.mcs.out");
        assert_eq!(plan.args[n - 1], "/work/a/b/x.mcs");
    }

    #[test]
    fn test_program_override() {
        let builder = CommandBuilder::new(&test_config(".out"), &[]).with_program("true");
        assert_eq!(builder.program(), "true");
    }

    #[test]
    fn test_append_suffix_keeps_whole_name() {
        assert_eq!(
            append_suffix(Path::new("dir/x.mcs"), ".out"),
            PathBuf::from("dir/x.mcs.out")
        );
    }
}
