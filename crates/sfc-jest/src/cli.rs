//! CLI argument parsing.

use camino::Utf8PathBuf;
use clap::{Parser, ValueEnum};

/// Transforms single-file components into CommonJS test modules.
#[derive(Debug, Parser)]
#[command(name = "sfc-jest")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Component files or directories to transform (default: the working directory)
    pub inputs: Vec<Utf8PathBuf>,

    /// Project root: configuration files and node packages resolve from here
    #[arg(long, default_value = ".")]
    pub cwd: Utf8PathBuf,

    /// Write `<name>.js` and `<name>.js.map` here instead of printing JSON lines
    #[arg(long = "out-dir")]
    pub out_dir: Option<Utf8PathBuf>,

    /// Read one component from stdin, reported under this path
    #[arg(long = "stdin-filename")]
    pub stdin_filename: Option<Utf8PathBuf>,

    /// File extensions picked up when walking directories
    #[arg(long = "extension", default_value = "vue")]
    pub extensions: Vec<String>,

    /// Glob patterns to ignore
    #[arg(long)]
    pub ignore: Vec<String>,

    /// Path to the node binary
    #[arg(long)]
    pub node: Option<Utf8PathBuf>,

    /// How render functions are normalized
    #[arg(long, value_enum, default_value = "swc")]
    pub normalizer: NormalizerKind,

    /// Log debug output to stderr
    #[arg(long, short)]
    pub verbose: bool,
}

/// Render function normalizer.
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum NormalizerKind {
    /// Syntax check in process (default)
    #[default]
    Swc,
    /// `vue-template-es2015-compiler` through node
    Node,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_args() {
        let args = Args::parse_from(["sfc-jest"]);
        assert!(args.inputs.is_empty());
        assert_eq!(args.cwd.as_str(), ".");
        assert_eq!(args.extensions, vec!["vue".to_string()]);
        assert_eq!(args.normalizer, NormalizerKind::Swc);
        assert!(args.out_dir.is_none());
        assert!(!args.verbose);
    }

    #[test]
    fn test_inputs_and_out_dir() {
        let args = Args::parse_from([
            "sfc-jest",
            "src/components",
            "App.vue",
            "--out-dir",
            "build",
        ]);
        assert_eq!(args.inputs.len(), 2);
        assert_eq!(args.inputs[1].as_str(), "App.vue");
        assert_eq!(args.out_dir.as_deref().map(|p| p.as_str()), Some("build"));
    }

    #[test]
    fn test_repeated_extensions_replace_default() {
        let args = Args::parse_from(["sfc-jest", "--extension", "vue", "--extension", "comp"]);
        assert_eq!(args.extensions, vec!["vue".to_string(), "comp".to_string()]);
    }

    #[test]
    fn test_normalizer_and_node() {
        let args = Args::parse_from([
            "sfc-jest",
            "--normalizer",
            "node",
            "--node",
            "/usr/local/bin/node",
            "-v",
        ]);
        assert_eq!(args.normalizer, NormalizerKind::Node);
        assert_eq!(args.node.as_deref().map(|p| p.as_str()), Some("/usr/local/bin/node"));
        assert!(args.verbose);
    }

    #[test]
    fn test_stdin_filename() {
        let args = Args::parse_from(["sfc-jest", "--stdin-filename", "src/Foo.vue"]);
        assert_eq!(
            args.stdin_filename.as_deref().map(|p| p.as_str()),
            Some("src/Foo.vue")
        );
    }
}
