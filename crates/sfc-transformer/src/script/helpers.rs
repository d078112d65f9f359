//! Runtime helpers referenced by the CommonJS rewrite.

/// How helpers reach the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HelperMode {
    /// Declared once at the top of the script and called by name.
    Shared,
    /// Written out as a function expression at every use.
    Inline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Helper {
    /// Wraps a CommonJS module so that `.default` reads the module itself.
    InteropDefault,
    /// Copies every named export of a module onto `exports`.
    ExportStar,
}

impl Helper {
    fn name(self) -> &'static str {
        match self {
            Helper::InteropDefault => "__sfc_interopDefault",
            Helper::ExportStar => "__sfc_exportStar",
        }
    }

    fn params(self) -> &'static str {
        match self {
            Helper::InteropDefault => "(m)",
            Helper::ExportStar => "(m, e)",
        }
    }

    fn body(self) -> &'static str {
        match self {
            Helper::InteropDefault => "{ return m && m.__esModule ? m : { default: m }; }",
            Helper::ExportStar => {
                "{ Object.keys(m).forEach(function (k) { if (k !== \"default\" && !Object.prototype.hasOwnProperty.call(e, k)) e[k] = m[k]; }); return m; }"
            }
        }
    }
}

/// Tracks which helpers a script uses.
#[derive(Debug)]
pub(crate) struct Helpers {
    mode: HelperMode,
    used: Vec<Helper>,
}

impl Helpers {
    pub fn new(mode: HelperMode) -> Self {
        Self {
            mode,
            used: Vec::new(),
        }
    }

    /// Returns the expression calling `helper` with `args`.
    pub fn call(&mut self, helper: Helper, args: &str) -> String {
        match self.mode {
            HelperMode::Shared => {
                if !self.used.contains(&helper) {
                    self.used.push(helper);
                }
                format!("{}({args})", helper.name())
            }
            HelperMode::Inline => {
                format!("(function {} {})({args})", helper.params(), helper.body())
            }
        }
    }

    /// Declarations of every shared helper used so far, on a single line.
    pub fn declarations(&self) -> String {
        self.used
            .iter()
            .map(|helper| format!("function {}{} {}", helper.name(), helper.params(), helper.body()))
            .collect()
    }
}
