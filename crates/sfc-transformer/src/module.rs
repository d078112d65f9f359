//! Output module layout.

/// Prefix of every line the assembler adds around the script.
pub const COVERAGE_IGNORE: &str = "/* istanbul ignore next */";

/// Stringified render functions to attach to the component options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderAttachment {
    pub render: String,
    /// An array literal.
    pub static_render_fns: String,
}

/// The pieces of an output module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleTemplate<'a> {
    pub script: &'a str,
    pub render: Option<RenderAttachment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledModule {
    pub code: String,
    /// 0-based line of `code` holding the first script line.
    pub script_start_line: u32,
}

impl ModuleTemplate<'_> {
    pub fn render(&self) -> AssembledModule {
        let prologue = format!("{COVERAGE_IGNORE};(function(){{\n");
        let script_start_line = prologue.matches('\n').count() as u32;

        let mut code = prologue;
        code.push_str(self.script);
        code.push('\n');
        code.push_str(&format!("{COVERAGE_IGNORE}}})()\n"));
        code.push_str(&format!(
            "{COVERAGE_IGNORE}if (module.exports.__esModule) module.exports = module.exports.default\n"
        ));
        code.push_str(&format!(
            "{COVERAGE_IGNORE}var __vue__options__ = (typeof module.exports === \"function\"? module.exports.options: module.exports)"
        ));
        if let Some(render) = &self.render {
            code.push_str(&format!(
                "\n{COVERAGE_IGNORE}__vue__options__.render = {}\n{COVERAGE_IGNORE}__vue__options__.staticRenderFns = {}",
                render.render, render.static_render_fns
            ));
        }

        AssembledModule {
            code,
            script_start_line,
        }
    }
}
