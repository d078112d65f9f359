//! Writing transform results.

use std::fs;
use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;
use sfc_transformer::TransformOutput;

use crate::error::RunError;

/// One line of JSON output.
#[derive(Debug, Serialize)]
pub struct JsonRecord<'a> {
    pub file: &'a str,
    #[serde(flatten)]
    pub output: &'a TransformOutput,
}

/// Where results go.
#[derive(Debug, Clone)]
pub enum Emitter {
    /// One JSON object per line on stdout.
    JsonLines,
    /// `.js` and `.js.map` files under `out_dir`, mirroring the input's
    /// location relative to `cwd`.
    Files { out_dir: Utf8PathBuf, cwd: Utf8PathBuf },
}

impl Emitter {
    pub fn emit(
        &self,
        file: &Utf8Path,
        output: &TransformOutput,
        out: &mut impl Write,
    ) -> Result<(), RunError> {
        match self {
            Emitter::JsonLines => {
                let record = JsonRecord {
                    file: file.as_str(),
                    output,
                };
                let line = serde_json::to_string(&record).map_err(|e| RunError::Write {
                    path: Utf8PathBuf::from("<stdout>"),
                    source: e.into(),
                })?;
                writeln!(out, "{line}").map_err(|source| RunError::Write {
                    path: Utf8PathBuf::from("<stdout>"),
                    source,
                })
            }
            Emitter::Files { out_dir, cwd } => {
                let js = module_path(out_dir, cwd, file);
                let map = Utf8PathBuf::from(format!("{js}.map"));
                if let Some(parent) = js.parent() {
                    fs::create_dir_all(parent).map_err(|source| RunError::Write {
                        path: parent.to_path_buf(),
                        source,
                    })?;
                }

                let map_name = map.file_name().unwrap_or_default();
                let code = format!("{}\n//# sourceMappingURL={map_name}\n", output.code);
                fs::write(&js, code).map_err(|source| RunError::Write {
                    path: js.clone(),
                    source,
                })?;

                let map_json = serde_json::to_string(&output.map).map_err(|e| RunError::Write {
                    path: map.clone(),
                    source: e.into(),
                })?;
                fs::write(&map, map_json).map_err(|source| RunError::Write {
                    path: map.clone(),
                    source,
                })?;
                tracing::debug!("wrote {js}");
                Ok(())
            }
        }
    }
}

/// `<out_dir>/<path relative to cwd>` with a `.js` extension. Files outside
/// `cwd` land directly in `out_dir`.
pub fn module_path(out_dir: &Utf8Path, cwd: &Utf8Path, file: &Utf8Path) -> Utf8PathBuf {
    let relative = match file.strip_prefix(cwd) {
        Ok(relative) => relative.to_path_buf(),
        Err(_) => Utf8PathBuf::from(file.file_name().unwrap_or("component")),
    };
    out_dir.join(relative).with_extension("js")
}
