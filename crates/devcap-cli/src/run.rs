//! The check run behind `devcap check`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use devcap_check::compat::COMPAT_RULE;
use devcap_check::{CheckConfig, CompatibilityChecker, DiagnosticCollector, DiagnosticFormatter};
use devcap_foundation::SourceMap;
use tracing::{info, warn};

use crate::references::SymbolReference;

/// Diagnostics from one run plus the sources needed to render them.
#[derive(Debug)]
pub struct CheckRun {
    pub sources: SourceMap,
    pub diagnostics: DiagnosticCollector,
}

impl CheckRun {
    pub fn render(&self) -> String {
        DiagnosticFormatter::new(&self.sources).format_all(self.diagnostics.diagnostics())
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.has_errors()
    }
}

/// Check every reference with the level `config` gives its file.
///
/// With `sources_root`, each referenced file is read relative to it so the
/// rendered diagnostics carry source lines. Files that cannot be read are
/// rendered with their location only.
pub fn check_references(
    config: &CheckConfig,
    references: &[SymbolReference],
    sources_root: Option<&Path>,
) -> CheckRun {
    let checker = CompatibilityChecker::new(config.device);
    let mut sources = SourceMap::new();
    let mut file_ids: HashMap<PathBuf, u16> = HashMap::new();
    let mut diagnostics = DiagnosticCollector::new();

    for reference in references {
        let file_id = *file_ids.entry(reference.file.clone()).or_insert_with(|| {
            let source = read_source(sources_root, &reference.file);
            sources.add_file(reference.file.clone(), source)
        });

        let level = config.severity_for(COMPAT_RULE, &reference.file);
        checker.report_if_incompatible(
            &reference.symbol,
            &reference.node(file_id),
            &mut diagnostics,
            level,
            reference.member_name.as_deref(),
        );
    }

    info!(
        device = %config.device,
        references = references.len(),
        files = sources.file_count(),
        diagnostics = diagnostics.len(),
        "check complete"
    );

    CheckRun {
        sources,
        diagnostics,
    }
}

fn read_source(root: Option<&Path>, file: &Path) -> String {
    let Some(root) = root else {
        return String::new();
    };
    let path = root.join(file);
    match std::fs::read_to_string(&path) {
        Ok(source) => source,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "source unavailable");
            String::new()
        }
    }
}
