//! Integration test harness for the compatibility checker.
//!
//! Stands in for a host language server: holds source files, resolves
//! written references against a small table of micro:bit library stubs,
//! and runs the checker with the levels a `CheckConfig` gives each file.

use std::path::PathBuf;

use devcap_apidocs::{ApiDocsEntry, ApiDocsKind, ApiDocsParams, ApiDocsResponse, ApiDocsResponseBuilder};
use devcap_check::compat::COMPAT_RULE;
use devcap_check::{
    CheckConfig, CompatibilityChecker, Diagnostic, DiagnosticCollector, DiagnosticFormatter,
};
use devcap_foundation::{ClassSymbol, NodeRef, SourceMap, Span, Symbol};
use indexmap::IndexMap;

/// Library stubs the harness resolves references against, by full dotted
/// path.
pub fn microbit_stubs() -> IndexMap<&'static str, Symbol> {
    let neopixel = ClassSymbol::new("neopixel", "NeoPixel");
    let mut stubs = IndexMap::new();

    stubs.insert("log", Symbol::module("log"));
    stubs.insert("log.add", Symbol::function("log", "add"));
    stubs.insert("log.set_labels", Symbol::function("log", "set_labels"));
    stubs.insert("power", Symbol::module("power"));
    stubs.insert("power.deep_sleep", Symbol::function("power", "deep_sleep"));

    stubs.insert("microbit", Symbol::module("microbit"));
    stubs.insert("microbit.sleep", Symbol::function("microbit", "sleep"));
    stubs.insert("microbit.run_every", Symbol::function("microbit", "run_every"));
    stubs.insert("microbit.set_volume", Symbol::function("microbit", "set_volume"));
    stubs.insert("microbit.Sound", Symbol::class("microbit", "Sound"));
    stubs.insert("microbit.Image", Symbol::class("microbit", "Image"));
    stubs.insert(
        "microbit.pin0",
        Symbol::class("microbit", "MicroBitTouchPin"),
    );
    stubs.insert(
        "microbit.pin_logo",
        Symbol::class("microbit", "MicroBitTouchPin"),
    );
    stubs.insert(
        "microbit.pin_speaker",
        Symbol::class("microbit", "MicroBitAnalogDigitalPin"),
    );
    stubs.insert("microbit.speaker", Symbol::module("microbit.speaker"));
    stubs.insert("microbit.microphone", Symbol::module("microbit.microphone"));
    stubs.insert("microbit.audio", Symbol::module("microbit.audio"));
    stubs.insert("microbit.audio.play", Symbol::function("microbit.audio", "play"));
    stubs.insert(
        "microbit.audio.SoundEffect",
        Symbol::class("microbit.audio", "SoundEffect"),
    );

    stubs.insert("neopixel", Symbol::module("neopixel"));
    stubs.insert("neopixel.NeoPixel", Symbol::Class(neopixel.clone()));
    stubs.insert(
        "neopixel.NeoPixel.show",
        Symbol::method("neopixel", "show", neopixel.clone()),
    );
    stubs.insert(
        "neopixel.NeoPixel.fill",
        Symbol::method("neopixel", "fill", neopixel.clone()),
    );
    stubs.insert(
        "neopixel.NeoPixel.write",
        Symbol::method("neopixel", "write", neopixel),
    );

    stubs
}

/// Test harness that checks references the way a host would while binding.
pub struct CheckHarness {
    config: CheckConfig,
    checker: CompatibilityChecker<'static>,
    stubs: IndexMap<&'static str, Symbol>,
    sources: SourceMap,
    diagnostics: DiagnosticCollector,
}

impl CheckHarness {
    /// Harness with the default configuration (micro:bit V1, warning).
    pub fn new() -> Self {
        Self::with_config(CheckConfig::default())
    }

    pub fn with_config(config: CheckConfig) -> Self {
        Self {
            checker: CompatibilityChecker::new(config.device),
            config,
            stubs: microbit_stubs(),
            sources: SourceMap::new(),
            diagnostics: DiagnosticCollector::new(),
        }
    }

    /// Harness configured from YAML.
    ///
    /// # Panics
    ///
    /// Panics if the configuration does not parse.
    pub fn from_yaml(yaml: &str) -> Self {
        let config = CheckConfig::from_yaml(yaml).expect("invalid test configuration");
        Self::with_config(config)
    }

    /// Add a source file and return its id.
    pub fn add_source(&mut self, path: &str, text: &str) -> u16 {
        self.sources.add_file(PathBuf::from(path), text.to_string())
    }

    /// Resolve a stub by full dotted path.
    ///
    /// # Panics
    ///
    /// Panics if no stub has that path.
    pub fn symbol(&self, path: &str) -> Symbol {
        self.stubs
            .get(path)
            .cloned()
            .unwrap_or_else(|| panic!("no stub for '{path}'"))
    }

    /// Span of the `occurrence`th (0-based) appearance of `written` in a file.
    ///
    /// # Panics
    ///
    /// Panics if the file or occurrence does not exist.
    pub fn span_of(&self, file_id: u16, written: &str, occurrence: usize) -> Span {
        let file = self
            .sources
            .file(&Span::new(file_id, 0, 0))
            .expect("unknown file id");
        let start = file
            .source
            .match_indices(written)
            .nth(occurrence)
            .map(|(offset, _)| offset)
            .unwrap_or_else(|| panic!("'{written}' occurrence {occurrence} not found"));
        Span::new(file_id, start as u32, (start + written.len()) as u32)
    }

    /// Check a name reference that binds to the stub at `target`.
    pub fn reference(
        &mut self,
        file_id: u16,
        written: &str,
        occurrence: usize,
        target: &str,
    ) -> &mut Self {
        let node = NodeRef::name(self.span_of(file_id, written, occurrence), written);
        let symbol = self.symbol(target);
        self.report(&symbol, &node, None);
        self
    }

    /// Check `module.member` where the left operand binds to a module stub.
    pub fn member_access(
        &mut self,
        file_id: u16,
        written_module: &str,
        occurrence: usize,
        member: &str,
    ) -> &mut Self {
        let node = NodeRef::name(
            self.span_of(file_id, written_module, occurrence),
            written_module,
        );
        let symbol = self.symbol(written_module);
        self.report(&symbol, &node, Some(member));
        self
    }

    fn report(&mut self, symbol: &Symbol, node: &NodeRef, member_name: Option<&str>) {
        let path = self
            .sources
            .file_path(&node.span)
            .map(|p| p.to_path_buf())
            .unwrap_or_default();
        let level = self.config.severity_for(COMPAT_RULE, &path);
        self.checker.report_if_incompatible(
            symbol,
            node,
            &mut self.diagnostics,
            level,
            member_name,
        );
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.diagnostics.diagnostics()
    }

    pub fn messages(&self) -> Vec<&str> {
        self.diagnostics.messages()
    }

    /// Source text each diagnostic points at.
    pub fn snippets(&self) -> Vec<&str> {
        self.diagnostics()
            .iter()
            .filter_map(|d| self.sources.snippet(&d.span))
            .collect()
    }

    pub fn render(&self) -> String {
        DiagnosticFormatter::new(&self.sources).format_all(self.diagnostics())
    }

    /// Documentation trees for the requested modules, built from the stubs.
    ///
    /// Modules without a stub are left out of the response.
    pub fn api_docs(&self, params: &ApiDocsParams) -> ApiDocsResponse {
        let mut builder = ApiDocsResponseBuilder::new();
        for module in &params.modules {
            if let Some(entry) = self.doc_entry(module) {
                builder.insert(module.clone(), entry);
            }
        }
        builder.finish()
    }

    fn doc_entry(&self, path: &str) -> Option<ApiDocsEntry> {
        let symbol = self.stubs.get(path)?;
        let mut entry = match symbol {
            // Instances are stubbed by their declared class.
            Symbol::Class(class) if !path.ends_with(class.name.as_str()) => {
                ApiDocsEntry::variable(path).with_type(class.name.clone())
            }
            _ => ApiDocsEntry::new(ApiDocsKind::from_symbol(symbol)?, path),
        };

        if entry.kind.allows_children() {
            let prefix = format!("{path}.");
            let children = self
                .stubs
                .keys()
                .filter(|key| key.strip_prefix(&prefix).is_some_and(|rest| !rest.contains('.')));
            for child in children {
                if let Some(child) = self.doc_entry(child) {
                    entry.add_child(child).ok()?;
                }
            }
        }
        Some(entry)
    }
}

impl Default for CheckHarness {
    fn default() -> Self {
        Self::new()
    }
}
