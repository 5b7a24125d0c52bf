//! Integration tests for the compatibility check as a host drives it.
//!
//! Each test adds a small Python source, replays the name references a
//! binder would resolve in it, and inspects the diagnostics that reach the
//! sink.

use devcap_apidocs::{find_entry, ApiDocsKind, ApiDocsParams};
use devcap_check::compat::COMPAT_RULE;
use devcap_check::{CheckConfig, DeviceRevision};
use devcap_foundation::DiagnosticLevel;
use devcap_tests::CheckHarness;

/// Importing a fully disallowed module and calling one of its functions.
///
/// Both the import and the member call are reported, in source order.
#[test]
fn test_disallowed_module_import_and_call() {
    let mut harness = CheckHarness::new();
    let file = harness.add_source("test2.py", "import log\nlog.add()\n");

    harness
        .reference(file, "log", 0, "log")
        .reference(file, "add", 0, "log.add");

    assert_eq!(
        harness.messages(),
        vec![
            "\"log\" is not supported on a micro:bit V1",
            "\"log.add\" is not supported on a micro:bit V1",
        ]
    );
    assert_eq!(harness.snippets(), vec!["log", "add"]);
    assert!(harness
        .diagnostics()
        .iter()
        .all(|d| d.rule == COMPAT_RULE && d.level == DiagnosticLevel::Warning));
}

/// A method called on an instance is reported against its class.
#[test]
fn test_instance_method_reports_class_method_use() {
    let mut harness = CheckHarness::new();
    let file = harness.add_source(
        "test3.py",
        "import neopixel\nnp = neopixel.NeoPixel(pin0, 8)\nnp.fill((0, 0, 0))\nnp.show()\n",
    );

    harness
        .reference(file, "NeoPixel", 0, "neopixel.NeoPixel")
        .reference(file, "fill", 0, "neopixel.NeoPixel.fill")
        .reference(file, "show", 0, "neopixel.NeoPixel.show");

    assert_eq!(
        harness.messages(),
        vec!["\"NeoPixel.fill\" is not supported on a micro:bit V1"]
    );
    assert_eq!(harness.snippets(), vec!["fill"]);
}

/// Only the denylisted members of a partially disallowed module are flagged.
#[test]
fn test_partially_disallowed_module_members() {
    let mut harness = CheckHarness::new();
    let file = harness.add_source(
        "main.py",
        "import microbit\nmicrobit.run_every(tick)\nmicrobit.sleep(100)\n",
    );

    harness
        .reference(file, "microbit", 0, "microbit")
        .reference(file, "run_every", 0, "microbit.run_every")
        .reference(file, "sleep", 0, "microbit.sleep");

    assert_eq!(
        harness.messages(),
        vec!["\"microbit.run_every\" is not supported on a micro:bit V1"]
    );
}

/// With the rule configured off, nothing reaches the diagnostics.
#[test]
fn test_rule_disabled_by_configuration() {
    let mut harness = CheckHarness::from_yaml(
        r#"
apiVersion: devcap/v1
kind: CheckConfig
device: v1
rules:
  reportMicrobitV2ApiUse: none
"#,
    );
    let file = harness.add_source("test2.py", "import log\nlog.add()\n");

    harness
        .reference(file, "log", 0, "log")
        .reference(file, "add", 0, "log.add");

    assert!(harness.diagnostics().is_empty());
}

/// `from microbit import *` and `microbit.set_volume` resolve to the same
/// function and produce the same message.
#[test]
fn test_wildcard_and_explicit_imports_match() {
    let mut wildcard = CheckHarness::new();
    let file = wildcard.add_source("wild.py", "from microbit import *\nset_volume(100)\n");
    wildcard.reference(file, "set_volume", 0, "microbit.set_volume");

    let mut explicit = CheckHarness::new();
    let file = explicit.add_source("explicit.py", "import microbit\nmicrobit.set_volume(100)\n");
    explicit.reference(file, "set_volume", 0, "microbit.set_volume");

    assert_eq!(wildcard.messages(), explicit.messages());
    assert_eq!(
        wildcard.messages(),
        vec!["\"microbit.set_volume\" is not supported on a micro:bit V1"]
    );
}

/// Pins share declared types, so the written name decides.
#[test]
fn test_pins_are_checked_by_written_name() {
    let mut harness = CheckHarness::new();
    let file = harness.add_source(
        "pins.py",
        "from microbit import *\npin_logo.is_touched()\npin_speaker.write_digital(1)\npin0.is_touched()\n",
    );

    harness
        .reference(file, "pin_logo", 0, "microbit.pin_logo")
        .reference(file, "pin_speaker", 0, "microbit.pin_speaker")
        .reference(file, "pin0", 0, "microbit.pin0");

    assert_eq!(
        harness.messages(),
        vec![
            "\"microbit.pin_logo\" is not supported on a micro:bit V1",
            "\"microbit.pin_speaker\" is not supported on a micro:bit V1",
        ]
    );
}

/// Classes and submodules are reported by their full module path.
#[test]
fn test_classes_and_submodules() {
    let mut harness = CheckHarness::new();
    let file = harness.add_source(
        "sounds.py",
        "from microbit import speaker, Sound, Image\nfrom microbit.audio import SoundEffect\n",
    );

    harness
        .reference(file, "speaker", 0, "microbit.speaker")
        .reference(file, "Sound", 0, "microbit.Sound")
        .reference(file, "Image", 0, "microbit.Image")
        .reference(file, "SoundEffect", 0, "microbit.audio.SoundEffect");

    assert_eq!(
        harness.messages(),
        vec![
            "\"microbit.speaker\" is not supported on a micro:bit V1",
            "\"microbit.Sound\" is not supported on a micro:bit V1",
            "\"microbit.audio.SoundEffect\" is not supported on a micro:bit V1",
        ]
    );
}

/// Member access on a module object runs the module-level test only.
#[test]
fn test_member_access_on_module_object() {
    let mut harness = CheckHarness::new();
    let file = harness.add_source("power.py", "import power\npower.deep_sleep()\nimport microbit\nmicrobit.sleep(1)\n");

    harness
        .member_access(file, "power", 1, "deep_sleep")
        .member_access(file, "microbit", 1, "sleep");

    assert_eq!(
        harness.messages(),
        vec!["\"power\" is not supported on a micro:bit V1"]
    );
    assert_eq!(harness.snippets(), vec!["power"]);
}

/// Targeting V2 accepts the whole API.
#[test]
fn test_v2_accepts_everything() {
    let mut harness = CheckHarness::with_config(CheckConfig::new(DeviceRevision::V2));
    let file = harness.add_source("test2.py", "import log\nlog.add()\nnp.fill(0)\n");

    harness
        .reference(file, "log", 0, "log")
        .reference(file, "add", 0, "log.add")
        .reference(file, "fill", 0, "neopixel.NeoPixel.fill");

    assert!(harness.diagnostics().is_empty());
}

/// Path overrides change the level for matching files only.
#[test]
fn test_path_overrides() {
    let mut harness = CheckHarness::from_yaml(
        r#"
apiVersion: devcap/v1
kind: CheckConfig
rules:
  reportMicrobitV2ApiUse: error
overrides:
  - path: lib/
    rules:
      reportMicrobitV2ApiUse: information
  - path: lib/vendor/
    rules:
      reportMicrobitV2ApiUse: none
"#,
    );
    let main = harness.add_source("main.py", "import log\n");
    let lib = harness.add_source("lib/radio_log.py", "import log\n");
    let vendor = harness.add_source("lib/vendor/old.py", "import log\n");

    harness
        .reference(main, "log", 0, "log")
        .reference(lib, "log", 0, "log")
        .reference(vendor, "log", 0, "log");

    let levels: Vec<_> = harness.diagnostics().iter().map(|d| d.level).collect();
    assert_eq!(
        levels,
        vec![DiagnosticLevel::Error, DiagnosticLevel::Information]
    );
}

/// The rendered report points at the offending source.
#[test]
fn test_rendered_report() {
    let mut harness = CheckHarness::new();
    let file = harness.add_source("test2.py", "import log\nlog.add()\n");
    harness.reference(file, "add", 0, "log.add");

    let rendered = harness.render();
    assert!(rendered.starts_with(
        "warning: reportMicrobitV2ApiUse: \"log.add\" is not supported on a micro:bit V1\n"
    ));
    assert!(rendered.contains("  --> test2.py:2:5\n"));
    assert!(rendered.contains("  2 | log.add()\n"));
    assert!(rendered.contains("   |     ^^^\n"));
}

/// Configuration loaded from disk behaves like the inline YAML.
#[test]
fn test_config_file_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("devcap.yaml");
    std::fs::write(
        &path,
        "apiVersion: devcap/v1\nkind: CheckConfig\nrules:\n  reportMicrobitV2ApiUse: error\n",
    )
    .unwrap();

    let mut harness = CheckHarness::with_config(CheckConfig::load(&path).unwrap());
    let file = harness.add_source("main.py", "import power\n");
    harness.reference(file, "power", 0, "power");

    assert!(harness.diagnostics()[0].is_error());
}

/// Documentation trees built from the same stubs the checker resolves.
#[test]
fn test_api_docs_response() {
    let harness = CheckHarness::new();
    let params: ApiDocsParams = serde_json::from_str(
        r#"{ "modules": ["microbit", "neopixel", "radio"], "path": "main.py" }"#,
    )
    .unwrap();

    let response = harness.api_docs(&params);
    assert_eq!(response.keys().collect::<Vec<_>>(), vec!["microbit", "neopixel"]);

    let microbit = &response["microbit"];
    assert_eq!(microbit.kind, ApiDocsKind::Module);
    assert!(microbit.validate().is_ok());

    let sound_effect = find_entry(&response, "microbit.audio.SoundEffect").unwrap();
    assert_eq!(sound_effect.kind, ApiDocsKind::Class);

    let pin = find_entry(&response, "microbit.pin_speaker").unwrap();
    assert_eq!(pin.kind, ApiDocsKind::Variable);
    assert_eq!(pin.type_string.as_deref(), Some("MicroBitAnalogDigitalPin"));

    let fill = find_entry(&response, "neopixel.NeoPixel.fill").unwrap();
    assert_eq!(fill.kind, ApiDocsKind::Function);
    assert!(fill.children.is_none());

    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["neopixel"]["children"][0]["fullName"], "neopixel.NeoPixel");
    assert_eq!(json["microbit"]["children"][5]["type"], "MicroBitTouchPin");
}
