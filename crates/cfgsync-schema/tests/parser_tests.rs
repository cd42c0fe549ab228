//! Tests for schema annotation parsing

use cfgsync_fs::NormalizedPath;
use cfgsync_schema::{Schema, SchemaParser, Target, TargetKind, ValueKind};
use pretty_assertions::assert_eq;
use rstest::rstest;

const KCONFIG: &str = r#"menu "Hardware"

choice
    prompt "CPU board"
    default CPU_K2526

config CPU_K2521
    bool "K2521"
    help
      CPU board K2521
      source=bios.mac cpu=k2521

config CPU_K2526
    bool "K2526"
    help
      CPU board K2526

      source=bios.mac cpu=k2526

endchoice

config SYSTEM_AUTOEXEC_STR
    string "Autoexec command"
    help
      Command executed after cold boot.
      source=bios.mac kltbef=string

config NO_ANNOTATION
    bool "Plain option"
    help
      Nothing to synchronize here.

config RAMDISK_EM256
    bool "RAM disk EM256"
    help
      source=bios.mac oss=0 em256=1
      source=bios.mac mkd256=0 raf=0 rna=0

endmenu
"#;

#[test]
fn test_parses_mappings_in_declaration_order() {
    let schema = Schema::parse(KCONFIG);
    let names: Vec<&str> = schema.mappings().iter().map(|m| m.name.as_str()).collect();

    assert_eq!(
        names,
        vec!["CPU_K2521", "CPU_K2526", "SYSTEM_AUTOEXEC_STR", "RAMDISK_EM256"]
    );
    assert!(schema.get("NO_ANNOTATION").is_none());
    assert!(schema.diagnostics().is_empty());
}

#[test]
fn test_toggle_literal_and_blank_help_lines() {
    let schema = Schema::parse(KCONFIG);
    let cpu = schema.get("CPU_K2526").unwrap();

    assert_eq!(cpu.source, "bios.mac");
    assert_eq!(cpu.targets, vec![Target::new("cpu", TargetKind::Toggle("k2526".into()))]);
    assert_eq!(cpu.kind(), ValueKind::Toggle);
    assert_eq!(cpu.line, 13);
}

#[test]
fn test_type_tag_has_no_literal() {
    let schema = Schema::parse(KCONFIG);
    let autoexec = schema.get("SYSTEM_AUTOEXEC_STR").unwrap();

    assert_eq!(autoexec.kind(), ValueKind::BoundedString);
    assert_eq!(autoexec.targets[0].kind.literal(), None);
}

#[test]
fn test_multiple_annotation_lines_accumulate_targets() {
    let schema = Schema::parse(KCONFIG);
    let ramdisk = schema.get("RAMDISK_EM256").unwrap();
    let symbols: Vec<&str> = ramdisk.symbols().collect();

    assert_eq!(symbols, vec!["oss", "em256", "mkd256", "raf", "rna"]);
    assert!(ramdisk.is_multi_target());
}

#[test]
fn test_choice_members_form_exclusive_group() {
    let schema = Schema::parse(KCONFIG);
    let group = schema.group_of("CPU_K2521").unwrap();

    assert_eq!(group.members, vec!["CPU_K2521", "CPU_K2526"]);
    assert_eq!(group.symbols, vec!["cpu"]);
    assert!(schema.group_of("SYSTEM_AUTOEXEC_STR").is_none());
}

#[test]
fn test_source_filter_drops_other_artifacts() {
    let text = r#"
config BDOS_OPT
    bool "BDOS option"
    help
      source=bdos.mac opt=1

config CPU_K2526
    bool "K2526"
    help
      source=bios.mac cpu=k2526
"#;
    let schema = SchemaParser::for_source("bios.mac").parse(text);

    assert_eq!(schema.len(), 1);
    assert_eq!(schema.mappings()[0].name, "CPU_K2526");
}

#[rstest]
#[case::empty_source("source= cpu=k2526")]
#[case::no_tokens("source=bios.mac")]
#[case::no_equals("source=bios.mac cpu")]
#[case::empty_value("source=bios.mac cpu=")]
fn test_malformed_annotation_is_skipped(#[case] annotation: &str) {
    let text = format!(
        "config BROKEN\n    bool \"Broken\"\n    help\n      {annotation}\n\nconfig GOOD\n    bool \"Good\"\n    help\n      source=bios.mac cpu=k2521\n"
    );
    let schema = Schema::parse(&text);

    assert!(schema.get("BROKEN").is_none());
    assert!(schema.get("GOOD").is_some());
    assert!(!schema.diagnostics().is_empty());
}

#[test]
fn test_mixed_toggle_and_typed_targets_rejected() {
    let text = "config MIXED\n    help\n      source=bios.mac a=1 b=string\n";
    let schema = Schema::parse(text);

    assert!(schema.is_empty());
    assert_eq!(schema.diagnostics().len(), 1);
    assert!(schema.diagnostics()[0].reason.contains("mixes"));
}

#[test]
fn test_duplicate_parameter_keeps_first() {
    let text = "config A\n help\n  source=bios.mac x=1\nconfig A\n help\n  source=bios.mac x=2\n";
    let schema = Schema::parse(text);

    assert_eq!(schema.len(), 1);
    assert_eq!(schema.mappings()[0].targets[0].kind.literal(), Some("1"));
}

#[test]
fn test_annotation_outside_help_is_ignored() {
    let text = "config A\n    bool \"A\"\n    source=bios.mac x=1\n";
    assert!(Schema::parse(text).is_empty());
}

#[test]
fn test_help_text_ends_at_dedent() {
    let text = r#"
config A
	bool "A"
	help
	  First paragraph.
	  source=bios.mac a=1
if FEATURE
config B
	bool "B"
endif
"#;
    let schema = Schema::parse(text);
    assert_eq!(schema.len(), 1);
    assert_eq!(schema.mappings()[0].name, "A");
}

#[test]
fn test_load_from_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("Kconfig.system");
    std::fs::write(&path, KCONFIG).unwrap();

    let schema = Schema::load(&NormalizedPath::new(&path), Some("bios.mac")).unwrap();
    assert_eq!(schema.len(), 4);
}
