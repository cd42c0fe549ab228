//! Tests for the two-pass artifact patcher

use cfgsync_content::{ArtifactDocument, ConfigValue};
use cfgsync_core::{ArtifactPatcher, ArtifactReader, ConfigFile, Error};
use cfgsync_schema::{Schema, SchemaParser};
use cfgsync_test_utils::fixtures;
use pretty_assertions::assert_eq;
use rstest::rstest;

fn fixture_schema() -> Schema {
    SchemaParser::for_source("bios.mac").parse(fixtures::SCHEMA)
}

fn patch(schema: &Schema, artifact: &str, config: &str) -> cfgsync_core::Result<String> {
    let mut doc = ArtifactDocument::parse(artifact);
    ArtifactPatcher::new(schema, "CONFIG_").apply(&mut doc, &ConfigFile::parse(config))?;
    Ok(doc.render())
}

/// Value of `symbol` in rendered artifact text.
fn value_of(artifact: &str, symbol: &str) -> String {
    ArtifactDocument::parse(artifact)
        .read_value(symbol)
        .map(|v| v.text)
        .unwrap_or_default()
}

#[test]
fn test_cpu_scenario() {
    let schema = Schema::parse("config CPU_K2526\n\tbool \"K2526\"\n\thelp\n\t  source=bios.mac cpu=k2526\n");

    let extraction = ArtifactReader::new(&schema, "CONFIG_").read(&ArtifactDocument::parse("cpu equ k2526\n"));
    let mut config = ConfigFile::default();
    config.merge(extraction.values);
    assert_eq!(config.render(), "CONFIG_CPU_K2526=y\n");

    let patched = patch(&schema, "cpu equ k2526\n", "# CONFIG_CPU_K2526 is not set\n").unwrap();
    assert_eq!(patched, "cpu equ 0\n");
}

#[rstest]
#[case::binary_one("fd80 equ 1\n", "# CONFIG_FLOPPY_80 is not set\n", "fd80 equ 0\n")]
#[case::binary_zero("wait equ 0\n", "# CONFIG_NO_WAIT is not set\n", "wait equ 1\n")]
#[case::named_literal("cpu equ k2526\n", "# CONFIG_CPU_K2526 is not set\n", "cpu equ 0\n")]
#[case::select_zero("wait equ 1\n", "CONFIG_NO_WAIT=y\n", "wait equ 0\n")]
fn test_toggle_inversion(#[case] artifact: &str, #[case] config: &str, #[case] expected: &str) {
    assert_eq!(patch(&fixture_schema(), artifact, config).unwrap(), expected);
}

const RAMDISK_BLOCKS: [&str; 4] = [
    "config RAMDISK_OSS\n help\n  source=bios.mac oss=1 em256=0\n  source=bios.mac mkd256=0 raf=0 rna=0\n",
    "config RAMDISK_EM256\n help\n  source=bios.mac oss=0 em256=1\n  source=bios.mac mkd256=0 raf=0 rna=0\n",
    "config RAMDISK_MKD256\n help\n  source=bios.mac oss=0 em256=0\n  source=bios.mac mkd256=1 raf=1 rna=0\n",
    "config RAMDISK_RNA\n help\n  source=bios.mac oss=0 em256=0\n  source=bios.mac mkd256=0 raf=0 rna=1\n",
];

#[rstest]
#[case::schema_order([0, 1, 2, 3])]
#[case::reversed([3, 2, 1, 0])]
#[case::selected_first([2, 0, 3, 1])]
fn test_ramdisk_group_select_member_three(#[case] order: [usize; 4]) {
    let schema = Schema::parse(&order.iter().map(|i| RAMDISK_BLOCKS[*i]).collect::<String>());
    let artifact = "oss equ 1\nem256 equ 0\nmkd256 equ 0\nraf equ 0\nrna equ 0\n";
    let config = "\
# CONFIG_RAMDISK_OSS is not set
# CONFIG_RAMDISK_EM256 is not set
CONFIG_RAMDISK_MKD256=y
# CONFIG_RAMDISK_RNA is not set
";

    let patched = patch(&schema, artifact, config).unwrap();
    assert_eq!(patched, "oss equ 0\nem256 equ 0\nmkd256 equ 1\nraf equ 1\nrna equ 0\n");

    let extraction = ArtifactReader::new(&schema, "CONFIG_").read(&ArtifactDocument::parse(&patched));
    for member in fixtures::RAMDISK_MEMBERS {
        let expected = if member == "RAMDISK_MKD256" {
            ConfigValue::Selected
        } else {
            ConfigValue::Unselected
        };
        assert_eq!(extraction.get(&format!("CONFIG_{member}")), Some(&expected), "{member}");
    }
}

#[rstest]
#[case("CPU_K2521")]
#[case("CPU_K2526")]
#[case("CPU_C1715")]
fn test_group_exclusivity(#[case] selected: &str) {
    let schema = fixture_schema();
    let config: String = fixtures::CPU_MEMBERS
        .iter()
        .map(|m| {
            let value = if *m == selected { ConfigValue::Selected } else { ConfigValue::Unselected };
            format!("{}\n", value.render(&format!("CONFIG_{m}")))
        })
        .collect();

    let patched = patch(&schema, fixtures::BIOS_MAC, &config).unwrap();
    let extraction = ArtifactReader::new(&schema, "CONFIG_").read(&ArtifactDocument::parse(&patched));

    for member in fixtures::CPU_MEMBERS {
        let state = extraction.get(&format!("CONFIG_{member}")).unwrap();
        assert_eq!(state.is_selected(), member == selected, "{member}");
    }
}

#[test]
fn test_unmanaged_lines_pass_through() {
    let schema = fixture_schema();
    let config = "CONFIG_CPU_C1715=y\n# CONFIG_CPU_K2521 is not set\nCONFIG_FLOPPY_80=y\nCONFIG_SYSTEM_AUTOEXEC_STR=\"Hello\"\n";

    let mut doc = ArtifactDocument::parse(fixtures::BIOS_MAC);
    let outcome = ArtifactPatcher::new(&schema, "CONFIG_")
        .apply(&mut doc, &ConfigFile::parse(config))
        .unwrap();
    let patched = doc.render();

    let changed: Vec<usize> = outcome.changes.iter().map(|c| c.line).collect();
    assert_eq!(changed, vec![4, 13, 17]);

    let before: Vec<&str> = fixtures::BIOS_MAC.split_inclusive('\n').collect();
    let after: Vec<&str> = patched.split_inclusive('\n').collect();
    assert_eq!(before.len(), after.len());
    for (idx, (b, a)) in before.iter().zip(&after).enumerate() {
        if !changed.contains(&(idx + 1)) {
            assert_eq!(b, a, "line {}", idx + 1);
        }
    }
    assert!(after.iter().all(|l| l.ends_with("\r\n")));
}

#[test]
fn test_conflicting_selection_is_rejected() {
    let schema = fixture_schema();
    let mut doc = ArtifactDocument::parse(fixtures::BIOS_MAC);
    let config = ConfigFile::parse("CONFIG_CPU_K2521=y\nCONFIG_CPU_K2526=y\n");

    let err = ArtifactPatcher::new(&schema, "CONFIG_")
        .apply(&mut doc, &config)
        .unwrap_err();

    match err {
        Error::ConflictingSelection { symbol, members } => {
            assert_eq!(symbol, "cpu");
            assert_eq!(members, vec!["CPU_K2521", "CPU_K2526"]);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!doc.is_modified());
}

#[test]
fn test_literals_differing_in_case_do_not_conflict() {
    let schema = Schema::parse(
        "config A\n help\n  source=bios.mac cpu=K2526\nconfig B\n help\n  source=bios.mac cpu=k2526\n",
    );
    assert!(schema.exclusive_groups().is_empty());

    let extraction = ArtifactReader::new(&schema, "CONFIG_").read(&ArtifactDocument::parse("cpu equ k2526\n"));
    assert_eq!(extraction.get("CONFIG_A"), Some(&ConfigValue::Selected));
    assert_eq!(extraction.get("CONFIG_B"), Some(&ConfigValue::Selected));

    let patched = patch(&schema, "cpu equ 0\n", "CONFIG_A=y\nCONFIG_B=y\n").unwrap();
    assert!(patched.eq_ignore_ascii_case("cpu equ k2526\n"));
}

#[test]
fn test_absent_parameters_are_untouched() {
    let schema = fixture_schema();
    let patched = patch(&schema, fixtures::BIOS_MAC, "CONFIG_CPU_K2526=y\n").unwrap();

    assert_eq!(value_of(&patched, "cpu"), "k2526");
    assert_eq!(value_of(&patched, "oss"), "1");
    assert_eq!(value_of(&patched, "wait"), "1");
    assert_eq!(value_of(&patched, "kltbef"), "DIR");
}

#[test]
fn test_state_not_fitting_kind_is_ignored() {
    let schema = fixture_schema();
    let mut doc = ArtifactDocument::parse(fixtures::BIOS_MAC);
    let config = ConfigFile::parse("CONFIG_CPU_K2526=\"k2526\"\nCONFIG_SYSTEM_TOP_HEX=y\n");

    let outcome = ArtifactPatcher::new(&schema, "CONFIG_").apply(&mut doc, &config).unwrap();

    let ignored: Vec<&str> = outcome.ignored.iter().map(|i| i.parameter.as_str()).collect();
    assert_eq!(ignored, vec!["CPU_K2526", "SYSTEM_TOP_HEX"]);
    assert!(outcome.changes.is_empty());
}

#[test]
fn test_typed_values_are_written_unquoted() {
    let schema = fixture_schema();
    let config = "CONFIG_SYSTEM_TOP_HEX=\"0E000h\"\nCONFIG_SYSTEM_DRIVES_INT=4\nCONFIG_SYSTEM_AUTOEXEC_STR=\"say \\\"hi\\\"\"\n";
    let patched = patch(&schema, fixtures::BIOS_MAC, config).unwrap();

    assert!(patched.contains("@top:\tequ\t0E000h\t; top of memory\r\n"));
    assert!(patched.contains("drives\tequ\t4\r\n"));
    assert!(patched.contains("kltbef:\tdb\t'say \"hi\"',0\t; autoexec command\r\n"));
}

#[test]
fn test_cleared_typed_values_use_sentinels() {
    let schema = fixture_schema();
    let config = "# CONFIG_SYSTEM_TOP_HEX is not set\n# CONFIG_SYSTEM_AUTOEXEC_STR is not set\n";
    let patched = patch(&schema, fixtures::BIOS_MAC, config).unwrap();

    assert_eq!(value_of(&patched, "top"), "0");
    assert!(patched.contains("kltbef:\tdb\t'',0"));
}

#[test]
fn test_unmatched_symbols_are_reported() {
    let schema = fixture_schema();
    let mut doc = ArtifactDocument::parse("cpu equ k2521\n");
    let outcome = ArtifactPatcher::new(&schema, "CONFIG_")
        .apply(&mut doc, &ConfigFile::parse("CONFIG_FLOPPY_80=y\nCONFIG_CPU_K2526=y\n# CONFIG_CPU_K2521 is not set\n"))
        .unwrap();

    assert_eq!(outcome.unmatched.len(), 1);
    assert_eq!(outcome.unmatched[0].symbol, "fd80");
    assert_eq!(doc.render(), "cpu equ k2526\n");
}
