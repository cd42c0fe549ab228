//! Canonical fixture texts.
//!
//! The schema and artifact describe one system variant with:
//!
//! - a three-member CPU board group sharing the `cpu` symbol
//! - a four-member RAM-disk group over `oss`, `em256`, `mkd256`, `raf`
//!   and `rna`
//! - binary toggles with literal `1` (`fd80`) and `0` (`wait`)
//! - string, hex and integer parameters
//! - an annotation for another artifact and an unannotated option
//!
//! The artifact uses CRLF line endings throughout.

/// Default variant name used by the fixtures.
pub const VARIANT: &str = "bc_a5120";

/// Configuration key selecting [`VARIANT`] for `auto` variant detection.
pub const VARIANT_KEY: &str = "CONFIG_VARIANT_BC_A5120";

/// Schema for [`VARIANT`].
pub const SCHEMA: &str = r#"mainmenu "BIOS configuration"

menu "Hardware"

choice
	prompt "CPU board"
	default CPU_K2521

config CPU_K2521
	bool "K2521"
	help
	  CPU board K2521.
	  source=bios.mac cpu=k2521

config CPU_K2526
	bool "K2526"
	help
	  CPU board K2526.
	  source=bios.mac cpu=k2526

config CPU_C1715
	bool "C1715"
	help
	  source=bios.mac cpu=c1715

endchoice

choice
	prompt "RAM disk"

config RAMDISK_OSS
	bool "OSS"
	help
	  RAM disk on the OSS board.
	  source=bios.mac oss=1 em256=0
	  source=bios.mac mkd256=0 raf=0 rna=0

config RAMDISK_EM256
	bool "EM256"
	help
	  source=bios.mac oss=0 em256=1
	  source=bios.mac mkd256=0 raf=0 rna=0

config RAMDISK_MKD256
	bool "MKD256 with RAF"
	help
	  source=bios.mac oss=0 em256=0
	  source=bios.mac mkd256=1 raf=1 rna=0

config RAMDISK_RNA
	bool "RNA"
	help
	  source=bios.mac oss=0 em256=0
	  source=bios.mac mkd256=0 raf=0 rna=1

endchoice

config FLOPPY_80
	bool "80 track floppy drives"
	help
	  source=bios.mac fd80=1

config NO_WAIT
	bool "Skip wait states"
	help
	  source=bios.mac wait=0

endmenu

menu "System"

config SYSTEM_AUTOEXEC_STR
	string "Autoexec command"
	help
	  Command run after cold boot.
	  source=bios.mac kltbef=string

config SYSTEM_TOP_HEX
	hex "Top of memory"
	help
	  source=bios.mac top=hex

config SYSTEM_DRIVES_INT
	int "Number of drives"
	help
	  source=bios.mac drives=int

config BDOS_OPTION
	bool "BDOS option"
	help
	  source=bdos.mac opt=1

config PLAIN_OPTION
	bool "Option without artifact mapping"
	help
	  Only used by the build.

endmenu
"#;

/// Artifact for [`VARIANT`], with CRLF line endings.
pub const BIOS_MAC: &str = "\
;------------------------------------------\r
; BC A5120 BIOS configuration\r
;------------------------------------------\r
cpu\tequ\tk2521\t\t; CPU board\r
;\r
; RAM disk\r
oss\tequ\t1\r
em256\tequ\t0\r
mkd256\tequ\t0\r
raf\tequ\t0\r
rna\tequ\t0\r
;\r
fd80\tequ\t0\t\t; 80 track drives\r
wait\tequ\t1\r
@top:\tequ\t0F000h\t; top of memory\r
drives\tequ\t2\r
kltbef:\tdb\t'DIR',0\t; autoexec command\r
;\r
\tif\tcpu eq k2526\r
\tld\ta,1\r
\tendif\r
";

/// Configuration matching [`BIOS_MAC`] as extracted, plus keys the schema
/// does not know about.
pub const DOT_CONFIG: &str = "\
#
# Automatically generated file; DO NOT EDIT.
#
CONFIG_VARIANT_BC_A5120=y
CONFIG_CPU_K2521=y
# CONFIG_CPU_K2526 is not set
# CONFIG_CPU_C1715 is not set
CONFIG_RAMDISK_OSS=y
# CONFIG_RAMDISK_EM256 is not set
# CONFIG_RAMDISK_MKD256 is not set
# CONFIG_RAMDISK_RNA is not set
# CONFIG_FLOPPY_80 is not set
# CONFIG_NO_WAIT is not set
CONFIG_SYSTEM_AUTOEXEC_STR=\"DIR\"
CONFIG_SYSTEM_TOP_HEX=\"0F000h\"
CONFIG_SYSTEM_DRIVES_INT=\"2\"
CONFIG_BUILD_JOBS=4
";

/// Parameter names of the RAM-disk group in schema order.
pub const RAMDISK_MEMBERS: [&str; 4] = [
    "RAMDISK_OSS",
    "RAMDISK_EM256",
    "RAMDISK_MKD256",
    "RAMDISK_RNA",
];

/// Parameter names of the CPU group in schema order.
pub const CPU_MEMBERS: [&str; 3] = ["CPU_K2521", "CPU_K2526", "CPU_C1715"];
