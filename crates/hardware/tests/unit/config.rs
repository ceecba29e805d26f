//! Configuration tests.
//!
//! Verifies JSON defaults, file loading, and layout/opcode validation.

use std::io::Write;

use expctl_core::common::ConfigError;
use expctl_core::config::{Config, FieldLayout, FieldRange, StepPolicy};
use pretty_assertions::assert_eq;
use rstest::rstest;

#[test]
fn empty_document_is_default() {
    let config = Config::from_json_str("{}").unwrap();
    assert_eq!(config.protocol, Config::default().protocol);
    assert_eq!(config.controller.step_policy, StepPolicy::Ignore);
    assert_eq!(config.controller.rx_fifo_depth, 16);
    assert_eq!(config.controller.tx_fifo_depth, 16);
    assert_eq!(config.experiment.registers, 256);
    assert_eq!(config.general.max_cycles, 1_000_000);
}

#[test]
fn default_layout_matches_documented_fields() {
    let layout = FieldLayout::default();
    assert_eq!(layout.word_width, 64);
    assert_eq!(layout.opcode, FieldRange::new(63, 56));
    assert_eq!(layout.addr, FieldRange::new(55, 36));
    assert_eq!(layout.data, FieldRange::new(35, 20));
    assert_eq!(layout.value, FieldRange::new(19, 0));
    assert!(layout.validate().is_ok());
}

#[test]
fn default_config_is_valid() {
    assert!(Config::default().validate().is_ok());
}

#[test]
fn partial_layout_keeps_other_defaults() {
    let json = r#"{ "protocol": { "layout": { "word_width": 32,
        "opcode": { "high": 31, "low": 24 },
        "addr":   { "high": 23, "low": 16 },
        "data":   { "high": 15, "low": 8 },
        "value":  { "high": 7, "low": 0 } } } }"#;
    let config = Config::from_json_str(json).unwrap();
    assert_eq!(config.protocol.layout.word_width, 32);
    assert_eq!(config.protocol.layout.value.mask(), 0xFF);
    assert_eq!(config.protocol.commands.step, 3);
}

#[test]
fn step_policy_parses_by_name() {
    let config = Config::from_json_str(r#"{ "controller": { "step_policy": "Restart" } }"#).unwrap();
    assert_eq!(config.controller.step_policy, StepPolicy::Restart);
    assert!(matches!(
        Config::from_json_str(r#"{ "controller": { "step_policy": "Sometimes" } }"#),
        Err(ConfigError::Json(_))
    ));
}

#[test]
fn field_range_width_and_mask() {
    let range = FieldRange::new(15, 8);
    assert_eq!(range.width(), 8);
    assert_eq!(range.mask(), 0xFF);
    assert_eq!(FieldRange::new(63, 0).mask(), u64::MAX);
    assert!(range.overlaps(&FieldRange::new(8, 0)));
    assert!(!range.overlaps(&FieldRange::new(7, 0)));
}

#[test]
fn overlapping_fields_rejected() {
    let layout = FieldLayout {
        data: FieldRange::new(41, 20),
        ..FieldLayout::default()
    };
    assert!(matches!(
        layout.validate(),
        Err(ConfigError::Overlap {
            first: "addr",
            second: "data"
        })
    ));
}

#[test]
fn inverted_range_rejected() {
    let layout = FieldLayout {
        value: FieldRange::new(0, 19),
        ..FieldLayout::default()
    };
    assert!(matches!(
        layout.validate(),
        Err(ConfigError::InvalidRange { field: "value", .. })
    ));
}

#[rstest]
#[case(0)]
#[case(65)]
fn word_width_bounds(#[case] width: u32) {
    let layout = FieldLayout {
        word_width: width,
        ..FieldLayout::default()
    };
    assert!(matches!(layout.validate(), Err(ConfigError::WordWidth(w)) if w == width));
}

#[test]
fn field_outside_word_rejected() {
    let layout = FieldLayout {
        word_width: 48,
        ..FieldLayout::default()
    };
    assert!(matches!(
        layout.validate(),
        Err(ConfigError::FieldOutsideWord { field: "opcode", .. })
    ));
}

#[test]
fn addr_narrower_than_value_rejected() {
    let layout = FieldLayout {
        addr: FieldRange::new(55, 40),
        ..FieldLayout::default()
    };
    assert!(matches!(
        layout.validate(),
        Err(ConfigError::AddrNarrowerThanValue {
            addr_width: 16,
            value_width: 20
        })
    ));
}

#[test]
fn opcode_wider_than_field_rejected() {
    let json = r#"{ "protocol": { "commands": { "status": 256 } } }"#;
    assert!(matches!(
        Config::from_json_str(json),
        Err(ConfigError::OpcodeTooWide {
            table: "command",
            name: "status",
            ..
        })
    ));
}

#[test]
fn duplicate_response_code_rejected() {
    let json = r#"{ "protocol": { "responses": { "unrecognized": 3 } } }"#;
    assert!(matches!(
        Config::from_json_str(json),
        Err(ConfigError::DuplicateOpcode {
            table: "response",
            first: "step",
            second: "unrecognized",
            code: 3
        })
    ));
}

#[rstest]
#[case(r#"{ "controller": { "rx_fifo_depth": 0 } }"#, "rx")]
#[case(r#"{ "controller": { "tx_fifo_depth": 0 } }"#, "tx")]
fn zero_depth_fifo_rejected(#[case] json: &str, #[case] which: &str) {
    assert!(matches!(Config::from_json_str(json), Err(ConfigError::ZeroDepth(w)) if w == which));
}

#[test]
fn experiment_shape_validated() {
    assert!(matches!(
        Config::from_json_str(r#"{ "experiment": { "registers": 0 } }"#),
        Err(ConfigError::NoRegisters)
    ));
    assert!(matches!(
        Config::from_json_str(r#"{ "experiment": { "registers": 4, "counter_register": 4 } }"#),
        Err(ConfigError::CounterOutOfRange {
            register: 4,
            registers: 4
        })
    ));
}

#[test]
fn from_file_loads_and_validates() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(br#"{ "general": { "max_cycles": 500, "trace": true } }"#)
        .unwrap();
    let config = Config::from_file(file.path()).unwrap();
    assert_eq!(config.general.max_cycles, 500);
    assert!(config.general.trace);
}

#[test]
fn from_file_reports_missing_path() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.json");
    match Config::from_file(&missing) {
        Err(ConfigError::Io { path, .. }) => assert_eq!(path, missing),
        other => panic!("expected Io error, got {other:?}"),
    }
}

#[test]
fn error_messages_name_the_problem() {
    let err = ConfigError::Overlap {
        first: "addr",
        second: "data",
    };
    assert_eq!(err.to_string(), "fields `addr` and `data` overlap");
}
