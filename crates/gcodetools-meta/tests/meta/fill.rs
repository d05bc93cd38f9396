use crate::programs::{load, parse, CURA, PRUSA};
use gcodetools_core::Config;
use gcodetools_meta::{DialectTable, MetaFiller};
use gcodetools_parser::MoveType;
use proptest::prelude::*;

#[test]
fn test_printing_object_comments() {
    let gcode = load("; printing object foo\nG1 X1 Y1 E1\n; stop printing object\nG1 X2 Y2\n");

    assert_eq!(gcode.len(), 4);
    let first = gcode[1].meta().object.unwrap();
    assert_eq!(gcode.object_name(first), Some("foo"));
    assert_eq!(gcode[3].meta().object, None);
}

#[test]
fn test_prusa_program() {
    let gcode = load(PRUSA);
    assert_eq!(gcode.len(), 20);
    assert_eq!(gcode.objects(), ["cube_id_0_copy_0".to_string()]);

    for block in gcode.iter().take(5) {
        assert_eq!(block.meta().move_type, Some(MoveType::PrintStart));
    }
    assert_eq!(gcode[5].meta().move_type, Some(MoveType::Skirt));
    assert_eq!(gcode[6].meta().layer, 1);

    // the object starts on its first ;WIDTH: line, not at the marker
    assert_eq!(gcode[7].meta().object, None);
    assert_eq!(gcode[8].meta().object, None);
    assert_eq!(gcode[9].meta().object, Some(0));
    assert_eq!(gcode[12].meta().object, Some(0));
    assert_eq!(gcode[12].meta().move_type, Some(MoveType::ExternalPerimeter));
    assert_eq!(gcode[13].meta().object, None);

    assert_eq!(gcode[14].meta().layer, 2);
    assert_eq!(gcode[16].meta().move_type, Some(MoveType::SolidInfill));
    for block in gcode.iter().skip(17) {
        assert_eq!(block.meta().move_type, Some(MoveType::PrintEnd));
    }
}

#[test]
fn test_cura_program() {
    let gcode = load(CURA);
    assert_eq!(gcode.objects(), ["cube_stl".to_string()]);

    assert_eq!(gcode[0].meta().move_type, Some(MoveType::PrintStart));
    assert_eq!(gcode[2].meta().move_type, None);

    assert_eq!(gcode[3].meta().layer, 0);
    assert_eq!(gcode[4].meta().layer, 1);
    assert_eq!(gcode[9].meta().move_type, Some(MoveType::ExternalPerimeter));
    assert_eq!(gcode[9].meta().object, Some(0));
    assert_eq!(gcode[11].meta().object, None);

    assert_eq!(gcode[15].meta().layer, 2);
    assert_eq!(gcode[15].meta().object, Some(0));
    assert_eq!(gcode[15].meta().move_type, Some(MoveType::SparseInfill));
    assert_eq!(gcode[16].meta().move_type, Some(MoveType::PrintEnd));
    assert_eq!(gcode[17].meta().move_type, Some(MoveType::PrintEnd));
}

#[test]
fn test_no_markers_leaves_defaults() {
    let gcode = load("G1 X1\nG1 X2 E1\n; just a note\n");
    for block in &gcode {
        assert_eq!(block.meta().object, None);
        assert_eq!(block.meta().move_type, None);
        assert_eq!(block.meta().layer, 0);
    }
    assert!(gcode.objects().is_empty());
}

#[test]
fn test_objects_registered_in_encounter_order() {
    let gcode = load(
        "M486 S1\nG1 X1 E1\nM486 S-1\nM486 S0\nG1 X2 E1\nM486 S-1\nM486 S1\nG1 X3 E1\n",
    );
    assert_eq!(gcode.objects(), ["1".to_string(), "0".to_string()]);
    assert_eq!(gcode[1].meta().object, Some(0));
    assert_eq!(gcode[2].meta().object, None);
    assert_eq!(gcode[4].meta().object, Some(1));
    assert_eq!(gcode[7].meta().object, Some(0));
}

#[test]
fn test_inline_comment_not_in_object_name() {
    let gcode = load("EXCLUDE_OBJECT_START NAME=cube ; begin\nG1 X1 E1\nEXCLUDE_OBJECT_END\n");
    assert_eq!(gcode.objects(), ["cube".to_string()]);
    assert_eq!(gcode[1].meta().object, Some(0));
}

#[test]
fn test_refill_is_stable() {
    let config = Config::default();
    let mut gcode = load(PRUSA);
    let before = gcode.clone();
    MetaFiller::new(&config).fill(&mut gcode).unwrap();
    assert_eq!(gcode, before);
}

#[test]
fn test_custom_dialect() {
    let table = DialectTable::from_toml_str(
        r#"
[[object_start]]
pattern = "^; BEGIN PART "

[[object_end]]
pattern = "^; END PART"

[[layer_change]]
pattern = "^; NEXT LAYER"
"#,
    )
    .unwrap();
    let dialect = table.compile().unwrap();
    let config = Config::default();

    let mut gcode = parse("; NEXT LAYER\n; BEGIN PART gear\nG1 X1 E1\n; END PART\n; NEXT LAYER\nG1 X2\n");
    MetaFiller::with_dialect(&config, &dialect).fill(&mut gcode).unwrap();

    assert_eq!(gcode.objects(), ["gear".to_string()]);
    assert_eq!(gcode[2].meta().object, Some(0));
    assert_eq!(gcode[2].meta().layer, 1);
    assert_eq!(gcode[3].meta().object, None);
    assert_eq!(gcode[5].meta().layer, 2);
    // no print start rows in this table
    assert_eq!(gcode[0].meta().move_type, None);
}

#[test]
fn test_progress_reports_every_block() {
    let config = Config::default();
    let mut gcode = parse(PRUSA);
    let mut calls = Vec::new();
    MetaFiller::new(&config)
        .fill_with_progress(&mut gcode, |current, total| calls.push((current, total)))
        .unwrap();
    assert_eq!(calls.len(), 20);
    assert_eq!(calls.last(), Some(&(20, 20)));
}

fn program_line() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(";LAYER_CHANGE".to_string()),
        Just(";TYPE:Perimeter".to_string()),
        Just(";TYPE:Solid infill".to_string()),
        Just("; stop printing object".to_string()),
        Just("EXCLUDE_OBJECT_END".to_string()),
        Just(";WIDTH:0.4".to_string()),
        "[a-c]".prop_map(|name| format!("; printing object {}", name)),
        "[a-c]".prop_map(|name| format!("EXCLUDE_OBJECT_START NAME={}", name)),
        (0i32..50, 0i32..50).prop_map(|(x, y)| format!("G1 X{} Y{} E0.1", x, y)),
        (0i32..50).prop_map(|x| format!("G0 X{}", x)),
    ]
}

proptest! {
    #[test]
    fn metadata_is_monotonic_and_registered(lines in prop::collection::vec(program_line(), 1..80)) {
        let gcode = load(&lines.join("\n"));
        let mut layer = 0;
        for block in &gcode {
            let meta = block.meta();
            prop_assert!(meta.layer >= layer);
            layer = meta.layer;
            if let Some(object) = meta.object {
                prop_assert!(object < gcode.objects().len());
            }
        }
    }
}
