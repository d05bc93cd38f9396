use crate::programs::{load, parse, CURA, PRUSA};
use gcodetools_core::Config;
use gcodetools_meta::{
    add_layer_tags, add_move_type_tags, fill_meta, read_config, slicer_info, split, trim, LAYER_TAG,
};
use gcodetools_parser::{MoveType, Parser, Writer};

#[test]
fn test_slicer_info() {
    let info = slicer_info(&parse(PRUSA)).unwrap();
    assert_eq!(info.name, "PrusaSlicer");
    assert_eq!(info.version, "2.6.1+linux");

    let info = slicer_info(&parse(CURA)).unwrap();
    assert_eq!(info.name, "Cura_SteamEngine");
    assert_eq!(info.version, "5.4.0");

    assert!(slicer_info(&parse("G1 X1\n")).is_none());
}

#[test]
fn test_read_prusa_config() {
    let gcode = parse(
        "G1 X1\n; prusaslicer_config = begin\n; layer_height = 0.2\n; nozzle_diameter = 0.4\n; prusaslicer_config = end\n",
    );
    let settings = read_config(&gcode, &Config::default()).unwrap();
    assert_eq!(settings.len(), 2);
    assert_eq!(settings["layer_height"], "0.2");
    assert_eq!(settings["nozzle_diameter"], "0.4");
}

#[test]
fn test_read_simplify3d_config() {
    let gcode = parse("; Settings Summary\n;   extruderDiameter,0.4\n;   layerHeight,0.2\nG90\nG1 X1\n");
    let settings = read_config(&gcode, &Config::default()).unwrap();
    assert_eq!(settings.len(), 2);
    assert_eq!(settings["extruderDiameter"], "0.4");
    assert_eq!(settings["layerHeight"], "0.2");
}

#[test]
fn test_read_config_absent() {
    assert!(read_config(&parse(CURA), &Config::default()).is_none());
}

#[test]
fn test_split() {
    let gcode = load(PRUSA);
    let parts = split(&gcode);

    assert_eq!(parts.start.len(), 5);
    assert_eq!(parts.end.len(), 3);
    assert_eq!(parts.body.len(), 12);
    assert_eq!(parts.objects.len(), 1);
    assert_eq!(parts.objects[0].len(), 4);
    assert_eq!(parts.unassigned.len(), 16);

    assert!(parts.end.iter().all(|b| b.meta().move_type == Some(MoveType::PrintEnd)));
    assert_eq!(parts.objects[0].objects(), gcode.objects());
}

#[test]
fn test_trim_keeps_moves_only() {
    let gcode = parse("G1 X1\n; note\nM104 S200\nG1 X2\nG1 X2\nG1 X2 E1\nM107\n");
    let trimmed = trim(&gcode);

    assert_eq!(trimmed.len(), 3);
    assert!(trimmed.iter().all(|b| b.command().is_empty() && !b.emit_command()));
    assert_eq!(trimmed[0].position().x, Some(1.0));
    assert_eq!(trimmed[1].position().x, Some(2.0));
    assert_eq!(trimmed[2].position().e, Some(1.0));
    // temperatures stay in the block data
    assert_eq!(trimmed[2].data().e_temp, Some(200.0));
}

#[test]
fn test_add_move_type_tags() {
    let gcode = load(PRUSA);
    let tagged = add_move_type_tags(&gcode);

    // existing canonical tags are not duplicated; only the start is new
    assert_eq!(tagged.len(), gcode.len() + 1);
    assert_eq!(tagged[0].command(), ";TYPE:Custom");
    assert_eq!(tagged[0].meta().move_type, Some(MoveType::PrintStart));
    assert_eq!(tagged[1], gcode[0]);
}

#[test]
fn test_add_layer_tags_survive_rewrite() {
    let config = Config::default();
    let gcode = load(CURA);
    let tagged = add_layer_tags(&gcode);

    let tags: Vec<usize> = tagged
        .iter()
        .enumerate()
        .filter(|(_, b)| b.command() == LAYER_TAG)
        .map(|(i, _)| i)
        .collect();
    assert_eq!(tags.len(), 2);
    assert_eq!(tagged[tags[0] + 1].command(), ";LAYER:0");
    assert_eq!(tagged[tags[1]].meta().layer, 2);

    let text = Writer::new(&config).write_str(&tagged);
    assert_eq!(text.matches(LAYER_TAG).count(), 2);

    // the reparsed program counts each layer once per tag
    let mut reparsed = Parser::new(&config).parse_str(&text).unwrap();
    fill_meta(&mut reparsed, &config).unwrap();
    assert_eq!(reparsed.last().unwrap().meta().layer, 4);
}
