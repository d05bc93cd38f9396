use gcodetools_core::Config;
use gcodetools_meta::fill_meta;
use gcodetools_parser::{Gcode, Parser};

pub const PRUSA: &str = "\
; generated by PrusaSlicer 2.6.1+linux on 2024-03-01 at 10:00:00 UTC
M104 S200
G28
;LAYER_CHANGE
;Z:0.2
;TYPE:Skirt/Brim
G1 X10 Y10 E1
EXCLUDE_OBJECT_START NAME=cube_id_0_copy_0
G1 X11 Y11
;WIDTH:0.45
G1 X12 Y12 E0.5
;TYPE:External perimeter
G1 X13 Y13 E0.5
EXCLUDE_OBJECT_END NAME=cube_id_0_copy_0
;LAYER_CHANGE
;TYPE:Solid infill
G1 X14 E1
;TYPE:Custom
G1 Z10
; filament used [mm] = 10
";

pub const CURA: &str = "\
;FLAVOR:Marlin
;Generated with Cura_SteamEngine 5.4.0
M140 S60
;LAYER_COUNT:2
;LAYER:0
M107
;MESH:cube.stl
G0 X1 Y1
;TYPE:WALL-OUTER
G1 X2 Y2 E1
;MESH:NONMESH
G0 Z1
;LAYER:1
;TYPE:FILL
;MESH:cube.stl
G1 X3 E1
;TIME_ELAPSED:100
;End of Gcode
";

pub fn parse(text: &str) -> Gcode {
    let config = Config::default();
    Parser::new(&config).parse_str(text).unwrap()
}

pub fn load(text: &str) -> Gcode {
    let mut gcode = parse(text);
    fill_meta(&mut gcode, &Config::default()).unwrap();
    gcode
}
