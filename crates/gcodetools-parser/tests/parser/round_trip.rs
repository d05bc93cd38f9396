use gcodetools_core::Config;
use gcodetools_parser::{Gcode, Parser, Writer};
use proptest::prelude::*;

const TOLERANCE: f64 = 1e-4;

fn parse(text: &str, config: &Config) -> Gcode {
    Parser::new(config).parse_str(text).unwrap()
}

/// Resolved XYZF per block, starting at the origin, with consecutive repeats removed
fn trajectory(gcode: &Gcode) -> Vec<[f64; 4]> {
    let mut out: Vec<[f64; 4]> = vec![[0.0, 0.0, 0.0, Config::default().default_speed]];
    for block in gcode {
        let p = block.position();
        let point = [
            p.x.unwrap_or(f64::NAN),
            p.y.unwrap_or(f64::NAN),
            p.z.unwrap_or(f64::NAN),
            p.f.unwrap_or(f64::NAN),
        ];
        let repeat = out
            .last()
            .is_some_and(|last| last.iter().zip(point.iter()).all(|(a, b)| (a - b).abs() < TOLERANCE));
        if !repeat {
            out.push(point);
        }
    }
    out
}

fn total_extrusion(gcode: &Gcode) -> f64 {
    gcode.iter().filter_map(|b| b.position().e).sum()
}

fn coord() -> impl Strategy<Value = f64> {
    (-200_000i32..200_000).prop_map(|v| v as f64 / 1000.0)
}

fn line() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("G90".to_string()),
        Just("G91".to_string()),
        Just("M82".to_string()),
        Just("M83".to_string()),
        Just("G92 E0".to_string()),
        Just("G28".to_string()),
        Just("M107".to_string()),
        Just("; comment".to_string()),
        Just("M600".to_string()),
        prop_oneof![Just("G17"), Just("G18"), Just("G19")].prop_map(str::to_string),
        coord().prop_map(|v| format!("G92 X{}", v)),
        (0u32..256).prop_map(|s| format!("M106 S{}", s)),
        (150u32..260).prop_map(|t| format!("M104 S{}", t)),
        (150u32..260).prop_map(|t| format!("M109 S{}", t)),
        (40u32..110).prop_map(|t| format!("M140 S{}", t)),
        (0u32..4).prop_map(|t| format!("T{}", t)),
        (
            proptest::option::of(coord()),
            proptest::option::of(coord()),
            proptest::option::of(coord()),
            proptest::option::of(coord()),
            proptest::option::of((60u32..12_000).prop_map(f64::from)),
        )
            .prop_map(|(x, y, z, e, f)| {
                let mut words = vec!["G1".to_string()];
                for (letter, value) in [('X', x), ('Y', y), ('Z', z), ('E', e), ('F', f)] {
                    if let Some(v) = value {
                        words.push(format!("{}{}", letter, v));
                    }
                }
                words.join(" ")
            }),
    ]
}

fn program() -> impl Strategy<Value = String> {
    prop::collection::vec(line(), 1..60).prop_map(|lines| lines.join("\n"))
}

fn assert_same_trajectory(a: &Gcode, b: &Gcode) {
    let ta = trajectory(a);
    let tb = trajectory(b);
    assert_eq!(ta.len(), tb.len(), "{:?}\n{:?}", ta, tb);
    for (pa, pb) in ta.iter().zip(tb.iter()) {
        for (x, y) in pa.iter().zip(pb.iter()) {
            assert!((x - y).abs() < TOLERANCE, "{:?} != {:?}", pa, pb);
        }
    }
}

#[test]
fn test_arc_round_trip() {
    let config = Config::default().with_step(1.0);
    let first = parse("G1 X10 Y0 F1200\nG2 X0 Y-10 I-10 J0 E3\nG18\nG3 X5 Z5 I2.5 K2.5\n", &config);
    let text = Writer::new(&config).write_str(&first);
    let second = parse(&text, &config);
    assert_same_trajectory(&first, &second);
}

proptest! {
    #[test]
    fn positions_survive_round_trip(text in program()) {
        let config = Config::default();
        let first = parse(&text, &config);
        let written = Writer::new(&config).write_str(&first);
        let second = parse(&written, &config);

        assert_same_trajectory(&first, &second);
        prop_assert!((total_extrusion(&first) - total_extrusion(&second)).abs() < 1e-3);

        let last_a = first.last().map(|b| *b.data());
        let last_b = second.last().map(|b| *b.data());
        prop_assert_eq!(
            last_a.map(|d| (d.e_temp, d.bed_temp, d.fan, d.tool)),
            last_b.map(|d| (d.e_temp, d.bed_temp, d.fan, d.tool))
        );
    }

    #[test]
    fn writing_is_idempotent(text in program()) {
        let config = Config::default();
        let once = Writer::new(&config).write_str(&parse(&text, &config));
        let twice = Writer::new(&config).write_str(&parse(&once, &config));
        prop_assert_eq!(once, twice);
    }
}
