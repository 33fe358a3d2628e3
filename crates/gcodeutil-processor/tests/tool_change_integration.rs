use gcodeutil_processor::{output_path_for, rewrite_file, transform_lines, InsertConfig};
use tempfile::TempDir;

const TWO_TOOL_PROGRAM: &str = "\
%
O1001 (BRACKET)
N10 G21 G90 G17
N20 M6 T1 (6MM END MILL)
N30 S12000 M3
N40 M8
N50 G4 P2
N60 G0 X10 Y10
N70 G43 Z5 H1
N80 G1 Z-2 F200
N90 G1 X40 F600
N100 G0 Z25
N110 M9
N120 M6 T2 (3MM DRILL)
N130 S8000 M3
N140 G0 Z25
N150 G0 X20 Y5
N160 G81 Z-6 R2 F150
N170 G80
N180 M30
%";

#[test]
fn test_two_tool_program() {
    let config = InsertConfig::new(["M9", "G28 G91 Z0"], ["M8", "G4 P1"]);
    let output = transform_lines(&config, TWO_TOOL_PROGRAM.lines());

    let expected = "\
%
O1001 (BRACKET)
N10 G21 G90 G17
N18 M9
N19 G28 G91 Z0
N20 M6 T1 (6MM END MILL)
N30 S12000 M3
N60 G0 X10 Y10
N50 G4 P2
N61 M8
N62 G4 P1
N70 G43 Z5 H1
N80 G1 Z-2 F200
N90 G1 X40 F600
N100 G0 Z25
N110 M9
N118 M9
N119 G28 G91 Z0
N120 M6 T2 (3MM DRILL)
N130 S8000 M3
N140 G0 Z25
N150 G0 X20 Y5
N151 M8
N152 G4 P1
N160 G81 Z-6 R2 F150
N170 G80
N180 M30
%";

    assert_eq!(output.lines.join("\n"), expected);
    assert_eq!(output.stats.tool_changes, 2);
    assert_eq!(output.stats.insertions, 2);
    assert_eq!(output.stats.coolant_suppressed, 1);
    assert_eq!(output.stats.dwells_requeued, 1);
    assert_eq!(output.stats.unclosed_windows, 0);
}

#[test]
fn test_subroutine_call_opens_window() {
    let config = InsertConfig::new(Vec::<String>::new(), ["M8"]);
    let output = transform_lines(&config, ["M98 P2000", "G0 X0 Y0", "M99"]);
    assert_eq!(output.lines, vec!["M98 P2000", "G0 X0 Y0", "M8", "M99"]);
}

#[test]
fn test_override_replaces_before_list_only() {
    let config = InsertConfig::default().with_before(InsertConfig::parse_list("M5,M9"));
    let output = transform_lines(&config, ["M6 T3", "G0 X1 Y2"]);
    assert_eq!(
        output.lines,
        vec!["M5", "M9", "M6 T3", "G0 X1 Y2", "M8", "G4 P1"]
    );
}

#[test]
fn test_rewrite_file_on_disk() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("bracket.nc");
    std::fs::write(&input, TWO_TOOL_PROGRAM).unwrap();

    let output = output_path_for(&input, "_modified");
    assert_eq!(output, dir.path().join("bracket_modified.nc"));

    let config = InsertConfig::new(Vec::<String>::new(), ["M8"]);
    let stats = rewrite_file(&input, &output, &config).unwrap();

    let written = std::fs::read_to_string(&output).unwrap();
    assert!(written.ends_with("N180 M30\n%\n"));
    assert!(written.contains("N150 G0 X20 Y5\nN151 M8\n"));
    assert!(!written.contains("N40 M8"));
    assert_eq!(stats.lines_written, written.lines().count());
}
