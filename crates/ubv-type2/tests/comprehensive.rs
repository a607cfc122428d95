//! End-to-end Type 2 conversion tests over synthetic file pairs

use std::io::Cursor;

use ubv_type2::{convert, Type2Error};

/// Command file: 14-byte header, five-word records, the last record being
/// the END_FILE footer
fn cmd_file(declared: u16, records: &[[u16; 5]]) -> Vec<u8> {
    let mut data = Vec::new();
    for w in [0, declared, 0, 0, 0, 0, 0] {
        data.extend_from_slice(&w.to_be_bytes());
    }
    for rec in records {
        for w in rec {
            data.extend_from_slice(&w.to_be_bytes());
        }
    }
    data
}

/// Point file: 2×u16 header, then word-swapped 32-bit coordinates
fn point_file(points: &[(i32, i32)]) -> Vec<u8> {
    let mut data = vec![0, 0, 0, points.len() as u8];
    for &(x, y) in points {
        for v in [x, y] {
            let v = v as u32;
            data.extend_from_slice(&((v & 0xFFFF) as u16).to_be_bytes());
            data.extend_from_slice(&((v >> 16) as u16).to_be_bytes());
        }
    }
    data
}

fn run(cmd: &[u8], pts: &[u8]) -> (ubv_type2::Summary, String) {
    let mut out = Cursor::new(Vec::new());
    let summary = convert(cmd, pts, &mut out).unwrap();
    (summary, String::from_utf8(out.into_inner()).unwrap())
}

const END: [u16; 5] = [0x01, 0x34, 0, 0, 0];

#[test]
fn test_stroked_line_end_to_end() {
    let cmd = cmd_file(
        11,
        &[
            [0x05, 16, 32, 48, 0],
            [0x0A, 0x8000, 0x0001, 0, 0],
            [0x08, 1, 0, 0, 0],
            [0x09, 0, 0, 0, 0],
            [0x02, 1, 0, 0, 0],
            [0x03, 2, 0, 0, 0],
            [0x07, 0, 0, 0, 0],
            [0x07, 2, 0, 0, 0],
            [0x06, 9, 9, 9, 0],
            END,
        ],
    );
    let pts = point_file(&[(0, 0), (0x20000, 0), (0x20000, 0x20000)]);

    let (summary, svg) = run(&cmd, &pts);
    assert!(!summary.count_mismatch);
    assert_eq!(summary.warnings, 0);
    // the discovered viewport, one-unit floor folded with the geometry
    assert!(svg.starts_with("<svg viewBox=\"0 0 2 2\""));
    assert!(svg.contains(
        "<path d=\"M 0.000000 0.000000 L 2.000000 0.000000 L 2.000000 2.000000 \""
    ));
    assert!(svg.contains("fill=\"none\" stroke=\"rgb(16,32,48)\" stroke-width=\"1.500000\""));
    assert!(svg.ends_with("</svg>\n"));
}

#[test]
fn test_filled_shape_closes_before_ending() {
    let cmd = cmd_file(
        11,
        &[
            [0x06, 200, 100, 50, 0],
            [0x02, 1, 0, 0, 0],
            [0x03, 2, 0, 0, 0],
            [0x07, 1, 0, 0, 0],
            [0x07, 2, 0, 0, 0],
            [0x07, 4, 0, 0, 0],
            [0x07, 5, 0, 0, 0],
            [0x08, 0, 0, 0, 0],
            [0x09, 0, 0, 0, 0],
            END,
        ],
    );
    let pts = point_file(&[(0, 0), (0x10000, 0), (0x10000, 0x10000)]);

    let (_, svg) = run(&cmd, &pts);
    assert!(svg.contains("Z \" fill=\"rgb(200,100,50)\" stroke=\"none\""));
}

#[test]
fn test_cubic_segments() {
    let cmd = cmd_file(
        11,
        &[
            [0x02, 1, 0, 0, 0],
            [0x04, 3, 0, 0, 0],
            [0x07, 0, 0, 0, 0],
            [0x07, 2, 0, 0, 0],
            [0x08, 0, 0, 0, 0],
            [0x08, 0, 0, 0, 0],
            [0x09, 0, 0, 0, 0],
            [0x09, 0, 0, 0, 0],
            [0x05, 0, 0, 0, 0],
            END,
        ],
    );
    let pts = point_file(&[
        (0, 0),
        (0x10000, 0),
        (0x20000, 0x10000),
        (0x30000, 0x10000),
    ]);

    let (_, svg) = run(&cmd, &pts);
    assert!(svg.contains(
        "C 1.000000 0.000000, 2.000000 1.000000, 3.000000 1.000000 "
    ));
    assert!(svg.starts_with("<svg viewBox=\"0 0 3 1\""));
}

#[test]
fn test_short_command_loop_flags_a_mismatch() {
    let cmd = cmd_file(
        20,
        &[
            [0x02, 1, 0, 0, 0],
            [0x03, 1, 0, 0, 0],
            [0x07, 0, 0, 0, 0],
            [0x07, 2, 0, 0, 0],
            END,
        ],
    );
    let pts = point_file(&[(0, 0), (0x10000, 0x10000)]);

    let (summary, svg) = run(&cmd, &pts);
    assert!(summary.count_mismatch);
    assert!(summary.warnings >= 1);
    // the document still comes out whole
    assert!(svg.ends_with("</svg>\n"));
}

#[test]
fn test_unknown_opcode_is_skipped_with_warning() {
    let cmd = cmd_file(
        20,
        &[
            [0x0B, 7, 7, 7, 7],
            [0x02, 1, 0, 0, 0],
            [0x03, 1, 0, 0, 0],
            [0x07, 0, 0, 0, 0],
            [0x07, 2, 0, 0, 0],
            END,
        ],
    );
    let pts = point_file(&[(0, 0), (0x10000, 0x10000)]);

    let (summary, _) = run(&cmd, &pts);
    assert!(summary.warnings >= 1);
}

#[test]
fn test_unread_points_are_a_warning_not_an_error() {
    let cmd = cmd_file(
        20,
        &[
            [0x02, 1, 0, 0, 0],
            [0x03, 1, 0, 0, 0],
            [0x07, 0, 0, 0, 0],
            [0x07, 2, 0, 0, 0],
            END,
        ],
    );
    let pts = point_file(&[(0, 0), (0x10000, 0x10000), (0x50000, 0x50000)]);

    let (summary, svg) = run(&cmd, &pts);
    assert!(summary.warnings >= 1);
    // unread geometry never widens the viewport
    assert!(svg.starts_with("<svg viewBox=\"0 0 1 1\""));
}

#[test]
fn test_move_with_wrong_point_count_is_rejected() {
    let cmd = cmd_file(11, &[[0x02, 2, 0, 0, 0], END]);
    let pts = point_file(&[(0, 0), (1, 1)]);
    let err = convert(&cmd, &pts, Cursor::new(Vec::new())).unwrap_err();
    assert!(matches!(err, Type2Error::BadCommand { index: 1, .. }));
}

#[test]
fn test_cubic_count_must_be_a_multiple_of_three() {
    let cmd = cmd_file(
        11,
        &[[0x02, 1, 0, 0, 0], [0x04, 4, 0, 0, 0], END],
    );
    let pts = point_file(&[(0, 0); 5]);
    let err = convert(&cmd, &pts, Cursor::new(Vec::new())).unwrap_err();
    assert!(matches!(err, Type2Error::BadCommand { index: 2, .. }));
}

#[test]
fn test_exhausted_point_file_is_truncation() {
    let cmd = cmd_file(11, &[[0x02, 1, 0, 0, 0], END]);
    let pts = point_file(&[]);
    let err = convert(&cmd, &pts, Cursor::new(Vec::new())).unwrap_err();
    assert!(matches!(err, Type2Error::Truncated(_)));
}

#[test]
fn test_implausibly_small_command_count_rejects_the_file() {
    let cmd = cmd_file(5, &[END]);
    let err = convert(&cmd, &point_file(&[]), Cursor::new(Vec::new())).unwrap_err();
    assert!(matches!(err, Type2Error::InvalidHeader(_)));
}

#[test]
fn test_corrupt_footer_rejects_the_file() {
    let cmd = cmd_file(11, &[[0x01, 0x34, 0, 1, 0]]);
    let err = convert(&cmd, &point_file(&[]), Cursor::new(Vec::new())).unwrap_err();
    assert!(matches!(err, Type2Error::InvalidFooter(_)));
}
