use super::*;

fn records(text: &str) -> RecordSet {
    RecordSet::parse(text)
}

#[test]
fn empty_label_row_is_dropped() {
    let parsed = parse_windows(&records(
        "startSeconds,endSeconds,textContent\n0,5,Cat\n5,5.0001,\n",
    ))
    .expect("parse");

    assert_eq!(parsed.windows.len(), 1);
    let window = &parsed.windows[0];
    assert_eq!((window.start, window.end), (0.0, 5.0));
    assert_eq!(window.category, "Cat");
    assert_eq!(window.name, "Clip");
    assert_eq!(parsed.rejected, vec![RowRejection {
        row: 2,
        reason: "empty category".to_string(),
    }]);
}

#[test]
fn labels_collapse_whitespace_into_underscores() {
    assert_eq!(normalize_category("Amber Portwood  tiktok"), "Amber_Portwood_tiktok");
    assert_eq!(normalize_category("  padded\tlabel \n"), "padded_label");
    assert_eq!(normalize_category("   "), "");
}

#[test]
fn invalid_numbers_and_ordering_are_rejected() {
    let parsed = parse_windows(&records(
        "name,startSeconds,endSeconds,textContent\n\
         a,abc,3,Cat\n\
         b,-1,3,Cat\n\
         c,4,4,Cat\n\
         d,5,2,Cat\n\
         e,NaN,2,Cat\n\
         f,1.5,2.25,Dog Park\n",
    ))
    .expect("parse");

    assert_eq!(parsed.windows.len(), 1);
    assert_eq!(parsed.windows[0].name, "f");
    assert_eq!(parsed.windows[0].category, "Dog_Park");
    assert_eq!(parsed.windows[0].row, 6);
    let rows: Vec<usize> = parsed.rejected.iter().map(|r| r.row).collect();
    assert_eq!(rows, vec![1, 2, 3, 4, 5]);
}

#[test]
fn short_rows_are_rejected() {
    let parsed = parse_windows(&records(
        "startSeconds,endSeconds,textContent\n0,5\n1,2,Cat\n",
    ))
    .expect("parse");
    assert_eq!(parsed.windows.len(), 1);
    assert_eq!(parsed.rejected[0].row, 1);
    assert!(parsed.rejected[0].reason.contains("expected 3 fields"));
}

#[test]
fn missing_label_column_drops_every_row() {
    let parsed = parse_windows(&records("startSeconds,endSeconds\n0,5\n")).expect("parse");
    assert!(parsed.windows.is_empty());
    assert_eq!(parsed.rejected.len(), 1);
}

#[test]
fn missing_required_column_is_fatal() {
    let err = parse_windows(&records("startSeconds,textContent\n0,Cat\n")).unwrap_err();
    assert!(err.to_string().contains("endSeconds"));
}

#[test]
fn extra_export_columns_are_ignored_and_order_preserved() {
    let text = "indexInTrack,name,startSeconds,endSeconds,durationSeconds,mediaPath,textContent\n\
                0,intro,10,12.5,2.5,C:/x.mp4,\"Beach, sunset\"\n\
                1,outro,2,4,2,,city\n";
    let parsed = parse_windows(&records(text)).expect("parse");
    let categories: Vec<&str> = parsed.windows.iter().map(|w| w.category.as_str()).collect();
    assert_eq!(categories, vec!["Beach,_sunset", "city"]);
    assert_eq!(parsed.windows[0].duration(), 2.5);
}

#[test]
fn parsing_twice_yields_identical_windows() {
    let set = records("startSeconds,endSeconds,textContent\n0,5,Cat\n5,9,Dog\n");
    let first = parse_windows(&set).expect("first parse");
    let second = parse_windows(&set).expect("second parse");
    assert_eq!(first, second);
}
