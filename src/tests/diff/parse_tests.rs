use super::*;

const DIR_DIFF: &str = "\
diff -u ./model.py .exprec/0f3a9c2e/src/model.py
--- ./model.py\t2019-03-04 10:11:12.000000000 +0100
+++ .exprec/0f3a9c2e/src/model.py\t2019-03-01 09:00:00.000000000 +0100
@@ -1,4 +1,5 @@ class Net:
 import torch
-lr = 0.1
+lr = 0.01
+momentum = 0.9

 def train():
@@ -10,2 +11,2 @@
     pass
-    return 1
+    return 2
\\ No newline at end of file
Only in .: notes.txt
Common subdirectories: ./data and .exprec/0f3a9c2e/src/data
Binary files ./weights.bin and .exprec/0f3a9c2e/src/weights.bin differ
";

#[test]
fn parses_directory_diff_with_notes() {
    let diff = parse_unified_diff(DIR_DIFF).unwrap();
    assert_eq!(diff.files.len(), 3);

    let model = &diff.files[0];
    assert_eq!(model.old_path, "./model.py");
    assert_eq!(model.new_path, ".exprec/0f3a9c2e/src/model.py");
    assert_eq!(model.change, FileChange::Modified);
    assert_eq!(model.hunks.len(), 2);
    assert_eq!(model.added(), 3);
    assert_eq!(model.removed(), 2);

    let first = &model.hunks[0];
    assert_eq!(first.section.as_deref(), Some("class Net:"));
    assert_eq!(first.lines.len(), 6);
    assert_eq!(first.lines[3].text, "momentum = 0.9");
    assert_eq!(first.lines[3].new_no, Some(3));
    assert_eq!(first.lines[3].old_no, None);
    // empty context line without its leading space
    assert_eq!(first.lines[4].kind, LineKind::Context);
    assert_eq!(first.lines[4].old_no, Some(3));
    assert_eq!(first.lines[4].new_no, Some(4));

    let second = &model.hunks[1];
    assert!(second.lines.last().unwrap().no_newline_at_eof);

    assert_eq!(
        diff.files[1].change,
        FileChange::OnlyIn {
            dir: ".".to_string(),
            name: "notes.txt".to_string()
        }
    );
    assert_eq!(diff.files[1].display_name(), "./notes.txt");
    assert_eq!(diff.files[2].change, FileChange::Binary);
    assert_eq!(diff.totals(), (3, 2));
}

#[test]
fn empty_text_means_no_differences() {
    let diff = parse_unified_diff("").unwrap();
    assert!(diff.is_empty());
}

#[test]
fn plain_two_file_diff_without_command_line() {
    let text = "--- a.rs\n+++ b.rs\n@@ -1 +1 @@\n-fn a() {}\n+fn b() {}\n";
    let diff = parse_unified_diff(text).unwrap();
    assert_eq!(diff.files.len(), 1);
    assert_eq!(diff.files[0].display_name(), "a.rs -> b.rs");
    assert_eq!(diff.files[0].hunks[0].old_len, 1);
}

#[test]
fn removed_line_that_looks_like_a_header_stays_in_the_hunk() {
    let text = "--- a\n+++ b\n@@ -1,2 +1,1 @@\n--- not a header\n keep\n";
    let diff = parse_unified_diff(text).unwrap();
    let hunk = &diff.files[0].hunks[0];
    assert_eq!(hunk.lines[0].kind, LineKind::Removed);
    assert_eq!(hunk.lines[0].text, "-- not a header");
}

#[test]
fn malformed_input_is_rejected() {
    assert!(matches!(
        parse_unified_diff("--- a\n+++ b\n@@ -x +1 @@\n"),
        Err(DiffParseError::HunkHeader { line: 3, .. })
    ));
    assert!(matches!(
        parse_unified_diff("@@ -1 +1 @@\n-a\n+b\n"),
        Err(DiffParseError::OrphanHunk { line: 1 })
    ));
    assert!(matches!(
        parse_unified_diff("--- a\n+++ b\n@@ -1,3 +1,3 @@\n a\n"),
        Err(DiffParseError::Truncated { old: 2, new: 2 })
    ));
    assert!(matches!(
        parse_unified_diff("this is not a diff"),
        Err(DiffParseError::Unexpected { line: 1, .. })
    ));
}

#[test]
fn hunk_numbers_past_u32_are_a_header_error() {
    assert!(matches!(
        parse_unified_diff("--- a.py\n+++ b.py\n@@ -4294967295,2 +1,2 @@\n a\n b\n"),
        Err(DiffParseError::HunkHeader { line: 3, .. })
    ));
    // The last representable line still parses.
    let diff = parse_unified_diff("--- a.py\n+++ b.py\n@@ -4294967294,1 +1 @@\n a\n").unwrap();
    assert_eq!(diff.files[0].hunks[0].lines[0].old_no, Some(4294967294));
}
