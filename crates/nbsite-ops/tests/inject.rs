use std::fs;
use std::io::Write;
use std::path::PathBuf;

use nbsite_config::InjectSettings;
use nbsite_ops::{inject_header, insert_after, InjectStatus, Insertion};
use tempfile::TempDir;

const ANCHOR: &str = "<meta charset=\"utf-8\"/>";
const SNIPPET: &str = "<link rel=\"stylesheet\" href=\"custom.css\">";

fn settings() -> InjectSettings {
    InjectSettings {
        anchor: ANCHOR.into(),
        snippet: SNIPPET.into(),
    }
}

fn write_page(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    let mut file = fs::File::create(&path).expect("create file");
    file.write_all(contents.as_bytes()).expect("write file");
    path
}

#[test]
fn snippet_lands_immediately_after_anchor() {
    let contents = format!("<html><head>{ANCHOR}<title>t</title></head></html>");
    match insert_after(&contents, ANCHOR, SNIPPET) {
        Insertion::Done(updated) => {
            let expected =
                format!("<html><head>{ANCHOR}{SNIPPET}<title>t</title></head></html>");
            assert_eq!(updated, expected);
        }
        Insertion::AnchorMissing => panic!("anchor should be found"),
    }
}

#[test]
fn only_first_anchor_occurrence_is_used() {
    let contents = format!("{ANCHOR}middle{ANCHOR}");
    match insert_after(&contents, ANCHOR, SNIPPET) {
        Insertion::Done(updated) => {
            assert_eq!(updated, format!("{ANCHOR}{SNIPPET}middle{ANCHOR}"));
        }
        Insertion::AnchorMissing => panic!("anchor should be found"),
    }
}

#[test]
fn anchor_match_is_exact() {
    // Different whitespace inside the tag must not match.
    let contents = "<html><head><meta charset=\"utf-8\" /></head></html>";
    assert_eq!(
        insert_after(contents, ANCHOR, SNIPPET),
        Insertion::AnchorMissing
    );
}

#[test]
fn file_with_anchor_is_rewritten_in_place() {
    let temp = TempDir::new().expect("tempdir");
    let page = write_page(
        &temp,
        "a.html",
        &format!("<head>{ANCHOR}</head><body></body>"),
    );

    let status = inject_header(&page, &settings()).expect("inject");
    assert_eq!(status, InjectStatus::Injected);

    let rewritten = fs::read_to_string(&page).expect("read page");
    assert_eq!(rewritten, format!("<head>{ANCHOR}{SNIPPET}</head><body></body>"));
}

#[test]
fn file_without_anchor_is_left_untouched() {
    let temp = TempDir::new().expect("tempdir");
    let original = "<head><title>no charset</title></head>";
    let page = write_page(&temp, "a.html", original);

    let status = inject_header(&page, &settings()).expect("inject");
    assert_eq!(status, InjectStatus::AnchorMissing);
    assert_eq!(fs::read_to_string(&page).expect("read page"), original);
}

#[test]
fn injecting_twice_inserts_two_snippets() {
    let temp = TempDir::new().expect("tempdir");
    let page = write_page(&temp, "a.html", &format!("<head>{ANCHOR}</head>"));

    inject_header(&page, &settings()).expect("first inject");
    inject_header(&page, &settings()).expect("second inject");

    let rewritten = fs::read_to_string(&page).expect("read page");
    assert_eq!(rewritten.matches(SNIPPET).count(), 2);
}

#[test]
fn missing_file_is_an_io_error() {
    let temp = TempDir::new().expect("tempdir");
    let missing = temp.path().join("absent.html");

    let err = inject_header(&missing, &settings()).expect_err("should fail");
    assert!(err.to_string().contains("absent.html"));
}
