use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use nbsite_ops::toc::{link_entries, rebuild, render_entries};
use nbsite_ops::TocStatus;
use tempfile::TempDir;

const TOC_ANCHOR: &str = "<ul id=\"table-of-contents\">";

fn write_index(dir: &TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("index.html");
    let mut file = fs::File::create(&path).expect("create index");
    file.write_all(contents.as_bytes()).expect("write index");
    path
}

fn pages(names: &[&str]) -> Vec<PathBuf> {
    names.iter().map(PathBuf::from).collect()
}

#[test]
fn entries_join_base_directory_and_file_name() {
    let entries = link_entries(
        &pages(&["a.html", "b.html"]),
        "http://x/base",
        Path::new("articles"),
    );

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].url, "http://x/base/articles/a.html");
    assert_eq!(entries[0].name, "a");
    assert_eq!(entries[1].url, "http://x/base/articles/b.html");
    assert_eq!(entries[1].name, "b");
}

#[test]
fn trailing_slash_on_base_does_not_double_up() {
    let entries = link_entries(&pages(&["a.html"]), "http://x/base/", Path::new("articles"));
    assert_eq!(entries[0].url, "http://x/base/articles/a.html");
}

#[test]
fn rendered_block_wraps_each_item_in_newlines() {
    let entries = link_entries(&pages(&["a.html"]), "http://x", Path::new("articles"));
    assert_eq!(
        render_entries(&entries),
        "\n<li><a href=\"http://x/articles/a.html\">a</a></li>\n"
    );
}

#[test]
fn stale_entries_are_stripped_before_regeneration() {
    let temp = TempDir::new().expect("tempdir");
    let index = write_index(
        &temp,
        &format!(
            "<html><body>\n{TOC_ANCHOR}\n\
             <li><a href=\"http://old/articles/gone.html\">gone</a></li>\n\
             <li><a href=\"http://old/articles/stale.html\">stale</a></li>\n\
             <li><a href=\"http://old/articles/dead.html\">dead</a></li>\n\
             </ul>\n</body></html>\n"
        ),
    );

    let status = rebuild(
        &index,
        &pages(&["a.html", "b.html"]),
        "http://x/base",
        Path::new("articles"),
        TOC_ANCHOR,
    )
    .expect("rebuild");
    assert_eq!(status, TocStatus::Rebuilt { entries: 2 });

    let rewritten = fs::read_to_string(&index).expect("read index");
    assert_eq!(rewritten.matches("<li>").count(), 2);
    assert!(rewritten.contains("http://x/base/articles/a.html"));
    assert!(rewritten.contains("http://x/base/articles/b.html"));
    assert!(!rewritten.contains("gone"));
    assert!(!rewritten.contains("stale"));
    assert!(!rewritten.contains("dead"));
}

#[test]
fn rebuild_is_stable_under_repeated_invocation() {
    let temp = TempDir::new().expect("tempdir");
    let index = write_index(
        &temp,
        &format!("<html><body>\n{TOC_ANCHOR}\n</ul>\n</body></html>\n"),
    );
    let page_list = pages(&["a.html", "b.html"]);

    rebuild(
        &index,
        &page_list,
        "http://x/base",
        Path::new("articles"),
        TOC_ANCHOR,
    )
    .expect("first rebuild");
    let first = fs::read_to_string(&index).expect("read after first");

    rebuild(
        &index,
        &page_list,
        "http://x/base",
        Path::new("articles"),
        TOC_ANCHOR,
    )
    .expect("second rebuild");
    let second = fs::read_to_string(&index).expect("read after second");

    assert_eq!(first, second);
}

#[test]
fn empty_page_list_leaves_anchor_without_entries() {
    let temp = TempDir::new().expect("tempdir");
    let index = write_index(
        &temp,
        &format!(
            "<html><body>\n{TOC_ANCHOR}\n\
             <li><a href=\"http://old/a.html\">a</a></li>\n\
             </ul>\n</body></html>\n"
        ),
    );

    let status = rebuild(
        &index,
        &pages(&[]),
        "http://x/base",
        Path::new("articles"),
        TOC_ANCHOR,
    )
    .expect("rebuild");
    assert_eq!(status, TocStatus::Rebuilt { entries: 0 });

    let rewritten = fs::read_to_string(&index).expect("read index");
    assert!(!rewritten.contains("<li>"));
    assert!(rewritten.contains(TOC_ANCHOR));
}

#[test]
fn missing_anchor_strips_stale_lines_but_inserts_nothing() {
    let temp = TempDir::new().expect("tempdir");
    let index = write_index(
        &temp,
        "<html><body>\n<ul>\n<li><a href=\"http://old/a.html\">a</a></li>\n</ul>\n</body></html>\n",
    );

    let status = rebuild(
        &index,
        &pages(&["a.html"]),
        "http://x/base",
        Path::new("articles"),
        TOC_ANCHOR,
    )
    .expect("rebuild");
    assert_eq!(status, TocStatus::AnchorMissing);

    let rewritten = fs::read_to_string(&index).expect("read index");
    assert_eq!(
        rewritten,
        "<html><body>\n<ul>\n</ul>\n</body></html>\n"
    );
}

#[test]
fn unrelated_lines_containing_li_marker_are_also_dropped() {
    // The strip is textual: any line with the marker goes, even prose.
    let temp = TempDir::new().expect("tempdir");
    let index = write_index(
        &temp,
        &format!("<p>mentions <li> in passing</p>\n{TOC_ANCHOR}\n</ul>\n"),
    );

    rebuild(
        &index,
        &pages(&[]),
        "http://x",
        Path::new("articles"),
        TOC_ANCHOR,
    )
    .expect("rebuild");

    let rewritten = fs::read_to_string(&index).expect("read index");
    assert!(!rewritten.contains("in passing"));
}

#[test]
fn missing_index_is_an_io_error() {
    let temp = TempDir::new().expect("tempdir");
    let missing = temp.path().join("index.html");

    let err = rebuild(
        &missing,
        &pages(&[]),
        "http://x",
        Path::new("articles"),
        TOC_ANCHOR,
    )
    .expect_err("should fail");
    assert!(err.to_string().contains("index.html"));
}
