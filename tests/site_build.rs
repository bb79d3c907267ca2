//! End-to-end build over a small content tree.
//!
//! Exercises the whole pipeline through the public API, then smoke-tests the
//! compiled binary the way a user would run it. The content tree is written
//! from scratch here rather than shared with the unit-test fixtures, so this
//! file documents a complete minimal site on its own.

use serde_json::json;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn write_json(dir: &Path, name: &str, value: serde_json::Value) {
    std::fs::create_dir_all(dir).unwrap();
    let body = serde_json::to_string_pretty(&value).unwrap();
    std::fs::write(dir.join(name), body).unwrap();
}

/// Three pages, three posts, two listing renditions at posts_per_page = 2.
fn demo_site() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();

    std::fs::write(
        root.join("config.toml"),
        r#"
[site]
title = "Fern & Field"
tagline = "Garden notes from a small plot"
base_url = "https://fern.example"

[blog]
posts_per_page = 2
"#,
    )
    .unwrap();

    let pages = root.join("pages");
    write_json(
        &pages,
        "home.json",
        json!({
            "_type": "page",
            "title": "Welcome",
            "sections": [
                {
                    "_type": "sectionHeader",
                    "title": "Grow quietly",
                    "subtitle": "A garden is a long conversation.",
                    "background": "mint"
                },
                {
                    "_type": "sectionContent",
                    "body": [
                        {"style": "normal", "children": [
                            {"text": "Most of gardening is "},
                            {"text": "waiting", "marks": ["strong"]},
                            {"text": ", and waiting well."}
                        ]}
                    ]
                }
            ]
        }),
    );
    write_json(
        &pages,
        "journal.json",
        json!({
            "_type": "page",
            "title": "Journal",
            "nav_order": 2,
            "sections": [
                {"_type": "sectionBlog", "title": "Notes from the plot"}
            ]
        }),
    );
    write_json(
        &pages,
        "say-hello.json",
        json!({
            "_type": "page",
            "title": "Say hello",
            "nav_order": 3,
            "sections": [
                {
                    "_type": "sectionForm",
                    "title": "Write to us",
                    "fields": [
                        {"name": "name", "label": "Name"},
                        {"name": "email", "label": "Email", "kind": "email", "required": true},
                        {"name": "message", "label": "Message", "kind": "textarea"}
                    ]
                }
            ]
        }),
    );

    let posts = root.join("posts");
    write_json(
        &posts,
        "seedlings.json",
        json!({
            "_type": "post",
            "title": "Seedlings under lights",
            "date": "2025-03-10",
            "body": "Legginess means the light is too far away. Lower it."
        }),
    );
    write_json(
        &posts,
        "compost.json",
        json!({
            "_type": "post",
            "title": "Compost, turned",
            "date": "2025-02-01",
            "body": "Browns, greens, water, patience."
        }),
    );
    write_json(
        &posts,
        "first-frost.json",
        json!({
            "_type": "post",
            "title": "First frost",
            "date": "2025-01-15",
            "body": "The dahlias are done. Lift the tubers this weekend."
        }),
    );

    let statics = root.join("static");
    std::fs::create_dir_all(&statics).unwrap();
    std::fs::write(statics.join("robots.txt"), "User-agent: *\nAllow: /\n").unwrap();

    tmp
}

fn read_out(out: &Path, relative: &str) -> String {
    std::fs::read_to_string(out.join(relative)).unwrap()
}

// ============================================================================
// Library API
// ============================================================================

#[test]
fn build_produces_the_full_output_tree() {
    let site = demo_site();
    let out = TempDir::new().unwrap();
    let report = brochure::generate::generate(site.path(), out.path()).unwrap();

    // 3 pages, one expanding to 2 listing renditions, plus 3 posts.
    assert_eq!(report.pages.len(), 4);
    assert_eq!(report.posts.len(), 3);
    assert!(report.skips.is_empty());
    assert_eq!(report.assets_copied, 1);

    for path in [
        "index.html",
        "journal/index.html",
        "journal/page/2/index.html",
        "say-hello/index.html",
        "blog/seedlings/index.html",
        "blog/compost/index.html",
        "blog/first-frost/index.html",
        "robots.txt",
    ] {
        assert!(out.path().join(path).is_file(), "missing {path}");
    }

    let home = read_out(out.path(), "index.html");
    assert!(home.contains("<h1>Grow quietly</h1>"));
    assert!(home.contains("tint-mint"));
    assert!(home.contains("<strong>waiting</strong>"));
    assert!(home.contains("Fern &amp; Field"));
}

#[test]
fn listing_renditions_are_linked_both_ways() {
    let site = demo_site();
    let out = TempDir::new().unwrap();
    brochure::generate::generate(site.path(), out.path()).unwrap();

    let page1 = read_out(out.path(), "journal/index.html");
    assert!(page1.contains("Seedlings under lights"));
    assert!(page1.contains("Compost, turned"));
    assert!(!page1.contains("First frost"));
    assert!(page1.contains(r#"rel="next""#));
    assert!(page1.contains(r#"href="/journal/page/2/""#));

    let page2 = read_out(out.path(), "journal/page/2/index.html");
    assert!(page2.contains("First frost"));
    assert!(page2.contains(r#"rel="prev""#));
    assert!(page2.contains(r#"href="/journal/""#));
    assert!(page2.contains(r#"href="https://fern.example/journal/page/2/""#));
}

#[test]
fn posts_carry_their_body_and_a_way_back() {
    let site = demo_site();
    let out = TempDir::new().unwrap();
    brochure::generate::generate(site.path(), out.path()).unwrap();

    let post = read_out(out.path(), "blog/first-frost/index.html");
    assert!(post.contains("First frost"));
    assert!(post.contains("January 15, 2025"));
    assert!(post.contains("Lift the tubers"));
    assert!(post.contains(r#"href="/journal/""#));
}

#[test]
fn check_agrees_with_build() {
    let site = demo_site();
    let report = brochure::generate::check(site.path()).unwrap();

    assert_eq!(report.pages, 3);
    assert_eq!(report.posts, 3);
    assert_eq!(report.documents, 7);
    assert!(report.skips.is_empty());
}

// ============================================================================
// Binary
// ============================================================================

fn brochure_cmd() -> Command {
    Command::new(env!("CARGO_BIN_EXE_brochure"))
}

#[test]
fn binary_builds_and_reports() {
    let site = demo_site();
    let out = TempDir::new().unwrap();

    let result = brochure_cmd()
        .arg("build")
        .arg("--source")
        .arg(site.path())
        .arg("--output")
        .arg(out.path())
        .output()
        .unwrap();

    assert!(
        result.status.success(),
        "build failed: {}",
        String::from_utf8_lossy(&result.stderr)
    );
    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(stdout.contains("Generated 4 pages, 3 posts, 1 static assets"));
    assert!(stdout.contains("==> Build complete"));
    assert!(out.path().join("index.html").is_file());
}

#[test]
fn binary_check_reports_without_writing() {
    let site = demo_site();

    let result = brochure_cmd()
        .arg("check")
        .arg("--source")
        .arg(site.path())
        .output()
        .unwrap();

    assert!(result.status.success());
    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(stdout.contains("Checked 3 pages, 3 posts"));
    assert!(stdout.contains("All sections transform cleanly"));
    assert!(!site.path().join("dist").exists());
}

#[test]
fn binary_build_fails_without_a_home_page() {
    let tmp = TempDir::new().unwrap();
    write_json(
        &tmp.path().join("pages"),
        "about.json",
        json!({"_type": "page", "title": "About", "sections": []}),
    );
    let out = TempDir::new().unwrap();

    let result = brochure_cmd()
        .arg("build")
        .arg("--source")
        .arg(tmp.path())
        .arg("--output")
        .arg(out.path())
        .output()
        .unwrap();

    assert!(!result.status.success());
    assert!(!out.path().join("index.html").exists());
}

#[test]
fn binary_gen_config_prints_valid_toml() {
    let result = brochure_cmd().arg("gen-config").output().unwrap();

    assert!(result.status.success());
    let stdout = String::from_utf8(result.stdout).unwrap();
    assert!(stdout.contains("[site]"));
    assert!(stdout.contains("posts_per_page"));
    let parsed: Result<toml::Table, _> = stdout.parse();
    assert!(parsed.is_ok(), "gen-config output is not valid TOML");
}
