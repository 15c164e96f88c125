//! CLI integration tests for quire commands.
//!
//! These check exit codes and the key lines of output, not exact formatting.

use std::{fs, path::Path};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Notes tree used by most tests.
fn notes() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(root, "Alpha.md", "---\ntitle: Alpha Project\ntags: [work, zeus]\n---\nproject zeus\n");
    write(root, "Docs/Guide.md", "See [[Alpha Project]] and [[Missing]].\n");
    write(root, "Docs/notes.txt", "project zeus\n");
    dir
}

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// A `quire` command isolated from user config and environment.
fn quire(root: &Path) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("quire").unwrap();
    cmd.env_remove("QUIRE_ROOT")
        .env_remove("RUST_LOG")
        .arg("--quiet")
        .arg("--config")
        .arg(root.join("no-such-config.toml"))
        .arg("--root")
        .arg(root);
    cmd
}

mod index {
    use super::*;

    #[test]
    fn reports_counts() {
        let dir = notes();
        quire(dir.path())
            .arg("index")
            .assert()
            .success()
            .stdout(predicate::str::contains("Notes:       2"))
            .stdout(predicate::str::contains("Directories: 1"));
    }

    #[test]
    fn missing_root_fails() {
        let dir = tempfile::tempdir().unwrap();
        quire(&dir.path().join("absent"))
            .arg("index")
            .assert()
            .failure()
            .stderr(predicate::str::contains("notes root not found"));
    }
}

mod search {
    use super::*;

    #[test]
    fn text_query_matches_note_content_only() {
        let dir = notes();
        quire(dir.path())
            .args(["search", "zeus"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Alpha.md"))
            .stdout(predicate::str::contains("notes.txt").not());
    }

    #[test]
    fn tag_query() {
        let dir = notes();
        quire(dir.path())
            .args(["search", "tag:work"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Alpha.md  [work,zeus]"));
    }

    #[test]
    fn json_output() {
        let dir = notes();
        let output = quire(dir.path())
            .args(["search", "guide", "--output", "json"])
            .output()
            .unwrap();
        assert!(output.status.success());

        let rows: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        let rows = rows.as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["name"], "Guide.md");
        assert_eq!(rows[0]["depth"], 1);
    }

    #[test]
    fn requires_a_query() {
        let dir = notes();
        quire(dir.path()).arg("search").assert().failure();
    }
}

mod resolve {
    use super::*;

    #[test]
    fn resolves_title() {
        let dir = notes();
        quire(dir.path())
            .args(["resolve", "alpha project"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Alpha.md"));
    }

    #[test]
    fn unresolved_label_fails() {
        let dir = notes();
        quire(dir.path())
            .args(["resolve", "Missing"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Unresolved wiki link: Missing"));
    }
}

mod links {
    use super::*;

    #[test]
    fn lists_resolved_and_unresolved() {
        let dir = notes();
        quire(dir.path())
            .arg("links")
            .arg(dir.path().join("Docs/Guide.md"))
            .assert()
            .success()
            .stdout(predicate::str::contains("[[Alpha Project]] -> Alpha.md"))
            .stdout(predicate::str::contains("[[Missing]] -> (unresolved)"));
    }
}

mod rank {
    use super::*;

    #[test]
    fn ranks_by_prefix_and_usage() {
        let dir = notes();
        write(dir.path(), "Almanac.md", "");

        quire(dir.path())
            .arg("open")
            .arg(dir.path().join("Almanac.md"))
            .assert()
            .success()
            .stdout(predicate::str::contains("opened 1 time(s)"));

        // Alpha Project scores 720 on title and name, Almanac 300 plus one open.
        let output = quire(dir.path()).args(["rank", "al"]).output().unwrap();
        assert!(output.status.success());
        let stdout = String::from_utf8(output.stdout).unwrap();
        let labels: Vec<&str> = stdout.lines().map(|l| l.split('\t').next().unwrap()).collect();
        assert_eq!(labels, vec!["Alpha Project", "Almanac"]);
    }

    #[test]
    fn prefix_from_cursor() {
        let dir = notes();
        let draft = dir.path().join("draft.txt");
        fs::write(&draft, "link to [[Gui").unwrap();

        quire(dir.path())
            .arg("rank")
            .arg("--from")
            .arg(&draft)
            .args(["--cursor", "13"])
            .assert()
            .success()
            .stdout(predicate::str::starts_with("Guide\t0\t"));
    }
}

mod open {
    use super::*;

    #[test]
    fn persists_usage_in_managed_dir() {
        let dir = notes();
        for _ in 0..2 {
            quire(dir.path())
                .arg("open")
                .arg(dir.path().join("Alpha.md"))
                .assert()
                .success();
        }

        let raw = fs::read_to_string(dir.path().join(".quire/usage.json")).unwrap();
        assert!(raw.contains("\"Alpha.md\": 2"));

        // The managed directory never shows up in results.
        quire(dir.path())
            .args(["search", "usage"])
            .assert()
            .success()
            .stdout(predicate::str::is_empty());
    }

    #[test]
    fn outside_root_fails() {
        let dir = notes();
        let other = tempfile::tempdir().unwrap();
        write(other.path(), "stray.md", "");

        quire(dir.path())
            .arg("open")
            .arg(other.path().join("stray.md"))
            .assert()
            .failure();
    }
}

mod move_note {
    use super::*;

    #[test]
    fn carries_open_counts_and_resolution() {
        let dir = notes();
        fs::create_dir(dir.path().join("Archive")).unwrap();
        quire(dir.path())
            .arg("open")
            .arg(dir.path().join("Alpha.md"))
            .assert()
            .success();

        quire(dir.path())
            .arg("move")
            .arg(dir.path().join("Alpha.md"))
            .arg(dir.path().join("Archive/Alpha.md"))
            .assert()
            .success()
            .stdout(predicate::str::contains("Moved Alpha.md -> Archive/Alpha.md"));

        let raw = fs::read_to_string(dir.path().join(".quire/usage.json")).unwrap();
        assert!(raw.contains("\"Archive/Alpha.md\": 1"));
        assert!(!raw.contains("\"Alpha.md\""));

        quire(dir.path())
            .args(["resolve", "Alpha Project"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Archive/Alpha.md"));
    }

    #[test]
    fn refuses_to_overwrite() {
        let dir = notes();
        quire(dir.path())
            .arg("move")
            .arg(dir.path().join("Alpha.md"))
            .arg(dir.path().join("Docs/Guide.md"))
            .assert()
            .failure()
            .stderr(predicate::str::contains("Already exists"));
        assert!(dir.path().join("Alpha.md").exists());
    }
}

mod config {
    use super::*;

    fn quire_with_config(config: &Path) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("quire").unwrap();
        cmd.env_remove("QUIRE_ROOT")
            .env_remove("RUST_LOG")
            .arg("--quiet")
            .arg("--config")
            .arg(config);
        cmd
    }

    #[test]
    fn init_writes_defaults_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conf/quire.toml");

        quire_with_config(&path)
            .arg("config")
            .assert()
            .success()
            .stdout(predicate::str::contains("not created"));

        quire_with_config(&path)
            .args(["config", "--init"])
            .assert()
            .success();
        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("poll_interval_ms = 2000"));

        quire_with_config(&path)
            .args(["config", "--init"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("already exists"));
    }
}

mod watch {
    use super::*;

    #[test]
    fn bounded_run_exits() {
        let dir = notes();
        quire(dir.path())
            .args(["watch", "--interval-ms", "10", "--max-polls", "2"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Monitoring stopped."));
    }
}

mod status {
    use super::*;

    #[test]
    fn shows_summary() {
        let dir = notes();
        quire(dir.path())
            .arg("status")
            .assert()
            .success()
            .stdout(predicate::str::contains("Quire Index Status"))
            .stdout(predicate::str::contains("Notes:             2"));
    }
}
