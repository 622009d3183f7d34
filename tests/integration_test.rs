// tests/integration_test.rs
use bumper::config::Config;
use bumper::domain::{BumpRule, Trigger};
use bumper::source::{FileSource, VersionFileRef};
use bumper::{Bumper, BumperError};
use std::fs;
use tempfile::TempDir;

const CONFIG: &str = r#"
scheme = "semantic"

[version_file]
path = "VERSION"

[[files]]
path = "package.json"
line = 3

[[files]]
path = "README.md"

[[rules]]
trigger = "commit"
bump = "build"

[[rules]]
trigger = "commit"
branch = "master"
bump = "minor"
reset = "build"

[[rules]]
trigger = "commit"
branch = "release"
bump = "major"
reset = ["minor", "build"]
prefix = "v."
"#;

fn fixture() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("VERSION"), "1.2.3\n").unwrap();
    fs::write(
        dir.path().join("package.json"),
        "{\n  \"name\": \"demo\",\n  \"version\": \"1.2.3\"\n}\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("README.md"),
        "# demo\r\n\r\nCurrent release: 1.2.3 (stable)\r\n",
    )
    .unwrap();
    dir
}

fn bumper_for(dir: &TempDir) -> Bumper<FileSource> {
    let config = Config::from_toml(CONFIG).unwrap();
    Bumper::new(config, FileSource::with_root(dir.path())).unwrap()
}

#[test]
fn test_plan_does_not_write() {
    let dir = fixture();
    let bumper = bumper_for(&dir);

    let plan = bumper.plan(Trigger::Commit, "feature/x").unwrap();
    assert_eq!(plan.current.to_string(), "1.2.3");
    assert_eq!(plan.next, "1.2.4");
    assert_eq!(fs::read_to_string(dir.path().join("VERSION")).unwrap(), "1.2.3\n");
}

#[test]
fn test_bump_updates_every_file() {
    let dir = fixture();
    let bumper = bumper_for(&dir);

    let plan = bumper.plan(Trigger::Commit, "master").unwrap();
    assert_eq!(plan.next, "1.3.1");
    let written = bumper.apply(&plan).unwrap();
    assert_eq!(written.len(), 3);

    assert_eq!(fs::read_to_string(dir.path().join("VERSION")).unwrap(), "1.3.1\n");
    assert_eq!(
        fs::read_to_string(dir.path().join("package.json")).unwrap(),
        "{\n  \"name\": \"demo\",\n  \"version\": \"1.3.1\"\n}\n"
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("README.md")).unwrap(),
        "# demo\r\n\r\nCurrent release: 1.3.1 (stable)\r\n"
    );
}

#[test]
fn test_successive_bumps_read_back_decorations() {
    let dir = fixture();
    let bumper = bumper_for(&dir);

    let plan = bumper.plan(Trigger::Commit, "release").unwrap();
    assert_eq!(plan.next, "v.2.0.1");
    bumper.apply(&plan).unwrap();

    // The prefix written by the release rule is recognized on the next read
    let current = bumper.current_version().unwrap();
    assert_eq!(current.prefix.as_deref(), Some("v."));
    assert_eq!(current.core, "2.0.1");

    let plan = bumper.plan(Trigger::Commit, "master").unwrap();
    assert_eq!(plan.next, "2.1.1");
    bumper.apply(&plan).unwrap();
    assert_eq!(fs::read_to_string(dir.path().join("VERSION")).unwrap(), "2.1.1\n");
}

#[test]
fn test_missing_version_file() {
    let dir = TempDir::new().unwrap();
    let bumper = bumper_for(&dir);
    assert!(matches!(
        bumper.current_version(),
        Err(BumperError::UnreadableSource { .. })
    ));
}

#[test]
fn test_custom_scheme_end_to_end() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("build.txt"), "release 4.1->9\n").unwrap();

    let config = Config {
        scheme: "custom".to_string(),
        scheme_definition: Some("major.minor[->build]".to_string()),
        version_file: VersionFileRef::new("build.txt").with_line(1),
        rules: vec![BumpRule::new(Trigger::PullRequest)
            .with_bump("minor")
            .with_reset("build")],
        ..Config::default()
    };
    let bumper = Bumper::new(config, FileSource::with_root(dir.path())).unwrap();

    let plan = bumper.plan(Trigger::PullRequest, "any").unwrap();
    assert_eq!(plan.next, "4.2");
    bumper.apply(&plan).unwrap();
    assert_eq!(
        fs::read_to_string(dir.path().join("build.txt")).unwrap(),
        "release 4.2\n"
    );
}
