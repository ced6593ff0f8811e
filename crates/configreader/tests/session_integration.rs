//! Integration tests for configuration sessions backed by real files.
//!
//! These drive [`ConfigReader`] through its public API the way an application
//! would: open a path, mutate, commit, reopen, and export.  Every test works in
//! its own directory under the system temp dir, removed when the test ends.

use std::fs;
use std::path::{Path, PathBuf};

use configreader::{ConfigError, ConfigReader, EntryError, SearchOptions, Value};
use uuid::Uuid;

/// A unique scratch directory, removed on drop.
struct Scratch {
    dir: PathBuf,
}

impl Scratch {
    fn new() -> Self {
        let dir = std::env::temp_dir().join(format!("configreader_test_{}", Uuid::new_v4()));
        fs::create_dir_all(&dir).expect("create scratch dir");
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }
}

impl Drop for Scratch {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.dir);
    }
}

fn open(path: &Path) -> ConfigReader {
    ConfigReader::open(path).expect("open must succeed")
}

#[test]
fn test_fresh_path_is_bootstrapped_but_not_created() {
    // Arrange
    let scratch = Scratch::new();
    let path = scratch.path("settings.ini");

    // Act
    let config = open(&path);

    // Assert
    let items = config.get_items("main");
    assert_eq!(items.len(), 1);
    assert_eq!(items.get("reader"), Some(&Value::from("configreader")));
    let hit = config
        .search("reader", &SearchOptions::default())
        .unwrap()
        .expect("bootstrap entry must be found");
    assert_eq!(hit.as_tuple(), ("reader", "configreader", "main"));
    assert!(!path.exists(), "nothing is written before a commit");
}

#[test]
fn test_commit_creates_file_with_bootstrap_content() {
    let scratch = Scratch::new();
    let path = scratch.path("nested/dir/settings.ini");
    let mut config = open(&path);

    config.commit().unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("[main]"));
    assert!(text.contains("reader = configreader"));
}

#[test]
fn test_values_survive_commit_and_reopen() {
    // Arrange
    let scratch = Scratch::new();
    let path = scratch.path("settings.ini");
    let mut config = open(&path);
    config.set("states", Option::<&str>::None).unwrap();
    config.set("truth", true).unwrap();
    config.set("empty", "").unwrap();
    config.set_in("S", "count", 0).unwrap();
    config.set_with("main", "country", "Kenya", true).unwrap();

    // Act
    let reopened = open(&path);

    // Assert
    assert_eq!(reopened.get("states"), Value::Null);
    assert_eq!(reopened.get("truth"), Value::Bool(true));
    assert_eq!(reopened.get("empty"), "");
    assert_eq!(reopened.get_in("S", "count"), Value::Int(0));
    assert_eq!(reopened.get("country"), "Kenya");
    assert_eq!(reopened.sections().to_vec(), vec!["main", "S"]);
}

#[test]
fn test_uncommitted_changes_are_invisible_to_other_sessions() {
    // Arrange
    let scratch = Scratch::new();
    let path = scratch.path("settings.ini");
    let mut writer = open(&path);
    writer.commit().unwrap();

    // Act
    writer.set("name", "First").unwrap();
    let before = open(&path);
    writer.set_with("main", "surname", "Last", true).unwrap();
    let after = open(&path);

    // Assert
    assert_eq!(before.get("name"), Value::Null);
    assert_eq!(after.get("name"), "First");
    assert_eq!(after.get("surname"), "Last");
}

#[test]
fn test_reload_picks_up_commits_from_another_session() {
    let scratch = Scratch::new();
    let path = scratch.path("settings.ini");
    let mut first = open(&path);
    let mut second = open(&path);

    second.set_with("main", "shared", 42, true).unwrap();
    first.reload().unwrap();

    assert_eq!(first.get("shared"), Value::Int(42));
}

#[test]
fn test_get_default_is_returned_for_missing_key() {
    let scratch = Scratch::new();
    let config = open(&scratch.path("settings.ini"));

    assert_eq!(config.get_or("main", "missing", "fallback"), "fallback");
    assert_eq!(config.get_or("nowhere", "missing", 3), Value::Int(3));
}

#[test]
fn test_remove_key_and_section_with_commit() {
    // Arrange
    let scratch = Scratch::new();
    let path = scratch.path("settings.ini");
    let mut config = open(&path);
    config.set_in("extra", "k", "v").unwrap();
    config.set("gone", "soon").unwrap();
    config.commit().unwrap();

    // Act
    config.remove_key("main", "gone", true).unwrap();
    config.remove_section("extra", true).unwrap();

    // Assert
    let reopened = open(&path);
    assert_eq!(reopened.get("gone"), Value::Null);
    assert!(!reopened.sections().contains("extra"));
    assert!(reopened.get_items("extra").is_empty());
}

#[test]
fn test_set_after_close_is_invalid_state() {
    let scratch = Scratch::new();
    let mut config = open(&scratch.path("settings.ini"));

    config.close();

    assert!(matches!(config.set("k", "v"), Err(ConfigError::Closed)));
}

#[test]
fn test_scoped_session_commits_on_exit() {
    // Arrange
    let scratch = Scratch::new();
    let path = scratch.path("settings.ini");

    // Act
    let name = open(&path)
        .scoped(|config| {
            config.set("name", "First")?;
            Ok::<_, ConfigError>(config.get("name"))
        })
        .unwrap();

    // Assert
    assert_eq!(name, "First");
    assert_eq!(open(&path).get("name"), "First");
}

#[test]
fn test_scoped_guard_commits_when_dropped() {
    let scratch = Scratch::new();
    let path = scratch.path("settings.ini");

    {
        let mut config = open(&path).into_scoped();
        config.set_in("first", "count", 0).unwrap();
    }

    assert_eq!(open(&path).get_in("first", "count"), Value::Int(0));
}

#[test]
fn test_exact_search_respects_case_sensitivity() {
    // Arrange
    let scratch = Scratch::new();
    let mut config = open(&scratch.path("settings.ini"));
    config.set_in("places", "home", "The Place").unwrap();

    // Act
    let sensitive = config.search("the place", &SearchOptions::exact()).unwrap();
    let insensitive = config
        .search("the place", &SearchOptions::exact().ignore_case())
        .unwrap();

    // Assert
    assert!(sensitive.is_none());
    assert_eq!(
        insensitive.unwrap().as_tuple(),
        ("home", "The Place", "places")
    );
}

#[test]
fn test_fuzzy_search_tolerates_a_typo() {
    let scratch = Scratch::new();
    let mut config = open(&scratch.path("settings.ini"));
    config.set("host", "database.internal").unwrap();

    let hit = config
        .search("databse.internal", &SearchOptions::default())
        .unwrap()
        .expect("close match must be found");

    assert_eq!(hit.key, "host");
}

#[test]
fn test_search_threshold_bounds() {
    let scratch = Scratch::new();
    let config = open(&scratch.path("settings.ini"));

    for bad in [1.01, -1.0, f64::NAN] {
        let result = config.search("x", &SearchOptions::default().with_threshold(bad));
        assert!(matches!(result, Err(ConfigError::Threshold(_))));
    }
    for good in [0.0, 1.0] {
        assert!(config
            .search("x", &SearchOptions::default().with_threshold(good))
            .is_ok());
    }
}

#[test]
fn test_env_export_sets_process_variables() {
    // Arrange
    let scratch = Scratch::new();
    let mut config = open(&scratch.path("settings.ini"));
    config.set("country", "Kenya").unwrap();
    config.set_in("first", "count", 0).unwrap();

    // Act
    let count = config.to_env();

    // Assert
    assert_eq!(count, 3);
    assert_eq!(std::env::var("MAIN_COUNTRY").unwrap(), "Kenya");
    assert_eq!(std::env::var("FIRST_COUNT").unwrap(), "0");
}

#[test]
fn test_json_sink_receives_returned_text() {
    // Arrange
    let scratch = Scratch::new();
    let mut config = open(&scratch.path("settings.ini"));
    config.set_in("first", "count", 0).unwrap();
    let json_path = scratch.path("out.json");
    let mut file = fs::File::create(&json_path).unwrap();

    // Act
    let json = config.to_json(Some(&mut file)).unwrap();
    drop(file);

    // Assert
    assert_eq!(fs::read_to_string(&json_path).unwrap(), json);
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed["first"]["count"], "0");
    assert_eq!(parsed["main"]["reader"], "configreader");
}

#[test]
fn test_corrupt_file_is_a_parse_error() {
    let scratch = Scratch::new();
    let path = scratch.path("settings.ini");
    fs::write(&path, "key = value before any section\n").unwrap();

    let err = ConfigReader::open(&path).unwrap_err();

    assert!(matches!(err, ConfigError::Parse { .. }));
}

#[test]
fn test_hand_written_file_gains_main_section() {
    let scratch = Scratch::new();
    let path = scratch.path("settings.ini");
    fs::write(&path, "; comment\n[db]\nport: 5432\nurl = a\n  b\n").unwrap();

    let config = open(&path);

    assert_eq!(config.get_in("db", "port"), Value::Int(5432));
    assert_eq!(config.get_in("db", "url"), "a\nb");
    assert!(config.sections().contains("main"));
}

#[test]
fn test_value_with_blank_line_survives_commit_and_reopen() {
    // Arrange
    let scratch = Scratch::new();
    let path = scratch.path("settings.ini");
    let mut config = open(&path);

    // Act
    config
        .set_with("main", "motd", "line one\n\nline three", true)
        .unwrap();
    config.set_with("main", "after", "still here", true).unwrap();
    let reopened = open(&path);

    // Assert
    assert_eq!(reopened.get("motd"), "line one\n\nline three");
    assert_eq!(reopened.get("after"), "still here");
}

#[test]
fn test_bracket_key_survives_commit_and_reopen() {
    // Arrange
    let scratch = Scratch::new();
    let path = scratch.path("settings.ini");
    let mut config = open(&path);

    // Act
    config.set_with("main", "[x", 1, true).unwrap();
    let reopened = open(&path);

    // Assert
    assert_eq!(reopened.get("[x"), Value::Int(1));
    assert_eq!(reopened.sections().to_vec(), vec!["main"]);
}

#[test]
fn test_padded_key_is_rejected_and_file_stays_readable() {
    // Arrange
    let scratch = Scratch::new();
    let path = scratch.path("settings.ini");
    let mut config = open(&path);
    config.commit().unwrap();

    // Act
    let leading = config.set_with("main", " k", "v", true);
    let trailing = config.set_with("main", "k ", "v", true);

    // Assert
    assert!(matches!(leading, Err(ConfigError::Entry(EntryError::Key(_)))));
    assert!(matches!(trailing, Err(ConfigError::Entry(EntryError::Key(_)))));
    let reopened = open(&path);
    assert_eq!(reopened.get("reader"), "configreader");
    assert_eq!(reopened.get_items("main").len(), 1);
}

#[test]
fn test_delimiter_and_comment_keys_are_rejected() {
    let scratch = Scratch::new();
    let mut config = open(&scratch.path("settings.ini"));

    for key in ["a=b", "a:b", "a\nb", "#note", ";note", ""] {
        let result = config.set_with("main", key, "v", true);
        assert!(
            matches!(result, Err(ConfigError::Entry(_))),
            "key {key:?} must be rejected"
        );
    }
    assert!(!scratch.path("settings.ini").exists());
}

#[test]
fn test_items_keep_insertion_order_after_reopen() {
    // Arrange
    let scratch = Scratch::new();
    let path = scratch.path("settings.ini");
    let mut config = open(&path);
    config.set("zeta", 1).unwrap();
    config.set_with("main", "alpha", 2, true).unwrap();

    // Act
    let items = open(&path).get_items("main");

    // Assert
    assert_eq!(items.keys().collect::<Vec<_>>(), vec!["reader", "zeta", "alpha"]);
}
