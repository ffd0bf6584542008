use std::fs;
use std::path::PathBuf;

use tasktree::config::{local_config_path, Settings, LOCAL_CONFIG_FILE};
use tasktree::domain::DEFAULT_ORDER_COLUMN;
use tasktree::util::testing;
use tempfile::TempDir;

#[ctor::ctor]
fn init() {
    testing::init_test_setup();
}

#[test]
fn given_defaults_when_created_then_order_column_is_task_id() {
    let settings = Settings::default();
    assert_eq!(settings.order_column, DEFAULT_ORDER_COLUMN);
    assert!(settings.base_dir.ends_with(".tasktree"));
    assert!(settings.lists_dir().ends_with(".tasktree/lists"));
}

#[test]
fn given_directory_when_building_local_path_then_dotfile_inside() {
    let path = local_config_path(&PathBuf::from("/work"));
    assert_eq!(path, PathBuf::from("/work").join(LOCAL_CONFIG_FILE));
}

#[test]
fn given_local_config_when_loading_then_local_values_win() {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("data");
    fs::write(
        local_config_path(dir.path()),
        format!(
            "base_dir = \"{}\"\norder_column = \"t.id\"\n",
            data.display()
        ),
    )
    .unwrap();

    let settings = Settings::load(Some(dir.path())).unwrap();
    assert_eq!(settings.base_dir, data);
    assert_eq!(settings.order_column, "t.id");
}

#[test]
fn given_partial_local_config_when_loading_then_other_values_inherited() {
    let dir = TempDir::new().unwrap();
    fs::write(local_config_path(dir.path()), "order_column = \"x._id\"\n").unwrap();

    let settings = Settings::load(Some(dir.path())).unwrap();
    assert_eq!(settings.order_column, "x._id");
    assert!(!settings.base_dir.as_os_str().is_empty());
}

#[test]
fn given_tilde_in_base_dir_when_loading_then_expanded() {
    let dir = TempDir::new().unwrap();
    fs::write(local_config_path(dir.path()), "base_dir = \"~/tt-data\"\n").unwrap();

    let settings = Settings::load(Some(dir.path())).unwrap();
    assert!(!settings.base_dir.starts_with("~"));
    assert!(settings.base_dir.ends_with("tt-data"));
}

#[test]
fn given_invalid_toml_when_loading_then_config_error() {
    let dir = TempDir::new().unwrap();
    fs::write(local_config_path(dir.path()), "order_column = [\n").unwrap();

    let err = Settings::load(Some(dir.path())).unwrap_err();
    assert!(err.to_string().starts_with("config error:"), "{err}");
}

#[test]
fn given_settings_when_rendering_toml_then_parses_back() {
    let settings = Settings {
        base_dir: PathBuf::from("/var/lib/tasktree"),
        order_column: "t.id".into(),
    };
    let text = settings.to_toml().unwrap();
    let parsed: Settings = toml::from_str(&text).unwrap();
    assert_eq!(parsed, settings);
}
