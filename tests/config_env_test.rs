use routegen::Settings;
use std::env;
use std::path::PathBuf;
use tempfile::TempDir;

// Environment variables are process-wide, so every override is checked in one test.
#[test]
fn test_env_overrides() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("settings.toml");
    std::fs::write(&config_path, "app_dir = \"from-file\"\n[watch]\ndebounce_ms = 10\n").unwrap();

    unsafe {
        // Double underscore separates nested levels
        env::set_var("RG_APP_DIR", "app");
        env::set_var("RG_WATCH__DEBOUNCE_MS", "750");
        env::remove_var("RG_DEV_MODE");
        env::remove_var("NODE_ENV");
    }

    let settings = Settings::load_from(&config_path).unwrap();
    assert_eq!(settings.app_dir, PathBuf::from("app"));
    assert_eq!(settings.watch.debounce_ms, 750);
    assert!(!settings.dev_mode);

    unsafe {
        env::set_var("NODE_ENV", "development");
    }
    let settings = Settings::load_from(&config_path).unwrap();
    assert!(settings.dev_mode);

    unsafe {
        env::set_var("NODE_ENV", "production");
    }
    let settings = Settings::load_from(&config_path).unwrap();
    assert!(!settings.dev_mode);

    unsafe {
        env::remove_var("RG_APP_DIR");
        env::remove_var("RG_WATCH__DEBOUNCE_MS");
        env::remove_var("NODE_ENV");
    }

    let settings = Settings::load_from(&config_path).unwrap();
    assert_eq!(settings.app_dir, PathBuf::from("from-file"));
    assert_eq!(settings.watch.debounce_ms, 10);
}
