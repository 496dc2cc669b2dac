use std::fs;

use distfetch_settings::{Settings, SettingsProfile};

#[test]
fn test_load_profile_from_disk() {
    let dir = tempfile::Builder::new()
        .prefix("distfetch-profile-")
        .tempdir()
        .expect("Failed to create temp dir");
    let path = dir.path().join("fetch.toml");
    fs::write(
        &path,
        r#"
features = "distlocks -distlocks skiprocheck"

[vars]
DISTDIR = "/var/cache/distfiles"
GENTOO_MIRRORS = "https://a.example https://b.example"
PORTAGE_FETCH_RESUME_MIN_SIZE = "20K"

[thirdpartymirrors]
sourceforge = ["https://downloads.sourceforge.net"]
"#,
    )
    .expect("Failed to write profile");

    let settings = SettingsProfile::load_file(&path).expect("profile should load");

    assert_eq!(settings.get("DISTDIR"), Some("/var/cache/distfiles"));
    assert_eq!(settings.get("PORTAGE_FETCH_RESUME_MIN_SIZE"), Some("20K"));
    assert!(!settings.features().contains("distlocks"));
    assert!(settings.features().contains("skiprocheck"));
    assert_eq!(
        settings.thirdpartymirrors()["sourceforge"],
        vec!["https://downloads.sourceforge.net".to_string()]
    );
}

#[test]
fn test_missing_profile_is_empty() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let settings =
        SettingsProfile::load_file(dir.path().join("absent.toml")).expect("missing file is empty");

    assert!(settings.features().is_empty());
    assert!(settings.thirdpartymirrors().is_empty());
    assert!(settings.get("DISTDIR").is_none());
}
