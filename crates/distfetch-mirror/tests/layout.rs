use std::fs;

use distfetch_mirror::{
    HashAlgo, Layout, LayoutCache, MirrorCatalog, MirrorLayoutConfig, MirrorUrl,
};
use distfetch_settings::{MapSettings, load_custom_mirrors};

#[test]
fn test_filesystem_mirror_from_custom_mirrors_uses_its_layout() {
    let root = tempfile::Builder::new()
        .prefix("distfetch-root-")
        .tempdir()
        .expect("Failed to create temp dir");
    let mirror = tempfile::Builder::new()
        .prefix("distfetch-mirror-")
        .tempdir()
        .expect("Failed to create temp dir");

    fs::create_dir_all(root.path().join("etc/portage")).unwrap();
    fs::write(
        root.path().join("etc/portage/mirrors"),
        format!("local {}/ http://lan.example/\n", mirror.path().display()),
    )
    .unwrap();
    fs::write(
        mirror.path().join("layout.conf"),
        "[structure]\n0=filename-hash BLAKE2B 8\n1=filename-hash SHA256 8:8\n2=flat\n",
    )
    .unwrap();

    let custom = load_custom_mirrors(root.path()).expect("mirrors file should parse");
    let settings = MapSettings::builder()
        .var("GENTOO_MIRRORS", "https://pub.example")
        .build();
    let catalog = MirrorCatalog::from_settings(&settings, &custom, true);

    let base = mirror.path().to_string_lossy().into_owned();
    assert_eq!(catalog.fsmirrors(), [base.clone()]);
    assert_eq!(catalog.local(), ["http://lan.example"]);
    assert_eq!(catalog.public(), ["https://pub.example"]);

    let config = MirrorLayoutConfig::read_from_file(mirror.path().join("layout.conf")).unwrap();
    assert_eq!(
        config.best_supported_layout(),
        Layout::FilenameHash {
            algo:    HashAlgo::Sha256,
            cutoffs: vec![8, 8],
        }
    );

    let digest = HashAlgo::Sha256.hex_digest(b"pkg-1.0.tar.xz");
    let resolved = MirrorUrl::new(base, "pkg-1.0.tar.xz", None).resolve(&LayoutCache::new());
    assert_eq!(
        resolved,
        mirror
            .path()
            .join(&digest[..2])
            .join(&digest[2..4])
            .join("pkg-1.0.tar.xz")
            .to_string_lossy()
    );
}

#[test]
fn test_remote_mirror_without_known_layout_is_flat() {
    let url = MirrorUrl::new("ftp://ftp.example/pub", "a file.tgz", None);
    assert_eq!(
        url.resolve(&LayoutCache::new()),
        "ftp://ftp.example/pub/distfiles/a%20file.tgz"
    );
}
