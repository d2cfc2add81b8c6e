use std::fs;
use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

fn write_png(path: &Path, width: u32, height: u32) {
    let image = image::RgbaImage::from_pixel(width, height, image::Rgba([40, 90, 160, 255]));
    image.save(path).unwrap();
}

fn dispslide(config_dir: &Path) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_dispslide"));
    command
        .env_remove("DISPSLIDE_CONFIG")
        .env("DISPSLIDE_CONFIG_DIR", config_dir)
        .env("RUST_LOG", "warn");
    command
}

#[test]
fn config_subcommand_prints_resolved_toml() {
    let root = TempDir::new().unwrap();
    let config_path = root.path().join("slider.toml");
    fs::write(
        &config_path,
        r#"
intensity = 0.8
duration = "1s"
images = ["one.png", "two.png"]
displacement = "maps/disp.png"
cache_bust = false
"#,
    )
    .unwrap();

    let output = dispslide(root.path())
        .args(["config", "--duration", "750ms"])
        .output()
        .expect("failed to run dispslide config");
    assert!(output.status.success(), "{output:?}");

    let printed: toml::Value = toml::from_str(&String::from_utf8(output.stdout).unwrap()).unwrap();
    let intensity = printed["intensity"].as_float().unwrap();
    assert!((intensity - 0.8).abs() < 1e-6, "{intensity}");
    assert_eq!(printed["duration"].as_str(), Some("750ms"));
    assert_eq!(printed["cache_bust"].as_bool(), Some(false));

    let images = printed["images"].as_array().unwrap();
    let first = images[0].as_str().unwrap();
    assert_eq!(Path::new(first), root.path().join("one.png"));
    let displacement = printed["displacement"].as_str().unwrap();
    assert_eq!(Path::new(displacement), root.path().join("maps/disp.png"));
}

#[test]
fn explicit_config_flag_wins_over_discovery() {
    let discovered = TempDir::new().unwrap();
    fs::write(discovered.path().join("slider.toml"), "intensity = 0.1\n").unwrap();

    let explicit = TempDir::new().unwrap();
    let explicit_path = explicit.path().join("custom.toml");
    fs::write(&explicit_path, "intensity = 1.5\n").unwrap();

    let output = dispslide(discovered.path())
        .arg("config")
        .arg("--config")
        .arg(&explicit_path)
        .output()
        .unwrap();
    assert!(output.status.success(), "{output:?}");
    let printed: toml::Value = toml::from_str(&String::from_utf8(output.stdout).unwrap()).unwrap();
    assert_eq!(printed["intensity"].as_float(), Some(1.5));
}

#[test]
fn invalid_config_fails() {
    let root = TempDir::new().unwrap();
    fs::write(root.path().join("slider.toml"), "images = [\"only.png\"]\n").unwrap();

    let output = dispslide(root.path()).arg("config").output().unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("at least two images"), "{stderr}");
}

#[test]
fn assets_subcommand_reports_each_texture() {
    let root = TempDir::new().unwrap();
    let displacement = root.path().join("disp.png");
    let first = root.path().join("first.png");
    let second = root.path().join("second.png");
    write_png(&displacement, 4, 4);
    write_png(&first, 8, 2);
    write_png(&second, 3, 5);

    let output = dispslide(root.path())
        .arg("assets")
        .arg("--displacement")
        .arg(&displacement)
        .arg("--image")
        .arg(&first)
        .arg("--image")
        .arg(&second)
        .output()
        .unwrap();
    assert!(output.status.success(), "{output:?}");

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<_> = stdout.lines().collect();
    assert_eq!(
        lines,
        vec![
            "displacement 4x4 repeat",
            "slide 0 8x2 clamp",
            "slide 1 3x5 clamp"
        ]
    );
}

#[test]
fn assets_subcommand_names_the_missing_file() {
    let root = TempDir::new().unwrap();
    let displacement = root.path().join("disp.png");
    let present = root.path().join("present.png");
    let missing = root.path().join("missing.png");
    write_png(&displacement, 2, 2);
    write_png(&present, 2, 2);

    let output = dispslide(root.path())
        .arg("assets")
        .arg("--displacement")
        .arg(&displacement)
        .arg("--image")
        .arg(&present)
        .arg("--image")
        .arg(&missing)
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("missing.png"), "{stderr}");
}
