//! Integration tests for the shaderstack binary
//!
//! Each test writes sources into a temp dir, runs the CLI there and checks
//! the files or text it produces.

use std::path::Path;
use std::process::{Command, Output};
use tempfile::tempdir;

const SLIM: &str = "BEGIN_OPTIONS
END_OPTIONS

BEGIN_PROPERTIES
   _Color (\"Color\", Color) = (1, 1, 1, 1)
END_PROPERTIES

BEGIN_CBUFFER
   half4 _Color;
END_CBUFFER

BEGIN_CODE
   void SurfaceFunction(inout Surface o, ShaderData d)
   {
      o.Albedo = _Color.rgb;
   }
END_CODE
";

fn shaderstack(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_shaderstack"))
        .current_dir(dir)
        .args(args)
        .output()
        .expect("Failed to run shaderstack")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_build_to_stdout() {
    let dir = tempdir().expect("Failed to create temp dir");
    std::fs::write(dir.path().join("Water.surfshader"), SLIM).expect("Failed to write source");

    let output = shaderstack(dir.path(), &["build", "Water.surfshader", "-p", "URP2020"]);
    assert!(output.status.success(), "build failed: {:?}", output);

    let shader = stdout(&output);
    assert!(shader.contains("Shader \"ShaderStack/Water\""));
    assert!(shader.contains("#define _URP 1"));
    assert!(shader.contains("Render Pipeline: URP2020"));
}

#[test]
fn test_build_with_name_and_materials() {
    let dir = tempdir().expect("Failed to create temp dir");
    std::fs::write(dir.path().join("Water.surfshader"), SLIM).expect("Failed to write source");

    let output = shaderstack(
        dir.path(),
        &[
            "build",
            "Water.surfshader",
            "-o",
            "out/Water.shader",
            "--name",
            "Custom/Water",
            "--materials",
        ],
    );
    assert!(output.status.success(), "build failed: {:?}", output);

    let shader = std::fs::read_to_string(dir.path().join("out/Water.shader"))
        .expect("Failed to read output");
    assert!(shader.contains("Shader \"Custom/Water\""));
    assert!(shader.contains("#define _STANDARD 1"));

    let json = std::fs::read_to_string(dir.path().join("out/Water.materials.json"))
        .expect("Failed to read sub-materials");
    assert!(json.contains("_Color"));
}

#[test]
fn test_config_sets_pipeline_and_name() {
    let dir = tempdir().expect("Failed to create temp dir");
    std::fs::write(dir.path().join("Water.surfshader"), SLIM).expect("Failed to write source");
    std::fs::write(
        dir.path().join("shaderstack.toml"),
        "[build]\npipeline = \"HDRP2020\"\n\n[overrides]\nshader_name = \"FromConfig/Water\"\n",
    )
    .expect("Failed to write config");

    let output = shaderstack(dir.path(), &["build", "Water.surfshader"]);
    assert!(output.status.success(), "build failed: {:?}", output);

    let shader = stdout(&output);
    assert!(shader.contains("#define _HDRP 1"));
    assert!(shader.contains("Shader \"FromConfig/Water\""));
}

#[test]
fn test_export_writes_every_pipeline() {
    let dir = tempdir().expect("Failed to create temp dir");
    std::fs::write(dir.path().join("Water.surfshader"), SLIM).expect("Failed to write source");

    let output = shaderstack(dir.path(), &["export", "Water.surfshader", "-o", "generated"]);
    assert!(output.status.success(), "export failed: {:?}", output);

    for name in ["Standard", "URP2019", "URP2020", "HDRP2019", "HDRP2020"] {
        let path = dir.path().join(format!("generated/Water_{name}.shader"));
        assert!(path.exists(), "{} should exist", path.display());
    }
}

#[test]
fn test_build_failure_exits_nonzero() {
    let dir = tempdir().expect("Failed to create temp dir");
    std::fs::write(
        dir.path().join("Broken.surfshader"),
        "BEGIN_CODE\n   void SurfaceFunction(inout Surface o, ShaderData d) {}\n",
    )
    .expect("Failed to write source");

    let output = shaderstack(dir.path(), &["build", "Broken.surfshader"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("END_CODE"), "unexpected stderr: {}", stderr);
}

#[test]
fn test_includes_lists_merge_order() {
    let dir = tempdir().expect("Failed to create temp dir");
    std::fs::write(dir.path().join("Layer.surfshader"), SLIM).expect("Failed to write layer");
    std::fs::write(
        dir.path().join("Root.surfshader"),
        "BEGIN_SUBSHADERS\n   \"Layer.surfshader\"\n   \"Missing.surfshader\"\nEND_SUBSHADERS\n",
    )
    .expect("Failed to write root");

    let output = shaderstack(dir.path(), &["includes", "Root.surfshader"]);
    assert!(output.status.success(), "includes failed: {:?}", output);

    let text = stdout(&output);
    let root = text.find("Root.surfshader").expect("root listed");
    let layer = text.find("Layer.surfshader").expect("layer listed");
    // Includes merge ahead of the file that lists them
    assert!(layer < root);
    assert!(text.contains("warning: include 'Missing.surfshader'"));
}

#[test]
fn test_new_then_build() {
    let dir = tempdir().expect("Failed to create temp dir");

    let output = shaderstack(dir.path(), &["new", "Fresh", "--documented"]);
    assert!(output.status.success(), "new failed: {:?}", output);
    assert!(dir.path().join("Fresh.surfshader").exists());

    // Refuses to overwrite without --force
    let again = shaderstack(dir.path(), &["new", "Fresh.surfshader"]);
    assert!(!again.status.success());

    let build = shaderstack(dir.path(), &["build", "Fresh.surfshader", "-p", "URP2019"]);
    assert!(build.status.success(), "build failed: {:?}", build);
}

#[test]
fn test_locate_maps_line_to_source() {
    let dir = tempdir().expect("Failed to create temp dir");
    std::fs::write(dir.path().join("Water.surfshader"), SLIM).expect("Failed to write source");

    let build = shaderstack(dir.path(), &["build", "Water.surfshader", "-o", "Water.shader"]);
    assert!(build.status.success(), "build failed: {:?}", build);

    let shader =
        std::fs::read_to_string(dir.path().join("Water.shader")).expect("Failed to read output");
    let line = shader
        .lines()
        .position(|l| l.contains("o.Albedo = _Color.rgb;"))
        .expect("user code present")
        + 1;

    let output = shaderstack(
        dir.path(),
        &[
            "locate",
            "Water.surfshader",
            "--generated",
            "Water.shader",
            "--line",
            &line.to_string(),
            "--message",
            "undeclared identifier",
        ],
    );
    assert!(output.status.success(), "locate failed: {:?}", output);

    let report = stdout(&output);
    assert!(report.contains("undeclared identifier"));
    assert!(report.contains("Water.surfshader at line 15"), "report: {}", report);
}
