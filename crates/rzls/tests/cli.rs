use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::Command;
use std::process::Output;
use std::process::Stdio;

const COMPILATION: &str = r#"{
    "assembly": {
        "name": "App",
        "types": [
            {
                "name": "Counter",
                "namespace": "App.Pages",
                "base_type": {"kind": "named", "name": "Microsoft.AspNetCore.Components.ComponentBase"},
                "properties": [
                    {
                        "name": "Start",
                        "type": {"kind": "named", "name": "System.Int32"},
                        "attributes": [{"class": "Microsoft.AspNetCore.Components.ParameterAttribute"}]
                    }
                ]
            }
        ]
    },
    "references": [
        {
            "name": "Microsoft.AspNetCore.Components",
            "types": [
                {"name": "IComponent", "namespace": "Microsoft.AspNetCore.Components", "kind": "interface"},
                {
                    "name": "ComponentBase",
                    "namespace": "Microsoft.AspNetCore.Components",
                    "is_abstract": true,
                    "interfaces": [{"kind": "named", "name": "Microsoft.AspNetCore.Components.IComponent"}]
                }
            ]
        }
    ]
}"#;

fn rzls_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_rzls"))
}

fn rzls(dir: &Path, args: &[&str]) -> Output {
    Command::new(rzls_binary())
        .args(args)
        .current_dir(dir)
        .stdin(Stdio::null())
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn write_page(dir: &Path, name: &str, source: &str) -> PathBuf {
    let pages = dir.join("Pages");
    std::fs::create_dir_all(&pages).unwrap();
    let path = pages.join(name);
    std::fs::write(&path, source).unwrap();
    path
}

#[test]
fn fmt_rewrites_documents() {
    let dir = tempfile::tempdir().unwrap();
    let page = write_page(
        dir.path(),
        "Index.razor",
        "<div>\n<p>@message</p>\n</div>\n@code {\nstring message = \"hi\";\n}\n",
    );

    let output = rzls(dir.path(), &["fmt", "Pages"]);
    assert!(
        output.status.success(),
        "Expected exit 0, got {:?}\nstdout: {}\nstderr: {}",
        output.status.code(),
        stdout(&output),
        stderr(&output),
    );
    assert_eq!(
        std::fs::read_to_string(page).unwrap(),
        "<div>\n    <p>@message</p>\n</div>\n@code {\n    string message = \"hi\";\n}\n"
    );
    assert!(stdout(&output).contains("Reformatted 1 file."));
}

#[test]
fn fmt_check_prints_a_diff() {
    let dir = tempfile::tempdir().unwrap();
    let source = "<ul>\n<li>one</li>\n</ul>\n";
    let page = write_page(dir.path(), "List.cshtml", source);

    let output = rzls(dir.path(), &["fmt", "--check", "Pages"]);
    assert_eq!(output.status.code(), Some(1));
    let diff = stdout(&output);
    assert!(diff.contains("-<li>one</li>"), "{diff}");
    assert!(diff.contains("+    <li>one</li>"), "{diff}");
    assert!(stderr(&output).contains("Would reformat 1 file."));
    assert_eq!(std::fs::read_to_string(page).unwrap(), source);
}

#[test]
fn fmt_check_passes_on_formatted_documents() {
    let dir = tempfile::tempdir().unwrap();
    write_page(dir.path(), "Done.razor", "<ul>\n    <li>one</li>\n</ul>\n");

    let output = rzls(dir.path(), &["fmt", "--check", "Pages"]);
    assert!(output.status.success(), "{}", stdout(&output));
    assert!(stdout(&output).is_empty());
}

#[test]
fn fmt_reports_syntax_errors() {
    let dir = tempfile::tempdir().unwrap();
    let source = "<div>\n<p>hi</p>\n";
    let page = write_page(dir.path(), "Broken.razor", source);

    let output = rzls(dir.path(), &["fmt", "Pages"]);
    assert_eq!(output.status.code(), Some(1));
    let out = stdout(&output);
    assert!(out.contains("RZ1006"), "Expected RZ1006 in output:\n{out}");
    assert!(out.contains("Broken.razor"), "{out}");
    assert!(stderr(&output).contains("Found 1 syntax error in 1 file."));
    assert_eq!(std::fs::read_to_string(page).unwrap(), source);
}

#[test]
fn fmt_reads_stdin() {
    let dir = tempfile::tempdir().unwrap();
    let mut child = Command::new(rzls_binary())
        .args(["fmt", "--stdin"])
        .current_dir(dir.path())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"@code {\n public class Foo{}\n}\n")
        .unwrap();
    let output = child.wait_with_output().unwrap();

    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), "@code {\n    public class Foo { }\n}\n");
}

#[test]
fn fmt_uses_project_settings() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("rzls.toml"),
        "[format]\ninsert_spaces = false\n",
    )
    .unwrap();
    let page = write_page(dir.path(), "Tabs.razor", "<div>\n<p>x</p>\n</div>\n");

    let output = rzls(dir.path(), &["fmt", "Pages"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(
        std::fs::read_to_string(page).unwrap(),
        "<div>\n\t<p>x</p>\n</div>\n"
    );
}

#[test]
fn invalid_settings_fail() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("rzls.toml"), "[format]\ntab_size = \"wide\"\n").unwrap();

    let output = rzls(dir.path(), &["fmt", "--check", "."]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Failed to load settings"));
}

#[test]
fn taghelpers_lists_components() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("compilation.json"), COMPILATION).unwrap();

    let output = rzls(dir.path(), &["taghelpers", "compilation.json", "--assembly", "App"]);
    assert!(output.status.success(), "{}", stderr(&output));
    let listing = stdout(&output);
    assert!(listing.contains("Components.Component"), "{listing}");
    assert!(listing.contains("<Counter>"), "{listing}");
    assert!(listing.contains("<App.Pages.Counter>"), "{listing}");
}

#[test]
fn taghelpers_json_output() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("compilation.json"), COMPILATION).unwrap();

    let output = rzls(
        dir.path(),
        &["taghelpers", "compilation.json", "--json", "--assembly", "App"],
    );
    assert!(output.status.success(), "{}", stderr(&output));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let descriptors = value.as_array().unwrap();
    assert!(!descriptors.is_empty());
    assert!(descriptors
        .iter()
        .all(|descriptor| descriptor["assembly_name"] == "App"));
}

#[test]
fn taghelpers_unknown_assembly() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("compilation.json"), COMPILATION).unwrap();

    let output = rzls(dir.path(), &["taghelpers", "compilation.json", "--assembly", "Nope"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Assembly 'Nope' is not part of the compilation"));
}

#[test]
fn quiet_conflicts_with_verbose() {
    let dir = tempfile::tempdir().unwrap();
    let output = rzls(dir.path(), &["-q", "-v", "fmt", "."]);
    assert_eq!(output.status.code(), Some(2));
}
