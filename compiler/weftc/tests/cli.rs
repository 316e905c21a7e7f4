//! End-to-end runs of the CLI entry point against a temporary directory.

#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use std::fs;
use std::path::Path;

use pretty_assertions::assert_eq;
use weft_diagnostic::emitter::ColorMode;
use weftc::{output_path, parse_args, run, Command, Options, EXIT_FAILURE};

const UI: &str = "\
#include \"ui.h\"
class Widget {
    show: []() -> void;
}
class Button {
    deriving Wrappable;
    cast from Widget;
    virtual click: [](int) -> void;
}
inline:
int answer() { return 42; }
";

fn options(dir: &Path, inputs: &[&str]) -> Options {
    let mut args = vec!["--color=never".to_owned(), dir.join("ui").display().to_string()];
    args.extend(inputs.iter().map(|name| dir.join(name).display().to_string()));
    match parse_args(&args).unwrap() {
        Command::Compile(options) => options,
        Command::Help => panic!("unexpected help"),
    }
}

fn run_to_string(options: &Options) -> (i32, String) {
    let mut stderr = Vec::new();
    let code = run(options, &mut stderr, false);
    (code, String::from_utf8(stderr).unwrap())
}

#[test]
fn writes_all_three_outputs() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("ui.idl"), UI).unwrap();

    let (code, stderr) = run_to_string(&options(dir.path(), &["ui.idl"]));
    assert_eq!(code, 0, "{stderr}");
    assert!(stderr.is_empty());

    let base = dir.path().join("ui");
    let source = fs::read_to_string(output_path(&base, ".cpp")).unwrap();
    assert!(source.contains("#include \"ui.h\""));
    assert!(source.ends_with("int answer() { return 42; }\n"));
    assert!(fs::read_to_string(output_path(&base, ".json"))
        .unwrap()
        .contains("\"Button_of_Widget\""));
    assert!(fs::read_to_string(output_path(&base, ".linkage.json"))
        .unwrap()
        .contains("\"__link_vtbl_Button\""));
}

#[test]
fn nothing_is_written_on_error() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("ui.idl"), UI).unwrap();
    fs::write(
        dir.path().join("bad.idl"),
        "class Broken {\n    f: [](Ghost) -> void;\n}\n",
    )
    .unwrap();

    let (code, stderr) = run_to_string(&options(dir.path(), &["ui.idl", "bad.idl"]));
    assert_eq!(code, EXIT_FAILURE);
    assert!(stderr.starts_with("error[E2003]: unknown type `Ghost`"), "{stderr}");

    let base = dir.path().join("ui");
    for suffix in [".json", ".cpp", ".linkage.json"] {
        assert!(!output_path(&base, suffix).exists());
    }
}

#[test]
fn warnings_do_not_fail_the_run() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.idl"), "class A {\n    f: []() -> void;\n").unwrap();

    let (code, stderr) = run_to_string(&options(dir.path(), &["a.idl"]));
    assert_eq!(code, 0);
    assert!(stderr.starts_with("warning[W1001]"), "{stderr}");
    assert!(output_path(&dir.path().join("ui"), ".cpp").exists());
}

#[test]
fn unreadable_input_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stderr) = run_to_string(&options(dir.path(), &["missing.idl"]));
    assert_eq!(code, EXIT_FAILURE);
    assert!(stderr.starts_with("error[E0002]: could not read"), "{stderr}");
}

#[test]
fn unwritable_output_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("ui.idl"), UI).unwrap();
    let mut options = options(dir.path(), &["ui.idl"]);
    options.basename = dir.path().join("no_such_dir").join("ui");

    let (code, stderr) = run_to_string(&options);
    assert_eq!(code, EXIT_FAILURE);
    assert!(stderr.starts_with("error[E0003]: could not write"), "{stderr}");
}

#[test]
fn existing_outputs_are_replaced() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("ui.idl"), UI).unwrap();
    let cpp = output_path(&dir.path().join("ui"), ".cpp");
    fs::write(&cpp, "stale").unwrap();

    let (code, _) = run_to_string(&options(dir.path(), &["ui.idl"]));
    assert_eq!(code, 0);
    assert!(fs::read_to_string(cpp).unwrap().starts_with("// Workaround"));
}

#[test]
fn auto_color_follows_the_terminal() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.idl"), "class A {\n    f: []() -> void;\n").unwrap();
    let mut options = options(dir.path(), &["a.idl"]);
    options.color = ColorMode::Auto;

    let mut stderr = Vec::new();
    assert_eq!(run(&options, &mut stderr, true), 0);
    let colored = String::from_utf8(stderr).unwrap();
    assert!(colored.starts_with("\x1b[1;33mwarning"), "{colored:?}");

    let (code, plain) = run_to_string(&options);
    assert_eq!(code, 0);
    assert!(plain.starts_with("warning[W1001]"), "{plain}");
}
