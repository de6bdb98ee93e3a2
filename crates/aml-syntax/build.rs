//! Turns every `src/fixtures/*.aml` message into its own `#[test]`, so a
//! lexer regression names the fixture that broke instead of one shared test.

use std::fmt::Write as _;
use std::path::Path;

const FIXTURES: &str = "src/fixtures";

fn main() {
    let out_dir = std::env::var("OUT_DIR").unwrap();

    let mut names: Vec<String> = std::fs::read_dir(FIXTURES)
        .unwrap()
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "aml"))
        .filter_map(|path| path.file_stem()?.to_str().map(str::to_owned))
        .collect();
    names.sort();

    let mut code = String::from("mod lex_fixtures {\n    use super::fixture_test;\n");
    for name in &names {
        writeln!(
            code,
            "\n    #[test]\n    fn {name}() {{\n        fixture_test(\"{name}\");\n    }}"
        )
        .unwrap();
    }
    code.push_str("}\n");

    std::fs::write(Path::new(&out_dir).join("fixture_tests.rs"), code).unwrap();

    // New or edited messages must regenerate the test list.
    println!("cargo::rerun-if-changed={FIXTURES}");
}
