#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use periodical_engine::{CompileError, Compiler, KindlegenCompiler};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

/// Writes an executable stand-in for kindlegen that records its arguments
/// next to the manifest and, when `produce` is set, creates `book.mobi`.
fn fake_kindlegen(dir: &Path, name: &str, produce: bool) -> PathBuf {
    let mut script = String::from(
        "#!/bin/sh\nmanifest=\"$2\"\nprintf '%s\\n' \"$@\" > \"$(dirname \"$manifest\")/args.txt\"\n",
    );
    if produce {
        script.push_str("printf 'MOBI' > \"${manifest%.opf}.mobi\"\n");
    }
    let path = dir.join(name);
    fs::write(&path, script).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn book(dir: &Path) -> PathBuf {
    let book = dir.join("book");
    fs::create_dir_all(&book).unwrap();
    let manifest = book.join("book.opf");
    fs::write(&manifest, "<package/>").unwrap();
    manifest
}

// Single test: scripts must not be written while another test spawns.
#[test]
fn kindlegen_is_invoked_with_verbose_flag_and_manifest() {
    let temp = TempDir::new().unwrap();
    let working = fake_kindlegen(temp.path(), "kindlegen-ok", true);
    let silent = fake_kindlegen(temp.path(), "kindlegen-silent", false);

    let run = temp.path().join("run");
    let manifest = book(&run);
    let output = KindlegenCompiler::new(&working)
        .compile(&manifest, false)
        .unwrap();

    assert_eq!(output, manifest.with_extension("mobi"));
    assert_eq!(fs::read(&output).unwrap(), b"MOBI");
    let args = fs::read_to_string(manifest.with_file_name("args.txt")).unwrap();
    assert_eq!(
        args.lines().collect::<Vec<_>>(),
        vec!["-verbose", manifest.to_str().unwrap()]
    );

    let empty = temp.path().join("empty");
    let manifest = book(&empty);
    let err = KindlegenCompiler::new(&silent)
        .compile(&manifest, true)
        .unwrap_err();
    match err {
        CompileError::MissingOutput(path) => assert_eq!(path, manifest.with_extension("mobi")),
        other => panic!("unexpected error: {other}"),
    }
    assert!(manifest.with_file_name("args.txt").is_file());

    let err = KindlegenCompiler::new(temp.path().join("no-such-kindlegen"))
        .compile(&manifest, false)
        .unwrap_err();
    assert!(matches!(err, CompileError::Spawn { .. }));
}
