use std::sync::Arc;

use serde_json::{Value, json};
use serial_test::serial;
use webwin::{Bridge, fs::FileSystem};

fn fs_bridge() -> Bridge {
    let mut builder = Bridge::builder();
    builder
        .expose_object(Arc::new(FileSystem), Some("fs"))
        .unwrap();
    builder.build().unwrap()
}

fn call(bridge: &Bridge, name: &str, args: &Value) -> Value {
    let res = bridge.dispatch(name, &args.to_string()).unwrap();
    serde_json::from_str(&res).unwrap()
}

fn workdir() -> (tempfile::TempDir, String) {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a.txt"), "alpha").unwrap();
    std::fs::write(dir.path().join("b.html"), "<html></html>").unwrap();
    std::fs::create_dir(dir.path().join("sub")).unwrap();
    let path = dir.path().to_str().unwrap().to_string();
    (dir, path)
}

#[test]
fn test_exposed_names() {
    assert_eq!(
        fs_bridge().dispatcher().names(),
        vec![
            "fs.get_roots",
            "fs.ls",
            "fs.cwd",
            "fs.readfile",
            "fs.writefile",
            "fs.removefile"
        ]
    );
}

#[test]
fn test_get_roots() {
    let res = call(&fs_bridge(), "fs.get_roots", &json!([]));
    assert_eq!(res["status"], "succ");
    if cfg!(windows) {
        assert!(!res["retval"].as_array().unwrap().is_empty());
    } else {
        assert_eq!(res["retval"], json!(["/"]));
    }
}

#[test]
fn test_ls() {
    let (_dir, path) = workdir();
    let bridge = fs_bridge();

    let res = call(&bridge, "fs.ls", &json!([path]));
    let names: Vec<&str> = res["retval"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["a.txt", "b.html", "sub"]);

    let entry = &res["retval"][0];
    assert_eq!(entry["type"], "file");
    assert_eq!(entry["size"], 5);
    assert!(entry["fullpath"].as_str().unwrap().ends_with("a.txt"));
    assert_eq!(entry["mtime"].as_str().unwrap().len(), "2024-01-01 00:00:00".len());

    let res = call(&bridge, "fs.ls", &json!([path, "*.html"]));
    assert_eq!(res["retval"].as_array().unwrap().len(), 1);
    assert_eq!(res["retval"][0]["name"], "b.html");

    let res = call(&bridge, "fs.ls", &json!([path, "?.txt"]));
    assert_eq!(res["retval"][0]["name"], "a.txt");

    let res = call(&bridge, "fs.ls", &json!([path, "", "DIR"]));
    assert_eq!(res["retval"].as_array().unwrap().len(), 1);
    assert_eq!(res["retval"][0]["name"], "sub");
}

#[cfg(unix)]
#[test]
fn test_ls_links_report_their_target() {
    let (dir, path) = workdir();
    std::os::unix::fs::symlink(dir.path().join("a.txt"), dir.path().join("link.txt")).unwrap();
    std::os::unix::fs::symlink(dir.path().join("gone"), dir.path().join("dangling")).unwrap();
    let bridge = fs_bridge();

    let res = call(&bridge, "fs.ls", &json!([path, "", "file"]));
    let files: Vec<&str> = res["retval"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["name"].as_str().unwrap())
        .collect();
    assert_eq!(files, vec!["a.txt", "b.html", "link.txt"]);

    let res = call(&bridge, "fs.ls", &json!([path, "", "symlink"]));
    assert_eq!(res["retval"].as_array().unwrap().len(), 1);
    assert_eq!(res["retval"][0]["name"], "dangling");
}

#[test]
fn test_ls_missing_dir() {
    let (_dir, path) = workdir();
    let res = call(&fs_bridge(), "fs.ls", &json!([format!("{path}/a.txt")]));
    assert_eq!(res["status"], "fail");
    assert!(res["msg"].as_str().unwrap().contains("Directory not found"));
}

#[test]
fn test_read_write_remove() {
    let (_dir, path) = workdir();
    let bridge = fs_bridge();
    let file = format!("{path}/notes.txt");

    let res = call(&bridge, "fs.writefile", &json!([file, "héllo"]));
    assert_eq!(res["retval"], 5);
    let res = call(&bridge, "fs.writefile", &json!([file, " world", "a"]));
    assert_eq!(res["retval"], 6);

    let res = call(&bridge, "fs.readfile", &json!([file]));
    assert_eq!(res["retval"], "héllo world");

    let res = call(&bridge, "fs.writefile", &json!([file, "x", "z"]));
    assert_eq!(res["status"], "fail");

    let res = call(&bridge, "fs.readfile", &json!([file, "latin-1"]));
    assert_eq!(res["status"], "fail");
    assert!(res["msg"].as_str().unwrap().contains("Unsupported encoding"));

    let res = call(&bridge, "fs.removefile", &json!([file]));
    assert_eq!(res, json!({"status": "succ", "retval": null}));
    assert!(!std::path::Path::new(&file).exists());

    let res = call(&bridge, "fs.removefile", &json!([file]));
    assert_eq!(res["status"], "fail");
    let res = call(&bridge, "fs.readfile", &json!([file]));
    assert_eq!(res["status"], "fail");
}

#[test]
fn test_readfile_strips_bom() {
    let (_dir, path) = workdir();
    let file = format!("{path}/bom.txt");
    std::fs::write(&file, "\u{feff}text").unwrap();
    assert_eq!(
        FileSystem.readfile(&file, None).unwrap(),
        "text"
    );
}

#[test]
#[serial]
fn test_cwd() {
    let (dir, _) = workdir();
    let previous = std::env::current_dir().unwrap();
    std::env::set_current_dir(dir.path()).unwrap();

    let res = call(&fs_bridge(), "fs.cwd", &json!([]));
    std::env::set_current_dir(previous).unwrap();

    let cwd = std::path::PathBuf::from(res["retval"].as_str().unwrap());
    assert_eq!(
        cwd.canonicalize().unwrap(),
        dir.path().canonicalize().unwrap()
    );
}
