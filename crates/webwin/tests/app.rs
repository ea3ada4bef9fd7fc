use std::net::TcpListener;

use camino::{Utf8Path, Utf8PathBuf};
use serde_json::json;
use similar_asserts::assert_eq;
use webwin::{
    Function, MemoryChannel,
    app::{LaunchStatus, WebWinApp, normalize},
};
use webwin_config::{Config, paths::ProgramPaths};

const MAIN_PAGE: &str = r#"<html><head><title>demo</title></head><body>
<script src="lib/debug.js"></script>
<script src="app.js"></script>
</body></html>"#;

struct Fixture {
    _dir: tempfile::TempDir,
    root: Utf8PathBuf,
}

fn fixture() -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
    std::fs::create_dir(root.join("ui")).unwrap();
    std::fs::write(root.join("ui/index.html"), MAIN_PAGE).unwrap();
    std::fs::write(root.join("init.js"), "window.inited = true;").unwrap();
    Fixture { _dir: dir, root }
}

fn app(fx: &Fixture, edit: impl FnOnce(&mut Config)) -> WebWinApp {
    let mut cfg = Config::default();
    cfg.name = "demo".into();
    cfg.window.webroot = "ui".into();
    edit(&mut cfg);

    let paths = ProgramPaths::from_parts(&fx.root.join("bin/demo"), &fx.root);
    WebWinApp::new(cfg, paths)
}

#[test]
fn test_normalize() {
    assert_eq!(
        normalize(Utf8Path::new("/a/./b/../c")),
        Utf8PathBuf::from("/a/c")
    );
    assert_eq!(normalize(Utf8Path::new("a/../../b")), Utf8PathBuf::from("../b"));
    assert_eq!(normalize(Utf8Path::new("../../x")), Utf8PathBuf::from("../../x"));
    assert_eq!(normalize(Utf8Path::new("/..")), Utf8PathBuf::from("/"));
    assert_eq!(normalize(Utf8Path::new("/a/../../b")), Utf8PathBuf::from("/b"));
    assert_eq!(normalize(Utf8Path::new("./")), Utf8PathBuf::new());
}

#[test]
fn test_settings_resolve_webroot() {
    let fx = fixture();
    assert_eq!(app(&fx, |_| {}).settings().webroot, fx.root.join("ui"));

    let bundled = app(&fx, |cfg| cfg.window.webroot_bundled = true);
    assert_eq!(bundled.settings().webroot, fx.root.join("bin/ui"));
}

#[test]
fn test_run_shows_main_page() {
    let fx = fixture();
    let app = app(&fx, |cfg| {
        cfg.del_js = vec!["debug.js".into()];
        cfg.run_js = vec!["init.js".into(), "missing.js".into()];
    });

    let launched = app.run(MemoryChannel::new()).unwrap();
    assert_eq!(launched.status, LaunchStatus::MainPage);

    let channel = launched.window.channel();
    let doc = channel.last_document().unwrap();
    assert!(doc.contains(r#"<!-- <script src="lib/debug.js"></script> -->"#));
    assert!(doc.contains(r#"<script src="app.js"></script>"#));
    assert!(doc.contains(r#"<script src="/webui.js"></script>"#));
    assert!(doc.contains("fs: {\n"));
    assert!(doc.contains("_version_: \"1.0.0\",\n"));

    // hook, init.js, its loaded log; missing.js is only logged
    assert_eq!(channel.scripts().len(), 3);
    assert_eq!(channel.scripts()[1], "window.inited = true;");

    assert!(channel.bound_names().contains(&"fs.ls"));
}

#[test]
fn test_binding_hook() {
    let fx = fixture();
    let app = app(&fx, |_| {}).with_fs(false).with_binding(|builder| {
        builder.expose(Function::named("answer", || Ok::<_, String>(42)))?;
        Ok(())
    });

    let bridge = app.bridge().unwrap();
    assert_eq!(bridge.dispatcher().names(), vec!["answer".to_string()]);

    let launched = app.run(MemoryChannel::new()).unwrap();
    let res = launched.window.channel().invoke("answer", "").unwrap();
    assert_eq!(
        serde_json::from_str::<serde_json::Value>(&res).unwrap(),
        json!({"status": "succ", "retval": 42})
    );
}

#[test]
fn test_missing_main_page() {
    let fx = fixture();
    let app = app(&fx, |cfg| cfg.window.mainpage = "nope.html".into());

    let launched = app.run(MemoryChannel::new()).unwrap();
    assert!(matches!(
        launched.status,
        LaunchStatus::MainPageMissing { ref mainpage, .. } if mainpage.ends_with("nope.html")
    ));

    let channel = launched.window.channel();
    assert!(channel.last_document().unwrap().contains("Main page not found!"));
    assert!(channel.bound_names().is_empty());
}

#[test]
fn test_privileged_port() {
    let fx = fixture();
    // binding may succeed for root, the privileged check still applies
    let app = app(&fx, |cfg| cfg.window.port = 80);
    let launched = app.run(MemoryChannel::new()).unwrap();

    assert!(matches!(
        launched.status,
        LaunchStatus::PrivilegedPort(80) | LaunchStatus::PortInUse(80)
    ));
    assert_eq!(launched.window.settings().port, 0);
}

#[test]
fn test_port_in_use() {
    let fx = fixture();
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();

    let app = app(&fx, |cfg| cfg.window.port = port);
    let launched = app.run(MemoryChannel::new()).unwrap();
    assert_eq!(launched.status, LaunchStatus::PortInUse(port));

    let doc = launched.window.channel().last_document().unwrap();
    assert!(doc.contains("Port already in use!"));
    assert!(doc.contains(&format!("[port] {port}")));
}

#[test]
fn test_message_page_escapes_help() {
    let fx = fixture();
    let app = app(&fx, |_| {}).with_help("Usage: demo <COMMAND>");
    let page = app.message_page("<b>hi</b>");

    assert!(page.contains("<title>demo v1.0.0</title>"));
    assert!(page.contains("<b>hi</b>"));
    assert!(page.contains("Usage: demo &lt;COMMAND&gt;"));
}
