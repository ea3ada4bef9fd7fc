use crate::{
    CodegenError, StubEmitter, StubEntry, generate_docstring, js_string,
    ident::{is_identifier, simple_type_name, validate_name},
    stubs::EXPOSE_END_MARKER,
};

#[test]
fn test_identifiers() {
    assert!(is_identifier("hello"));
    assert!(is_identifier("$el"));
    assert!(is_identifier("_private"));
    assert!(is_identifier("café"));
    assert!(!is_identifier(""));
    assert!(!is_identifier("1st"));
    assert!(!is_identifier("world.hello"));
    assert!(!is_identifier("{{closure}}"));

    assert!(validate_name("swap").is_ok());
    assert!(matches!(
        validate_name("_call_"),
        Err(CodegenError::InvalidName { .. })
    ));
}

#[test]
fn test_simple_type_name() {
    assert_eq!(simple_type_name("my_app::api::Greeter"), "Greeter");
    assert_eq!(simple_type_name("my_app::Wrapper<alloc::string::String>"), "Wrapper");
    assert_eq!(simple_type_name("Plain"), "Plain");
    assert_eq!(
        simple_type_name("my_app::run<u8>::{{closure}}"),
        "{{closure}}"
    );
}

#[test]
fn test_docstring() {
    assert_eq!(generate_docstring(""), None);
    assert_eq!(generate_docstring("  \n"), None);
    assert_eq!(
        generate_docstring("Adds numbers"),
        Some("/*\nAdds numbers\n */".into())
    );
    assert_eq!(
        generate_docstring("ends */ early"),
        Some("/*\nends *\\/ early\n */".into())
    );
    assert_eq!(
        generate_docstring("see </script>"),
        Some("/*\nsee <\\/script>\n */".into())
    );
}

#[test]
fn test_js_string() {
    assert_eq!(js_string("say\"hi"), r#""say\"hi""#);
    assert_eq!(js_string("1.0</script>"), r#""1.0<\/script>""#);
}

#[test]
fn test_stub_order_follows_emission() {
    let mut emitter = StubEmitter::new();
    emitter.emit_function_stub("first", "first", None).unwrap();
    emitter.emit_namespace_open("world").unwrap();
    emitter
        .emit_function_stub("hello", "world.hello", None)
        .unwrap();
    emitter.emit_namespace_close().unwrap();
    emitter.emit_function_stub("last", "last", None).unwrap();

    let keys: Vec<&str> = emitter.entries().iter().map(StubEntry::key).collect();
    assert_eq!(keys, vec!["first", "world", "last"]);

    let bundle = emitter.finish("0.0.1").unwrap();
    let text = bundle.text();
    let first = text.find("async first(").unwrap();
    let world = text.find("world: {").unwrap();
    let last = text.find("async last(").unwrap();
    let marker = text.find(EXPOSE_END_MARKER).unwrap();
    assert!(first < world && world < last && last < marker);
    assert_eq!(text.matches(EXPOSE_END_MARKER).count(), 1);
}

#[test]
fn test_reemitting_replaces_entry() {
    let mut emitter = StubEmitter::new();
    emitter.emit_function_stub("a", "a", Some("old")).unwrap();
    emitter.emit_function_stub("b", "b", None).unwrap();

    let replaced = emitter.emit_function_stub("a", "a", Some("new")).unwrap();
    assert!(matches!(replaced, Some(StubEntry::Function(f)) if f.doc.as_deref() == Some("old")));

    let keys: Vec<&str> = emitter.entries().iter().map(StubEntry::key).collect();
    assert_eq!(keys, vec!["b", "a"]);

    let text = emitter.finish("1").unwrap().text().to_string();
    assert_eq!(text.matches("async a(").count(), 1);
    assert!(text.contains("new"));
    assert!(!text.contains("old"));
}

#[test]
fn test_namespace_replaces_function_with_same_key() {
    let mut emitter = StubEmitter::new();
    emitter.emit_function_stub("fs", "fs", None).unwrap();

    let replaced = emitter.emit_namespace_open("fs").unwrap();
    assert_eq!(replaced.map(|e| e.bind_names()), Some(vec!["fs".to_string()]));
    emitter.emit_function_stub("cwd", "fs.cwd", None).unwrap();
    emitter.emit_namespace_close().unwrap();

    assert_eq!(emitter.entries().len(), 1);
    assert_eq!(emitter.entries()[0].bind_names(), vec!["fs.cwd".to_string()]);
}

#[test]
fn test_namespace_misuse() {
    let mut emitter = StubEmitter::new();
    assert_eq!(
        emitter.emit_namespace_close(),
        Err(CodegenError::NamespaceNotOpen)
    );

    emitter.emit_namespace_open("a").unwrap();
    assert_eq!(
        emitter.emit_namespace_open("b"),
        Err(CodegenError::NamespaceOpen("a".into()))
    );
    assert!(matches!(
        emitter.finish("1"),
        Err(CodegenError::NamespaceOpen(alias)) if alias == "a"
    ));
}

#[test]
fn test_empty_namespace_block() {
    let mut emitter = StubEmitter::new();
    emitter.emit_namespace_open("empty").unwrap();
    emitter.emit_namespace_close().unwrap();

    let bundle = emitter.finish("1").unwrap();
    assert!(bundle.text().contains("empty: {\n},\n"));
}
