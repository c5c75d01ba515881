//! End-to-end loading from files, HTTP and the environment.

use std::fs;
use std::path::Path;

use dragon_ini::{ConfigError, Loader, MissingPolicy, Store};
use tempfile::TempDir;

fn write(dir: &Path, name: &str, contents: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path.display().to_string()
}

#[test]
fn test_typed_values_from_file() {
    let dir = TempDir::new().unwrap();
    let path = write(
        dir.path(),
        "conf.ini",
        "\
# sample
bar_val = bar
key1=string
[section1]
key2=s1,s2,s3
[section2]
key3 = 15
key4 = 9000000000
[section3]
key5=true
key6=99.99
key7=fake
[strings]
joined = ${bar_val}_string_${missing}_string
",
    );

    let store = Loader::new().load_file(&path).unwrap();

    assert_eq!(store.string("key1"), "string");
    assert_eq!(store.strings("section1.key2"), vec!["s1", "s2", "s3"]);
    assert_eq!(store.int("section2.key3").unwrap(), 15);
    assert_eq!(store.int64("section2.key4").unwrap(), 9_000_000_000);
    assert!(store.bool("section3.key5").unwrap());
    assert_eq!(store.float("section3.key6").unwrap(), 99.99);

    assert!(matches!(
        store.bool("section3.key7"),
        Err(ConfigError::InvalidValue { .. })
    ));
    assert!(!store.default_bool("section3.key7", false));
    assert_eq!(store.default_int("key1", 2), 2);
    assert_eq!(store.default_float("key1", 1.2), 1.2);

    assert_eq!(
        store.string("strings.joined"),
        "bar_string_${missing}_string"
    );
}

#[test]
fn test_missing_reference_policies() {
    let text = "joined = a_${x,y}_b\n";

    let mut kept = Store::new();
    Loader::new().parse_str(&mut kept, text).unwrap();

    let mut emptied = Store::new();
    Loader::builder()
        .with_missing_policy(MissingPolicy::Empty)
        .build()
        .parse_str(&mut emptied, text)
        .unwrap();

    assert_eq!(kept.string("joined"), "a_${x,y}_b");
    assert_eq!(emptied.string("joined"), "a__b");
}

#[test]
fn test_nested_file_includes() {
    let dir = TempDir::new().unwrap();
    let leaf = write(dir.path(), "leaf.ini", "leaf=yes\nshared=leaf\n");
    let middle = write(
        dir.path(),
        "middle.ini",
        &format!("middle=yes\n@load:{leaf}\n"),
    );
    let root = write(
        dir.path(),
        "root.ini",
        &format!("shared=root\n[inc]\n@load:{middle}\nafter=${{inc.shared}}\n"),
    );

    let store = Loader::new().load_file(&root).unwrap();

    assert_eq!(store.string("shared"), "root");
    assert_eq!(store.string("inc.middle"), "yes");
    assert_eq!(store.string("inc.leaf"), "yes");
    assert_eq!(store.string("inc.after"), "leaf");
}

#[test]
fn test_include_path_from_variable() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "extra.ini", "extra=1\n");
    let root = write(
        dir.path(),
        "root.ini",
        &format!(
            "conf_dir={}\n@load:${{conf_dir}}/extra.ini\n",
            dir.path().display()
        ),
    );

    let store = Loader::new().load_file(&root).unwrap();
    assert_eq!(store.int("extra").unwrap(), 1);
}

#[cfg(unix)]
#[test]
fn test_file_url_include() {
    let dir = TempDir::new().unwrap();
    let extra = write(dir.path(), "extra.ini", "via_url=yes\n");
    let root = write(dir.path(), "root.ini", &format!("@load:file://{extra}\n"));

    let store = Loader::new().load_file(&root).unwrap();
    assert!(store.bool("via_url").unwrap());
}

#[test]
fn test_self_include_is_a_load_loop() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("loop.ini");
    fs::write(&path, format!("count=${{count}}+\n@load:{}\n", path.display())).unwrap();

    let mut store = Store::new();
    let result = Loader::new().parse_file(&mut store, &path);

    assert!(matches!(
        result,
        Err(ConfigError::LoadLoop {
            depth: 21,
            limit: 20
        })
    ));
    assert!(store.string("count").ends_with('+'));
}

#[test]
fn test_remote_include_order_decides_precedence() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/shared.ini")
        .with_status(200)
        .with_body("timeout=30\nregion=eu\n")
        .expect(2)
        .create();
    let url = format!("{}/shared.ini", server.url());

    // Local value after the include wins
    let mut before = Store::new();
    Loader::new()
        .parse_str(&mut before, &format!("timeout=5\n@load:{url}\ntimeout=10\n"))
        .unwrap();
    assert_eq!(before.int("timeout").unwrap(), 10);
    assert_eq!(before.string("region"), "eu");

    // Remote value after the local one wins
    let mut after = Store::new();
    Loader::new()
        .parse_str(&mut after, &format!("timeout=5\n@load:{url}\n"))
        .unwrap();
    assert_eq!(after.int("timeout").unwrap(), 30);

    mock.assert();
}

#[test]
fn test_remote_include_failure_is_fatal() {
    let mut server = mockito::Server::new();
    let _mock = server.mock("GET", "/gone.ini").with_status(500).create();

    let mut store = Store::new();
    let result = Loader::new().parse_str(
        &mut store,
        &format!("before=1\n@load:{}/gone.ini\nafter=1\n", server.url()),
    );

    assert!(matches!(
        result,
        Err(ConfigError::HttpStatus { status: 500, .. })
    ));
    assert!(store.exists("before"));
    assert!(!store.exists("after"));
}

#[test]
fn test_unsupported_scheme_is_fatal() {
    let result = Loader::new().parse_str(&mut Store::new(), "@load:ftp://example.com/a.ini\n");
    assert!(matches!(result, Err(ConfigError::UnsupportedScheme { .. })));
}

#[test]
fn test_environment_fallback() {
    temp_env::with_vars(
        [
            ("DRAGON_INI_IT_HOST", Some("db.internal")),
            ("DRAGON_INI_IT_INCLUDE", None::<&str>),
        ],
        || {
            let mut store = Store::new();
            Loader::new()
                .parse_str(
                    &mut store,
                    "url=postgres://${DRAGON_INI_IT_HOST}/app\n@load:${DRAGON_INI_IT_INCLUDE}\n",
                )
                .unwrap();

            assert!(store.exists("DRAGON_INI_IT_HOST"));
            assert_eq!(store.string("DRAGON_INI_IT_HOST"), "db.internal");
            assert_eq!(store.string("url"), "postgres://db.internal/app");
        },
    );
}

#[test]
fn test_environment_does_not_shadow_stored_keys() {
    temp_env::with_var("DRAGON_INI_IT_PORT", Some("1"), || {
        let mut store = Store::new();
        Loader::new()
            .parse_str(&mut store, "DRAGON_INI_IT_PORT=2\n")
            .unwrap();
        assert_eq!(store.int("DRAGON_INI_IT_PORT").unwrap(), 2);
    });
}
