use std::path::PathBuf;

use mirrorsync::config::{ConfigFlags, load_config_flags, parse_flag_tokens};
use mirrorsync::session::Session;

#[test]
fn test_config_file_parsing_ignores_comments_and_blank_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".mirrorsyncrc");
    let content = r#"
# comment
--debug

--editors script,style
   
--script=session.txt
"#;
    std::fs::write(&path, content).unwrap();

    let flags = load_config_flags(&path).unwrap();
    assert!(flags.debug);
    assert_eq!(
        flags.editors,
        Some(vec!["script".to_string(), "style".to_string()])
    );
    assert_eq!(flags.script, Some(PathBuf::from("session.txt")));
}

#[test]
fn test_cli_flags_override_file_flags() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".mirrorsyncrc");
    std::fs::write(&path, "--debug\n--editors a,b\n--script file.txt\n").unwrap();

    let file_flags = load_config_flags(&path).unwrap();
    let cli_args = vec![
        "mirrorsync".to_string(),
        "--editors".to_string(),
        "c".to_string(),
        "--no-immediate".to_string(),
    ];
    let cli_flags = parse_flag_tokens(&cli_args);

    let effective = file_flags.union(&cli_flags);
    assert!(effective.debug, "file flags should remain enabled");
    assert!(effective.no_immediate, "cli flags should be applied");
    assert_eq!(effective.editors, Some(vec!["c".to_string()]), "cli should override editors");
    assert_eq!(
        effective.script,
        Some(PathBuf::from("file.txt")),
        "file config should be preserved when CLI does not override"
    );
}

#[test]
fn test_no_immediate_flag_reaches_controllers() {
    let flags = ConfigFlags {
        no_immediate: true,
        editors: Some(vec!["a".to_string()]),
        ..ConfigFlags::default()
    };
    let session = Session::new(flags);
    let controller = session.registry().get("a").unwrap();
    assert!(!controller.options().immediate);
    assert_eq!(controller.key(), "a");
}

#[test]
fn test_script_file_drives_session() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.txt");
    std::fs::write(
        &path,
        "# two editors\nedit a hello\nset b world\nshow\nquit\nedit a ignored\n",
    )
    .unwrap();

    let mut session = Session::new(ConfigFlags {
        editors: Some(vec!["a".to_string(), "b".to_string()]),
        ..ConfigFlags::default()
    });
    let file = std::io::BufReader::new(std::fs::File::open(&path).unwrap());
    let mut out = Vec::new();
    session.run(file, &mut out).unwrap();

    let out = String::from_utf8(out).unwrap();
    assert!(out.contains(r#"a: editor="hello" config="hello" [in sync, active]"#));
    assert!(out.contains(r#"b: editor="world" config="world" [in sync, active]"#));
    assert_eq!(session.editor("a").unwrap().text(), "hello");
}
