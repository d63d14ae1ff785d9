//! The global engine can be configured once per process, so this file holds a
//! single test.

use typetext::{reflect_object, to_json, to_jsv, Engine, Error, Options};

struct Profile {
    display_name: String,
    nick_name: Option<String>,
}

reflect_object!(Profile { display_name, nick_name });

#[test]
fn test_configure_global_once() {
    Engine::configure_global(
        Options::new()
            .with_camel_case_names(true)
            .with_include_null_values(true),
    )
    .unwrap();

    let profile = Profile {
        display_name: "Ann".to_string(),
        nick_name: None,
    };
    assert_eq!(
        to_json(&profile).unwrap(),
        r#"{"displayName":"Ann","nickName":null}"#
    );
    assert_eq!(to_jsv(&profile).unwrap(), "{displayName:Ann,nickName:}");

    let again = Engine::configure_global(Options::new());
    assert!(matches!(again, Err(Error::AlreadyInitialized)));
}
