use jni_cdata::status::{check, version_name, Status, VERSIONS};
use jni_cdata::sys::jni;
use jni_cdata::Error;

#[test]
fn codes_round_trip() {
    for code in [
        jni::JNI_OK,
        jni::JNI_ERR,
        jni::JNI_EDETACHED,
        jni::JNI_EVERSION,
        jni::JNI_ENOMEM,
        jni::JNI_EEXIST,
        jni::JNI_EINVAL,
        -99,
    ] {
        assert_eq!(Status::from_code(code).code(), code);
    }
    assert!(Status::from_code(0).is_ok());
    assert_eq!(Status::from_code(-99), Status::Unknown(-99));
}

#[test]
fn reasons() {
    assert_eq!(Status::from_code(jni::JNI_EEXIST).reason(), "VM already created");
    assert_eq!(Status::Detached.to_string(), "thread detached from the VM");
    assert_eq!(Status::from_code(-42).reason(), "unknown error code -42");
}

#[test]
fn check_surfaces_code_unchanged() {
    assert!(check(jni::JNI_OK, None).is_ok());

    let err = check(jni::JNI_EVERSION, Some("GetEnv")).unwrap_err();
    assert_eq!(err.code(), Some(jni::JNI_EVERSION));
    assert_eq!(err.to_string(), "GetEnv: JNI version error");
    assert!(matches!(
        err,
        Error::ForeignCall {
            code: jni::JNI_EVERSION,
            info: Some("GetEnv")
        }
    ));

    let err = check(7, None).unwrap_err();
    assert_eq!(err.to_string(), "unknown error code 7");
}

#[test]
fn versions_are_named() {
    assert_eq!(VERSIONS.len(), 11);
    assert_eq!(version_name(0x00010008), Some("JNI_VERSION_1_8"));
    assert_eq!(version_name(jni::JNI_VERSION_21), Some("JNI_VERSION_21"));
    assert_eq!(version_name(0x00160000), None);
    assert!(VERSIONS.windows(2).all(|w| w[0].1 < w[1].1));
}
