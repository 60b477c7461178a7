use std::sync::Arc;

use jni_cdata::exports::{self, ExportKind};
use jni_cdata::sys::jni;
use jni_cdata::value::Kind;

// One test only: the registry is process-wide.
#[test]
fn registry_lifecycle() {
    exports::teardown();
    assert!(!exports::is_initialized());
    assert!(exports::get().is_none());

    let first = exports::init();
    let second = exports::init();
    assert!(Arc::ptr_eq(&first, &second));
    assert!(exports::is_initialized());

    let jint = first.type_info("jint").unwrap();
    assert_eq!(jint.kind, ExportKind::Scalar(Kind::Int));
    assert_eq!(jint.size, 4);
    assert_eq!(first.type_info("jvalue").unwrap().size, 8);
    assert_eq!(first.type_info("jvalue").unwrap().kind, ExportKind::Union);
    assert_eq!(
        first.type_info("jmethodID").unwrap().size,
        std::mem::size_of::<usize>()
    );
    assert_eq!(
        first.type_info("JavaVMInitArgs").unwrap().size,
        std::mem::size_of::<jni::JavaVMInitArgs>()
    );
    assert!(first.type_info("jthread").is_none());

    assert_eq!(first.constant("JNI_EINVAL"), Some(-6));
    assert_eq!(first.constant("JNI_ABORT"), Some(2));
    assert_eq!(first.constant("JNI_TRUE"), Some(1));
    assert_eq!(first.constant("JNIWeakGlobalRefType"), Some(3));
    assert_eq!(first.constant("JNI_VERSION_24"), Some(0x00180000));

    exports::teardown();
    exports::teardown();
    assert!(!exports::is_initialized());
    // Handles taken before teardown stay usable.
    assert_eq!(first.constant("JNI_OK"), Some(0));

    let rebuilt = exports::init();
    assert!(!Arc::ptr_eq(&first, &rebuilt));
    exports::teardown();
}
