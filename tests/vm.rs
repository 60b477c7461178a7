use std::ffi::c_void;
use std::ptr;
use std::sync::atomic::{AtomicUsize, Ordering};

use jni_cdata::embed::JavaVm;
use jni_cdata::record::VmAttachArgs;
use jni_cdata::sys::jni::{self, JNIInvokeInterface_, JavaVM};
use jni_cdata::Error;

static DESTROYED: AtomicUsize = AtomicUsize::new(0);
static ENV_CALLS: AtomicUsize = AtomicUsize::new(0);
static ATTACHED: AtomicUsize = AtomicUsize::new(0);
static DETACHED: AtomicUsize = AtomicUsize::new(0);

const FAKE_ENV: usize = 0xe000;

unsafe extern "system" fn destroy_vm(_vm: *mut JavaVM) -> jni::jint {
    DESTROYED.fetch_add(1, Ordering::SeqCst);
    jni::JNI_OK
}

unsafe extern "system" fn attach(
    _vm: *mut JavaVM,
    penv: *mut *mut c_void,
    args: *mut c_void,
) -> jni::jint {
    if !args.is_null() {
        let args = &*(args as *const jni::JavaVMAttachArgs);
        if args.version != jni::JNI_VERSION_1_8 {
            return jni::JNI_EVERSION;
        }
    }
    ATTACHED.fetch_add(1, Ordering::SeqCst);
    *penv = FAKE_ENV as *mut c_void;
    jni::JNI_OK
}

unsafe extern "system" fn detach(_vm: *mut JavaVM) -> jni::jint {
    DETACHED.fetch_add(1, Ordering::SeqCst);
    jni::JNI_OK
}

unsafe extern "system" fn get_env(
    _vm: *mut JavaVM,
    penv: *mut *mut c_void,
    version: jni::jint,
) -> jni::jint {
    ENV_CALLS.fetch_add(1, Ordering::SeqCst);
    if version > jni::JNI_VERSION_24 {
        return jni::JNI_EVERSION;
    }
    if DETACHED.load(Ordering::SeqCst) > 0 {
        return jni::JNI_EDETACHED;
    }
    *penv = FAKE_ENV as *mut c_void;
    jni::JNI_OK
}

fn table() -> JNIInvokeInterface_ {
    JNIInvokeInterface_ {
        reserved0: ptr::null_mut(),
        reserved1: ptr::null_mut(),
        reserved2: ptr::null_mut(),
        DestroyJavaVM: destroy_vm,
        AttachCurrentThread: attach,
        DetachCurrentThread: detach,
        GetEnv: get_env,
        AttachCurrentThreadAsDaemon: attach,
    }
}

#[test]
fn forwarders_call_through_the_function_table_until_destroy() {
    let functions = table();
    let mut slot: JavaVM = &functions;
    let vm = unsafe { JavaVm::from_raw(&mut slot) };
    assert_eq!(vm.as_raw(), &mut slot as *mut JavaVM);

    assert_eq!(vm.get_env(jni::JNI_VERSION_1_8).unwrap() as usize, FAKE_ENV);
    let err = vm.get_env(jni::JNI_VERSION_24 + 1).unwrap_err();
    assert_eq!(err.code(), Some(jni::JNI_EVERSION));

    let name = c"worker";
    let mut args = VmAttachArgs::new(jni::JNI_VERSION_1_8, Some(name), jni_cdata::handle::NULL);
    assert_eq!(vm.attach_current_thread(Some(&mut args)).unwrap() as usize, FAKE_ENV);
    assert_eq!(vm.attach_current_thread_as_daemon(None).unwrap() as usize, FAKE_ENV);
    assert_eq!(ATTACHED.load(Ordering::SeqCst), 2);

    let mut old = VmAttachArgs::new(jni::JNI_VERSION_1_1, None, jni_cdata::handle::NULL);
    let err = vm.attach_current_thread(Some(&mut old)).unwrap_err();
    assert!(matches!(
        err,
        Error::ForeignCall {
            code: jni::JNI_EVERSION,
            info: Some("AttachCurrentThread")
        }
    ));

    vm.detach_current_thread().unwrap();
    let err = vm.get_env(jni::JNI_VERSION_1_8).unwrap_err();
    assert_eq!(err.code(), Some(jni::JNI_EDETACHED));
    assert_eq!(ENV_CALLS.load(Ordering::SeqCst), 3);

    unsafe { vm.destroy() }.unwrap();
    assert_eq!(DESTROYED.load(Ordering::SeqCst), 1);
    assert_eq!(ENV_CALLS.load(Ordering::SeqCst), 3);
}
