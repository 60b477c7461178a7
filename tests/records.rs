use std::ffi::{c_void, CStr};
use std::mem::size_of;

use jni_cdata::cell::CData;
use jni_cdata::handle::JObject;
use jni_cdata::record::{
    FieldKind, NativeMethod, Record, VmAttachArgs, VmInitArgs, VmOption,
};
use jni_cdata::signature::ValueType;
use jni_cdata::sys::jni;
use jni_cdata::value::{HostValue, Kind};
use jni_cdata::{ArgumentError, Error};

const PTR: usize = size_of::<*mut c_void>();

extern "system" fn native_add(_env: *mut jni::JNIEnv, _this: jni::jobject, a: jni::jint) -> jni::jint {
    a + 1
}

fn fn_ptr() -> *mut c_void {
    native_add as *mut c_void
}

#[test]
fn native_method_layout() {
    assert_eq!(NativeMethod::size_of(), 3 * PTR);
    let offsets: Vec<_> = NativeMethod::FIELDS.iter().map(|f| (f.name, f.offset)).collect();
    assert_eq!(offsets, vec![("name", 0), ("signature", PTR), ("fnPtr", 2 * PTR)]);
    assert_eq!(NativeMethod::field("signature").unwrap().kind, FieldKind::CString);
    assert!(NativeMethod::field("nope").is_none());
}

#[test]
fn native_method_accessors() {
    let name = c"add";
    let sig = c"(I)I";
    let method = NativeMethod::new(name, sig, fn_ptr()).unwrap();

    assert_eq!(method.name(), Some(name));
    assert_eq!(method.signature(), Some(sig));
    assert_eq!(method.fn_ptr(), fn_ptr());
    method.validate().unwrap();

    let parsed = method.parsed_signature().unwrap();
    assert_eq!(parsed.ret, ValueType::Primitive(Kind::Int));
    assert_eq!(parsed.args, vec![ValueType::Primitive(Kind::Int)]);

    // The stored pointer is the caller's string, not a copy.
    let bytes = method.field_bytes("name").unwrap();
    assert_eq!(bytes, &(name.as_ptr() as usize).to_ne_bytes());

    assert_eq!(
        method.get_host("name").unwrap(),
        HostValue::Bytes(b"add".to_vec())
    );
}

#[test]
fn native_method_rejects_bad_signature() {
    let err = NativeMethod::new(c"f", c"(Q)V", fn_ptr()).unwrap_err();
    assert!(matches!(
        err,
        Error::Argument(ArgumentError::InvalidSignature { .. })
    ));
}

#[test]
fn empty_native_method_fails_validation() {
    let mut method = NativeMethod::empty();
    assert_eq!(method.name(), None);
    let err = method.validate().unwrap_err();
    assert!(matches!(
        err,
        Error::Argument(ArgumentError::NullField {
            record: "JNINativeMethod",
            field: "name"
        })
    ));

    method.set_name(Some(c"run"));
    method.set_host("fnPtr", &HostValue::Int(0x1000)).unwrap();
    let err = method.validate().unwrap_err();
    assert!(matches!(
        err,
        Error::Argument(ArgumentError::NullField {
            field: "signature",
            ..
        })
    ));
}

#[test]
fn native_method_slice_is_contiguous() {
    let second_name = c"b";
    let methods = [
        NativeMethod::new(c"a", c"()V", fn_ptr()).unwrap(),
        NativeMethod::new(second_name, c"(J)J", fn_ptr()).unwrap(),
    ];
    let raw = NativeMethod::slice_as_raw(&methods);
    let second = unsafe { &*raw.add(1) };
    assert_eq!(second.name as *const _, second_name.as_ptr());
}

#[test]
fn vm_option_layout_and_accessors() {
    assert_eq!(VmOption::size_of(), 2 * PTR);
    assert_eq!(VmOption::field("extraInfo").unwrap().offset, PTR);

    let mut opt = VmOption::new(c"-Xcheck:jni");
    assert_eq!(opt.option_string(), Some(c"-Xcheck:jni"));
    assert!(opt.extra_info().is_null());

    opt.set_host("extraInfo", &HostValue::Int(0x55)).unwrap();
    assert_eq!(opt.extra_info() as usize, 0x55);
    assert_eq!(opt.get_host("extraInfo").unwrap(), HostValue::Int(0x55));

    opt.set_host("optionString", &HostValue::None).unwrap();
    assert_eq!(opt.option_string(), None);

    let err = opt
        .set_host("optionString", &HostValue::from("-verbose"))
        .unwrap_err();
    assert!(matches!(err, Error::Conversion { .. }));
}

#[test]
fn vm_init_args_layout() {
    let offsets: Vec<_> = VmInitArgs::FIELDS.iter().map(|f| f.offset).collect();
    assert_eq!(offsets, vec![0, 4, 8, 8 + PTR]);
    assert_eq!(VmInitArgs::field("ignoreUnrecognized").unwrap().size, 1);
    assert_eq!(VmInitArgs::size_of(), size_of::<jni::JavaVMInitArgs>());
}

#[test]
fn vm_init_args_point_at_options() {
    let options = [VmOption::new(c"-Xmx64m"), VmOption::new(c"-Dfoo=bar")];
    let args = VmInitArgs::new(jni::JNI_VERSION_1_8, &options, true).unwrap();

    assert_eq!(args.version(), jni::JNI_VERSION_1_8);
    assert_eq!(args.n_options(), 2);
    assert!(args.ignore_unrecognized());
    assert_eq!(args.options() as usize, options.as_ptr() as usize);

    let raw = args.as_raw();
    let second = unsafe { &*raw.options.add(1) };
    let text = unsafe { CStr::from_ptr(second.optionString) };
    assert_eq!(text, c"-Dfoo=bar");

    assert_eq!(args.field_bytes("nOptions").unwrap(), &2i32.to_ne_bytes());
}

#[test]
fn vm_init_args_host_fields() {
    let mut args = VmInitArgs::empty();
    assert!(args.options().is_null());

    args.set_host("version", &HostValue::Int(jni::JNI_VERSION_21 as i128))
        .unwrap();
    args.set_host("ignoreUnrecognized", &HostValue::Int(9)).unwrap();
    assert_eq!(args.version(), jni::JNI_VERSION_21);
    assert!(args.ignore_unrecognized());
    assert_eq!(
        args.get_host("ignoreUnrecognized").unwrap(),
        HostValue::Int(1)
    );
    assert_eq!(args.get_host("options").unwrap(), HostValue::None);

    let err = args.set_host("missing", &HostValue::Int(0)).unwrap_err();
    assert!(matches!(
        err,
        Error::Argument(ArgumentError::UnknownField {
            record: "JavaVMInitArgs",
            ..
        })
    ));
}

#[test]
fn empty_option_list_is_a_null_pointer() {
    let args = VmInitArgs::new(jni::JNI_VERSION_10, &[], false).unwrap();
    assert_eq!(args.n_options(), 0);
    assert!(args.options().is_null());
}

#[test]
fn vm_attach_args_layout_and_accessors() {
    let offsets: Vec<_> = VmAttachArgs::FIELDS.iter().map(|f| f.offset).collect();
    assert_eq!(offsets, vec![0, PTR.max(4), 2 * PTR.max(4)]);

    let group = JObject::new(Some(0xabc0));
    let mut args = VmAttachArgs::new(jni::JNI_VERSION_1_6, Some(c"worker-1"), group);
    assert_eq!(args.version(), jni::JNI_VERSION_1_6);
    assert_eq!(args.name(), Some(c"worker-1"));
    assert_eq!(args.group(), group);

    args.set_name(None);
    args.set_group(JObject::null());
    assert_eq!(args.get_host("name").unwrap(), HostValue::None);
    assert_eq!(args.get_host("group").unwrap(), HostValue::None);
    assert_eq!(args.field_bytes("group").unwrap(), &[0u8; PTR]);
}

fn addr_bytes<T>(p: *const T) -> Vec<u8> {
    (p as usize).to_ne_bytes().to_vec()
}

/// Every field of `record` reads back, byte for byte, as `expected`.
fn assert_fields<R: Record>(record: &R, expected: &[(&str, Vec<u8>)]) {
    assert_eq!(expected.len(), R::FIELDS.len(), "{}", R::NAME);
    for (name, bytes) in expected {
        let desc = R::field(name).unwrap();
        let actual = record.field_bytes(name).unwrap();
        assert_eq!(actual.len(), desc.size, "{}.{name}", R::NAME);
        assert_eq!(actual, &bytes[..], "{}.{name}", R::NAME);
    }
}

#[test]
fn every_record_field_holds_the_value_written() {
    let name = c"twice";
    let sig = c"(J)J";
    let mut method = NativeMethod::empty();
    method.set_name(Some(name));
    method.set_signature(Some(sig));
    method.set_fn_ptr(fn_ptr());
    assert_fields(
        &method,
        &[
            ("name", addr_bytes(name.as_ptr())),
            ("signature", addr_bytes(sig.as_ptr())),
            ("fnPtr", addr_bytes(fn_ptr())),
        ],
    );

    let option = c"-Xmx64m";
    let extra = 0x5150usize as *mut c_void;
    let mut vm_option = VmOption::empty();
    vm_option.set_option_string(Some(option));
    vm_option.set_extra_info(extra);
    assert_fields(
        &vm_option,
        &[
            ("optionString", addr_bytes(option.as_ptr())),
            ("extraInfo", addr_bytes(extra)),
        ],
    );

    let options = [VmOption::new(c"-Xint"), VmOption::new(c"-Xrs")];
    let mut init = VmInitArgs::empty();
    init.set_version(jni::JNI_VERSION_21);
    init.set_options(&options).unwrap();
    init.set_ignore_unrecognized(true);
    assert_fields(
        &init,
        &[
            ("version", jni::JNI_VERSION_21.to_ne_bytes().to_vec()),
            ("nOptions", 2i32.to_ne_bytes().to_vec()),
            ("options", addr_bytes(options.as_ptr())),
            ("ignoreUnrecognized", vec![jni::JNI_TRUE]),
        ],
    );

    let thread = c"main-2";
    let mut attach = VmAttachArgs::empty();
    attach.set_version(jni::JNI_VERSION_10);
    attach.set_name(Some(thread));
    attach.set_group(JObject::new(Some(0xa0)));
    assert_fields(
        &attach,
        &[
            ("version", jni::JNI_VERSION_10.to_ne_bytes().to_vec()),
            ("name", addr_bytes(thread.as_ptr())),
            ("group", 0xa0usize.to_ne_bytes().to_vec()),
        ],
    );
}

#[test]
fn cleared_record_fields_read_back_as_zero_bytes() {
    let mut method = NativeMethod::new(c"f", c"()V", fn_ptr()).unwrap();
    method.set_name(None);
    method.set_signature(None);
    method.set_fn_ptr(std::ptr::null_mut());
    for field in NativeMethod::FIELDS {
        assert!(method.field_bytes(field.name).unwrap().iter().all(|&b| b == 0), "{}", field.name);
    }

    let mut init = VmInitArgs::empty();
    init.set_options(&[]).unwrap();
    assert_eq!(init.field_bytes("options").unwrap(), &[0u8; PTR][..]);
    assert_eq!(init.field_bytes("nOptions").unwrap(), &[0u8; 4][..]);
}

#[test]
fn host_bytes_reach_string_fields_through_the_typed_setter() {
    let mut attach = VmAttachArgs::empty();
    let host = HostValue::Bytes(b"io-1".to_vec());
    let err = attach.set_host("name", &host).unwrap_err();
    assert!(matches!(
        err,
        Error::Conversion {
            expected: "None",
            found: "bytes"
        }
    ));
    assert_eq!(attach.name(), None);

    let owned = match &host {
        HostValue::Bytes(b) => std::ffi::CString::new(b.clone()).unwrap(),
        _ => unreachable!(),
    };
    attach.set_name(Some(&owned));
    assert_eq!(attach.get_host("name").unwrap(), host);
}
