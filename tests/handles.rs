use std::collections::HashSet;
use std::ffi::c_void;

use jni_cdata::cell::CData;
use jni_cdata::handle::{
    JClass, JFieldId, JIntArray, JMethodId, JObject, JObjectArray, JString, JWeak, NULL,
};
use jni_cdata::value::{HostValue, Kind, NativeValue};
use jni_cdata::{ArgumentError, Error};

#[test]
fn handles_are_pointer_sized() {
    let ptr = std::mem::size_of::<*mut c_void>();
    assert_eq!(JObject::size_of(), ptr);
    assert_eq!(JClass::size_of(), ptr);
    assert_eq!(JIntArray::size_of(), ptr);
    assert_eq!(JFieldId::size_of(), ptr);
    assert_eq!(JMethodId::align_of(), std::mem::align_of::<*mut c_void>());
}

#[test]
fn null_is_idempotent() {
    let a = JObject::null();
    let b = JObject::new(None);
    let c = JObject::new(Some(0));
    assert_eq!(a, b);
    assert_eq!(b, c);
    assert_eq!(a, NULL);
    assert_eq!(JObject::default(), NULL);
    assert!(a.is_null());
    assert!(!a.is_truthy());
    assert_eq!(a.address(), None);
    assert_eq!(a.to_host(), HostValue::None);
}

#[test]
fn equality_and_hash_are_by_address() {
    let a = JString::new(Some(0x7f00));
    let b = JString::from_raw(0x7f00 as *mut c_void);
    assert_eq!(a, b);
    assert_ne!(a, JString::new(Some(0x7f08)));

    let mut seen = HashSet::new();
    seen.insert(a);
    assert!(seen.contains(&b));
    assert!(a.is_truthy());
    assert_eq!(a.address(), Some(0x7f00));
}

#[test]
fn typed_handles_upcast_to_object() {
    let class = JClass::new(Some(0x10));
    let object: JObject = class.into();
    assert_eq!(object.address(), Some(0x10));

    let weak: JWeak = object.cast();
    assert_eq!(weak.as_raw(), class.as_raw());

    let array: JObject = JObjectArray::new(Some(0x20)).into();
    assert_eq!(array.type_name(), "jobject");
    assert_eq!(JObjectArray::null().type_name(), "jobjectArray");
}

#[test]
fn identifiers_are_not_objects_but_share_layout() {
    let field = JFieldId::new(Some(0x99));
    let method: JMethodId = field.cast();
    assert_eq!(method.address(), Some(0x99));
    assert_eq!(format!("{method:?}"), "jmethodID(0x99)");
    assert_eq!(format!("{:?}", JMethodId::null()), "jmethodID(NULL)");
}

#[test]
fn host_conversion() {
    assert!(JObject::from_host(&HostValue::None).unwrap().is_null());
    assert_eq!(
        JObject::from_host(&HostValue::Int(0x1234)).unwrap().address(),
        Some(0x1234)
    );
    assert_eq!(
        JObject::from_host(&HostValue::Native(NativeValue::Object(0x88)))
            .unwrap()
            .address(),
        Some(0x88)
    );

    let err = JObject::from_host(&HostValue::Int(1 << 70)).unwrap_err();
    assert!(matches!(
        err,
        Error::Argument(ArgumentError::Overflow {
            kind: Kind::Object,
            ..
        })
    ));

    let err = JObject::from_host(&HostValue::Float(1.0)).unwrap_err();
    assert!(matches!(err, Error::Conversion { .. }));
}

#[test]
fn negative_host_address_wraps() {
    let handle = JObject::from_host(&HostValue::Int(-1)).unwrap();
    assert_eq!(handle.address(), Some(usize::MAX));
}

#[test]
fn handles_box_as_object_values() {
    let value = NativeValue::from(JClass::new(Some(0x30)));
    assert_eq!(value, NativeValue::Object(0x30));
}
