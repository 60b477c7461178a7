use jni_cdata::signature::{parse, MethodSignature, ValueType};
use jni_cdata::value::Kind;
use jni_cdata::{ArgumentError, Error};

fn invalid(signature: &str) -> String {
    match parse(signature) {
        Err(Error::Argument(ArgumentError::InvalidSignature { reason, .. })) => reason,
        other => panic!("{signature:?} parsed unexpectedly: {other:?}"),
    }
}

#[test]
fn primitives_and_void() {
    let sig = parse("(ZBCSIJFD)V").unwrap();
    assert_eq!(sig.ret, ValueType::Void);
    let kinds: Vec<_> = sig.args.iter().map(|t| t.kind().unwrap()).collect();
    assert_eq!(
        kinds,
        vec![
            Kind::Boolean,
            Kind::Byte,
            Kind::Char,
            Kind::Short,
            Kind::Int,
            Kind::Long,
            Kind::Float,
            Kind::Double
        ]
    );
}

#[test]
fn references_are_refined() {
    let sig = parse("(Ljava/lang/String;Ljava/lang/Class;Ljava/util/List;)Ljava/lang/Object;")
        .unwrap();
    assert_eq!(
        sig.args,
        vec![ValueType::String, ValueType::Class, ValueType::Object]
    );
    assert_eq!(sig.ret, ValueType::Object);
    assert_eq!(sig.args[0].jni_name(), "jstring");
    assert_eq!(sig.args[0].kind(), Some(Kind::Object));
}

#[test]
fn arrays() {
    let sig = parse("([I[[I[Ljava/lang/String;[[D)[B").unwrap();
    assert_eq!(
        sig.args,
        vec![
            ValueType::Array(Kind::Int),
            ValueType::ObjectArray,
            ValueType::ObjectArray,
            ValueType::ObjectArray,
        ]
    );
    assert_eq!(sig.ret, ValueType::Array(Kind::Byte));
    assert_eq!(sig.ret.to_string(), "jbyteArray");
}

#[test]
fn empty_argument_list() {
    assert_eq!(
        MethodSignature::parse("()J").unwrap(),
        MethodSignature {
            ret: ValueType::Primitive(Kind::Long),
            args: Vec::new(),
        }
    );
}

#[test]
fn malformed_descriptors() {
    assert!(invalid("I)V").contains("expected '('"));
    assert!(invalid("(I").contains("missing ')'"));
    assert!(invalid("(I)").contains("end of input"));
    assert!(invalid("(V)V").contains("invalid type 'V'"));
    assert!(invalid("()[V").contains("invalid type 'V'"));
    assert!(invalid("(Ljava/lang/String)V").contains("unterminated"));
    assert!(invalid("(L;)V").contains("empty class name"));
    assert!(invalid("()VV").contains("trailing"));
    assert!(invalid("(X)V").contains("invalid type 'X'"));
    assert!(invalid("").contains("expected '('"));
}
