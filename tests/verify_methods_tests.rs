mod common;

use apistub::classfile::attribute::make_exceptions_attribute;
use apistub::classfile::flag::access_flags::*;
use apistub::classfile::{CodeAttribute, opcodes};
use apistub::consts::{HELPER_METHOD_DESCRIPTOR, HELPER_METHOD_NAME};
use apistub::verify::methods::MethodVerifyError;
use apistub::verify::{verify, VerifyError};
use apistub::{stub_class, StubConfig};
use common::ClassBuilder;

#[test]
fn verify_accepts_stubbed_class() {
    let class = ClassBuilder::abstract_class("p/Mixed", "java/lang/Object")
        .method(ACC_PUBLIC, "<init>", "()V")
        .method(ACC_PUBLIC | ACC_STATIC, "sum", "([JD)J")
        .bodiless(ACC_PUBLIC | ACC_ABSTRACT, "size", "()I")
        .bodiless(ACC_PUBLIC | ACC_NATIVE, "raw", "()V")
        .method_throwing(ACC_PUBLIC, "io", "()V", &["java/io/IOException"])
        .build();
    let stub = stub_class(class, &StubConfig::default()).unwrap();
    assert_eq!(verify(&stub), Ok(()));
}

#[test]
fn verify_accepts_stubbed_interface() {
    let class = ClassBuilder::interface("p/Api")
        .bodiless(ACC_PUBLIC | ACC_ABSTRACT, "call", "(Ljava/lang/String;)V")
        .method(ACC_PUBLIC, "twice", "(Ljava/lang/String;)V")
        .build();
    let stub = stub_class(class, &StubConfig::default()).unwrap();
    assert_eq!(verify(&stub), Ok(()));
}

#[test]
fn verify_rejects_helper_in_interface() {
    let class = ClassBuilder::interface("p/Api")
        .method(ACC_PRIVATE | ACC_STATIC | ACC_SYNTHETIC, HELPER_METHOD_NAME, HELPER_METHOD_DESCRIPTOR)
        .build();
    assert!(matches!(verify(&class), Err(VerifyError::Methods(MethodVerifyError::HelperInInterface(_)))));
}

#[test]
fn verify_rejects_duplicate_methods() {
    let class = ClassBuilder::class("p/Dup").method(ACC_PUBLIC, "m", "()V").method(ACC_PRIVATE, "m", "()V").build();
    assert_eq!(verify(&class), Err(VerifyError::Methods(MethodVerifyError::DuplicateMethod("m()V".to_string()))));
}

#[test]
fn verify_rejects_duplicate_exceptions_attribute_entries() {
    let mut class = ClassBuilder::class("p/Exc").method(ACC_PUBLIC, "m", "()V").build();
    let attribute =
        make_exceptions_attribute(&mut class.constant_pool, &["java/lang/Exception", "java/lang/Exception"]).unwrap();
    class.methods[0].attributes.push(attribute);
    assert_eq!(verify(&class), Err(VerifyError::Methods(MethodVerifyError::DuplicateExceptions)));
}

#[test]
fn verify_rejects_duplicate_code_attribute() {
    let mut class = ClassBuilder::class("p/Twice").method(ACC_PUBLIC, "m", "()V").build();
    let code = class.methods[0].attributes[0].clone();
    class.methods[0].attributes.push(code);
    assert!(matches!(
        verify(&class),
        Err(VerifyError::Methods(MethodVerifyError::DuplicateMethodAttribute { .. }))
    ));
}

#[test]
fn verify_rejects_empty_code() {
    let class = ClassBuilder::class("p/Empty")
        .method_with_body(ACC_PUBLIC | ACC_STATIC, "m", "()V", Some(CodeAttribute::new(0, 0, vec![])), &[])
        .build();
    assert!(matches!(verify(&class), Err(VerifyError::Methods(MethodVerifyError::InvalidCode { .. }))));
}

#[test]
fn verify_rejects_too_few_locals_for_receiver() {
    let class = ClassBuilder::class("p/Locals")
        .method_with_body(ACC_PUBLIC, "m", "()V", Some(CodeAttribute::new(0, 0, vec![opcodes::RETURN])), &[])
        .build();
    assert!(matches!(verify(&class), Err(VerifyError::Methods(MethodVerifyError::InvalidCode { .. }))));
}
