// Common test utilities
#![allow(dead_code)]

use apistub::classfile::attribute::{make_exceptions_attribute, make_signature_attribute};
use apistub::classfile::flag::access_flags::*;
use apistub::classfile::{class_file_to_bytes, opcodes, ClassFile, CodeAttribute, Constant, FieldInfo, MethodInfo};
use apistub::consts::{HELPER_METHOD_DESCRIPTOR, HELPER_METHOD_NAME};

/// Builds small but well-formed classes for tests
pub struct ClassBuilder {
    class: ClassFile,
}

impl ClassBuilder {
    pub fn new(access_flags: u16, name: &str, super_name: &str) -> Self {
        let mut class = ClassFile::new();
        class.access_flags = access_flags;
        class.this_class = class.constant_pool.add_class(name).unwrap();
        class.super_class = class.constant_pool.add_class(super_name).unwrap();
        Self { class }
    }

    pub fn class(name: &str) -> Self {
        Self::new(ACC_PUBLIC | ACC_SUPER, name, "java/lang/Object")
    }

    pub fn abstract_class(name: &str, super_name: &str) -> Self {
        Self::new(ACC_PUBLIC | ACC_SUPER | ACC_ABSTRACT, name, super_name)
    }

    pub fn interface(name: &str) -> Self {
        Self::new(ACC_PUBLIC | ACC_INTERFACE | ACC_ABSTRACT, name, "java/lang/Object")
    }

    pub fn implements(mut self, interface: &str) -> Self {
        let index = self.class.constant_pool.add_class(interface).unwrap();
        self.class.interfaces.push(index);
        self
    }

    pub fn signature(mut self, signature: &str) -> Self {
        let attribute = make_signature_attribute(&mut self.class.constant_pool, signature).unwrap();
        self.class.attributes.push(attribute);
        self
    }

    pub fn field(mut self, flags: u16, name: &str, descriptor: &str) -> Self {
        let name = self.class.constant_pool.add_utf8(name).unwrap();
        let descriptor = self.class.constant_pool.add_utf8(descriptor).unwrap();
        self.class.fields.push(FieldInfo::new(flags, name, descriptor));
        self
    }

    /// A method whose body returns a default value for its return type
    pub fn method(self, flags: u16, name: &str, descriptor: &str) -> Self {
        let body = default_body(descriptor);
        self.method_with_body(flags, name, descriptor, Some(body), &[])
    }

    /// An abstract or native method; no Code attribute
    pub fn bodiless(self, flags: u16, name: &str, descriptor: &str) -> Self {
        self.method_with_body(flags, name, descriptor, None, &[])
    }

    pub fn method_throwing(self, flags: u16, name: &str, descriptor: &str, exceptions: &[&str]) -> Self {
        let body = default_body(descriptor);
        self.method_with_body(flags, name, descriptor, Some(body), exceptions)
    }

    /// `String name()` with body `ldc value; areturn`
    pub fn string_method(mut self, flags: u16, name: &str, value: &str) -> Self {
        let string = self.class.constant_pool.add_string(value).unwrap();
        let body = CodeAttribute::new(1, 1, vec![opcodes::LDC_W, (string >> 8) as u8, string as u8, opcodes::ARETURN]);
        self.method_with_body(flags, name, "()Ljava/lang/String;", Some(body), &[])
    }

    /// `String name()` returning a literal whose Utf8 bytes are kept raw,
    /// e.g. an unpaired surrogate
    pub fn raw_string_method(mut self, flags: u16, name: &str, utf8: &[u8]) -> Self {
        let raw = self.class.constant_pool.push(Constant::Utf8Raw(utf8.to_vec())).unwrap();
        let string = self.class.constant_pool.push(Constant::String(raw)).unwrap();
        let body = CodeAttribute::new(1, 1, vec![opcodes::LDC_W, (string >> 8) as u8, string as u8, opcodes::ARETURN]);
        self.method_with_body(flags, name, "()Ljava/lang/String;", Some(body), &[])
    }

    pub fn method_with_body(
        mut self,
        flags: u16,
        name: &str,
        descriptor: &str,
        body: Option<CodeAttribute>,
        exceptions: &[&str],
    ) -> Self {
        let pool = &mut self.class.constant_pool;
        let name = pool.add_utf8(name).unwrap();
        let descriptor = pool.add_utf8(descriptor).unwrap();
        let mut method = MethodInfo::new(flags, name, descriptor);
        if let Some(body) = body {
            let code_name = pool.add_utf8("Code").unwrap();
            method.attributes.push(body.into_attribute(code_name));
        }
        if !exceptions.is_empty() {
            method.attributes.push(make_exceptions_attribute(pool, exceptions).unwrap());
        }
        self.class.methods.push(method);
        self
    }

    pub fn build(self) -> ClassFile {
        self.class
    }

    pub fn bytes(self) -> Vec<u8> {
        class_file_to_bytes(&self.class)
    }
}

/// `return` of a zero value matching the descriptor's return type.
/// `max_locals` is generous so it covers any parameters used in tests.
fn default_body(descriptor: &str) -> CodeAttribute {
    let ret = descriptor.rsplit(')').next().unwrap_or("V");
    let code = match ret.as_bytes().first() {
        Some(b'V') => vec![opcodes::RETURN],
        Some(b'L') | Some(b'[') => vec![opcodes::ACONST_NULL, opcodes::ARETURN],
        Some(b'J') => vec![0x09, opcodes::LRETURN],
        Some(b'F') => vec![0x0b, opcodes::FRETURN],
        Some(b'D') => vec![0x0e, opcodes::DRETURN],
        _ => vec![0x03, opcodes::IRETURN],
    };
    CodeAttribute::new(2, 16, code)
}

/// Number of synthetic helper methods in `class`
pub fn helper_count(class: &ClassFile) -> usize {
    let pool = &class.constant_pool;
    class
        .methods
        .iter()
        .filter(|m| m.name(pool).ok() == Some(HELPER_METHOD_NAME) && m.descriptor(pool).ok() == Some(HELPER_METHOD_DESCRIPTOR))
        .count()
}

pub fn method<'a>(class: &'a ClassFile, name: &str) -> &'a MethodInfo {
    let pool = &class.constant_pool;
    class
        .methods
        .iter()
        .find(|m| m.name(pool).ok() == Some(name))
        .unwrap_or_else(|| panic!("no method named {}", name))
}
