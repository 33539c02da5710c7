//! The stub transform: one pass over a class, rewriting every method body

use crate::classfile::defs::{attribute_names, STATIC_INITIALIZER_METHOD_NAME};
use crate::classfile::descriptor::parameter_slots;
use crate::classfile::flag::access_flags;
use crate::classfile::{ClassFile, CodeAttribute, ConstantPool, MethodInfo};
use crate::config::{InitializerPolicy, StubConfig};
use crate::consts::{HELPER_METHOD_DESCRIPTOR, HELPER_METHOD_NAME};
use crate::error::StubError;

use super::body::{self, ExceptionRefs};

/// Access flags of the synthetic helper
pub const HELPER_ACCESS_FLAGS: u16 = access_flags::ACC_PRIVATE | access_flags::ACC_STATIC | access_flags::ACC_SYNTHETIC;

/// Rewrites a decoded class into its API stub.
///
/// The transformer holds only settings; every call to [`transform`](Self::transform)
/// runs over its own [`StubBuilder`], so one instance can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct StubTransformer {
    initializer_policy: InitializerPolicy,
}

impl StubTransformer {
    pub fn new(config: &StubConfig) -> Self {
        Self { initializer_policy: config.initializer_policy }
    }

    /// Replace every method body of `class` with a diagnostic raise.
    ///
    /// Class header, fields and class attributes are returned untouched.
    /// Bodiless methods (abstract or native) pass through as they are. For
    /// non-interface classes one synthetic helper is appended after the
    /// declared methods. Module descriptors are returned unchanged.
    pub fn transform(&self, mut class: ClassFile) -> Result<ClassFile, StubError> {
        if class.is_module() {
            log::debug!("{} is a module descriptor, left as is", class.class_name()?);
            return Ok(class);
        }
        let class_name = class.class_name()?.to_string();
        let is_interface = class.is_interface();
        let methods = std::mem::take(&mut class.methods);

        let mut builder = StubBuilder::new(&mut class.constant_pool, class_name, is_interface, self.initializer_policy);
        builder.visit_header(&methods)?;

        let mut stubbed = Vec::with_capacity(methods.len() + 1);
        for method in methods {
            stubbed.push(builder.visit_method(method)?);
        }
        let (helper, count) = builder.finish();
        if let Some(helper) = helper {
            stubbed.push(helper);
        }
        log::debug!("stubbed {} of {} methods in {}", count, stubbed.len(), class.class_name()?);

        class.methods = stubbed;
        Ok(class)
    }
}

/// Traversal state for one class
struct StubBuilder<'a> {
    pool: &'a mut ConstantPool,
    class_name: String,
    is_interface: bool,
    initializer_policy: InitializerPolicy,
    exception: Option<ExceptionRefs>,
    helper_ref: Option<u16>,
    helper: Option<MethodInfo>,
    stubbed: usize,
}

impl<'a> StubBuilder<'a> {
    fn new(pool: &'a mut ConstantPool, class_name: String, is_interface: bool, initializer_policy: InitializerPolicy) -> Self {
        Self {
            pool,
            class_name,
            is_interface,
            initializer_policy,
            exception: None,
            helper_ref: None,
            helper: None,
            stubbed: 0,
        }
    }

    fn exception_refs(&mut self) -> Result<ExceptionRefs, StubError> {
        if let Some(refs) = self.exception {
            return Ok(refs);
        }
        let refs = ExceptionRefs::intern(self.pool)?;
        self.exception = Some(refs);
        Ok(refs)
    }

    /// Emit the helper for non-interface classes. Runs once, before any method is visited.
    fn visit_header(&mut self, methods: &[MethodInfo]) -> Result<(), StubError> {
        if self.is_interface || self.helper.is_some() {
            return Ok(());
        }

        for method in methods {
            if method.name(self.pool)? == HELPER_METHOD_NAME && method.descriptor(self.pool)? == HELPER_METHOD_DESCRIPTOR {
                return Err(StubError::HelperNameCollision {
                    class: self.class_name.clone(),
                    name: HELPER_METHOD_NAME,
                    descriptor: HELPER_METHOD_DESCRIPTOR,
                });
            }
        }

        let refs = self.exception_refs()?;
        let name_index = self.pool.add_utf8(HELPER_METHOD_NAME)?;
        let descriptor_index = self.pool.add_utf8(HELPER_METHOD_DESCRIPTOR)?;
        let code_name = self.pool.add_utf8(attribute_names::CODE)?;
        let mut helper = MethodInfo::new(HELPER_ACCESS_FLAGS, name_index, descriptor_index);
        helper.attributes.push(body::helper_body(refs)?.into_attribute(code_name));

        self.helper_ref = Some(self.pool.add_method_ref(&self.class_name, HELPER_METHOD_NAME, HELPER_METHOD_DESCRIPTOR)?);
        self.helper = Some(helper);
        log::trace!("emitted {} in {}", HELPER_METHOD_NAME, self.class_name);
        Ok(())
    }

    fn visit_method(&mut self, mut method: MethodInfo) -> Result<MethodInfo, StubError> {
        if !method.has_body(self.pool) {
            return Ok(method);
        }

        let name = method.name(self.pool)?.to_string();
        let descriptor = method.descriptor(self.pool)?;
        let receiver = if method.is_static() { 0 } else { 1 };
        let max_locals = parameter_slots(descriptor)? + receiver;

        let body = self.replacement_body(&name, max_locals)?;
        method.replace_code(self.pool, body);
        self.stubbed += 1;
        log::trace!("stubbed {}.{}", self.class_name, name);
        Ok(method)
    }

    fn replacement_body(&mut self, name: &str, max_locals: u16) -> Result<CodeAttribute, StubError> {
        if name == STATIC_INITIALIZER_METHOD_NAME && self.initializer_policy == InitializerPolicy::Empty {
            return Ok(body::empty_body(max_locals));
        }
        let body = match self.helper_ref {
            Some(helper_ref) => body::delegating_body(helper_ref, max_locals)?,
            None => {
                let refs = self.exception_refs()?;
                body::inline_raise_body(refs, max_locals)?
            }
        };
        Ok(body)
    }

    fn finish(self) -> (Option<MethodInfo>, usize) {
        (self.helper, self.stubbed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classfile::opcodes;

    fn class_with(methods: &[(u16, &str, &str, bool)]) -> ClassFile {
        let mut cf = ClassFile::new();
        cf.access_flags = access_flags::ACC_PUBLIC | access_flags::ACC_SUPER;
        cf.this_class = cf.constant_pool.add_class("p/T").unwrap();
        cf.super_class = cf.constant_pool.add_class("java/lang/Object").unwrap();
        let code_name = cf.constant_pool.add_utf8("Code").unwrap();
        for (flags, name, desc, with_code) in methods {
            let n = cf.constant_pool.add_utf8(name).unwrap();
            let d = cf.constant_pool.add_utf8(desc).unwrap();
            let mut m = MethodInfo::new(*flags, n, d);
            if *with_code {
                m.attributes.push(CodeAttribute::new(1, 4, vec![opcodes::ACONST_NULL, opcodes::ARETURN]).into_attribute(code_name));
            }
            cf.methods.push(m);
        }
        cf
    }

    #[test]
    fn test_max_locals_counts_receiver_and_wide_parameters() {
        let cf = class_with(&[
            (access_flags::ACC_PUBLIC, "a", "(JI)Ljava/lang/Object;", true),
            (access_flags::ACC_PUBLIC | access_flags::ACC_STATIC, "b", "(D)Ljava/lang/Object;", true),
        ]);
        let out = StubTransformer::default().transform(cf).unwrap();
        let a = out.methods[0].code(&out.constant_pool).unwrap().unwrap();
        let b = out.methods[1].code(&out.constant_pool).unwrap().unwrap();
        assert_eq!(a.max_locals, 4);
        assert_eq!(b.max_locals, 2);
        assert_eq!(a.max_stack, 1);
    }

    #[test]
    fn test_empty_initializer_policy() {
        let cf = class_with(&[(access_flags::ACC_STATIC, "<clinit>", "()V", true)]);
        let config = StubConfig::default().with_initializer_policy(InitializerPolicy::Empty);
        let out = StubTransformer::new(&config).transform(cf).unwrap();
        let clinit = out.methods[0].code(&out.constant_pool).unwrap().unwrap();
        assert_eq!(clinit.code, vec![opcodes::RETURN]);
        assert_eq!(clinit.max_stack, 0);
        // helper is still emitted for the class
        assert_eq!(out.methods.len(), 2);
    }

    #[test]
    fn test_collision_with_existing_helper() {
        let cf = class_with(&[(HELPER_ACCESS_FLAGS, HELPER_METHOD_NAME, HELPER_METHOD_DESCRIPTOR, true)]);
        let err = StubTransformer::default().transform(cf).unwrap_err();
        assert!(matches!(err, StubError::HelperNameCollision { ref class, .. } if class == "p/T"));
    }

    #[test]
    fn test_same_name_different_descriptor_is_not_a_collision() {
        let cf = class_with(&[(access_flags::ACC_PUBLIC, HELPER_METHOD_NAME, "()V", true)]);
        let out = StubTransformer::default().transform(cf).unwrap();
        assert_eq!(out.methods.len(), 2);
    }

    #[test]
    fn test_module_descriptor_untouched() {
        let mut cf = ClassFile::new();
        cf.access_flags = access_flags::ACC_MODULE;
        cf.this_class = cf.constant_pool.add_class("module-info").unwrap();
        let out = StubTransformer::default().transform(cf.clone()).unwrap();
        assert_eq!(out, cf);
        assert!(out.methods.is_empty());
    }
}
