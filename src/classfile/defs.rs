//! Generic classfile-specific definitions

/// Header of Java class file (magic number)
pub const MAGIC: u32 = 0xCAFEBABE;

/// Name of a constructor
pub const CONSTRUCTOR_METHOD_NAME: &str = "<init>";

/// Name of a static initializer
pub const STATIC_INITIALIZER_METHOD_NAME: &str = "<clinit>";

/// Name of the root of the class hierarchy, the only class without a super class
pub const OBJECT_CLASS_NAME: &str = "java/lang/Object";

/// JVM version constants
pub mod major_versions {
    pub const JAVA_8: u16 = 52;
}

/// Attribute names the stub transform reads or rewrites
pub mod attribute_names {
    pub const CODE: &str = "Code";
    pub const EXCEPTIONS: &str = "Exceptions";
    pub const SIGNATURE: &str = "Signature";
}
