// Names and messages baked into every generated stub

/// Name of the synthetic helper that builds the diagnostic exception
pub const HELPER_METHOD_NAME: &str = "$unsupportedOpEx";

/// Descriptor of the synthetic helper: no parameters, returns the exception
pub const HELPER_METHOD_DESCRIPTOR: &str = "()Ljava/lang/UnsupportedOperationException;";

/// Exception type raised by every stubbed method
pub const EXCEPTION_CLASS: &str = "java/lang/UnsupportedOperationException";

/// Constructor descriptor of the exception type taking the message
pub const EXCEPTION_CONSTRUCTOR_DESCRIPTOR: &str = "(Ljava/lang/String;)V";

/// Message carried by the raised exception. Callers match on it, keep it stable.
pub const STUB_MESSAGE: &str = "You tried to call a method on an API class. You probably added the API jar on classpath instead of the implementation jar.";

/// File extension of compiled classes
pub const CLASS_FILE_EXTENSION: &str = "class";
