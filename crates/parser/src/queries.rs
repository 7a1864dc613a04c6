//! Tag-query sources: one `.scm`-style query string per grammar family,
//! using the `definition.*` / `name.*` / `parent` capture convention the
//! tag-capture processor understands.

pub const RUST: &str = r#"
(function_item name: (identifier) @name) @definition.function
(struct_item name: (type_identifier) @name) @definition.struct
(enum_item name: (type_identifier) @name) @definition.enum
(trait_item name: (type_identifier) @name) @definition.trait
(impl_item type: (type_identifier) @name) @definition.impl
(mod_item name: (identifier) @name) @definition.module
(impl_item
  type: (type_identifier) @parent
  body: (declaration_list
    (function_item name: (identifier) @name) @definition.method))
"#;

pub const JS_FAMILY: &str = r#"
(function_declaration name: (identifier) @name) @definition.function
(function_expression name: (identifier) @name) @definition.function
(variable_declarator
  name: (identifier) @name
  value: (arrow_function)) @definition.function
(variable_declarator
  name: (identifier) @name
  value: (function_expression)) @definition.function
(class_declaration name: (identifier) @name) @definition.class
(class_declaration
  name: (identifier) @parent
  body: (class_body
    (method_definition name: (property_identifier) @name) @definition.method))
(interface_declaration name: (type_identifier) @name) @definition.interface
"#;

pub const PYTHON: &str = r#"
(function_definition name: (identifier) @name) @definition.function
(class_definition
  name: (identifier) @parent
  body: (block
    (function_definition name: (identifier) @name) @definition.method))
(class_definition name: (identifier) @name) @definition.class
"#;

pub const GO: &str = r#"
(function_declaration name: (identifier) @name) @definition.function
(method_declaration name: (field_identifier) @name) @definition.method
(type_declaration (type_spec name: (type_identifier) @name type: (struct_type))) @definition.struct
(type_declaration (type_spec name: (type_identifier) @name type: (interface_type))) @definition.interface
"#;

pub const C_FAMILY: &str = r#"
(function_definition declarator: (function_declarator declarator: (identifier) @name)) @definition.function
(struct_specifier name: (type_identifier) @name) @definition.struct
(class_specifier name: (type_identifier) @name) @definition.class
"#;

pub const CSHARP: &str = r#"
(method_declaration name: (identifier) @name) @definition.method
(class_declaration name: (identifier) @name) @definition.class
(interface_declaration name: (identifier) @name) @definition.interface
(struct_declaration name: (identifier) @name) @definition.struct
"#;

pub const RUBY: &str = r#"
(method name: (identifier) @name) @definition.method
(class name: (constant) @name) @definition.class
(module name: (constant) @name) @definition.module
"#;

pub const JAVA: &str = r#"
(method_declaration name: (identifier) @name) @definition.method
(class_declaration name: (identifier) @name) @definition.class
(interface_declaration name: (identifier) @name) @definition.interface
"#;

pub const PHP: &str = r#"
(function_definition name: (name) @name) @definition.function
(method_declaration name: (name) @name) @definition.method
(class_declaration name: (name) @name) @definition.class
"#;
