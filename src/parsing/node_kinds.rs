//! Per-language syntax-node-type tables consumed by the generic extractor
//! (C3). Each [`LanguageSyntax`] maps tree-sitter grammar node *type names*
//! onto the roles the extraction rules care about; the extractor itself
//! never special-cases a language by name, only by looking entries up here.

use crate::types::NodeKind;
use super::language::LanguageId;

pub struct LanguageSyntax {
    /// Function-like declarations that default to [`NodeKind::Function`]
    /// unless refinement rule 1 reclassifies them as a method.
    pub function_types: &'static [&'static str],
    /// Node types that are unambiguously methods regardless of parent.
    pub method_types: &'static [&'static str],
    pub class_types: &'static [&'static str],
    pub struct_types: &'static [&'static str],
    pub interface_types: &'static [&'static str],
    pub enum_types: &'static [&'static str],
    pub trait_types: &'static [&'static str],
    pub namespace_types: &'static [&'static str],
    pub type_alias_types: &'static [&'static str],
    pub variable_types: &'static [&'static str],
    pub constant_types: &'static [&'static str],
    /// Body/block node types that make a `function_types` descendant a
    /// method when it is a direct-or-near child of one of these.
    pub class_body_types: &'static [&'static str],
    pub call_types: &'static [&'static str],
    /// `extends`/`implements`/superclass/protocol-conformance clauses.
    pub heritage_types: &'static [&'static str],
    pub import_types: &'static [&'static str],
    pub comment_types: &'static [&'static str],
}

macro_rules! syntax {
    ($name:ident { $($field:ident: [$($v:literal),* $(,)?]),* $(,)? }) => {
        static $name: LanguageSyntax = LanguageSyntax {
            $($field: &[$($v),*]),*
        };
    };
}

syntax!(RUST {
    function_types: ["function_item"],
    method_types: [],
    class_types: [],
    struct_types: ["struct_item"],
    interface_types: [],
    enum_types: ["enum_item"],
    trait_types: ["trait_item"],
    namespace_types: ["mod_item"],
    type_alias_types: ["type_item"],
    variable_types: ["let_declaration"],
    constant_types: ["const_item", "static_item"],
    class_body_types: ["declaration_list"],
    call_types: ["call_expression", "macro_invocation"],
    heritage_types: ["trait_bound", "impl_item"],
    import_types: ["use_declaration"],
    comment_types: ["line_comment", "block_comment"],
});

syntax!(PYTHON {
    function_types: ["function_definition"],
    method_types: [],
    class_types: ["class_definition"],
    struct_types: [],
    interface_types: [],
    enum_types: [],
    trait_types: [],
    namespace_types: [],
    type_alias_types: ["type_alias_statement"],
    variable_types: ["assignment"],
    constant_types: [],
    class_body_types: ["block"],
    call_types: ["call"],
    heritage_types: ["argument_list"],
    import_types: ["import_statement", "import_from_statement"],
    comment_types: ["comment"],
});

syntax!(JAVASCRIPT {
    function_types: ["function_declaration", "function_expression", "arrow_function", "generator_function_declaration"],
    method_types: ["method_definition"],
    class_types: ["class_declaration"],
    struct_types: [],
    interface_types: [],
    enum_types: [],
    trait_types: [],
    namespace_types: [],
    type_alias_types: [],
    variable_types: ["variable_declarator"],
    constant_types: [],
    class_body_types: ["class_body"],
    call_types: ["call_expression", "new_expression"],
    heritage_types: ["class_heritage"],
    import_types: ["import_statement"],
    comment_types: ["comment"],
});

syntax!(TYPESCRIPT {
    function_types: ["function_declaration", "function_expression", "arrow_function", "generator_function_declaration"],
    method_types: ["method_definition", "method_signature"],
    class_types: ["class_declaration", "abstract_class_declaration"],
    struct_types: [],
    interface_types: ["interface_declaration"],
    enum_types: ["enum_declaration"],
    trait_types: [],
    namespace_types: ["internal_module", "module_declaration"],
    type_alias_types: ["type_alias_declaration"],
    variable_types: ["variable_declarator"],
    constant_types: [],
    class_body_types: ["class_body"],
    call_types: ["call_expression", "new_expression"],
    heritage_types: ["class_heritage", "extends_clause", "implements_clause"],
    import_types: ["import_statement"],
    comment_types: ["comment"],
});

syntax!(GO {
    function_types: ["function_declaration"],
    method_types: ["method_declaration"],
    class_types: [],
    struct_types: ["struct_type"],
    interface_types: ["interface_type"],
    enum_types: [],
    trait_types: [],
    namespace_types: ["package_clause"],
    type_alias_types: ["type_alias"],
    variable_types: ["var_spec", "short_var_declaration"],
    constant_types: ["const_spec"],
    class_body_types: [],
    call_types: ["call_expression"],
    heritage_types: [],
    import_types: ["import_spec"],
    comment_types: ["comment"],
});

syntax!(JAVA {
    function_types: [],
    method_types: ["method_declaration", "constructor_declaration"],
    class_types: ["class_declaration"],
    struct_types: [],
    interface_types: ["interface_declaration"],
    enum_types: ["enum_declaration"],
    trait_types: [],
    namespace_types: ["package_declaration"],
    type_alias_types: [],
    variable_types: ["local_variable_declaration", "field_declaration"],
    constant_types: [],
    class_body_types: ["class_body", "interface_body", "enum_body"],
    call_types: ["method_invocation", "object_creation_expression"],
    heritage_types: ["superclass", "super_interfaces"],
    import_types: ["import_declaration"],
    comment_types: ["line_comment", "block_comment"],
});

syntax!(C {
    function_types: ["function_definition"],
    method_types: [],
    class_types: [],
    struct_types: ["struct_specifier"],
    interface_types: [],
    enum_types: ["enum_specifier"],
    trait_types: [],
    namespace_types: [],
    type_alias_types: ["type_definition"],
    variable_types: ["declaration"],
    constant_types: [],
    class_body_types: [],
    call_types: ["call_expression"],
    heritage_types: [],
    import_types: ["preproc_include"],
    comment_types: ["comment"],
});

syntax!(CPP {
    function_types: ["function_definition"],
    method_types: [],
    class_types: ["class_specifier"],
    struct_types: ["struct_specifier"],
    interface_types: [],
    enum_types: ["enum_specifier"],
    trait_types: [],
    namespace_types: ["namespace_definition"],
    type_alias_types: ["type_definition", "alias_declaration"],
    variable_types: ["declaration"],
    constant_types: [],
    class_body_types: ["field_declaration_list"],
    call_types: ["call_expression"],
    heritage_types: ["base_class_clause"],
    import_types: ["preproc_include"],
    comment_types: ["comment"],
});

syntax!(CSHARP {
    function_types: ["local_function_statement"],
    method_types: ["method_declaration", "constructor_declaration"],
    class_types: ["class_declaration"],
    struct_types: ["struct_declaration"],
    interface_types: ["interface_declaration"],
    enum_types: ["enum_declaration"],
    trait_types: [],
    namespace_types: ["namespace_declaration", "file_scoped_namespace_declaration"],
    type_alias_types: [],
    variable_types: ["variable_declarator", "field_declaration"],
    constant_types: [],
    class_body_types: ["declaration_list"],
    call_types: ["invocation_expression", "object_creation_expression"],
    heritage_types: ["base_list"],
    import_types: ["using_directive"],
    comment_types: ["comment"],
});

syntax!(PHP {
    function_types: ["function_definition"],
    method_types: ["method_declaration"],
    class_types: ["class_declaration"],
    struct_types: [],
    interface_types: ["interface_declaration"],
    enum_types: ["enum_declaration"],
    trait_types: ["trait_declaration"],
    namespace_types: ["namespace_definition"],
    type_alias_types: [],
    variable_types: ["property_declaration"],
    constant_types: ["const_declaration"],
    class_body_types: ["declaration_list"],
    call_types: ["function_call_expression", "member_call_expression", "scoped_call_expression"],
    heritage_types: ["base_clause", "class_interface_clause"],
    import_types: ["namespace_use_declaration"],
    comment_types: ["comment"],
});

syntax!(KOTLIN {
    function_types: ["function_declaration"],
    method_types: [],
    class_types: ["class_declaration"],
    struct_types: [],
    interface_types: [],
    enum_types: ["enum_class_body"],
    trait_types: [],
    namespace_types: ["package_header"],
    type_alias_types: ["type_alias"],
    variable_types: ["property_declaration"],
    constant_types: [],
    class_body_types: ["class_body"],
    call_types: ["call_expression"],
    heritage_types: ["delegation_specifier"],
    import_types: ["import_header"],
    comment_types: ["comment", "line_comment", "multiline_comment"],
});

syntax!(SWIFT {
    function_types: ["function_declaration"],
    method_types: [],
    class_types: ["class_declaration"],
    struct_types: ["struct_declaration"],
    interface_types: [],
    enum_types: ["enum_declaration"],
    trait_types: ["protocol_declaration"],
    namespace_types: [],
    type_alias_types: ["typealias_declaration"],
    variable_types: ["property_declaration"],
    constant_types: [],
    class_body_types: ["class_body"],
    call_types: ["call_expression"],
    heritage_types: ["inheritance_specifier"],
    import_types: ["import_declaration"],
    comment_types: ["comment", "multiline_comment"],
});

syntax!(LUA {
    function_types: ["function_declaration", "local_function"],
    method_types: [],
    class_types: [],
    struct_types: [],
    interface_types: [],
    enum_types: [],
    trait_types: [],
    namespace_types: [],
    type_alias_types: [],
    variable_types: ["variable_declaration"],
    constant_types: [],
    class_body_types: [],
    call_types: ["function_call"],
    heritage_types: [],
    import_types: [],
    comment_types: ["comment"],
});

syntax!(GDSCRIPT {
    function_types: ["function_definition"],
    method_types: [],
    class_types: ["class_definition"],
    struct_types: [],
    interface_types: [],
    enum_types: ["enum_definition"],
    trait_types: [],
    namespace_types: [],
    type_alias_types: [],
    variable_types: ["variable_statement"],
    constant_types: ["const_statement"],
    class_body_types: ["body"],
    call_types: ["call"],
    heritage_types: ["extends_statement"],
    import_types: [],
    comment_types: ["comment"],
});

pub fn syntax_for(id: LanguageId) -> &'static LanguageSyntax {
    match id {
        LanguageId::Rust => &RUST,
        LanguageId::Python => &PYTHON,
        LanguageId::JavaScript => &JAVASCRIPT,
        LanguageId::TypeScript | LanguageId::Tsx => &TYPESCRIPT,
        LanguageId::Go => &GO,
        LanguageId::Java => &JAVA,
        LanguageId::C => &C,
        LanguageId::Cpp => &CPP,
        LanguageId::CSharp => &CSHARP,
        LanguageId::Php => &PHP,
        LanguageId::Kotlin => &KOTLIN,
        LanguageId::Swift => &SWIFT,
        LanguageId::Lua => &LUA,
        LanguageId::GdScript => &GDSCRIPT,
    }
}

/// Classify a raw node-type name against a language's tables, applying
/// rule-2 (component heuristic excluded here; handled by the extractor
/// since it needs the node's captured name too) and the direct kind maps.
pub fn classify(syntax: &LanguageSyntax, node_type: &str) -> Option<NodeKind> {
    if syntax.method_types.contains(&node_type) {
        Some(NodeKind::Method)
    } else if syntax.function_types.contains(&node_type) {
        Some(NodeKind::Function)
    } else if syntax.class_types.contains(&node_type) {
        Some(NodeKind::Class)
    } else if syntax.struct_types.contains(&node_type) {
        Some(NodeKind::Struct)
    } else if syntax.interface_types.contains(&node_type) {
        Some(NodeKind::Interface)
    } else if syntax.enum_types.contains(&node_type) {
        Some(NodeKind::Enum)
    } else if syntax.trait_types.contains(&node_type) {
        Some(NodeKind::Trait)
    } else if syntax.namespace_types.contains(&node_type) {
        Some(NodeKind::Namespace)
    } else if syntax.type_alias_types.contains(&node_type) {
        Some(NodeKind::TypeAlias)
    } else if syntax.constant_types.contains(&node_type) {
        Some(NodeKind::Constant)
    } else if syntax.variable_types.contains(&node_type) {
        Some(NodeKind::Variable)
    } else {
        None
    }
}
