//! java renderer
//!
//! the single textual backend over the structured emission model: one
//! [`GeneratedUnit`] in, one java source file out. also owns the mapping
//! from graphql input types to java types, including the primitive
//! detection the argument-presence semantics depend on.

use crate::model::{ClassSpec, GeneratedUnit, MethodSpec};
use crate::schema::SchemaIndex;
use graphql_parser::schema::{Type, TypeDefinition};

const INDENT: &str = "    ";

/// render a generated unit as a java source file
pub fn render_unit(unit: &GeneratedUnit) -> String {
    let mut out = String::new();
    out.push_str(&format!("package {};\n\n", unit.package));
    render_class(&mut out, &unit.class, 0);
    out
}

/// relative file path for a generated unit (`com/example/Foo.java`)
pub fn unit_path(unit: &GeneratedUnit) -> String {
    format!("{}/{}.java", unit.package.replace('.', "/"), unit.class.name)
}

fn render_class(out: &mut String, class: &ClassSpec, level: usize) {
    if let Some(doc) = &class.doc {
        render_javadoc(out, doc, level);
    }

    push_indent(out, level);
    out.push_str("public ");
    if class.is_static {
        out.push_str("static ");
    }
    out.push_str(if class.is_interface { "interface " } else { "class " });
    out.push_str(&class.name);
    if let Some(extends) = &class.extends {
        out.push_str(" extends ");
        out.push_str(extends);
    }
    out.push_str(" {\n");

    let mut first = class.fields.is_empty();
    for field in &class.fields {
        push_indent(out, level + 1);
        out.push_str("private ");
        out.push_str(&field.type_name);
        out.push(' ');
        out.push_str(&field.name);
        if let Some(init) = &field.init {
            out.push_str(" = ");
            out.push_str(init);
        }
        out.push_str(";\n");
    }

    if !class.initializer.is_empty() {
        if !first {
            out.push('\n');
        }
        first = false;
        push_indent(out, level + 1);
        out.push_str("{\n");
        for stmt in &class.initializer {
            push_indent(out, level + 2);
            out.push_str(stmt);
            out.push('\n');
        }
        push_indent(out, level + 1);
        out.push_str("}\n");
    }

    for method in &class.methods {
        if !first {
            out.push('\n');
        }
        first = false;
        render_method(out, method, class, level + 1);
    }

    for nested in &class.nested {
        if !first {
            out.push('\n');
        }
        first = false;
        render_class(out, nested, level + 1);
    }

    push_indent(out, level);
    out.push_str("}\n");
}

fn render_method(out: &mut String, method: &MethodSpec, class: &ClassSpec, level: usize) {
    if let Some(doc) = &method.doc {
        render_javadoc(out, doc, level);
    }
    if method.is_override {
        push_indent(out, level);
        out.push_str("@Override\n");
    }

    push_indent(out, level);
    if !class.is_interface {
        out.push_str("public ");
    }
    if method.is_static {
        out.push_str("static ");
    }
    if method.is_constructor() {
        out.push_str(&class.name);
    } else {
        out.push_str(method.returns.as_deref().unwrap_or("void"));
        out.push(' ');
        out.push_str(&method.name);
    }

    out.push('(');
    for (idx, param) in method.params.iter().enumerate() {
        if idx > 0 {
            out.push_str(", ");
        }
        out.push_str(&param.type_name);
        out.push(' ');
        out.push_str(&param.name);
    }
    out.push(')');

    if class.is_interface && method.body.is_empty() {
        out.push_str(";\n");
        return;
    }

    out.push_str(" {\n");
    for stmt in &method.body {
        push_indent(out, level + 1);
        out.push_str(stmt);
        out.push('\n');
    }
    push_indent(out, level);
    out.push_str("}\n");
}

fn render_javadoc(out: &mut String, doc: &str, level: usize) {
    push_indent(out, level);
    out.push_str("/**\n");
    for line in doc.lines() {
        push_indent(out, level);
        // a literal close marker inside a description would end the javadoc
        out.push_str(&format!(" * {}\n", line.replace("*/", "*&#47;")));
    }
    push_indent(out, level);
    out.push_str(" */\n");
}

fn push_indent(out: &mut String, level: usize) {
    for _ in 0..level {
        out.push_str(INDENT);
    }
}

/// a java type reference for a generated argument or field
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JavaType {
    /// java source name, possibly fully qualified
    pub name: String,
    /// true for unboxed primitives (`int`, `double`, `boolean`)
    pub primitive: bool,
}

impl JavaType {
    fn object(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            primitive: false,
        }
    }

    fn primitive(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            primitive: true,
        }
    }
}

/// map a graphql input type to its java representation
///
/// non-null built-in scalars become unboxed primitives; everything else is
/// an object reference. enums and input objects qualify against the types
/// package; unresolvable names fall back to `Object`.
pub fn java_input_type(
    ty: &Type<'_, String>,
    index: &SchemaIndex<'_>,
    types_package: &str,
) -> JavaType {
    match ty {
        Type::NonNullType(inner) => named_type(inner, index, types_package, false),
        _ => named_type(ty, index, types_package, true),
    }
}

fn named_type(
    ty: &Type<'_, String>,
    index: &SchemaIndex<'_>,
    types_package: &str,
    nullable: bool,
) -> JavaType {
    match ty {
        Type::NonNullType(inner) => named_type(inner, index, types_package, nullable),
        Type::ListType(inner) => {
            let element = java_input_type(inner, index, types_package);
            JavaType::object(format!("java.util.List<{}>", boxed(&element)))
        }
        Type::NamedType(name) => match name.as_str() {
            "String" | "ID" => JavaType::object("String"),
            "Int" => {
                if nullable {
                    JavaType::object("Integer")
                } else {
                    JavaType::primitive("int")
                }
            }
            "Float" => {
                if nullable {
                    JavaType::object("Double")
                } else {
                    JavaType::primitive("double")
                }
            }
            "Boolean" => {
                if nullable {
                    JavaType::object("Boolean")
                } else {
                    JavaType::primitive("boolean")
                }
            }
            other => match index.type_definition(other) {
                Some(TypeDefinition::Enum(_)) | Some(TypeDefinition::InputObject(_)) => {
                    JavaType::object(format!("{types_package}.{other}"))
                }
                Some(TypeDefinition::Scalar(_)) | None => JavaType::object("Object"),
                Some(_) => JavaType::object(format!("{types_package}.{other}")),
            },
        },
    }
}

fn boxed(ty: &JavaType) -> String {
    if !ty.primitive {
        return ty.name.clone();
    }
    match ty.name.as_str() {
        "int" => "Integer".to_string(),
        "double" => "Double".to_string(),
        "boolean" => "Boolean".to_string(),
        other => other.to_string(),
    }
}
