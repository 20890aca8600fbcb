//! client generator
//!
//! the recursive walk over the schema type graph: one query class per
//! included root operation field, a root projection per selectable root
//! field type, and a tree of sub-projection and fragment classes below it.
//! the walk owns cycle and depth control, consults the name registry before
//! every emission, and delegates data-type generation to the configured
//! emitter.
//!
//! recursion state lives in [`Walk`] snapshots: each descent extends its own
//! copy of the visited edge set and depth, so sibling branches never observe
//! each other's cycle state.

use crate::config::CodeGenConfig;
use crate::datatype::DataTypeEmitter;
use crate::filter::{filter_fields, ExampleOperation, SelectionPos};
use crate::model::{ClassSpec, FieldSpec, GeneratedUnit, GenerationResult, MethodSpec, Param};
use crate::names::{capitalized, sanitize};
use crate::registry::NameRegistry;
use crate::render::java_input_type;
use crate::schema::{is_selectable, type_name, OperationKind, SchemaIndex};
use crate::shorten::Shortener;
use graphql_parser::schema::{Field, TypeDefinition};
use std::collections::BTreeSet;
use tracing::debug;

/// implicit discriminator field injected into non-entity fragments
const TYPENAME_FIELD: &str = "__typename";

/// recursion state for one projection node, copied on every descent
///
/// `'a` is the schema content lifetime (carried by `type_def`); `'e`/`'o` are
/// the example-selection borrow and operation-content lifetimes.
#[derive(Clone)]
struct Walk<'a, 'e, 'o> {
    type_def: &'a TypeDefinition<'a, String>,
    parent_class: String,
    root_class: String,
    prefix: String,
    selection: Option<SelectionPos<'e, 'o>>,
    visited: BTreeSet<(String, String)>,
    depth: i32,
    operation_name: Option<String>,
}

/// projection and query class generator for one schema
///
/// registry, shortener, and the data-type dedup set live for exactly one
/// generation run; create a fresh generator per run.
pub struct ClientGenerator<'a> {
    config: &'a CodeGenConfig,
    schema: &'a SchemaIndex<'a>,
    emitter: &'a mut dyn DataTypeEmitter,
    registry: NameRegistry,
    shortener: Shortener,
    data_types_seen: BTreeSet<String>,
}

impl<'a> ClientGenerator<'a> {
    /// create a generator for one run over one schema
    pub fn new(
        config: &'a CodeGenConfig,
        schema: &'a SchemaIndex<'a>,
        emitter: &'a mut dyn DataTypeEmitter,
    ) -> Self {
        Self {
            config,
            schema,
            emitter,
            registry: NameRegistry::new(),
            shortener: Shortener::new(config.short_projection_names),
            data_types_seen: BTreeSet::new(),
        }
    }

    /// generate every operation kind present in the schema, plus the
    /// federation entities projection
    pub fn generate_all<'o>(
        &mut self,
        operations: Option<&graphql_parser::query::Document<'o, String>>,
    ) -> GenerationResult {
        let mut result = GenerationResult::new();
        for kind in OperationKind::ALL {
            let example = operations.and_then(|doc| ExampleOperation::for_kind(doc, kind));
            result = result.merge(self.generate(kind, example.as_ref()));
        }
        result.merge(self.generate_entities())
    }

    /// generate query classes and projection trees for one operation kind
    pub fn generate<'e, 'o>(
        &mut self,
        kind: OperationKind,
        example: Option<&'e ExampleOperation<'e, 'o>>,
    ) -> GenerationResult {
        let Some(root_def) = self.schema.operation_root(kind) else {
            return GenerationResult::new();
        };

        let root_selection = example.map(|e| e.root());
        let operation_name = example.and_then(|e| e.name()).map(str::to_string);

        let fields = filter_fields(
            self.schema.fields_with_extensions(root_def),
            self.config,
            root_selection,
            true,
        );

        let mut result = GenerationResult::new();
        for field in fields {
            if let Some(unit) = self.query_class(field, kind) {
                result = result.merge(GenerationResult::query_type(unit));
            }

            let field_selection = root_selection.and_then(|pos| pos.child(&field.name));
            match self.schema.resolve(&field.field_type) {
                Some(type_def) if is_selectable(type_def) => {
                    result = result.merge(self.root_projection(
                        type_def,
                        &capitalized(&field.name),
                        field_selection,
                        operation_name.as_deref(),
                    ));
                }
                _ => {}
            }
        }
        result
    }

    /// generate the shared entities projection for federation key types
    pub fn generate_entities(&mut self) -> GenerationResult {
        if self.config.skip_entity_queries {
            return GenerationResult::new();
        }
        let federated = self.schema.federated_objects();
        if federated.is_empty() {
            return GenerationResult::new();
        }

        let class_name = "EntitiesProjectionRoot".to_string();
        if !self.registry.register(&class_name) {
            return GenerationResult::new();
        }
        debug!(types = federated.len(), "generating federation entities projection");

        let mut class = ClassSpec::new(&class_name);
        class.extends = Some(format!("{}.BaseProjectionNode", self.config.runtime_package));

        let mut fragments = GenerationResult::new();
        for obj in federated {
            let Some(member_def) = self.schema.type_definition(&obj.name) else {
                continue;
            };
            let frag_prefix = format!("Entities{}Key", capitalized(&obj.name));
            let frag_class = format!("{frag_prefix}Projection");

            let mut method = MethodSpec::new(format!("on{}", obj.name));
            method.returns = Some(frag_class.clone());
            method
                .body
                .push(format!("{frag_class} fragment = new {frag_class}(this, this);"));
            method.body.push("getFragments().add(fragment);".to_string());
            method.body.push("return fragment;".to_string());
            class.methods.push(method);

            let walk = Walk {
                type_def: member_def,
                parent_class: class_name.clone(),
                root_class: class_name.clone(),
                prefix: frag_prefix,
                selection: None,
                visited: BTreeSet::new(),
                depth: 0,
                operation_name: None,
            };
            fragments = fragments.merge(self.fragment(walk, true));
        }

        GenerationResult::projection(GeneratedUnit {
            package: self.config.projection_package.clone(),
            class,
        })
        .merge(fragments)
    }

    fn query_class(&mut self, field: &Field<'_, String>, kind: OperationKind) -> Option<GeneratedUnit> {
        let class_name = format!("{}GraphQLQuery", capitalized(&field.name));
        if !self.registry.register(&class_name) {
            debug!(class = %class_name, "query class already generated");
            return None;
        }

        let mut class = ClassSpec::new(&class_name);
        class.extends = Some(format!("{}.GraphQLQuery", self.config.runtime_package));
        class.doc = field.description.clone();

        let mut op_name = MethodSpec::new("getOperationName");
        op_name.returns = Some("String".to_string());
        op_name.is_override = true;
        op_name.body.push(format!("return \"{}\";", field.name));
        class.methods.push(op_name);

        let args = &field.arguments;

        let mut ctor = MethodSpec::constructor();
        ctor.body.push(format!("super(\"{}\");", kind.keyword()));
        for arg in args {
            let java = java_input_type(&arg.value_type, self.schema, &self.config.types_package);
            let param = sanitize(&arg.name);
            ctor.params.push(Param::new(java.name.clone(), param.clone()));
            if java.primitive {
                ctor.body
                    .push(format!("getInput().put(\"{}\", {});", arg.name, param));
            } else {
                // nullable and object arguments keep the distinction between
                // "omitted" and "explicitly null" via the fieldsSet marker
                ctor.body.push(format!(
                    "if ({} != null || fieldsSet.contains(\"{}\")) {{",
                    param, arg.name
                ));
                ctor.body
                    .push(format!("    getInput().put(\"{}\", {});", arg.name, param));
                ctor.body.push("}".to_string());
            }
        }
        if !args.is_empty() {
            ctor.params.push(Param::new("java.util.Set<String>", "fieldsSet"));
        }
        class.methods.push(ctor);

        if !args.is_empty() {
            let mut empty = MethodSpec::constructor();
            empty.body.push(format!("super(\"{}\");", kind.keyword()));
            class.methods.push(empty);
        }

        let mut factory = MethodSpec::new("newRequest");
        factory.is_static = true;
        factory.returns = Some("Builder".to_string());
        factory.body.push("return new Builder();".to_string());
        class.methods.push(factory);

        let mut builder = ClassSpec::new("Builder");
        builder.is_static = true;
        builder.fields.push(FieldSpec {
            type_name: "java.util.Set<String>".to_string(),
            name: "fieldsSet".to_string(),
            init: Some("new java.util.HashSet<>()".to_string()),
        });
        for arg in args {
            let java = java_input_type(&arg.value_type, self.schema, &self.config.types_package);
            let param = sanitize(&arg.name);
            builder.fields.push(FieldSpec {
                type_name: java.name.clone(),
                name: param.clone(),
                init: None,
            });

            let mut setter = MethodSpec::new(param.clone());
            setter.doc = arg.description.clone();
            setter.returns = Some("Builder".to_string());
            setter.params.push(Param::new(java.name.clone(), param.clone()));
            setter.body.push(format!("this.{param} = {param};"));
            setter.body.push(format!("this.fieldsSet.add(\"{}\");", arg.name));
            setter.body.push("return this;".to_string());
            builder.methods.push(setter);
        }
        let mut build = MethodSpec::new("build");
        build.returns = Some(class_name.clone());
        if args.is_empty() {
            build.body.push(format!("return new {class_name}();"));
        } else {
            let arg_list: Vec<String> = args.iter().map(|a| sanitize(&a.name)).collect();
            build.body.push(format!(
                "return new {class_name}({}, fieldsSet);",
                arg_list.join(", ")
            ));
        }
        builder.methods.push(build);
        class.nested.push(builder);

        Some(GeneratedUnit {
            package: self.config.query_package.clone(),
            class,
        })
    }

    fn root_projection<'e, 'o>(
        &mut self,
        type_def: &'a TypeDefinition<'a, String>,
        prefix: &str,
        selection: Option<SelectionPos<'e, 'o>>,
        operation_name: Option<&str>,
    ) -> GenerationResult {
        let class_name = format!("{prefix}ProjectionRoot");
        if !self.registry.register(&class_name) {
            debug!(class = %class_name, "root projection already generated");
            return GenerationResult::new();
        }

        let mut class = ClassSpec::new(&class_name);
        class.extends = Some(format!("{}.BaseProjectionNode", self.config.runtime_package));

        let walk = Walk {
            type_def,
            parent_class: class_name.clone(),
            root_class: class_name,
            prefix: prefix.to_string(),
            selection,
            visited: BTreeSet::new(),
            depth: 0,
            operation_name: operation_name.map(str::to_string),
        };

        let fields = filter_fields(
            self.schema.fields_with_extensions(type_def),
            self.config,
            selection,
            false,
        );
        let children = self.field_methods(&mut class, &walk, &fields, true);
        let fragments = self.member_fragments(&mut class, &walk, true);
        let data = self.delegate_data_type(type_def, selection, operation_name);

        GenerationResult::projection(GeneratedUnit {
            package: self.config.projection_package.clone(),
            class,
        })
        .merge(children)
        .merge(fragments)
        .merge(data)
    }

    fn sub_projection<'e, 'o>(&mut self, walk: Walk<'a, 'e, 'o>) -> GenerationResult {
        match self.sub_projection_type(walk) {
            Some((class, rest)) => GenerationResult::projection(GeneratedUnit {
                package: self.config.projection_package.clone(),
                class,
            })
            .merge(rest),
            None => GenerationResult::new(),
        }
    }

    fn fragment<'e, 'o>(&mut self, walk: Walk<'a, 'e, 'o>, entity: bool) -> GenerationResult {
        let concrete_type = type_name(walk.type_def).to_string();
        let Some((mut class, rest)) = self.sub_projection_type(walk) else {
            return GenerationResult::new();
        };

        // entity key fragments deserialize directly into typed results and
        // must not carry the discriminator field
        if !entity {
            class
                .initializer
                .push(format!("getFields().put(\"{TYPENAME_FIELD}\", null);"));
        }

        let mut to_string = MethodSpec::new("toString");
        to_string.returns = Some("String".to_string());
        to_string.is_override = true;
        to_string.body = vec![
            "StringBuilder builder = new StringBuilder();".to_string(),
            format!("builder.append(\"... on {concrete_type} {{\");"),
            "getFields().forEach((k, v) -> {".to_string(),
            "    builder.append(\" \").append(k);".to_string(),
            "    if (v != null) {".to_string(),
            "        builder.append(\" \").append(v.toString());".to_string(),
            "    }".to_string(),
            "});".to_string(),
            "builder.append(\"}\");".to_string(),
            "return builder.toString();".to_string(),
        ];
        class.methods.push(to_string);

        GenerationResult::projection(GeneratedUnit {
            package: self.config.projection_package.clone(),
            class,
        })
        .merge(rest)
    }

    fn sub_projection_type<'e, 'o>(
        &mut self,
        walk: Walk<'a, 'e, 'o>,
    ) -> Option<(ClassSpec, GenerationResult)> {
        let class_name = format!("{}Projection", walk.prefix);
        if !self.registry.register(&class_name) {
            debug!(class = %class_name, "projection already generated");
            return None;
        }

        let mut class = ClassSpec::new(&class_name);
        class.extends = Some(format!(
            "{}.BaseSubProjectionNode<{}, {}>",
            self.config.runtime_package, walk.parent_class, walk.root_class
        ));

        let mut ctor = MethodSpec::constructor();
        ctor.params.push(Param::new(walk.parent_class.clone(), "parent"));
        ctor.params.push(Param::new(walk.root_class.clone(), "root"));
        ctor.body.push(format!(
            "super(parent, root, java.util.Optional.of(\"{}\"));",
            type_name(walk.type_def)
        ));
        class.methods.push(ctor);

        let data = self.delegate_data_type(
            walk.type_def,
            walk.selection,
            walk.operation_name.as_deref(),
        );

        let fields = filter_fields(
            self.schema.fields_with_extensions(walk.type_def),
            self.config,
            walk.selection,
            false,
        );
        let children = self.field_methods(&mut class, &walk, &fields, false);
        let fragments = self.member_fragments(&mut class, &walk, false);

        Some((class, children.merge(fragments).merge(data)))
    }

    /// emit selection methods for the retained fields and recurse into
    /// selectable children
    fn field_methods<'e, 'o>(
        &mut self,
        class: &mut ClassSpec,
        walk: &Walk<'a, 'e, 'o>,
        fields: &[&'a Field<'a, String>],
        at_root: bool,
    ) -> GenerationResult {
        let descend = self.config.max_projection_depth == -1
            || walk.depth < self.config.max_projection_depth;
        let root_ref = if at_root { "this" } else { "getRoot()" };
        let current_type = type_name(walk.type_def);

        let mut result = GenerationResult::new();
        for field in fields {
            match self.schema.resolve(&field.field_type) {
                Some(child_def) if is_selectable(child_def) => {
                    let child_type = type_name(child_def);
                    if !descend {
                        debug!(field = %field.name, depth = walk.depth, "depth limit reached");
                        continue;
                    }
                    let edge = (child_type.to_string(), current_type.to_string());
                    if walk.visited.contains(&edge) {
                        debug!(child = %child_type, parent = %current_type, "cyclic edge cut");
                        continue;
                    }

                    let short = self.shortener.shorten(&walk.prefix);
                    let child_prefix = format!("{}_{}", short, capitalized(&field.name));
                    let child_class = format!("{child_prefix}Projection");

                    let mut method = MethodSpec::new(sanitize(&field.name));
                    method.returns = Some(child_class.clone());
                    method.body.push(format!(
                        "{child_class} projection = new {child_class}(this, {root_ref});"
                    ));
                    method
                        .body
                        .push(format!("getFields().put(\"{}\", projection);", field.name));
                    method.body.push("return projection;".to_string());
                    class.methods.push(method);

                    if !field.arguments.is_empty() {
                        class
                            .methods
                            .push(self.projection_method_with_arguments(field, &child_class, root_ref));
                    }

                    let mut visited = walk.visited.clone();
                    visited.insert(edge);
                    let child_walk = Walk {
                        type_def: child_def,
                        parent_class: class.name.clone(),
                        root_class: walk.root_class.clone(),
                        prefix: child_prefix,
                        selection: walk.selection.and_then(|pos| pos.child(&field.name)),
                        visited,
                        depth: walk.depth + 1,
                        operation_name: walk.operation_name.clone(),
                    };
                    result = result.merge(self.sub_projection(child_walk));
                }
                _ => {
                    // scalar, enum, or unresolvable: terminal selection
                    let mut method = MethodSpec::new(sanitize(&field.name));
                    method.returns = Some(class.name.clone());
                    method
                        .body
                        .push(format!("getFields().put(\"{}\", null);", field.name));
                    method.body.push("return this;".to_string());
                    class.methods.push(method);

                    if !field.arguments.is_empty() {
                        class
                            .methods
                            .push(self.terminal_method_with_arguments(field, &class.name));
                    }
                }
            }
        }
        result
    }

    /// emit fragment accessors and classes for an interface's implementors
    /// or a union's members
    fn member_fragments<'e, 'o>(
        &mut self,
        class: &mut ClassSpec,
        walk: &Walk<'a, 'e, 'o>,
        at_root: bool,
    ) -> GenerationResult {
        let member_names: Vec<&'a str> = match walk.type_def {
            TypeDefinition::Interface(iface) => self
                .schema
                .implementations(&iface.name)
                .iter()
                .map(|obj| obj.name.as_str())
                .collect(),
            TypeDefinition::Union(union) => self
                .schema
                .union_members(union)
                .into_iter()
                .filter(|def| matches!(def, TypeDefinition::Object(_)))
                .map(type_name)
                .collect(),
            _ => return GenerationResult::new(),
        };

        let current_type = type_name(walk.type_def);
        let restricted = walk
            .selection
            .map(|pos| pos.selects_members(current_type))
            .unwrap_or(false);
        let root_ref = if at_root { "this" } else { "getRoot()" };

        let mut result = GenerationResult::new();
        for member in member_names {
            let member_selection = walk.selection.and_then(|pos| pos.fragment(member));
            if restricted && member_selection.is_none() {
                continue;
            }
            let Some(member_def) = self.schema.type_definition(member) else {
                continue;
            };

            let short = self.shortener.shorten(&walk.prefix);
            let frag_prefix = format!("{}_{}", short, capitalized(member));
            let frag_class = format!("{frag_prefix}Projection");

            let mut method = MethodSpec::new(format!("on{member}"));
            method.returns = Some(frag_class.clone());
            method
                .body
                .push(format!("{frag_class} fragment = new {frag_class}(this, {root_ref});"));
            method.body.push("getFragments().add(fragment);".to_string());
            method.body.push("return fragment;".to_string());
            class.methods.push(method);

            let frag_walk = Walk {
                type_def: member_def,
                parent_class: class.name.clone(),
                root_class: walk.root_class.clone(),
                prefix: frag_prefix,
                selection: member_selection,
                visited: walk.visited.clone(),
                depth: walk.depth,
                operation_name: walk.operation_name.clone(),
            };
            result = result.merge(self.fragment(frag_walk, false));
        }
        result
    }

    fn projection_method_with_arguments(
        &self,
        field: &Field<'_, String>,
        child_class: &str,
        root_ref: &str,
    ) -> MethodSpec {
        let mut method = MethodSpec::new(sanitize(&field.name));
        method.returns = Some(child_class.to_string());
        method.body.push(format!(
            "{child_class} projection = new {child_class}(this, {root_ref});"
        ));
        method
            .body
            .push(format!("getFields().put(\"{}\", projection);", field.name));
        self.push_argument_statements(&mut method, field);
        method.body.push("return projection;".to_string());
        method
    }

    fn terminal_method_with_arguments(
        &self,
        field: &Field<'_, String>,
        class_name: &str,
    ) -> MethodSpec {
        let mut method = MethodSpec::new(sanitize(&field.name));
        method.returns = Some(class_name.to_string());
        method
            .body
            .push(format!("getFields().put(\"{}\", null);", field.name));
        self.push_argument_statements(&mut method, field);
        method.body.push("return this;".to_string());
        method
    }

    fn push_argument_statements(&self, method: &mut MethodSpec, field: &Field<'_, String>) {
        let runtime = &self.config.runtime_package;
        method.body.push(format!(
            "getInputArguments().computeIfAbsent(\"{}\", k -> new java.util.ArrayList<>());",
            field.name
        ));
        for arg in &field.arguments {
            let param = sanitize(&arg.name);
            method.body.push(format!(
                "{runtime}.InputArgument {param}Arg = new {runtime}.InputArgument(\"{}\", {param});",
                arg.name
            ));
            method.body.push(format!(
                "getInputArguments().get(\"{}\").add({param}Arg);",
                field.name
            ));
        }
        for arg in &field.arguments {
            let java = java_input_type(&arg.value_type, self.schema, &self.config.types_package);
            method.params.push(Param::new(java.name, sanitize(&arg.name)));
        }
    }

    fn delegate_data_type<'e, 'o>(
        &mut self,
        type_def: &'a TypeDefinition<'a, String>,
        selection: Option<SelectionPos<'e, 'o>>,
        operation_name: Option<&str>,
    ) -> GenerationResult {
        if !matches!(
            type_def,
            TypeDefinition::Object(_) | TypeDefinition::Interface(_)
        ) {
            return GenerationResult::new();
        }
        let name = type_name(type_def);
        if !self.data_types_seen.insert(name.to_string()) {
            return GenerationResult::new();
        }
        self.emitter.emit(self.schema, type_def, selection, operation_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datatype::NoopDataTypeEmitter;
    use crate::schema::parse_schema;

    fn generate(sdl: &str, config: &CodeGenConfig) -> GenerationResult {
        let doc = parse_schema(sdl).unwrap();
        let index = SchemaIndex::new(&doc);
        let mut emitter = NoopDataTypeEmitter;
        let mut generator = ClientGenerator::new(config, &index, &mut emitter);
        generator.generate_all(None)
    }

    #[test]
    fn test_cyclic_schema_terminates() {
        let config = CodeGenConfig::new().with_max_projection_depth(-1);
        let result = generate(
            r#"
            type Query { authors: [Author] }
            type Author { name: String, books: [Book] }
            type Book { title: String, author: Author }
            "#,
            &config,
        );

        // Author -> Book -> Author is cut at the repeated (Book, Author) edge
        let names: Vec<&str> = result.projections.iter().map(|u| u.class.name.as_str()).collect();
        assert!(names.contains(&"AuthorsProjectionRoot"));
        assert!(names.contains(&"Authors_BooksProjection"));
        assert!(names.contains(&"Authors_Books_AuthorProjection"));
        assert!(!names.contains(&"Authors_Books_Author_BooksProjection"));
    }

    #[test]
    fn test_rerun_is_deduplicated() {
        let doc = parse_schema("type Query { shows: [Show] } type Show { title: String }").unwrap();
        let index = SchemaIndex::new(&doc);
        let config = CodeGenConfig::new();
        let mut emitter = NoopDataTypeEmitter;
        let mut generator = ClientGenerator::new(&config, &index, &mut emitter);

        let first = generator.generate(OperationKind::Query, None);
        let second = generator.generate(OperationKind::Query, None);

        assert_eq!(first.query_types.len(), 1);
        assert_eq!(first.projections.len(), 1);
        assert!(second.query_types.is_empty());
        assert!(second.projections.is_empty());
    }

    #[test]
    fn test_skip_entity_queries() {
        let sdl = r#"
            type Query { shows: [Show] }
            type Show @key(fields: "id") { id: ID! }
        "#;
        let with_entities = generate(sdl, &CodeGenConfig::new());
        assert!(with_entities
            .projections
            .iter()
            .any(|u| u.class.name == "EntitiesProjectionRoot"));

        let skipped = generate(sdl, &CodeGenConfig::new().with_skip_entity_queries(true));
        assert!(!skipped
            .projections
            .iter()
            .any(|u| u.class.name == "EntitiesProjectionRoot"));
    }

    #[test]
    fn test_unresolvable_field_is_terminal() {
        let config = CodeGenConfig::new();
        let result = generate(
            "type Query { shows: [Show] } type Show { when: DateTime }",
            &config,
        );

        let root = result
            .projections
            .iter()
            .find(|u| u.class.name == "ShowsProjectionRoot")
            .unwrap();
        let when = root.class.method("when").unwrap();
        assert_eq!(when.returns.as_deref(), Some("ShowsProjectionRoot"));
        assert!(when.body.iter().any(|s| s.contains("put(\"when\", null)")));
    }
}
