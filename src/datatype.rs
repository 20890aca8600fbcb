//! data-type emitter
//!
//! projection generation delegates plain data representations to this seam.
//! the engine invokes the emitter at most once per concrete object or
//! interface type per run and merges whatever comes back without looking at
//! it.

use crate::filter::SelectionPos;
use crate::model::{ClassSpec, FieldSpec, GeneratedUnit, GenerationResult, MethodSpec, Param};
use crate::names::capitalized;
use crate::render::java_input_type;
use crate::schema::{fields_of, type_name, SchemaIndex};
use graphql_parser::schema::TypeDefinition;

/// collaborator contract for data-type generation
pub trait DataTypeEmitter {
    /// emit the data representation for one schema type
    fn emit(
        &mut self,
        schema: &SchemaIndex<'_>,
        type_def: &TypeDefinition<'_, String>,
        selection: Option<SelectionPos<'_, '_>>,
        operation_name: Option<&str>,
    ) -> GenerationResult;
}

/// emitter that produces nothing; useful when only projections are wanted
#[derive(Debug, Default)]
pub struct NoopDataTypeEmitter;

impl DataTypeEmitter for NoopDataTypeEmitter {
    fn emit(
        &mut self,
        _schema: &SchemaIndex<'_>,
        _type_def: &TypeDefinition<'_, String>,
        _selection: Option<SelectionPos<'_, '_>>,
        _operation_name: Option<&str>,
    ) -> GenerationResult {
        GenerationResult::new()
    }
}

/// default emitter: plain java data classes with getters and setters, and
/// getter-only interfaces for interface types
#[derive(Debug)]
pub struct JavaDataTypeEmitter {
    types_package: String,
}

impl JavaDataTypeEmitter {
    /// create an emitter targeting the given types package
    pub fn new(types_package: impl Into<String>) -> Self {
        Self {
            types_package: types_package.into(),
        }
    }

    fn package_for(&self, operation_name: Option<&str>) -> String {
        match operation_name {
            Some(name) => format!("{}.{}", self.types_package, name.to_lowercase()),
            None => self.types_package.clone(),
        }
    }
}

impl DataTypeEmitter for JavaDataTypeEmitter {
    fn emit(
        &mut self,
        schema: &SchemaIndex<'_>,
        type_def: &TypeDefinition<'_, String>,
        selection: Option<SelectionPos<'_, '_>>,
        operation_name: Option<&str>,
    ) -> GenerationResult {
        let is_interface = matches!(type_def, TypeDefinition::Interface(_));
        if !is_interface && !matches!(type_def, TypeDefinition::Object(_)) {
            return GenerationResult::new();
        }

        let selected_names: Option<Vec<String>> = selection
            .map(|pos| pos.fields().iter().map(|f| f.name.clone()).collect());

        let mut class = ClassSpec::new(type_name(type_def));
        class.is_interface = is_interface;

        for field in fields_of(type_def) {
            if let Some(names) = &selected_names {
                if !names.iter().any(|n| n == &field.name) {
                    continue;
                }
            }

            let java = java_input_type(&field.field_type, schema, &self.types_package);
            let accessor = capitalized(&field.name);

            let mut getter = MethodSpec::new(format!("get{accessor}"));
            getter.returns = Some(java.name.clone());
            if !is_interface {
                getter.body.push(format!("return {};", field.name));

                let mut setter = MethodSpec::new(format!("set{accessor}"));
                setter.params.push(Param::new(java.name.clone(), field.name.clone()));
                setter.body.push(format!("this.{} = {};", field.name, field.name));
                class.fields.push(FieldSpec {
                    type_name: java.name.clone(),
                    name: field.name.clone(),
                    init: None,
                });
                class.methods.push(getter);
                class.methods.push(setter);
            } else {
                class.methods.push(getter);
            }
        }

        GenerationResult::data_type(GeneratedUnit {
            package: self.package_for(operation_name),
            class,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::parse_schema;

    const SDL: &str = r#"
        type Query { shows: [Show] }

        type Show {
            id: ID!
            title: String
        }

        interface Person {
            name: String
        }
    "#;

    #[test]
    fn test_object_data_class() {
        let doc = parse_schema(SDL).unwrap();
        let index = SchemaIndex::new(&doc);
        let show = index.type_definition("Show").unwrap();

        let mut emitter = JavaDataTypeEmitter::new("graphql.types");
        let result = emitter.emit(&index, show, None, None);

        assert_eq!(result.data_types.len(), 1);
        let unit = &result.data_types[0];
        assert_eq!(unit.package, "graphql.types");
        assert_eq!(unit.class.name, "Show");
        assert_eq!(
            unit.class.method_names(),
            ["getId", "setId", "getTitle", "setTitle"]
        );
    }

    #[test]
    fn test_interface_data_type() {
        let doc = parse_schema(SDL).unwrap();
        let index = SchemaIndex::new(&doc);
        let person = index.type_definition("Person").unwrap();

        let mut emitter = JavaDataTypeEmitter::new("graphql.types");
        let result = emitter.emit(&index, person, None, Some("ShowsAndPeople"));

        let unit = &result.data_types[0];
        assert!(unit.class.is_interface);
        assert_eq!(unit.package, "graphql.types.showsandpeople");
        assert_eq!(unit.class.method_names(), ["getName"]);
    }

    #[test]
    fn test_selection_restricts_fields() {
        let doc = parse_schema(SDL).unwrap();
        let index = SchemaIndex::new(&doc);
        let show = index.type_definition("Show").unwrap();

        let ops = crate::filter::parse_operations("query { shows { title } }").unwrap();
        let example =
            crate::filter::ExampleOperation::for_kind(&ops, crate::schema::OperationKind::Query)
                .unwrap();
        let pos = example.root().child("shows").unwrap();

        let mut emitter = JavaDataTypeEmitter::new("graphql.types");
        let result = emitter.emit(&index, show, Some(pos), None);
        assert_eq!(
            result.data_types[0].class.method_names(),
            ["getTitle", "setTitle"]
        );
    }
}
