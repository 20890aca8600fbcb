//! schema index
//!
//! read-only view over a parsed schema document: type lookup by name,
//! extension merging, interface implementations, union members, federation
//! key detection, and operation-root resolution. the document is owned by
//! the caller and never mutated here.

use crate::error::{Error, Result};
use graphql_parser::schema::{
    Definition, Directive, Document, Field, ObjectType, Type, TypeDefinition, TypeExtension,
    UnionType,
};
use std::collections::BTreeMap;

/// directive marking a federation entity type
pub const KEY_DIRECTIVE: &str = "key";

/// parse a schema document
pub fn parse_schema(text: &str) -> Result<Document<'_, String>> {
    graphql_parser::parse_schema::<String>(text).map_err(|err| Error::SchemaParse(err.to_string()))
}

/// the three root operation kinds
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperationKind {
    Query,
    Mutation,
    Subscription,
}

impl OperationKind {
    /// all kinds, in generation order
    pub const ALL: [OperationKind; 3] = [
        OperationKind::Query,
        OperationKind::Mutation,
        OperationKind::Subscription,
    ];

    /// the operation keyword used in request documents
    pub fn keyword(self) -> &'static str {
        match self {
            OperationKind::Query => "query",
            OperationKind::Mutation => "mutation",
            OperationKind::Subscription => "subscription",
        }
    }

    /// the default root type name when the schema declares none
    fn default_type_name(self) -> &'static str {
        match self {
            OperationKind::Query => "Query",
            OperationKind::Mutation => "Mutation",
            OperationKind::Subscription => "Subscription",
        }
    }
}

/// index over one schema document
pub struct SchemaIndex<'a> {
    doc: &'a Document<'a, String>,
    types: BTreeMap<&'a str, &'a TypeDefinition<'a, String>>,
    query_type: Option<String>,
    mutation_type: Option<String>,
    subscription_type: Option<String>,
}

impl<'a> SchemaIndex<'a> {
    /// index a parsed schema document
    pub fn new(doc: &'a Document<'a, String>) -> Self {
        let mut types = BTreeMap::new();
        let mut query_type = None;
        let mut mutation_type = None;
        let mut subscription_type = None;

        for def in &doc.definitions {
            match def {
                Definition::TypeDefinition(ty) => {
                    types.insert(type_name(ty), ty);
                }
                Definition::SchemaDefinition(schema) => {
                    query_type = schema.query.clone();
                    mutation_type = schema.mutation.clone();
                    subscription_type = schema.subscription.clone();
                }
                _ => {}
            }
        }

        Self {
            doc,
            types,
            query_type,
            mutation_type,
            subscription_type,
        }
    }

    /// look up a type definition by name
    pub fn type_definition(&self, name: &str) -> Option<&'a TypeDefinition<'a, String>> {
        self.types.get(name).copied()
    }

    /// resolve a field type to its schema definition, unwrapping list and
    /// non-null wrappers; None for built-in scalars and dangling references
    pub fn resolve(&self, ty: &Type<'_, String>) -> Option<&'a TypeDefinition<'a, String>> {
        self.type_definition(base_name(ty))
    }

    /// the root object type for an operation kind, if the schema has one
    pub fn operation_root(&self, kind: OperationKind) -> Option<&'a TypeDefinition<'a, String>> {
        let name = match kind {
            OperationKind::Query => self.query_type.as_deref(),
            OperationKind::Mutation => self.mutation_type.as_deref(),
            OperationKind::Subscription => self.subscription_type.as_deref(),
        }
        .unwrap_or_else(|| kind.default_type_name());

        self.type_definition(name)
            .filter(|def| matches!(def, TypeDefinition::Object(_)))
    }

    /// a type's own fields plus any fields contributed by schema extensions,
    /// in declaration order
    pub fn fields_with_extensions(
        &self,
        type_def: &'a TypeDefinition<'a, String>,
    ) -> Vec<&'a Field<'a, String>> {
        let name = type_name(type_def);
        let mut fields: Vec<&'a Field<'a, String>> = fields_of(type_def).iter().collect();

        for def in &self.doc.definitions {
            if let Definition::TypeExtension(ext) = def {
                match ext {
                    TypeExtension::Object(obj) if obj.name == name => {
                        fields.extend(obj.fields.iter());
                    }
                    TypeExtension::Interface(iface) if iface.name == name => {
                        fields.extend(iface.fields.iter());
                    }
                    _ => {}
                }
            }
        }

        fields
    }

    /// object types implementing an interface, in declaration order
    pub fn implementations(&self, interface: &str) -> Vec<&'a ObjectType<'a, String>> {
        self.doc
            .definitions
            .iter()
            .filter_map(|def| match def {
                Definition::TypeDefinition(TypeDefinition::Object(obj))
                    if obj.implements_interfaces.iter().any(|i| i == interface) =>
                {
                    Some(obj)
                }
                _ => None,
            })
            .collect()
    }

    /// resolved member types of a union, in declaration order; dangling
    /// member names are skipped
    pub fn union_members(
        &self,
        union: &UnionType<'_, String>,
    ) -> Vec<&'a TypeDefinition<'a, String>> {
        union
            .types
            .iter()
            .filter_map(|name| self.type_definition(name))
            .collect()
    }

    /// object types carrying the federation key directive, in declaration
    /// order
    pub fn federated_objects(&self) -> Vec<&'a ObjectType<'a, String>> {
        self.doc
            .definitions
            .iter()
            .filter_map(|def| match def {
                Definition::TypeDefinition(TypeDefinition::Object(obj))
                    if has_directive(&obj.directives, KEY_DIRECTIVE) =>
                {
                    Some(obj)
                }
                _ => None,
            })
            .collect()
    }
}

/// the name of a type definition
pub fn type_name<'r>(def: &'r TypeDefinition<'_, String>) -> &'r str {
    match def {
        TypeDefinition::Scalar(ty) => &ty.name,
        TypeDefinition::Object(ty) => &ty.name,
        TypeDefinition::Interface(ty) => &ty.name,
        TypeDefinition::Union(ty) => &ty.name,
        TypeDefinition::Enum(ty) => &ty.name,
        TypeDefinition::InputObject(ty) => &ty.name,
    }
}

/// the named type at the bottom of list and non-null wrappers
pub fn base_name<'r>(ty: &'r Type<'_, String>) -> &'r str {
    match ty {
        Type::NamedType(name) => name,
        Type::ListType(inner) => base_name(inner),
        Type::NonNullType(inner) => base_name(inner),
    }
}

/// true for type kinds that take a selection set
pub fn is_selectable(def: &TypeDefinition<'_, String>) -> bool {
    matches!(
        def,
        TypeDefinition::Object(_) | TypeDefinition::Interface(_) | TypeDefinition::Union(_)
    )
}

/// a type definition's field list; empty for kinds without fields
pub fn fields_of<'r, 'c>(def: &'r TypeDefinition<'c, String>) -> &'r [Field<'c, String>] {
    match def {
        TypeDefinition::Object(ty) => &ty.fields,
        TypeDefinition::Interface(ty) => &ty.fields,
        _ => &[],
    }
}

/// true if a directive with the given name is present
pub fn has_directive(directives: &[Directive<'_, String>], name: &str) -> bool {
    directives.iter().any(|d| d.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SDL: &str = r#"
        schema {
            query: QueryRoot
        }

        type QueryRoot {
            shows: [Show]
        }

        type Show @key(fields: "id") {
            id: ID!
            title: String
        }

        extend type Show {
            rating: Float
        }

        interface Person {
            name: String
        }

        type Actor implements Person {
            name: String
            roles: [String]
        }

        type Director implements Person {
            name: String
        }

        union SearchResult = Show | Actor

        enum Genre {
            DRAMA
            COMEDY
        }
    "#;

    #[test]
    fn test_operation_roots() {
        let doc = parse_schema(SDL).unwrap();
        let index = SchemaIndex::new(&doc);

        let query = index.operation_root(OperationKind::Query).unwrap();
        assert_eq!(type_name(query), "QueryRoot");
        assert!(index.operation_root(OperationKind::Mutation).is_none());
        assert!(index.operation_root(OperationKind::Subscription).is_none());
    }

    #[test]
    fn test_resolve() {
        let doc = parse_schema(SDL).unwrap();
        let index = SchemaIndex::new(&doc);
        let query = index.operation_root(OperationKind::Query).unwrap();

        let shows = &fields_of(query)[0];
        let resolved = index.resolve(&shows.field_type).unwrap();
        assert_eq!(type_name(resolved), "Show");
        assert!(is_selectable(resolved));

        let show = index.type_definition("Show").unwrap();
        let title = &fields_of(show)[1];
        assert!(index.resolve(&title.field_type).is_none());
    }

    #[test]
    fn test_extension_fields_merged() {
        let doc = parse_schema(SDL).unwrap();
        let index = SchemaIndex::new(&doc);
        let show = index.type_definition("Show").unwrap();

        let names: Vec<&str> = index
            .fields_with_extensions(show)
            .iter()
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(names, ["id", "title", "rating"]);
    }

    #[test]
    fn test_implementations() {
        let doc = parse_schema(SDL).unwrap();
        let index = SchemaIndex::new(&doc);

        let impls: Vec<&str> = index
            .implementations("Person")
            .iter()
            .map(|obj| obj.name.as_str())
            .collect();
        assert_eq!(impls, ["Actor", "Director"]);
    }

    #[test]
    fn test_union_members() {
        let doc = parse_schema(SDL).unwrap();
        let index = SchemaIndex::new(&doc);

        let union = match index.type_definition("SearchResult").unwrap() {
            TypeDefinition::Union(union) => union,
            _ => panic!("expected union"),
        };
        let members: Vec<&str> = index.union_members(union).into_iter().map(type_name).collect();
        assert_eq!(members, ["Show", "Actor"]);
    }

    #[test]
    fn test_federated_objects() {
        let doc = parse_schema(SDL).unwrap();
        let index = SchemaIndex::new(&doc);

        let federated: Vec<&str> = index
            .federated_objects()
            .iter()
            .map(|obj| obj.name.as_str())
            .collect();
        assert_eq!(federated, ["Show"]);
    }

    #[test]
    fn test_enum_not_selectable() {
        let doc = parse_schema(SDL).unwrap();
        let index = SchemaIndex::new(&doc);
        let genre = index.type_definition("Genre").unwrap();
        assert!(!is_selectable(genre));
        assert!(fields_of(genre).is_empty());
    }
}
