use querygen::{
    ClassSpec, ClientGenerator, CodeGenConfig, GenerationResult, JavaDataTypeEmitter,
    NoopDataTypeEmitter, OperationKind, SchemaIndex,
};
use std::collections::BTreeMap;

fn generate(sdl: &str, operations: Option<&str>, config: &CodeGenConfig) -> GenerationResult {
    let doc = querygen::parse_schema(sdl).expect("schema");
    let index = SchemaIndex::new(&doc);
    let ops_doc = operations.map(|text| querygen::parse_operations(text).expect("operations"));
    let mut emitter = NoopDataTypeEmitter;
    let mut generator = ClientGenerator::new(config, &index, &mut emitter);
    generator.generate_all(ops_doc.as_ref())
}

fn projection<'r>(result: &'r GenerationResult, name: &str) -> &'r ClassSpec {
    &result
        .projections
        .iter()
        .find(|u| u.class.name == name)
        .unwrap_or_else(|| panic!("missing projection class {name}"))
        .class
}

#[test]
fn cyclic_schema_terminates_with_unlimited_depth() {
    let config = CodeGenConfig::new().with_max_projection_depth(-1);
    let result = generate(
        r#"
        type Query { authors: [Author] }
        type Author { name: String, books: [Book] }
        type Book { title: String, author: Author }
        "#,
        None,
        &config,
    );

    let names: Vec<&str> = result
        .projections
        .iter()
        .map(|u| u.class.name.as_str())
        .collect();
    assert_eq!(
        names,
        [
            "AuthorsProjectionRoot",
            "Authors_BooksProjection",
            "Authors_Books_AuthorProjection",
        ]
    );

    // the class at the cut point keeps its scalar methods but loses the
    // cyclic child accessor
    let tail = projection(&result, "Authors_Books_AuthorProjection");
    assert!(tail.method("name").is_some());
    assert!(tail.method("books").is_none());
}

#[test]
fn every_class_name_emitted_at_most_once() {
    // the Show type is reachable through both operation kinds and through
    // two query fields; the shared query-class and root-projection names
    // must come out exactly once
    let result = generate(
        r#"
        type Query { shows: [Show], featured: Show }
        type Mutation { shows: Show }
        type Show { title: String, related: Show }
        "#,
        None,
        &CodeGenConfig::new(),
    );

    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for unit in result.units() {
        *counts.entry(unit.class.name.as_str()).or_default() += 1;
    }
    for (name, count) in counts {
        assert_eq!(count, 1, "{name} generated {count} times");
    }
}

#[test]
fn depth_bound_is_respected() {
    let sdl = r#"
        type Query { a: A }
        type A { b: B, x: String }
        type B { c: C, y: String }
        type C { z: String }
    "#;

    let bounded = generate(sdl, None, &CodeGenConfig::new().with_max_projection_depth(1));
    let names: Vec<&str> = bounded
        .projections
        .iter()
        .map(|u| u.class.name.as_str())
        .collect();
    assert_eq!(names, ["AProjectionRoot", "A_BProjection"]);

    // the class at the limit only carries scalar methods
    let leaf = projection(&bounded, "A_BProjection");
    assert_eq!(leaf.method_names(), ["y"]);

    let unbounded = generate(sdl, None, &CodeGenConfig::new().with_max_projection_depth(-1));
    assert!(unbounded
        .projections
        .iter()
        .any(|u| u.class.name == "A_B_CProjection"));
}

#[test]
fn example_operation_restricts_fields() {
    let result = generate(
        r#"
        type Query { t: T }
        type T { a: String, b: String, c: String, d: String }
        "#,
        Some("query { t { a c } }"),
        &CodeGenConfig::new(),
    );

    let root = projection(&result, "TProjectionRoot");
    assert_eq!(root.method_names(), ["a", "c"]);
}

#[test]
fn argument_presence_semantics_in_query_class() {
    let result = generate(
        r#"
        type Query { shows(titleFilter: String, first: Int!): [Show] }
        type Show { title: String }
        "#,
        None,
        &CodeGenConfig::new(),
    );

    assert_eq!(result.query_types.len(), 1);
    let query = &result.query_types[0].class;
    assert_eq!(query.name, "ShowsGraphQLQuery");

    let ctor = query
        .methods
        .iter()
        .find(|m| m.is_constructor() && !m.params.is_empty())
        .expect("all-arguments constructor");
    let body = ctor.body.join("\n");

    // primitive arguments always land in the input map
    assert!(body.contains("getInput().put(\"first\", first);"));
    // nullable arguments only when non-null or explicitly set
    assert!(body.contains("if (titleFilter != null || fieldsSet.contains(\"titleFilter\"))"));

    // the trailing marker-set parameter follows the declared arguments
    let param_names: Vec<&str> = ctor.params.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(param_names, ["titleFilter", "first", "fieldsSet"]);

    // operation name is the field name verbatim
    let op_name = query.method("getOperationName").expect("getOperationName");
    assert_eq!(op_name.body, ["return \"shows\";"]);

    // builder records value and presence
    let builder = &query.nested[0];
    assert_eq!(builder.name, "Builder");
    let setter = builder.method("titleFilter").expect("builder setter");
    assert!(setter.body.iter().any(|s| s.contains("fieldsSet.add(\"titleFilter\")")));
}

#[test]
fn interface_fragments_render_on_concrete_types() {
    let result = generate(
        r#"
        type Query { people: [Person] }
        interface Person { name: String }
        type Actor implements Person { name: String, roles: [String] }
        type Director implements Person { name: String }
        "#,
        None,
        &CodeGenConfig::new(),
    );

    let root = projection(&result, "PeopleProjectionRoot");
    assert!(root.method("onActor").is_some());
    assert!(root.method("onDirector").is_some());

    let fragment = projection(&result, "People_ActorProjection");
    let to_string = fragment.method("toString").expect("fragment toString");
    assert!(to_string.body.iter().any(|s| s.contains("... on Actor {")));
    // non-entity fragments pre-register the discriminator field
    assert!(fragment
        .initializer
        .iter()
        .any(|s| s.contains("__typename")));
}

#[test]
fn union_fragments_follow_example_selection() {
    let result = generate(
        r#"
        type Query { search: [SearchResult] }
        union SearchResult = Show | Actor
        type Show { title: String }
        type Actor { name: String }
        "#,
        Some("query { search { ... on Show { title } } }"),
        &CodeGenConfig::new(),
    );

    let root = projection(&result, "SearchProjectionRoot");
    assert!(root.method("onShow").is_some());
    assert!(root.method("onActor").is_none());

    let fragment = projection(&result, "Search_ShowProjection");
    assert_eq!(fragment.method_names(), ["title", "toString"]);
}

#[test]
fn federation_entities_projection() {
    let result = generate(
        r#"
        type Query { shows: [Show] }
        type Show @key(fields: "id") { id: ID!, title: String }
        type Review @key(fields: "id") { id: ID!, stars: Int }
        "#,
        None,
        &CodeGenConfig::new(),
    );

    let roots: Vec<_> = result
        .projections
        .iter()
        .filter(|u| u.class.name == "EntitiesProjectionRoot")
        .collect();
    assert_eq!(roots.len(), 1);
    assert!(roots[0].class.method("onShow").is_some());
    assert!(roots[0].class.method("onReview").is_some());

    // entity key fragments skip the discriminator field but still render
    // as inline fragments
    let key = projection(&result, "EntitiesShowKeyProjection");
    assert!(key.initializer.is_empty());
    assert!(key.method("toString").is_some());
    assert!(key.method("id").is_some());
}

#[test]
fn skipped_and_excluded_fields_are_dropped() {
    let config = CodeGenConfig::new().with_exclude_fields(["internalId"]);
    let result = generate(
        r#"
        type Query { shows: [Show] }
        type Show { title: String, internalId: ID, debug: String @skipcodegen }
        "#,
        None,
        &config,
    );

    let root = projection(&result, "ShowsProjectionRoot");
    assert_eq!(root.method_names(), ["title"]);
}

#[test]
fn include_list_restricts_operations() {
    let config = CodeGenConfig::new().with_include_operations(["shows"]);
    let result = generate(
        r#"
        type Query { shows: [Show], actors: [Actor] }
        type Show { title: String }
        type Actor { name: String }
        "#,
        None,
        &config,
    );

    let names: Vec<&str> = result
        .query_types
        .iter()
        .map(|u| u.class.name.as_str())
        .collect();
    assert_eq!(names, ["ShowsGraphQLQuery"]);
    assert!(result
        .projections
        .iter()
        .all(|u| !u.class.name.starts_with("Actors")));
}

#[test]
fn short_names_stay_distinct_on_deep_trees() {
    let config = CodeGenConfig::new()
        .with_max_projection_depth(-1)
        .with_short_projection_names(true);
    let result = generate(
        r#"
        type Query { searchResultsAcrossCatalogs: [CatalogSearchResultConnection] }
        type CatalogSearchResultConnection { matchingCatalogEntries: [CatalogEntryAggregate], relatedCatalogSuggestions: [CatalogEntryAggregate] }
        type CatalogEntryAggregate { primaryClassification: ClassificationDescriptor, secondaryClassification: ClassificationDescriptor }
        type ClassificationDescriptor { label: String }
        "#,
        None,
        &config,
    );

    let mut names: Vec<&str> = result
        .projections
        .iter()
        .map(|u| u.class.name.as_str())
        .collect();
    let total = names.len();
    names.sort_unstable();
    names.dedup();
    assert_eq!(names.len(), total, "shortened class names must stay unique");
}

#[test]
fn data_types_delegated_once_per_type() {
    let doc = querygen::parse_schema(
        r#"
        type Query { shows: [Show], featured: Show }
        type Show { title: String }
        "#,
    )
    .expect("schema");
    let index = SchemaIndex::new(&doc);
    let config = CodeGenConfig::new();
    let mut emitter = JavaDataTypeEmitter::new(&config.types_package);
    let mut generator = ClientGenerator::new(&config, &index, &mut emitter);
    let result = generator.generate(OperationKind::Query, None);

    // Show is visited from both root fields but its data class comes out once
    let shows: Vec<_> = result
        .data_types
        .iter()
        .filter(|u| u.class.name == "Show")
        .collect();
    assert_eq!(shows.len(), 1);
}
