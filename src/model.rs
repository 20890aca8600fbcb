//! structured emission model
//!
//! the engine builds class/method/field descriptors instead of source text;
//! the renderer turns them into files. one [`GeneratedUnit`] is one emitted
//! class plus its target package; a [`GenerationResult`] groups units by
//! category and merges by order-preserving concatenation.

/// one generated class and its target package
#[derive(Clone, Debug)]
pub struct GeneratedUnit {
    /// target package (namespace) of the class
    pub package: String,
    /// the class itself
    pub class: ClassSpec,
}

/// aggregate output of a generation run
#[derive(Clone, Debug, Default)]
pub struct GenerationResult {
    /// generated query classes, one per included root operation field
    pub query_types: Vec<GeneratedUnit>,
    /// generated projection and fragment classes
    pub projections: Vec<GeneratedUnit>,
    /// delegated data-type classes, merged opaquely
    pub data_types: Vec<GeneratedUnit>,
}

impl GenerationResult {
    /// empty result
    pub fn new() -> Self {
        Self::default()
    }

    /// result holding a single query class
    pub fn query_type(unit: GeneratedUnit) -> Self {
        Self {
            query_types: vec![unit],
            ..Self::default()
        }
    }

    /// result holding a single projection class
    pub fn projection(unit: GeneratedUnit) -> Self {
        Self {
            projections: vec![unit],
            ..Self::default()
        }
    }

    /// result holding a single data-type class
    pub fn data_type(unit: GeneratedUnit) -> Self {
        Self {
            data_types: vec![unit],
            ..Self::default()
        }
    }

    /// append another result, preserving order within each category
    pub fn merge(mut self, other: Self) -> Self {
        self.query_types.extend(other.query_types);
        self.projections.extend(other.projections);
        self.data_types.extend(other.data_types);
        self
    }

    /// all units across categories, in category order
    pub fn units(&self) -> impl Iterator<Item = &GeneratedUnit> {
        self.query_types
            .iter()
            .chain(self.projections.iter())
            .chain(self.data_types.iter())
    }
}

/// a class descriptor
#[derive(Clone, Debug)]
pub struct ClassSpec {
    /// class name
    pub name: String,
    /// javadoc text, if any
    pub doc: Option<String>,
    /// superclass reference, possibly parameterized
    pub extends: Option<String>,
    /// render as `interface` instead of `class`
    pub is_interface: bool,
    /// render with the `static` modifier (nested classes)
    pub is_static: bool,
    /// instance fields
    pub fields: Vec<FieldSpec>,
    /// instance initializer statements
    pub initializer: Vec<String>,
    /// constructors and methods, in declaration order
    pub methods: Vec<MethodSpec>,
    /// nested classes (e.g. a query's Builder)
    pub nested: Vec<ClassSpec>,
}

impl ClassSpec {
    /// new public class with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc: None,
            extends: None,
            is_interface: false,
            is_static: false,
            fields: Vec::new(),
            initializer: Vec::new(),
            methods: Vec::new(),
            nested: Vec::new(),
        }
    }

    /// look up a method by name
    pub fn method(&self, name: &str) -> Option<&MethodSpec> {
        self.methods.iter().find(|m| m.name == name)
    }

    /// names of all non-constructor methods, in declaration order
    pub fn method_names(&self) -> Vec<&str> {
        self.methods
            .iter()
            .filter(|m| !m.is_constructor())
            .map(|m| m.name.as_str())
            .collect()
    }
}

/// a field descriptor
#[derive(Clone, Debug)]
pub struct FieldSpec {
    /// field type
    pub type_name: String,
    /// field name
    pub name: String,
    /// initializer expression, if any
    pub init: Option<String>,
}

/// a method or constructor descriptor
#[derive(Clone, Debug)]
pub struct MethodSpec {
    /// method name; empty for constructors (the renderer uses the class name)
    pub name: String,
    /// javadoc text, if any
    pub doc: Option<String>,
    /// return type; None for constructors
    pub returns: Option<String>,
    /// parameters, in order
    pub params: Vec<Param>,
    /// body statements, one per line
    pub body: Vec<String>,
    /// render with the `static` modifier
    pub is_static: bool,
    /// render an `@Override` annotation
    pub is_override: bool,
}

impl MethodSpec {
    /// new public method with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc: None,
            returns: None,
            params: Vec::new(),
            body: Vec::new(),
            is_static: false,
            is_override: false,
        }
    }

    /// new constructor
    pub fn constructor() -> Self {
        Self::new("")
    }

    /// true for constructors
    pub fn is_constructor(&self) -> bool {
        self.name.is_empty()
    }
}

/// a method parameter
#[derive(Clone, Debug)]
pub struct Param {
    /// parameter type
    pub type_name: String,
    /// parameter name
    pub name: String,
}

impl Param {
    /// new parameter
    pub fn new(type_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            name: name.into(),
        }
    }
}
