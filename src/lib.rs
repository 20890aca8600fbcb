//! querygen graphql client generator
//!
//! this crate generates strongly-typed java client classes from a graphql
//! schema: one query class per root operation field, plus a recursive tree
//! of projection classes for building type-safe selection sets. start with
//! [`SchemaIndex`], [`CodeGenConfig`], and [`ClientGenerator`]; render the
//! result with [`render::render_unit`]. for a ready-made cli, use the
//! `querygen` binary.
//!
//! ## quick start
//!
//! ```
//! use querygen::{ClientGenerator, CodeGenConfig, JavaDataTypeEmitter, SchemaIndex};
//!
//! # fn example() -> querygen::Result<()> {
//! let doc = querygen::parse_schema("type Query { shows: [Show] } type Show { title: String }")?;
//! let schema = SchemaIndex::new(&doc);
//! let config = CodeGenConfig::new();
//! config.validate()?;
//!
//! let mut data_types = JavaDataTypeEmitter::new(&config.types_package);
//! let mut generator = ClientGenerator::new(&config, &schema, &mut data_types);
//! let result = generator.generate_all(None);
//!
//! assert_eq!(result.query_types.len(), 1);
//! for unit in result.units() {
//!     println!("{}", querygen::render::render_unit(unit));
//! }
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## example operations
//!
//! an example operation document restricts which schema fields get
//! projection methods: parse it with [`parse_operations`] and pass it to
//! [`ClientGenerator::generate_all`].

mod config;
mod datatype;
mod error;
mod filter;
mod generator;
mod model;
mod names;
mod registry;
mod schema;
mod shorten;

pub mod render;

pub use config::CodeGenConfig;
pub use datatype::{DataTypeEmitter, JavaDataTypeEmitter, NoopDataTypeEmitter};
pub use error::{Error, Result};
pub use filter::{parse_operations, ExampleOperation, SelectionPos, SKIP_DIRECTIVE};
pub use generator::ClientGenerator;
pub use model::{ClassSpec, FieldSpec, GeneratedUnit, GenerationResult, MethodSpec, Param};
pub use registry::NameRegistry;
pub use schema::{parse_schema, OperationKind, SchemaIndex, KEY_DIRECTIVE};
pub use shorten::Shortener;
