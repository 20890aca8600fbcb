//! selection filter
//!
//! reduces a type's field list to the fields that get projection methods:
//! skip-directive fields are always dropped, the config's exclude list drops
//! by exact name, the include list restricts root operation fields, and an
//! example operation (when supplied) restricts the result to its concrete
//! selection, in the selection's order. fragment spreads in the example
//! document are expanded through its fragment definitions.

use crate::config::CodeGenConfig;
use crate::error::{Error, Result};
use crate::schema::{has_directive, OperationKind};
use graphql_parser::query::{
    Definition, Document, Field as QueryField, FragmentDefinition, OperationDefinition, Selection,
    SelectionSet, TypeCondition,
};
use graphql_parser::schema::Field as SchemaField;
use std::collections::{BTreeMap, BTreeSet};

/// directive that unconditionally excludes a field from generation
pub const SKIP_DIRECTIVE: &str = "skipcodegen";

/// parse an example operations document
pub fn parse_operations(text: &str) -> Result<Document<'_, String>> {
    graphql_parser::parse_query::<String>(text)
        .map_err(|err| Error::OperationParse(err.to_string()))
}

/// one located operation of an example document, plus its fragments
///
/// `'d` is the lifetime of the borrow into the parsed document; `'o` is the
/// document's own content lifetime. they are kept distinct because the parser
/// types are invariant over their content lifetime, so a borrow for less than
/// the content lifetime cannot be coerced to one.
pub struct ExampleOperation<'d, 'o> {
    name: Option<String>,
    root: &'d SelectionSet<'o, String>,
    fragments: BTreeMap<&'d str, &'d FragmentDefinition<'o, String>>,
}

impl<'d, 'o> ExampleOperation<'d, 'o> {
    /// locate the first operation of the given kind in a parsed document
    pub fn for_kind(doc: &'d Document<'o, String>, kind: OperationKind) -> Option<Self> {
        let mut fragments = BTreeMap::new();
        for def in &doc.definitions {
            if let Definition::Fragment(frag) = def {
                fragments.insert(frag.name.as_str(), frag);
            }
        }

        for def in &doc.definitions {
            if let Definition::Operation(op) = def {
                let (matches, name, root) = match op {
                    OperationDefinition::SelectionSet(set) => {
                        (kind == OperationKind::Query, None, set)
                    }
                    OperationDefinition::Query(query) => {
                        (kind == OperationKind::Query, query.name.clone(), &query.selection_set)
                    }
                    OperationDefinition::Mutation(mutation) => (
                        kind == OperationKind::Mutation,
                        mutation.name.clone(),
                        &mutation.selection_set,
                    ),
                    OperationDefinition::Subscription(sub) => (
                        kind == OperationKind::Subscription,
                        sub.name.clone(),
                        &sub.selection_set,
                    ),
                };
                if matches {
                    return Some(Self {
                        name,
                        root,
                        fragments: std::mem::take(&mut fragments),
                    });
                }
            }
        }
        None
    }

    /// the operation's name, if it has one
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// cursor at the operation's top-level selection
    pub fn root(&self) -> SelectionPos<'_, 'o> {
        SelectionPos {
            set: self.root,
            op: self,
        }
    }
}

/// cursor into an example operation at one nesting position
///
/// `'e` is the lifetime of the borrow into the [`ExampleOperation`] (and,
/// by covariance, the document nodes reachable through it); `'o` is the
/// document's content lifetime.
#[derive(Clone, Copy)]
pub struct SelectionPos<'e, 'o> {
    set: &'e SelectionSet<'o, String>,
    op: &'e ExampleOperation<'e, 'o>,
}

impl<'e, 'o> SelectionPos<'e, 'o> {
    /// plain fields selected at this position, fragment spreads expanded
    pub fn fields(&self) -> Vec<&'e QueryField<'o, String>> {
        let mut out = Vec::new();
        let mut seen_fragments = BTreeSet::new();
        collect_fields(self.set, self.op, &mut out, &mut seen_fragments);
        out
    }

    /// cursor at the named child field's selection, if it has one
    pub fn child(&self, name: &str) -> Option<SelectionPos<'e, 'o>> {
        self.fields()
            .into_iter()
            .find(|f| f.name == name)
            .filter(|f| !f.selection_set.items.is_empty())
            .map(|f| SelectionPos {
                set: &f.selection_set,
                op: self.op,
            })
    }

    /// cursor at the fragment selection for a concrete type, if present
    pub fn fragment(&self, type_name: &str) -> Option<SelectionPos<'e, 'o>> {
        for item in &self.set.items {
            match item {
                Selection::InlineFragment(frag) => {
                    if let Some(TypeCondition::On(on)) = &frag.type_condition {
                        if on == type_name {
                            return Some(SelectionPos {
                                set: &frag.selection_set,
                                op: self.op,
                            });
                        }
                    }
                }
                Selection::FragmentSpread(spread) => {
                    if let Some(def) = self.op.fragments.get(spread.fragment_name.as_str()) {
                        let TypeCondition::On(on) = &def.type_condition;
                        if on == type_name {
                            return Some(SelectionPos {
                                set: &def.selection_set,
                                op: self.op,
                            });
                        }
                    }
                }
                Selection::Field(_) => {}
            }
        }
        None
    }

    /// true if this position restricts concrete members via fragments
    ///
    /// fragments conditioned on the current (interface/union) type itself are
    /// plain field selections, not member selections.
    pub fn selects_members(&self, current_type: &str) -> bool {
        self.set.items.iter().any(|item| match item {
            Selection::InlineFragment(frag) => match &frag.type_condition {
                Some(TypeCondition::On(on)) => on != current_type,
                None => false,
            },
            Selection::FragmentSpread(spread) => {
                match self.op.fragments.get(spread.fragment_name.as_str()) {
                    Some(def) => {
                        let TypeCondition::On(on) = &def.type_condition;
                        on != current_type
                    }
                    None => false,
                }
            }
            Selection::Field(_) => false,
        })
    }
}

fn collect_fields<'e, 'o>(
    set: &'e SelectionSet<'o, String>,
    op: &'e ExampleOperation<'e, 'o>,
    out: &mut Vec<&'e QueryField<'o, String>>,
    seen_fragments: &mut BTreeSet<&'e str>,
) {
    for item in &set.items {
        match item {
            Selection::Field(field) => out.push(field),
            Selection::FragmentSpread(spread) => {
                if let Some(frag) = op.fragments.get(spread.fragment_name.as_str()) {
                    // guard against spread cycles in malformed documents
                    if seen_fragments.insert(frag.name.as_str()) {
                        collect_fields(&frag.selection_set, op, out, seen_fragments);
                    }
                }
            }
            Selection::InlineFragment(frag) => {
                if frag.type_condition.is_none() {
                    collect_fields(&frag.selection_set, op, out, seen_fragments);
                }
            }
        }
    }
}

/// reduce a field list to the fields that get projection methods
///
/// `at_operation_root` scopes the config include list to root operation
/// fields; the exclude list and the skip directive apply at every level. the
/// example selection composes last: a field admitted by the lists but absent
/// from the concrete selection is dropped.
pub fn filter_fields<'s, 'e, 'o>(
    fields: Vec<&'s SchemaField<'s, String>>,
    config: &CodeGenConfig,
    selection: Option<SelectionPos<'e, 'o>>,
    at_operation_root: bool,
) -> Vec<&'s SchemaField<'s, String>> {
    let allowed: Vec<&'s SchemaField<'s, String>> = fields
        .into_iter()
        .filter(|f| !has_directive(&f.directives, SKIP_DIRECTIVE))
        .filter(|f| !config.exclude_fields.contains(f.name.as_str()))
        .filter(|f| {
            !at_operation_root
                || config.include_operations.is_empty()
                || config.include_operations.contains(f.name.as_str())
        })
        .collect();

    let Some(pos) = selection else {
        return allowed;
    };

    let mut out: Vec<&'s SchemaField<'s, String>> = Vec::new();
    for selected in pos.fields() {
        if let Some(&field) = allowed.iter().find(|f| f.name == selected.name) {
            if !out.iter().any(|f| f.name == field.name) {
                out.push(field);
            }
        }
    }
    out
}
