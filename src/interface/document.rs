//! Registry of the classes declared by an interface document.
//!
//! Every `package`, `type`, `record` and `function` element carrying an `id`
//! is registered under its qualified name, in document order. Name lookup and
//! alias resolution work on this registry alone.

use std::collections::HashSet;
use std::ops::Range;

use indexmap::IndexMap;
use log::trace;

use super::xml::XmlElement;
use crate::codec::{Dimension, Shape};
use crate::error::{Result, ScriptingError};
use crate::grammar::{ClassRestriction, Direction, Identifier, QualifiedName};

/// Root element name of an interface document.
pub const ROOT_ELEMENT: &str = "omcInterface";

/// A component (`argument` or `element`) as written in the document.
#[derive(Clone, Debug, PartialEq)]
pub struct ComponentNode {
    pub name: Identifier,
    /// `className` as written, relative to the enclosing class.
    pub class_name: QualifiedName,
    pub direction: Option<Direction>,
    pub comment: Option<String>,
    pub shape: Shape,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EnumeratorNode {
    pub name: Identifier,
    pub comment: Option<String>,
}

/// One registered class.
#[derive(Clone, Debug, PartialEq)]
pub struct ClassNode {
    pub name: QualifiedName,
    pub restriction: ClassRestriction,
    /// Target of an alias (`ref`), as written.
    pub reference: Option<QualifiedName>,
    pub comment: Option<String>,
    /// Interface-only listing from the `code` child.
    pub code: Option<String>,
    pub components: Vec<ComponentNode>,
    pub enumerators: Vec<EnumeratorNode>,
    pub span: Range<usize>,
}

impl ClassNode {
    pub fn is_alias(&self) -> bool {
        self.reference.is_some()
    }

    /// Scope that relative references inside this class start from.
    pub fn scope(&self) -> &QualifiedName {
        &self.name
    }
}

/// All classes of a document, keyed by unrooted qualified name.
#[derive(Clone, Debug, Default)]
pub struct InterfaceDocument {
    pub omc_version: String,
    classes: IndexMap<QualifiedName, ClassNode>,
}

fn restriction_of(tag: &str) -> Option<ClassRestriction> {
    match tag {
        "package" => Some(ClassRestriction::Package),
        "type" => Some(ClassRestriction::Type),
        "record" => Some(ClassRestriction::Record),
        "function" => Some(ClassRestriction::Function),
        _ => None,
    }
}

fn parse_name(text: &str, what: &str, span: &Range<usize>) -> Result<QualifiedName> {
    QualifiedName::parse(text.trim()).map_err(|_| {
        ScriptingError::InvalidDocument(format!(
            "invalid {} {:?} at byte {}",
            what, text, span.start
        ))
    })
}

fn parse_identifier(text: &str, span: &Range<usize>) -> Result<Identifier> {
    Identifier::new(text.trim()).map_err(|_| {
        ScriptingError::InvalidDocument(format!(
            "invalid component name {:?} at byte {}",
            text, span.start
        ))
    })
}

fn required<'a>(element: &'a XmlElement, key: &str) -> Result<&'a str> {
    element.attribute(key).ok_or_else(|| {
        ScriptingError::InvalidDocument(format!(
            "<{}> at byte {} has no '{}' attribute",
            element.name, element.span.start, key
        ))
    })
}

fn comment_of(element: &XmlElement) -> Option<String> {
    element
        .attribute("comment")
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
}

fn shape_of(element: &XmlElement) -> Shape {
    let dimensions = element
        .child("dimensions")
        .map(|dims| {
            dims.children_named("dimension")
                .map(|d| Dimension::parse(d.attribute("size").unwrap_or(":")))
                .collect()
        })
        .unwrap_or_default();
    Shape::new(dimensions)
}

fn component_of(element: &XmlElement) -> Result<ComponentNode> {
    let direction = match element.attribute("direction").map(str::trim) {
        None | Some("") => None,
        Some("input") => Some(Direction::Input),
        Some("output") => Some(Direction::Output),
        Some(other) => {
            return Err(ScriptingError::InvalidDocument(format!(
                "unknown direction {:?} at byte {}",
                other, element.span.start
            )));
        }
    };
    Ok(ComponentNode {
        name: parse_identifier(required(element, "name")?, &element.span)?,
        class_name: parse_name(required(element, "className")?, "className", &element.span)?,
        direction,
        comment: comment_of(element),
        shape: shape_of(element),
    })
}

impl InterfaceDocument {
    /// Register every class of a parsed `omcInterface` tree.
    pub fn from_xml(root: &XmlElement) -> Result<Self> {
        if root.name != ROOT_ELEMENT {
            return Err(ScriptingError::InvalidDocument(format!(
                "expected <{}>, found <{}>",
                ROOT_ELEMENT, root.name
            )));
        }
        let mut document = InterfaceDocument {
            omc_version: root.attribute("omcVersion").unwrap_or("unknown").to_string(),
            classes: IndexMap::new(),
        };
        document.collect(root, None)?;
        Ok(document)
    }

    fn collect(&mut self, element: &XmlElement, parent: Option<&QualifiedName>) -> Result<()> {
        for child in &element.children {
            match restriction_of(&child.name) {
                Some(restriction) if child.attribute("id").is_some() => {
                    let name = self.register(child, restriction, parent)?;
                    self.collect(child, Some(&name))?;
                }
                _ => self.collect(child, parent)?,
            }
        }
        Ok(())
    }

    fn register(
        &mut self,
        element: &XmlElement,
        restriction: ClassRestriction,
        parent: Option<&QualifiedName>,
    ) -> Result<QualifiedName> {
        let id = parse_name(required(element, "id")?, "id", &element.span)?.unrooted();
        // A nested id may be written relative to its enclosing class.
        let name = match parent {
            Some(parent) if id.strip_prefix(parent).is_none() => parent / &id,
            _ => id,
        };
        if let Some(existing) = self.classes.get(&name) {
            return Err(ScriptingError::InvalidDocument(format!(
                "class '{}' at byte {} is already declared at byte {}",
                name, element.span.start, existing.span.start
            )));
        }

        let reference = element
            .attribute("ref")
            .map(|r| parse_name(r, "ref", &element.span))
            .transpose()?;
        let code = element
            .child("code")
            .map(|c| c.text.trim().to_string())
            .filter(|c| !c.is_empty());

        let mut components = Vec::new();
        let mut enumerators: Vec<EnumeratorNode> = Vec::new();
        if let Some(list) = element.child("components") {
            for item in &list.children {
                match item.name.as_str() {
                    "argument" | "element" => components.push(component_of(item)?),
                    "enumerator" => {
                        let name = parse_identifier(required(item, "name")?, &item.span)?;
                        // Enumerators are deduplicated, keeping the first.
                        if !enumerators.iter().any(|e| e.name == name) {
                            enumerators.push(EnumeratorNode {
                                name,
                                comment: comment_of(item),
                            });
                        }
                    }
                    _ => {}
                }
            }
        }

        trace!("registered {:?} {}", restriction, name);
        self.classes.insert(
            name.clone(),
            ClassNode {
                name: name.clone(),
                restriction,
                reference,
                comment: comment_of(element),
                code,
                components,
                enumerators,
                span: element.span.clone(),
            },
        );
        Ok(name)
    }

    pub fn get(&self, name: &QualifiedName) -> Option<&ClassNode> {
        if name.is_rooted() {
            self.classes.get(&name.unrooted())
        } else {
            self.classes.get(name)
        }
    }

    pub fn classes(&self) -> impl Iterator<Item = &ClassNode> {
        self.classes.values()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Find the class a reference denotes.
    ///
    /// A relative reference is tried in `scope`, then in each enclosing scope,
    /// then at top level. A rooted reference is looked up absolutely only.
    pub fn lookup(
        &self,
        scope: Option<&QualifiedName>,
        reference: &QualifiedName,
    ) -> Option<&ClassNode> {
        self.lookup_matching(scope, reference, |_| true)
    }

    /// [`lookup`](InterfaceDocument::lookup), passing over classes `accept` rejects.
    fn lookup_matching<F>(
        &self,
        scope: Option<&QualifiedName>,
        reference: &QualifiedName,
        accept: F,
    ) -> Option<&ClassNode>
    where
        F: Fn(&ClassNode) -> bool,
    {
        if reference.is_rooted() {
            return self.get(reference).filter(|c| accept(c));
        }
        let mut current = scope.cloned();
        while let Some(scope) = current {
            if let Some(found) = self.classes.get(&(&scope / reference)).filter(|c| accept(c)) {
                return Some(found);
            }
            current = scope.parent();
        }
        self.classes.get(reference).filter(|c| accept(c))
    }

    /// The name a reference resolves to: the class found by [`lookup`], or the
    /// reference itself (unrooted) when no class declares it.
    ///
    /// [`lookup`]: InterfaceDocument::lookup
    pub fn resolve(
        &self,
        scope: Option<&QualifiedName>,
        reference: &QualifiedName,
    ) -> QualifiedName {
        match self.lookup(scope, reference) {
            Some(class) => class.name.clone(),
            None => reference.unrooted(),
        }
    }

    /// Follow an alias chain to its final, non-alias class.
    ///
    /// Each hop walks outward from the alias's scope to the nearest class of
    /// the same restriction; same-named classes of other kinds, and the alias
    /// itself, are passed over.
    pub fn resolve_alias<'a>(&'a self, alias: &'a ClassNode) -> Result<&'a ClassNode> {
        let unresolved = |target: &QualifiedName| ScriptingError::UnresolvedAlias {
            name: alias.name.to_string(),
            target: target.to_string(),
        };
        let mut visited: HashSet<&QualifiedName> = HashSet::new();
        visited.insert(&alias.name);
        let mut worklist = vec![alias];
        while let Some(current) = worklist.pop() {
            let Some(reference) = &current.reference else {
                return Ok(current);
            };
            let target = self
                .lookup_matching(current.name.parent().as_ref(), reference, |t| {
                    t.restriction == alias.restriction && t.name != current.name
                })
                .ok_or_else(|| unresolved(reference))?;
            if !visited.insert(&target.name) {
                trace!("alias cycle through {}", target.name);
                return Err(unresolved(reference));
            }
            worklist.push(target);
        }
        Err(unresolved(&alias.name))
    }
}
