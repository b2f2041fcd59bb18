//! html5ever-backed fragment facility
//!
//! Parsing runs the full HTML5 tree construction algorithm on the markup placed inside
//! `<body>`, then copies the body's subtree into a [Fragment] arena. Serializing rebuilds
//! an rcdom subtree from the arena and hands it to the html5ever serializer.

use super::fragment::{Fragment, NodeId, NodeKind};
use super::{FragmentError, HtmlFacility, SerializeScope};
use html5ever::tendril::TendrilSink;
use html5ever::{
    ns, parse_document, serialize, serialize::SerializeOpts, serialize::TraversalScope,
    Attribute, LocalName, ParseOpts, QualName,
};
use markup5ever_rcdom::{Handle, Node, NodeData, RcDom, SerializableHandle};
use std::cell::{Cell, RefCell};
use std::default::Default;
use std::rc::Rc;

/// Default [HtmlFacility], backed by html5ever.
#[derive(Debug, Clone, Copy, Default)]
pub struct Html5everFacility;

impl Html5everFacility {
    pub fn new() -> Self {
        Html5everFacility
    }
}

impl HtmlFacility for Html5everFacility {
    fn parse_fragment(&self, html: &str) -> Result<Fragment, FragmentError> {
        let markup = format!("<body>{}", html);
        let dom = parse_document(RcDom::default(), ParseOpts::default()).one(markup.as_str());
        let body = find_body(&dom.document).ok_or(FragmentError::MissingBody)?;
        Ok(copy_into_arena(&body))
    }

    fn serialize(
        &self,
        fragment: &Fragment,
        node: NodeId,
        scope: SerializeScope,
    ) -> Result<String, FragmentError> {
        let kind = fragment
            .kind(node)
            .ok_or(FragmentError::UnknownNode(node.index()))?;

        let traversal_scope = match (kind, scope) {
            (NodeKind::Root, _) => TraversalScope::ChildrenOnly(None),
            (NodeKind::Element { name, .. }, SerializeScope::Inner) => {
                TraversalScope::ChildrenOnly(Some(html_name(name)))
            }
            (_, SerializeScope::Inner) => return Ok(String::new()),
            (_, SerializeScope::Outer) => TraversalScope::IncludeNode,
        };

        let handle = rebuild(fragment, node);
        let mut output = Vec::new();
        let opts = SerializeOpts {
            traversal_scope,
            ..Default::default()
        };
        serialize(&mut output, &SerializableHandle::from(handle), opts)
            .map_err(|e| FragmentError::Serialization(e.to_string()))?;

        String::from_utf8(output).map_err(|e| FragmentError::Encoding(e.to_string()))
    }
}

fn find_body(document: &Handle) -> Option<Handle> {
    let html = document
        .children
        .borrow()
        .iter()
        .find(|child| element_name(child) == Some("html"))
        .cloned()?;
    let body = html
        .children
        .borrow()
        .iter()
        .find(|child| element_name(child) == Some("body"))
        .cloned();
    body
}

fn element_name(handle: &Handle) -> Option<&str> {
    match &handle.data {
        NodeData::Element { name, .. } => Some(&*name.local),
        _ => None,
    }
}

/// Copy the children of `container` into a fresh arena, iteratively.
fn copy_into_arena(container: &Handle) -> Fragment {
    let mut fragment = Fragment::new();
    let root = fragment.root();
    let mut stack: Vec<(Handle, NodeId)> = container
        .children
        .borrow()
        .iter()
        .rev()
        .map(|child| (child.clone(), root))
        .collect();

    while let Some((handle, parent)) = stack.pop() {
        match &handle.data {
            NodeData::Element {
                name,
                attrs,
                template_contents,
                ..
            } => {
                let attrs = attrs
                    .borrow()
                    .iter()
                    .map(|attr| (attribute_name(&attr.name), attr.value.to_string()))
                    .collect();
                let id = fragment.append(
                    parent,
                    NodeKind::Element {
                        name: name.local.to_string(),
                        attrs,
                    },
                );

                let mut children: Vec<Handle> = handle.children.borrow().clone();
                if let Some(contents) = template_contents.borrow().as_ref() {
                    children.extend(contents.children.borrow().iter().cloned());
                }
                stack.extend(children.into_iter().rev().map(|child| (child, id)));
            }
            NodeData::Text { contents } => {
                fragment.append(parent, NodeKind::Text(contents.borrow().to_string()));
            }
            NodeData::Comment { contents } => {
                fragment.append(parent, NodeKind::Comment(contents.to_string()));
            }
            _ => {}
        }
    }

    fragment
}

fn attribute_name(name: &QualName) -> String {
    match &name.prefix {
        Some(prefix) => format!("{}:{}", prefix, name.local),
        None => name.local.to_string(),
    }
}

fn html_name(tag: &str) -> QualName {
    QualName::new(None, ns!(html), LocalName::from(tag))
}

/// Rebuild the rcdom subtree rooted at `node`. The root becomes a `body` element.
fn rebuild(fragment: &Fragment, node: NodeId) -> Handle {
    let top = create_node(fragment, node);
    let mut stack: Vec<(NodeId, Handle)> = vec![(node, top.clone())];

    while let Some((id, handle)) = stack.pop() {
        for &child in fragment.children(id) {
            let child_handle = create_node(fragment, child);
            handle.children.borrow_mut().push(child_handle.clone());
            stack.push((child, child_handle));
        }
    }

    top
}

fn create_node(fragment: &Fragment, id: NodeId) -> Handle {
    match fragment.kind(id) {
        Some(NodeKind::Element { name, attrs }) => create_element(name, attrs),
        Some(NodeKind::Text(text)) => create_text(text),
        Some(NodeKind::Comment(text)) => create_comment(text),
        Some(NodeKind::Root) | None => create_element("body", &[]),
    }
}

fn create_element(tag: &str, attrs: &[(String, String)]) -> Handle {
    let attributes = attrs
        .iter()
        .map(|(name, value)| Attribute {
            name: QualName::new(None, ns!(), LocalName::from(name.as_str())),
            value: value.as_str().into(),
        })
        .collect();

    Rc::new(Node {
        parent: Cell::new(None),
        children: RefCell::new(Vec::new()),
        data: NodeData::Element {
            name: html_name(tag),
            attrs: RefCell::new(attributes),
            template_contents: Default::default(),
            mathml_annotation_xml_integration_point: false,
        },
    })
}

fn create_text(text: &str) -> Handle {
    Rc::new(Node {
        parent: Cell::new(None),
        children: RefCell::new(Vec::new()),
        data: NodeData::Text {
            contents: RefCell::new(text.into()),
        },
    })
}

fn create_comment(text: &str) -> Handle {
    Rc::new(Node {
        parent: Cell::new(None),
        children: RefCell::new(Vec::new()),
        data: NodeData::Comment {
            contents: text.into(),
        },
    })
}
