use serde::Serialize;

use crate::content::{ContentDocument, Section, SectionId};

pub const BODY_ID: &str = "body";

/// Where a new section node goes when the document had none before.
const SECTION_ANCHOR_ID: &str = "contact";

/// Label shown for a section whose title is empty.
pub const SECTION_LABEL: &str = "Section";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// Fixed page structure, independent of the document.
    Scaffold,
    /// Mirrors one entry of `ContentDocument::sections`.
    Section,
}

/// An addressable element in the navigator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditorNode {
    pub id: String,
    pub label: String,
    pub children: Vec<EditorNode>,
    pub is_container: bool,
    pub kind: NodeKind,
}

impl EditorNode {
    fn leaf(id: &str, label: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            children: Vec::new(),
            is_container: false,
            kind: NodeKind::Scaffold,
        }
    }

    fn container(id: &str, label: &str, children: Vec<EditorNode>) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            children,
            is_container: true,
            kind: NodeKind::Scaffold,
        }
    }

    fn for_section(section: &Section) -> Self {
        let label = if section.title.trim().is_empty() {
            SECTION_LABEL.to_string()
        } else {
            section.title.clone()
        };
        Self {
            id: section.id().to_string(),
            label,
            children: Vec::new(),
            is_container: false,
            kind: NodeKind::Section,
        }
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    fn find(&self, id: &str) -> Option<&EditorNode> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    fn find_mut(&mut self, id: &str) -> Option<&mut EditorNode> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter_mut().find_map(|child| child.find_mut(id))
    }
}

/// The navigator tree: fixed scaffolding plus one node per document section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavTree {
    root: EditorNode,
}

impl NavTree {
    /// Scaffolding only, no section nodes.
    pub fn scaffold() -> Self {
        let numbered = |prefix: &str, label: &str| {
            (1..=4)
                .map(|n| EditorNode::leaf(&format!("{prefix}-{n}"), &format!("{label} {n}")))
                .collect::<Vec<_>>()
        };

        let root = EditorNode::container(
            BODY_ID,
            "Body",
            vec![
                EditorNode::leaf("navigation", "Navigation"),
                EditorNode::container(
                    "hero",
                    "Hero",
                    vec![EditorNode::container(
                        "hero-container",
                        "Container",
                        vec![EditorNode::container(
                            "hero-intro",
                            "Intro Wrap",
                            vec![
                                EditorNode::leaf("hero-t-name", "T Name Text"),
                                EditorNode::leaf("hero-t-para", "T Paragraph Light"),
                                EditorNode::leaf("hero-h1", "H1 Heading Jumbo"),
                            ],
                        )],
                    )],
                ),
                EditorNode::container(
                    "experience",
                    "Experience",
                    vec![
                        EditorNode::leaf("experience-heading", "Heading"),
                        EditorNode::leaf("experience-paragraph", "Paragraph"),
                        EditorNode::container(
                            "experience-list",
                            "Experience List",
                            numbered("exp", "Experience Item"),
                        ),
                    ],
                ),
                EditorNode::container(
                    "works",
                    "Works",
                    vec![EditorNode::container(
                        "works-grid",
                        "Works Grid",
                        numbered("work", "Work Item"),
                    )],
                ),
                EditorNode::container(
                    "contact",
                    "Contact",
                    vec![
                        EditorNode::leaf("contact-heading", "Heading"),
                        EditorNode::leaf("contact-subheading", "Subheading"),
                        EditorNode::leaf("contact-paragraph", "Paragraph"),
                    ],
                ),
                EditorNode::leaf("footer", "Footer"),
            ],
        );

        Self { root }
    }

    pub fn for_document(doc: &ContentDocument) -> Self {
        let mut tree = Self::scaffold();
        tree.sync_sections(doc);
        tree
    }

    pub fn root(&self) -> &EditorNode {
        &self.root
    }

    pub fn find(&self, id: &str) -> Option<&EditorNode> {
        self.root.find(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    pub(crate) fn children_mut(&mut self, parent: &str) -> Option<&mut Vec<EditorNode>> {
        self.root.find_mut(parent).map(|node| &mut node.children)
    }

    /// Rebuilds the section nodes so they match `doc.sections` one to one.
    ///
    /// Existing section slots among the body's children stay where they are
    /// and are refilled in document order; nodes of removed sections drop out
    /// in place. Sections without a slot go after the last one, or before the
    /// contact block when there was none. Scaffold nodes never move.
    pub fn sync_sections(&mut self, doc: &ContentDocument) {
        let body = &mut self.root.children;
        body.retain(|n| {
            n.kind != NodeKind::Section || doc.section(&SectionId::from(n.id.as_str())).is_some()
        });

        let mut sections = doc.sections().iter();
        let mut last_slot = None;
        for (index, node) in body.iter_mut().enumerate() {
            if node.kind != NodeKind::Section {
                continue;
            }
            // Slots never outnumber sections once removed ones are gone
            if let Some(section) = sections.next() {
                *node = EditorNode::for_section(section);
                last_slot = Some(index);
            }
        }

        let at = last_slot
            .map(|index| index + 1)
            .or_else(|| body.iter().position(|n| n.id == SECTION_ANCHOR_ID))
            .unwrap_or(body.len());
        let tail = body.split_off(at);
        body.extend(sections.map(EditorNode::for_section));
        body.extend(tail);
    }

    /// Section ids in navigator order.
    pub fn section_order(&self) -> Vec<SectionId> {
        self.root
            .children
            .iter()
            .filter(|n| n.kind == NodeKind::Section)
            .map(|n| SectionId::from(n.id.as_str()))
            .collect()
    }
}

impl Default for NavTree {
    fn default() -> Self {
        Self::scaffold()
    }
}
