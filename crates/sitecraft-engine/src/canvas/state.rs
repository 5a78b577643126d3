use std::collections::{BTreeSet, HashMap};
use std::fmt::Write;

use super::alias::AliasTable;
use super::style::{ResolvedStyle, StyleOverride};
use super::tree::{BODY_ID, EditorNode, NavTree, SECTION_LABEL};
use crate::content::ContentDocument;

/// Containers shown open when a canvas is first created.
const INITIALLY_EXPANDED: &[&str] = &[BODY_ID, "hero", "hero-container", "hero-intro"];

/// Edits to the canvas. Every mutation goes through [`CanvasState::apply`].
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasCmd {
    Select(String),
    ClearSelection,
    ToggleExpand(String),
    /// Moves one child within `parent`; never across parents.
    Reorder {
        parent: String,
        from: usize,
        to: usize,
    },
    /// An empty label drops the override.
    Rename {
        id: String,
        label: String,
    },
    SetStyle {
        id: String,
        style: StyleOverride,
    },
    ClearStyle(String),
}

/// What an applied command changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    Selection,
    Expansion,
    Structure { parent: String },
    Label,
    Style,
}

/// Navigator tree plus the editor state layered over it.
#[derive(Debug, Clone)]
pub struct CanvasState {
    tree: NavTree,
    selected: Option<String>,
    expanded: BTreeSet<String>,
    labels: HashMap<String, String>,
    styles: HashMap<String, StyleOverride>,
}

impl CanvasState {
    pub fn new(tree: NavTree) -> Self {
        Self {
            tree,
            selected: None,
            expanded: INITIALLY_EXPANDED.iter().map(|id| id.to_string()).collect(),
            labels: HashMap::new(),
            styles: HashMap::new(),
        }
    }

    pub fn for_document(doc: &ContentDocument) -> Self {
        Self::new(NavTree::for_document(doc))
    }

    /// Applies one command. `None` means the command was a no-op, e.g. an
    /// unknown id or an out of range index.
    pub fn apply(&mut self, cmd: CanvasCmd) -> Option<Change> {
        match cmd {
            CanvasCmd::Select(id) => {
                let canonical = AliasTable::standard().resolve(&id).to_string();
                self.selected = Some(canonical);
                Some(Change::Selection)
            }
            CanvasCmd::ClearSelection => self.selected.take().map(|_| Change::Selection),
            CanvasCmd::ToggleExpand(id) => {
                if !self.expanded.remove(&id) {
                    self.expanded.insert(id);
                }
                Some(Change::Expansion)
            }
            CanvasCmd::Reorder { parent, from, to } => self.reorder(parent, from, to),
            CanvasCmd::Rename { id, label } => self.rename(id, label),
            CanvasCmd::SetStyle { id, style } => {
                if !self.tree.contains(&id) || style.is_empty() {
                    return None;
                }
                self.styles.entry(id).or_default().merge(style);
                Some(Change::Style)
            }
            CanvasCmd::ClearStyle(id) => self.styles.remove(&id).map(|_| Change::Style),
        }
    }

    fn reorder(&mut self, parent: String, from: usize, to: usize) -> Option<Change> {
        let children = self.tree.children_mut(&parent)?;
        if from >= children.len() || to >= children.len() || from == to {
            return None;
        }
        let node = children.remove(from);
        children.insert(to, node);
        Some(Change::Structure { parent })
    }

    fn rename(&mut self, id: String, label: String) -> Option<Change> {
        if !self.tree.contains(&id) {
            return None;
        }
        let label = label.trim();
        if label.is_empty() {
            self.labels.remove(&id).map(|_| Change::Label)
        } else {
            self.labels.insert(id, label.to_string());
            Some(Change::Label)
        }
    }

    pub fn tree(&self) -> &NavTree {
        &self.tree
    }

    pub fn selection(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Whether clicking `id` would land on the current selection.
    pub fn is_selected(&self, id: &str) -> bool {
        self.selected
            .as_deref()
            .is_some_and(|sel| sel == id || sel == AliasTable::standard().resolve(id))
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.contains(id)
    }

    /// The label override for `id`, else the node's own label.
    pub fn display_label(&self, id: &str) -> Option<&str> {
        self.labels
            .get(id)
            .map(String::as_str)
            .or_else(|| self.tree.find(id).map(|node| node.label.as_str()))
    }

    pub fn selected_label(&self) -> Option<&str> {
        let selected = self.selected.as_deref()?;
        Some(self.display_label(selected).unwrap_or(SECTION_LABEL))
    }

    pub fn breadcrumb(&self) -> String {
        let root = self.display_label(BODY_ID).unwrap_or("Body");
        match self.selected_label() {
            Some(label) if self.selected.as_deref() != Some(BODY_ID) => format!("{root} > {label}"),
            _ => root.to_string(),
        }
    }

    pub fn style(&self, id: &str) -> Option<&StyleOverride> {
        self.styles.get(id)
    }

    pub fn resolved_style(&self, id: &str) -> ResolvedStyle {
        match self.styles.get(id) {
            Some(style) => style.resolve(),
            None => StyleOverride::default().resolve(),
        }
    }

    /// Rebuilds section nodes from the document, keeping the rest of the
    /// editor state.
    pub fn sync_sections(&mut self, doc: &ContentDocument) {
        self.tree.sync_sections(doc);
    }

    /// Drops every piece of state held for `id`.
    pub fn forget(&mut self, id: &str) {
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        }
        self.expanded.remove(id);
        self.labels.remove(id);
        self.styles.remove(id);
    }

    /// Indented outline of the visible nodes: children of collapsed
    /// containers are hidden and the selection is starred.
    pub fn outline(&self) -> String {
        let mut out = String::new();
        self.write_outline(&mut out, self.tree.root(), 0);
        out
    }

    fn write_outline(&self, out: &mut String, node: &EditorNode, depth: usize) {
        let open = self.is_expanded(&node.id);
        let toggle = match (node.has_children(), open) {
            (false, _) => " ",
            (true, true) => "-",
            (true, false) => "+",
        };
        let label = self.display_label(&node.id).unwrap_or(&node.label);
        let star = if self.is_selected(&node.id) { " *" } else { "" };
        let _ = writeln!(out, "{:indent$}{toggle} {label} ({}){star}", "", node.id, indent = depth * 2);

        if open {
            for child in &node.children {
                self.write_outline(out, child, depth + 1);
            }
        }
    }
}

impl Default for CanvasState {
    fn default() -> Self {
        Self::for_document(&ContentDocument::starter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::style::Display;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn child_ids<'a>(state: &'a CanvasState, parent: &str) -> Vec<&'a str> {
        state
            .tree()
            .find(parent)
            .map(|n| n.children.iter().map(|c| c.id.as_str()).collect())
            .unwrap_or_default()
    }

    fn reorder(parent: &str, from: usize, to: usize) -> CanvasCmd {
        CanvasCmd::Reorder {
            parent: parent.to_string(),
            from,
            to,
        }
    }

    #[test]
    fn reorder_moves_within_parent() {
        let mut state = CanvasState::default();
        let change = state.apply(reorder("works-grid", 0, 2));

        assert_eq!(
            change,
            Some(Change::Structure {
                parent: "works-grid".to_string()
            })
        );
        assert_eq!(
            child_ids(&state, "works-grid"),
            vec!["work-2", "work-3", "work-1", "work-4"]
        );
    }

    #[rstest]
    #[case::from_out_of_range(reorder("works-grid", 4, 0))]
    #[case::to_out_of_range(reorder("works-grid", 0, 9))]
    #[case::same_index(reorder("works-grid", 1, 1))]
    #[case::unknown_parent(reorder("nope", 0, 1))]
    #[case::leaf_parent(reorder("work-1", 0, 0))]
    fn reorder_noops(#[case] cmd: CanvasCmd) {
        let mut state = CanvasState::default();
        let before = state.tree().clone();
        assert_eq!(state.apply(cmd), None);
        assert_eq!(state.tree(), &before);
    }

    #[test]
    fn select_is_unconditional_and_alias_aware() {
        let mut state = CanvasState::default();

        state.apply(CanvasCmd::Select("does-not-exist".into()));
        assert_eq!(state.selection(), Some("does-not-exist"));
        assert_eq!(state.selected_label(), Some(SECTION_LABEL));

        state.apply(CanvasCmd::Select("hero-h1".into()));
        assert_eq!(state.selection(), Some("hero"));
        assert!(state.is_selected("hero"));
        assert!(state.is_selected("hero-container"));
        assert!(!state.is_selected("footer"));

        assert_eq!(state.apply(CanvasCmd::ClearSelection), Some(Change::Selection));
        assert_eq!(state.apply(CanvasCmd::ClearSelection), None);
        assert_eq!(state.selection(), None);
    }

    #[test]
    fn toggle_expand_flips_membership() {
        let mut state = CanvasState::default();
        assert!(state.is_expanded("hero"));
        assert!(!state.is_expanded("works"));

        state.apply(CanvasCmd::ToggleExpand("hero".into()));
        state.apply(CanvasCmd::ToggleExpand("works".into()));
        assert!(!state.is_expanded("hero"));
        assert!(state.is_expanded("works"));
    }

    #[test]
    fn rename_overrides_and_empty_label_reverts() {
        let mut state = CanvasState::default();
        let rename = |label: &str| CanvasCmd::Rename {
            id: "footer".into(),
            label: label.into(),
        };

        assert_eq!(state.apply(rename("Site Footer")), Some(Change::Label));
        assert_eq!(state.display_label("footer"), Some("Site Footer"));

        assert_eq!(state.apply(rename("  ")), Some(Change::Label));
        assert_eq!(state.display_label("footer"), Some("Footer"));
        assert_eq!(state.apply(rename("")), None);

        let unknown = CanvasCmd::Rename {
            id: "ghost".into(),
            label: "Boo".into(),
        };
        assert_eq!(state.apply(unknown), None);
        assert_eq!(state.display_label("ghost"), None);
    }

    #[test]
    fn set_style_merges_into_existing_record() {
        let mut state = CanvasState::default();
        state.apply(CanvasCmd::SetStyle {
            id: "hero".into(),
            style: StyleOverride {
                margin_top: Some(10),
                ..Default::default()
            },
        });
        state.apply(CanvasCmd::SetStyle {
            id: "hero".into(),
            style: StyleOverride {
                display: Some(Display::Flex),
                ..Default::default()
            },
        });

        let style = state.style("hero").unwrap();
        assert_eq!(style.margin_top, Some(10));
        assert_eq!(style.display, Some(Display::Flex));
        assert_eq!(state.resolved_style("hero").margin, [10, 0, 0, 0]);
        assert_eq!(state.resolved_style("footer").display, Display::Block);
    }

    #[test]
    fn set_style_on_unknown_id_is_noop() {
        let mut state = CanvasState::default();
        let cmd = CanvasCmd::SetStyle {
            id: "ghost".into(),
            style: StyleOverride {
                opacity: Some(0.2),
                ..Default::default()
            },
        };
        assert_eq!(state.apply(cmd), None);
        assert_eq!(state.style("ghost"), None);
        assert_eq!(state.apply(CanvasCmd::ClearStyle("ghost".into())), None);
    }

    #[test]
    fn breadcrumb_follows_selection() {
        let mut state = CanvasState::default();
        assert_eq!(state.breadcrumb(), "Body");

        state.apply(CanvasCmd::Select("section-1".into()));
        assert_eq!(state.breadcrumb(), "Body > About");

        state.apply(CanvasCmd::Rename {
            id: "section-1".into(),
            label: "Who we are".into(),
        });
        assert_eq!(state.breadcrumb(), "Body > Who we are");

        state.apply(CanvasCmd::Select(BODY_ID.into()));
        assert_eq!(state.breadcrumb(), "Body");
    }

    #[test]
    fn forget_clears_all_state_for_an_id() {
        let mut state = CanvasState::default();
        state.apply(CanvasCmd::Select("section-2".into()));
        state.apply(CanvasCmd::ToggleExpand("section-2".into()));
        state.apply(CanvasCmd::Rename {
            id: "section-2".into(),
            label: "Offer".into(),
        });
        state.apply(CanvasCmd::SetStyle {
            id: "section-2".into(),
            style: StyleOverride {
                color: Some("red".into()),
                ..Default::default()
            },
        });

        state.forget("section-2");
        assert_eq!(state.selection(), None);
        assert!(!state.is_expanded("section-2"));
        assert_eq!(state.display_label("section-2"), Some("Services"));
        assert_eq!(state.style("section-2"), None);
    }

    #[test]
    fn outline_shows_visible_nodes() {
        let mut state = CanvasState::default();
        state.apply(CanvasCmd::Select("hero-t-name".into()));
        state.apply(reorder(BODY_ID, 5, 4));

        insta::assert_snapshot!(state.outline().trim_end(), @r"
        - Body (body)
            Navigation (navigation)
          - Hero (hero) *
            - Container (hero-container) *
              - Intro Wrap (hero-intro) *
                  T Name Text (hero-t-name) *
                  T Paragraph Light (hero-t-para) *
                  H1 Heading Jumbo (hero-h1) *
          + Experience (experience)
          + Works (works)
            Services (section-2)
            About (section-1)
          + Contact (contact)
            Footer (footer)
        ");
    }
}
