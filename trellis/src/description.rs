//! Declarative panel trees.
//!
//! A [`PanelDescription`] is the serde model of a panel and its subtree, so
//! layouts can be authored as JSON:
//!
//! ```json
//! {
//!   "name": "form",
//!   "layout": { "kind": "flex", "columns": 2 },
//!   "border": { "top": 8, "left": 8, "bottom": 8, "right": 8 },
//!   "children": [
//!     { "name": "label", "pref": { "width": 60, "height": 20 } },
//!     { "name": "field", "pref": { "width": 100, "height": 20 },
//!       "data": { "h_grab": true, "h_align": "fill" } }
//!   ]
//! }
//! ```
//!
//! Leaves are sized either by `pref` (with optional `min`/`max`) or by `text`,
//! a wrapping label.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::DescriptionError;
use crate::layout::{FlexData, Layout};
use crate::panel::{fixed_sizer, text_sizer, PanelId, PanelTree};
use crate::primitives::{Insets, Size, Sizes};

/// A wrapping text label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextDescription {
    /// Width of the text laid out on one line.
    pub width: f32,
    pub line_height: f32,
    #[serde(default)]
    pub min_width: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelDescription {
    pub name: Option<String>,
    pub layout: Option<Layout>,
    pub data: Option<FlexData>,
    pub border: Option<Insets>,
    /// Preferred size of a leaf. `min` defaults to it, `max` to it grown to
    /// the default maximum.
    pub pref: Option<Size>,
    pub min: Option<Size>,
    pub max: Option<Size>,
    pub text: Option<TextDescription>,
    pub children: Vec<PanelDescription>,
}

/// A tree built from a description, with its named panels.
#[derive(Debug)]
pub struct BuiltTree {
    pub tree: PanelTree,
    pub names: HashMap<String, PanelId>,
}

impl BuiltTree {
    /// Id of the panel with the given name.
    pub fn id(&self, name: &str) -> Option<PanelId> {
        self.names.get(name).copied()
    }
}

impl PanelDescription {
    pub fn from_json(json: &str) -> Result<Self, DescriptionError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Build a tree whose root is this panel.
    pub fn build(&self) -> Result<BuiltTree, DescriptionError> {
        let mut tree = PanelTree::new();
        let mut names = HashMap::new();
        let root = tree.root();
        self.apply(&mut tree, &mut names, root)?;
        tracing::debug!(panels = tree.panel_count(), "built panel tree from description");
        Ok(BuiltTree { tree, names })
    }

    fn apply(
        &self,
        tree: &mut PanelTree,
        names: &mut HashMap<String, PanelId>,
        id: PanelId,
    ) -> Result<(), DescriptionError> {
        if let Some(name) = &self.name {
            if names.insert(name.clone(), id).is_some() {
                return Err(DescriptionError::DuplicateName(name.clone()));
            }
            tree.set_name(id, name.clone())?;
        }
        if let Some(layout) = self.layout {
            tree.set_layout(id, layout)?;
        }
        if let Some(data) = self.data {
            tree.set_layout_data(id, data)?;
        }
        if let Some(border) = self.border {
            tree.set_border(id, border)?;
        }
        if let Some(text) = self.text {
            tree.set_sizer(id, text_sizer(text.width, text.line_height, text.min_width))?;
        } else if let Some(pref) = self.pref {
            let min = self.min.unwrap_or(pref);
            let max = self.max.unwrap_or_else(|| pref.grown_to_default_max());
            tree.set_sizer(id, fixed_sizer(Sizes::new(min, pref, max)))?;
        }

        for child in &self.children {
            let child_id = tree.add_panel();
            tree.add_child(id, child_id)?;
            child.apply(tree, names, child_id)?;
        }
        Ok(())
    }
}
