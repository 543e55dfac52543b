//! Panel tree: an arena of panels that layouts arrange.
//!
//! The tree owns every panel and hands out [`PanelId`] handles. Each panel
//! carries an optional [`Layout`] for its children, the [`FlexData`] its own
//! parent reads, border insets, an optional leaf [`Sizer`] and a frame
//! rectangle relative to its parent.
//!
//! Structural and data changes mark the panel and its ancestors as needing
//! layout; [`PanelTree::validate_layout`] lays out dirty panels depth first.
//!
//! Reads through [`LayoutTree`] treat unknown ids as empty panels, so a
//! layout never fails. Mutating calls report unknown ids as [`TreeError`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TreeError;
use crate::layout::{FlexData, Layout, LayoutTree};
use crate::primitives::{Insets, Rect, Size, Sizes};

/// Measures a leaf panel for a size hint.
pub type Sizer = Box<dyn Fn(Size) -> Sizes>;

/// Sizer that always reports `sizes`.
pub fn fixed_sizer(sizes: Sizes) -> Sizer {
    Box::new(move |_| sizes)
}

/// Sizer for a wrapping text label.
///
/// `text_width` is the width of the text on a single line. Given a narrower
/// width hint the label wraps onto as many lines of `line_height` as needed,
/// but never narrower than `min_width`.
pub fn text_sizer(text_width: f32, line_height: f32, min_width: f32) -> Sizer {
    Box::new(move |hint: Size| {
        let width = if hint.width > 0.0 && hint.width < text_width {
            hint.width.max(min_width)
        } else {
            text_width
        };
        let lines = if width > 0.0 {
            (text_width / width).ceil().max(1.0)
        } else {
            1.0
        };
        let pref = Size::new(width, lines * line_height);
        let min = Size::new(min_width.min(text_width), line_height);
        Sizes::new(min, pref, pref.grown_to_default_max())
    })
}

/// Handle to a panel in a [`PanelTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PanelId(usize);

impl PanelId {
    /// Position of the panel in its tree's arena.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for PanelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

struct Panel {
    name: Option<String>,
    parent: Option<PanelId>,
    children: Vec<PanelId>,
    layout: Option<Layout>,
    data: FlexData,
    border: Insets,
    sizer: Option<Sizer>,
    frame: Rect,
    needs_layout: bool,
}

impl Panel {
    fn new() -> Self {
        Self {
            name: None,
            parent: None,
            children: Vec::new(),
            layout: None,
            data: FlexData::default(),
            border: Insets::default(),
            sizer: None,
            frame: Rect::ZERO,
            needs_layout: true,
        }
    }
}

impl fmt::Debug for Panel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Panel")
            .field("name", &self.name)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field("layout", &self.layout)
            .field("data", &self.data)
            .field("border", &self.border)
            .field("sizer", &self.sizer.as_ref().map(|_| "<sizer>"))
            .field("frame", &self.frame)
            .field("needs_layout", &self.needs_layout)
            .finish()
    }
}

/// Arena of panels rooted at a single root panel.
#[derive(Debug)]
pub struct PanelTree {
    panels: Vec<Panel>,
}

impl Default for PanelTree {
    fn default() -> Self {
        Self::new()
    }
}

impl PanelTree {
    /// Create a tree containing only the root panel.
    pub fn new() -> Self {
        Self {
            panels: vec![Panel::new()],
        }
    }

    /// The root panel. Always present.
    pub fn root(&self) -> PanelId {
        PanelId(0)
    }

    /// Number of panels in the arena, attached or not.
    pub fn panel_count(&self) -> usize {
        self.panels.len()
    }

    pub fn contains(&self, id: PanelId) -> bool {
        id.0 < self.panels.len()
    }

    /// Create a detached panel.
    pub fn add_panel(&mut self) -> PanelId {
        self.panels.push(Panel::new());
        PanelId(self.panels.len() - 1)
    }

    fn panel(&self, id: PanelId) -> Result<&Panel, TreeError> {
        self.panels.get(id.0).ok_or(TreeError::UnknownPanel(id))
    }

    fn panel_mut(&mut self, id: PanelId) -> Result<&mut Panel, TreeError> {
        self.panels.get_mut(id.0).ok_or(TreeError::UnknownPanel(id))
    }

    /// Append `child` to `parent`'s children.
    pub fn add_child(&mut self, parent: PanelId, child: PanelId) -> Result<(), TreeError> {
        let index = self.panel(parent)?.children.len();
        self.insert_child(parent, index, child)
    }

    /// Insert `child` at `index` among `parent`'s children. Indices past the
    /// end append.
    pub fn insert_child(&mut self, parent: PanelId, index: usize, child: PanelId) -> Result<(), TreeError> {
        self.panel(parent)?;
        if let Some(existing) = self.panel(child)?.parent {
            return Err(TreeError::AlreadyAttached { child, parent: existing });
        }
        let mut ancestor = Some(parent);
        while let Some(current) = ancestor {
            if current == child {
                return Err(TreeError::Cycle { child, parent });
            }
            ancestor = self.panels[current.0].parent;
        }

        let children = &mut self.panels[parent.0].children;
        let index = index.min(children.len());
        children.insert(index, child);
        self.panels[child.0].parent = Some(parent);
        self.mark(parent);
        Ok(())
    }

    /// Detach `child` from `parent`. The child keeps its own subtree.
    pub fn remove_child(&mut self, parent: PanelId, child: PanelId) -> Result<(), TreeError> {
        self.panel(child)?;
        let children = &mut self.panel_mut(parent)?.children;
        let Some(position) = children.iter().position(|&c| c == child) else {
            return Err(TreeError::NotAChild { child, parent });
        };
        children.remove(position);
        self.panels[child.0].parent = None;
        self.mark(parent);
        Ok(())
    }

    pub fn children(&self, id: PanelId) -> Result<&[PanelId], TreeError> {
        Ok(&self.panel(id)?.children)
    }

    pub fn parent(&self, id: PanelId) -> Result<Option<PanelId>, TreeError> {
        Ok(self.panel(id)?.parent)
    }

    pub fn name(&self, id: PanelId) -> Option<&str> {
        self.panels.get(id.0)?.name.as_deref()
    }

    pub fn set_name(&mut self, id: PanelId, name: impl Into<String>) -> Result<(), TreeError> {
        self.panel_mut(id)?.name = Some(name.into());
        Ok(())
    }

    pub fn layout(&self, id: PanelId) -> Result<Option<Layout>, TreeError> {
        Ok(self.panel(id)?.layout)
    }

    pub fn set_layout(&mut self, id: PanelId, layout: impl Into<Layout>) -> Result<(), TreeError> {
        self.panel_mut(id)?.layout = Some(layout.into());
        self.mark(id);
        Ok(())
    }

    /// Store a copy of `data` as the panel's layout data.
    pub fn set_layout_data(&mut self, id: PanelId, data: FlexData) -> Result<(), TreeError> {
        self.panel_mut(id)?.data = data;
        self.mark(id);
        Ok(())
    }

    pub fn set_border(&mut self, id: PanelId, border: Insets) -> Result<(), TreeError> {
        self.panel_mut(id)?.border = border;
        self.mark(id);
        Ok(())
    }

    pub fn set_sizer(&mut self, id: PanelId, sizer: Sizer) -> Result<(), TreeError> {
        self.panel_mut(id)?.sizer = Some(sizer);
        self.mark(id);
        Ok(())
    }

    /// Set the frame of `id`, marking it for layout when its size changes.
    pub fn set_frame(&mut self, id: PanelId, rect: Rect) -> Result<(), TreeError> {
        self.panel(id)?;
        self.store_frame(id, rect);
        Ok(())
    }

    /// Frame of `id` in root coordinates.
    pub fn absolute_frame(&self, id: PanelId) -> Result<Rect, TreeError> {
        let mut rect = self.panel(id)?.frame;
        let mut ancestor = self.panels[id.0].parent;
        while let Some(current) = ancestor {
            let panel = &self.panels[current.0];
            rect.x += panel.frame.x;
            rect.y += panel.frame.y;
            ancestor = panel.parent;
        }
        Ok(rect)
    }

    pub fn needs_layout(&self, id: PanelId) -> Result<bool, TreeError> {
        Ok(self.panel(id)?.needs_layout)
    }

    /// Force `id` (and its ancestors) to be laid out on the next validation.
    pub fn mark_for_layout(&mut self, id: PanelId) -> Result<(), TreeError> {
        self.panel(id)?;
        self.mark(id);
        Ok(())
    }

    /// Lay out every dirty panel in the subtree rooted at `id`.
    pub fn validate_layout(&mut self, id: PanelId) -> Result<(), TreeError> {
        self.panel(id)?;
        tracing::debug!(panel = %id, "validating layout");
        self.validate(id);
        Ok(())
    }

    /// Depth-first, pre-order walk of the subtree at `id` with each panel's depth.
    pub fn walk(&self, id: PanelId) -> Result<Vec<(PanelId, usize)>, TreeError> {
        self.panel(id)?;
        let mut out = Vec::new();
        let mut stack = vec![(id, 0)];
        while let Some((current, depth)) = stack.pop() {
            out.push((current, depth));
            for &child in self.panels[current.0].children.iter().rev() {
                stack.push((child, depth + 1));
            }
        }
        Ok(out)
    }

    fn validate(&mut self, id: PanelId) {
        let layout = {
            let panel = &mut self.panels[id.0];
            let dirty = panel.needs_layout;
            panel.needs_layout = false;
            if dirty { panel.layout } else { None }
        };
        if let Some(layout) = layout {
            tracing::trace!(panel = %id, "performing layout");
            layout.perform_layout(self, id);
        }

        let children = self.panels[id.0].children.clone();
        for child in children {
            self.validate(child);
        }
    }

    fn mark(&mut self, id: PanelId) {
        let mut current = Some(id);
        while let Some(panel_id) = current {
            let panel = &mut self.panels[panel_id.0];
            panel.needs_layout = true;
            current = panel.parent;
        }
    }

    fn store_frame(&mut self, id: PanelId, rect: Rect) {
        let panel = &mut self.panels[id.0];
        if panel.frame.size() != rect.size() {
            panel.needs_layout = true;
        }
        panel.frame = rect;
    }
}

impl LayoutTree for PanelTree {
    type Id = PanelId;

    fn sizes(&self, id: PanelId, hint: Size) -> Sizes {
        let Some(panel) = self.panels.get(id.0) else {
            return Sizes::default();
        };
        let sizes = if let Some(layout) = &panel.layout {
            layout.sizes(self, id, hint)
        } else if let Some(sizer) = &panel.sizer {
            sizer(hint)
        } else {
            Sizes::new(Size::ZERO, Size::ZERO, Size::ZERO.grown_to_default_max())
        };
        sizes.normalized()
    }

    fn border(&self, id: PanelId) -> Insets {
        self.panels.get(id.0).map(|p| p.border).unwrap_or_default()
    }

    fn children_for_layout(&self, id: PanelId) -> Vec<PanelId> {
        self.panels
            .get(id.0)
            .map(|p| p.children.clone())
            .unwrap_or_default()
    }

    fn layout_data(&self, id: PanelId) -> FlexData {
        self.panels.get(id.0).map(|p| p.data).unwrap_or_default()
    }

    fn frame_rect(&self, id: PanelId) -> Rect {
        self.panels.get(id.0).map(|p| p.frame).unwrap_or_default()
    }

    fn set_frame_rect(&mut self, id: PanelId, rect: Rect) {
        if self.contains(id) {
            self.store_frame(id, rect);
        }
    }
}
