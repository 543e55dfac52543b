//! Trellis: grid layout for retained-mode panel trees
//!
//! Trellis sizes and positions panels. It provides:
//! - A span-aware Flex grid with grab/fill semantics and deterministic
//!   distribution of extra space
//! - A wrapping Flow layout
//! - A panel tree (arena + handles) that drives layout and tracks
//!   invalidation
//! - Declarative JSON descriptions of panel trees
//!
//! # Architecture
//!
//! Layouts never own their children. They talk to a [`LayoutTree`], which
//! answers sizing questions and receives frames. [`PanelTree`] is the
//! provided implementation.
//!
//! # Usage
//!
//! ```
//! use trellis::{Flex, FlexData, LayoutTree, PanelTree, Rect, Size, Sizes, fixed_sizer};
//!
//! let mut tree = PanelTree::new();
//! let root = tree.root();
//! tree.set_layout(root, Flex::new().columns(2)).unwrap();
//!
//! let label = tree.add_panel();
//! tree.set_sizer(label, fixed_sizer(Sizes::fixed(Size::new(60.0, 20.0)))).unwrap();
//! tree.add_child(root, label).unwrap();
//!
//! let field = tree.add_panel();
//! tree.set_sizer(field, fixed_sizer(Sizes::fixed(Size::new(100.0, 20.0)))).unwrap();
//! tree.set_layout_data(field, FlexData::new().h_grab(true)).unwrap();
//! tree.add_child(root, field).unwrap();
//!
//! tree.set_frame(root, Rect::new(0.0, 0.0, 300.0, 20.0)).unwrap();
//! tree.validate_layout(root).unwrap();
//! assert_eq!(tree.frame_rect(label), Rect::new(0.0, 0.0, 60.0, 20.0));
//! ```

// Core primitives
pub mod primitives;
pub mod error;

// Layout system (Flex grid, Flow)
pub mod layout;

// Panel tree
pub mod panel;

// Declarative descriptions
pub mod description;

// Re-export core types
pub use primitives::{Insets, Point, Rect, Size, Sizes, DEFAULT_MAX_SIZE};
pub use error::{DescriptionError, TreeError};
pub use layout::{apportion_extra, Alignment, Flex, FlexData, Flow, Layout, LayoutTree, MAX_CONVERGENCE_PASSES};
pub use panel::{fixed_sizer, text_sizer, PanelId, PanelTree, Sizer};
pub use description::{BuiltTree, PanelDescription, TextDescription};
