//! `Renderer`: one call per frame, tree in, string out.

use crate::buffer::OutputBuffer;
use crate::error::Result;
use crate::layout::compute_tree_layout;
use crate::text::{WidthCache, DEFAULT_CACHE_CAPACITY};

use super::node::{NodeId, NodeRegistry};
use super::walker::render_tree;

/// Configuration for the [`Renderer`].
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Number of strings the text measurement cache keeps.
    pub width_cache_capacity: usize,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            width_cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

/// One serialized frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    /// Rows joined by `\n`, each right-trimmed.
    pub output: String,
    /// Number of rows up to the last one with visible content.
    pub height: usize,
}

/// Turns a node tree into frame strings.
///
/// Layout map, clip stack and output buffer are rebuilt on every call and
/// dropped before it returns. Only the measurement cache survives between
/// frames.
pub struct Renderer {
    config: RendererConfig,
    cache: WidthCache,
}

impl Renderer {
    /// Create a renderer with custom configuration.
    pub fn new(config: RendererConfig) -> Self {
        let cache = WidthCache::new(config.width_cache_capacity);
        Self { config, cache }
    }

    /// Lay out and paint the tree under `root` for a terminal `width`
    /// columns wide.
    ///
    /// A hidden root renders as an empty frame.
    ///
    /// # Errors
    ///
    /// Returns an error if `root` is unknown or a style carries an invalid
    /// size or flex weight.
    pub fn render(&mut self, registry: &NodeRegistry, root: NodeId, width: u16) -> Result<Frame> {
        let layout = compute_tree_layout(registry, root, width, &mut self.cache)?;
        let Some(rect) = layout.get(&root) else {
            return Ok(Frame::default());
        };

        let mut buffer = OutputBuffer::new(usize::from(rect.width), usize::from(rect.height))?;
        render_tree(registry, &layout, root, &mut buffer);

        let frame = Frame {
            output: buffer.content(),
            height: buffer.content_height(),
        };
        let (hits, misses) = self.cache.stats();
        tracing::debug!(
            width,
            height = frame.height,
            nodes = layout.len(),
            cache_hits = hits,
            cache_misses = misses,
            "frame rendered"
        );
        Ok(frame)
    }

    /// Configuration in use.
    pub const fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// The text measurement cache.
    pub const fn cache(&self) -> &WidthCache {
        &self.cache
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(RendererConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{Border, BorderStyle, Style};

    #[test]
    fn test_render_frame() {
        let mut registry = NodeRegistry::new();
        let root = registry.add_root(Style::default().column());
        let panel = registry.add_box(root, Style::default().border(Border::new(BorderStyle::Single)));
        registry.add_text(panel, Style::default(), "ok");

        let mut renderer = Renderer::default();
        let frame = renderer.render(&registry, root, 8).unwrap();
        assert_eq!(frame.output, "┌──────┐\n│ok    │\n└──────┘");
        assert_eq!(frame.height, 3);
    }

    #[test]
    fn test_cache_persists_between_frames() {
        let mut registry = NodeRegistry::new();
        let root = registry.add_root(Style::default());
        registry.add_text(root, Style::default(), "cached");

        let mut renderer = Renderer::new(RendererConfig {
            width_cache_capacity: 8,
        });
        let first = renderer.render(&registry, root, 20).unwrap();
        let (_, misses) = renderer.cache().stats();
        let second = renderer.render(&registry, root, 20).unwrap();

        assert_eq!(first, second);
        assert_eq!(renderer.cache().stats().1, misses);
        assert!(renderer.cache().stats().0 > 0);
        assert_eq!(renderer.config().width_cache_capacity, 8);
    }

    #[test]
    fn test_hidden_root_renders_empty() {
        let mut registry = NodeRegistry::new();
        let mut style = Style::default();
        style.display = crate::render::Display::None;
        let root = registry.add_root(style);
        registry.add_text(root, Style::default(), "gone");

        let frame = Renderer::default().render(&registry, root, 10).unwrap();
        assert_eq!(frame, Frame::default());
    }

    #[test]
    fn test_unknown_root_is_an_error() {
        let registry = NodeRegistry::new();
        assert!(Renderer::default().render(&registry, NodeId(9), 10).is_err());
    }
}
