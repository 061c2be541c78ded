use serde::{Deserialize, Serialize};

/// Vertical extent of an element in client (screen) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub top: f64,
    pub height: f64,
}

impl Rect {
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// A scrollable element and its chain of scrollable ancestors.
pub trait ScrollNode {
    fn scroll_top(&self) -> f64;
    fn client_height(&self) -> f64;
    fn scroll_height(&self) -> f64;

    fn parent(&self) -> Option<&dyn ScrollNode> {
        None
    }
}

/// Live scroll metrics of the timeline container.
///
/// Never cached: read from the surface whenever a computation needs it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimelineViewport {
    pub scroll_top: f64,
    pub client_height: f64,
    pub scroll_height: f64,
}

impl TimelineViewport {
    pub fn read(node: &dyn ScrollNode) -> Self {
        Self {
            scroll_top: node.scroll_top(),
            client_height: node.client_height(),
            scroll_height: node.scroll_height(),
        }
    }

    /// Largest valid `scroll_top` for this viewport.
    pub fn max_scroll_top(&self) -> f64 {
        (self.scroll_height - self.client_height).max(0.0)
    }
}

/// Render-target handle for the timeline.
///
/// Reads return `None` while the host has not laid the element out yet; the
/// controllers treat that as "skip this frame". Mutators are applied directly
/// by the controllers outside the host's own render pass, so the host must not
/// overwrite handle position or scroll offset from its render while a drag or
/// zoom transition is active.
pub trait TimelineSurface {
    fn timeline(&self) -> Option<&dyn ScrollNode>;
    fn timeline_rect(&self) -> Option<Rect>;
    fn handle_rect(&self) -> Option<Rect>;

    fn set_handle_top(&mut self, top_px: f64);
    fn set_label(&mut self, text: &str);
    fn scroll_by(&mut self, delta_px: f64);
    fn set_scroll_top(&mut self, scroll_top: f64);
    fn set_content_height(&mut self, height_px: f64);
}

/// Scroll container simulated in memory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadlessNode {
    pub scroll_top: f64,
    pub client_height: f64,
    pub scroll_height: f64,
    #[serde(default)]
    pub parent: Option<Box<HeadlessNode>>,
}

impl HeadlessNode {
    pub fn new(client_height: f64, scroll_height: f64) -> Self {
        Self {
            scroll_top: 0.0,
            client_height,
            scroll_height,
            parent: None,
        }
    }

    fn clamp_scroll(&mut self) {
        let max = (self.scroll_height - self.client_height).max(0.0);
        self.scroll_top = self.scroll_top.clamp(0.0, max);
    }
}

impl ScrollNode for HeadlessNode {
    fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    fn client_height(&self) -> f64 {
        self.client_height
    }

    fn scroll_height(&self) -> f64 {
        self.scroll_height
    }

    fn parent(&self) -> Option<&dyn ScrollNode> {
        self.parent.as_deref().map(|node| node as &dyn ScrollNode)
    }
}

/// In-memory [`TimelineSurface`] used for script replay and tests.
///
/// Scroll offsets are clamped the way a browser clamps `scrollTop`.
///
/// # Example
/// ```
/// use scrubber::surface::{HeadlessSurface, TimelineSurface};
///
/// let mut surface = HeadlessSurface::new(100.0, 800.0);
/// surface.scroll_by(-40.0);
/// assert_eq!(surface.node.scroll_top, 0.0);
/// surface.set_scroll_top(1_000.0);
/// assert_eq!(surface.node.scroll_top, 700.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadlessSurface {
    pub node: HeadlessNode,
    pub rect_top: f64,
    pub handle_top: f64,
    pub handle_height: f64,
    pub label: String,
    pub mounted: bool,
}

impl HeadlessSurface {
    pub fn new(client_height: f64, scroll_height: f64) -> Self {
        Self {
            node: HeadlessNode::new(client_height, scroll_height),
            rect_top: 0.0,
            handle_top: 0.0,
            handle_height: 16.0,
            label: String::new(),
            mounted: true,
        }
    }

    fn cumulative_scroll_top(&self) -> f64 {
        crate::axis::cumulative_scroll_top(&self.node)
    }
}

impl TimelineSurface for HeadlessSurface {
    fn timeline(&self) -> Option<&dyn ScrollNode> {
        self.mounted.then_some(&self.node as &dyn ScrollNode)
    }

    fn timeline_rect(&self) -> Option<Rect> {
        self.mounted.then_some(Rect {
            top: self.rect_top,
            height: self.node.client_height,
        })
    }

    fn handle_rect(&self) -> Option<Rect> {
        self.mounted.then(|| Rect {
            top: self.rect_top + self.handle_top - self.cumulative_scroll_top(),
            height: self.handle_height,
        })
    }

    fn set_handle_top(&mut self, top_px: f64) {
        self.handle_top = top_px;
    }

    fn set_label(&mut self, text: &str) {
        self.label.clear();
        self.label.push_str(text);
    }

    fn scroll_by(&mut self, delta_px: f64) {
        self.node.scroll_top += delta_px;
        self.node.clamp_scroll();
    }

    fn set_scroll_top(&mut self, scroll_top: f64) {
        self.node.scroll_top = scroll_top;
        self.node.clamp_scroll();
    }

    fn set_content_height(&mut self, height_px: f64) {
        self.node.scroll_height = height_px;
        self.node.clamp_scroll();
    }
}
