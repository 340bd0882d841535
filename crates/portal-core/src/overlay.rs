//! Overlay markup, style block, and the one-shot exit subscription

/// Element id of the singleton overlay container
pub const OVERLAY_ID: &str = "a_open_page_iframe";

/// Element id of the singleton style block
pub const STYLE_ID: &str = "a_open_page_css";

pub const OVERLAY_CLASS: &str = "page__modal";
pub const HEADER_CLASS: &str = "page__modal-header";
pub const CLOSE_CLASS: &str = "close";
pub const CLOSE_LABEL: &str = "Back to XR";

/// Permissions delegated to the embedded frame
pub const FRAME_ALLOW: &str = "xr-spatial-tracking; gyroscope; accelerometer";
pub const FRAME_SANDBOX: &str = "allow-same-origin allow-scripts";

/// Style rules for the overlay, keyed on [`OVERLAY_ID`]
pub fn style_css() -> String {
    let sel = format!("#{}.{}", OVERLAY_ID, OVERLAY_CLASS);
    format!(
        "{sel} {{ position: fixed; left: 50%; top: 50%; transform: translate(-50%, -50%); width: 90vw; height: 70vh; }}\n\
         {sel} .{header} {{ width: 100%; display: flex; flex-direction: row-reverse; }}\n\
         {sel} iframe {{ width: 100%; height: 100%; }}",
        sel = sel,
        header = HEADER_CLASS,
    )
}

/// Description of one overlay instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayMarkup {
    /// Behavior that opened the overlay and receives its close event
    pub owner: u64,
    /// Frame source
    pub src: String,
}

impl OverlayMarkup {
    pub fn new(owner: u64, src: impl Into<String>) -> Self {
        Self {
            owner,
            src: src.into(),
        }
    }

    /// Render the overlay as an HTML fragment
    pub fn to_html(&self) -> String {
        format!(
            concat!(
                "<div id=\"{id}\" class=\"{class}\" tabindex=\"-1\">",
                "<div class=\"{header}\"><button class=\"{close}\">{label}</button></div>",
                "<iframe src=\"{src}\" frameborder=\"0\" allow=\"{allow}\" sandbox=\"{sandbox}\" ",
                "width=\"100%\" height=\"100%\"></iframe>",
                "</div>"
            ),
            id = OVERLAY_ID,
            class = OVERLAY_CLASS,
            header = HEADER_CLASS,
            close = CLOSE_CLASS,
            label = CLOSE_LABEL,
            src = escape_attr(&self.src),
            allow = FRAME_ALLOW,
            sandbox = FRAME_SANDBOX,
        )
    }
}

fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Where a behavior's overlay currently is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlayPhase {
    #[default]
    Closed,
    /// Session exit requested, overlay will mount on confirmation
    AwaitingExit,
    Open,
}

/// A subscription that fires at most once and then disarms itself.
///
/// There is no cancellation: an armed subscription stays armed until fired.
/// Arming again replaces the pending payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OneShot<T> {
    pending: Option<T>,
}

impl<T> Default for OneShot<T> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<T> OneShot<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm with a payload. Returns true if a previous payload was replaced.
    pub fn arm(&mut self, payload: T) -> bool {
        self.pending.replace(payload).is_some()
    }

    /// Take the payload, disarming the subscription
    pub fn fire(&mut self) -> Option<T> {
        self.pending.take()
    }

    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }
}
