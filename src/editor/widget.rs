//! Rich-text widget capability.
//!
//! The WYSIWYG engine is an external collaborator. The editor only mounts
//! widgets on containers, reads and seeds their HTML, and listens for
//! change notifications.

/// Called with the widget's current HTML after every user edit.
pub type ChangeListener = Box<dyn FnMut(&str) + Send>;

/// Toolbar entries offered by a mounted widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarItem {
    Bold,
    Italic,
    Underline,
    Image,
    OrderedList,
    BulletList,
}

/// Mount configuration handed to the widget host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetConfig {
    pub theme: &'static str,
    pub toolbar: Vec<Vec<ToolbarItem>>,
}

impl WidgetConfig {
    /// Configuration used for question bodies.
    pub fn question_body() -> Self {
        use ToolbarItem::*;

        Self {
            theme: "snow",
            toolbar: vec![
                vec![Bold, Italic, Underline],
                vec![Image],
                vec![OrderedList, BulletList],
            ],
        }
    }
}

pub trait RichTextWidget {
    /// Current document as HTML.
    fn content(&self) -> String;

    /// Replace the document without notifying listeners.
    fn set_content(&mut self, html: &str);

    fn on_change(&mut self, listener: ChangeListener);
}

/// Something that can mount widgets on named containers.
pub trait WidgetHost {
    type Widget: RichTextWidget;

    fn mount(&mut self, container: &str, config: &WidgetConfig) -> Self::Widget;
}

/// In-memory widget used by the terminal front-end and in tests.
pub struct BufferWidget {
    container: String,
    html: String,
    listeners: Vec<ChangeListener>,
}

impl BufferWidget {
    pub fn new(container: impl Into<String>) -> Self {
        Self {
            container: container.into(),
            html: String::new(),
            listeners: Vec::new(),
        }
    }

    pub fn container(&self) -> &str {
        &self.container
    }

    /// A user edit: replace the document and notify every listener.
    pub fn edit(&mut self, html: &str) {
        self.html = html.to_string();
        for listener in &mut self.listeners {
            listener(&self.html);
        }
    }
}

impl RichTextWidget for BufferWidget {
    fn content(&self) -> String {
        self.html.clone()
    }

    fn set_content(&mut self, html: &str) {
        self.html = html.to_string();
    }

    fn on_change(&mut self, listener: ChangeListener) {
        self.listeners.push(listener);
    }
}

/// Mounts [`BufferWidget`]s and remembers how many it has created.
#[derive(Debug, Default)]
pub struct BufferHost {
    mounted: usize,
}

impl BufferHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total widgets mounted over the host's lifetime.
    pub fn mounted(&self) -> usize {
        self.mounted
    }
}

impl WidgetHost for BufferHost {
    type Widget = BufferWidget;

    fn mount(&mut self, container: &str, _config: &WidgetConfig) -> BufferWidget {
        self.mounted += 1;
        BufferWidget::new(container)
    }
}
