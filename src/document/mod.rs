//! Markdown preview rendering.
//!
//! This module handles:
//! - Parsing markdown with comrak (GFM extensions on)
//! - Laying the result out as wrapped, styled lines for the preview pane
//! - Exporting the same source as HTML

mod parser;
mod types;

pub use parser::{render, to_html};
pub use types::{
    HeadingRef, InlineColor, InlineSpan, InlineStyle, LineType, LinkRef, Preview, RenderedLine,
};

/// The document shown when no file is given on the command line.
pub const WELCOME_DOCUMENT: &str = r"# Welcome to your Markdown Editor

Start typing to see live preview.

- Supports **bold**, *italic*, and `code`
- Add [links](https://example.com) or images
- Use `##` for subheadings

## Example
This is a **bold** text and this is *italic*.

### Code Example
```javascript
function hello() {
  console.log('Hello, World!');
}
```

### List Example
1. First item
2. Second item
3. Third item
";

/// File extensions offered by the upload picker.
pub const MARKDOWN_EXTENSIONS: &[&str] = &["md", "markdown"];

/// Whether a path carries one of the suggested markdown extensions.
pub fn is_markdown_path(path: &std::path::Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| MARKDOWN_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}
