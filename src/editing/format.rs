use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};

use super::{live_range, snapshot};
use crate::content::{Element, LiveRange};
use crate::errors::{EditorError, EditorResult};
use crate::models::EditableWindow;

/// HTML font size levels (`<font size="1..7">`)
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize_repr, Deserialize_repr)]
pub enum FontSize {
    XSmall = 1,
    Small = 2,
    Medium = 3,
    Large = 4,
    XLarge = 5,
    XxLarge = 6,
    XxxLarge = 7,
}

impl FontSize {
    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            1 => Some(FontSize::XSmall),
            2 => Some(FontSize::Small),
            3 => Some(FontSize::Medium),
            4 => Some(FontSize::Large),
            5 => Some(FontSize::XLarge),
            6 => Some(FontSize::XxLarge),
            7 => Some(FontSize::XxxLarge),
            _ => None,
        }
    }

    pub fn level(self) -> u8 {
        self as u8
    }
}

/// Inline formatting commands
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", content = "value", rename_all = "camelCase")]
pub enum FormatCommand {
    Bold,
    Italic,
    Underline,
    /// CSS color (`#ff0000`, `red`, ...)
    ForeColor(String),
    FontSize(FontSize),
    /// Font family
    FontName(String),
}

impl FormatCommand {
    /// Parse a host command name and optional value
    pub fn parse(command: &str, value: Option<&str>) -> Option<Self> {
        let value = value.map(str::trim).filter(|v| !v.is_empty());
        match command {
            "bold" => Some(FormatCommand::Bold),
            "italic" => Some(FormatCommand::Italic),
            "underline" => Some(FormatCommand::Underline),
            "foreColor" => value.map(|v| FormatCommand::ForeColor(v.to_string())),
            "fontSize" => value
                .and_then(|v| v.parse::<u8>().ok())
                .and_then(FontSize::from_level)
                .map(FormatCommand::FontSize),
            "fontName" => value.map(|v| FormatCommand::FontName(v.to_string())),
            _ => None,
        }
    }

    /// Wrapper element the command applies
    pub fn element(&self) -> Element {
        match self {
            FormatCommand::Bold => Element::new("b"),
            FormatCommand::Italic => Element::new("i"),
            FormatCommand::Underline => Element::new("u"),
            FormatCommand::ForeColor(color) => Element::new("font").with_attr("color", color.as_str()),
            FormatCommand::FontSize(size) => Element::new("font").with_attr("size", size.level().to_string()),
            FormatCommand::FontName(face) => Element::new("font").with_attr("face", face.as_str()),
        }
    }
}

/// Wrap the selected content in the command's element.
///
/// Leaves already inside an identical element are left alone (applying a
/// command twice does not toggle it off). The selection keeps spanning the
/// formatted content.
pub fn apply_inline_format(window: &mut EditableWindow, command: &FormatCommand) -> EditorResult<()> {
    let range = live_range(window)?;

    // Splitting text at the boundaries leaves the serialized content unchanged
    let (start, end) = window.container.split_at_boundaries(range);
    window.selection = Some(LiveRange { start, end });

    let leaves = window.container.leaves_within(start, end);
    let (Some(first), Some(last)) = (leaves.first().copied(), leaves.last().copied()) else {
        return Err(EditorError::EmptySelection(window.id.clone()));
    };

    snapshot(window);
    window.container.wrap_leaves(&leaves, &command.element());

    let container = &window.container;
    window.selection = match (container.leaf_start(first), container.leaf_end(last)) {
        (Some(s), Some(e)) => Some(LiveRange::new(container, s, e)),
        _ => Some(LiveRange::caret(container.end_point())),
    };
    Ok(())
}
