//! Panel script decoding.
//!
//! One panel per line, six `|`-delimited fields:
//!
//! ```text
//! id | title | narration | dialog1;dialog2;... | file | snippet
//! ```
//!
//! The format has no escaping. A literal `|` inside a field shifts every later
//! field, and a literal `;` inside a dialog line splits it in two.

use saga_core::script::{DEFAULT_PANEL_GOAL, Panel, Script, UNTITLED_PANEL};

const FIELD_DELIMITER: char = '|';
const DIALOG_DELIMITER: char = ';';

/// Decode every line containing a `|` into a panel, in line order.
///
/// Missing trailing fields default to empty; a line never fails to decode.
pub fn decode_panels(text: &str) -> Script {
    let panels: Vec<Panel> = text
        .trim()
        .lines()
        .filter(|line| !line.is_empty() && line.contains(FIELD_DELIMITER))
        .map(decode_panel)
        .collect();

    tracing::debug!(panels = panels.len(), "decoded panel script");
    Script { panels }
}

fn decode_panel(line: &str) -> Panel {
    let mut parts = line.split(FIELD_DELIMITER).map(str::trim);
    let mut field = || parts.next().unwrap_or_default();

    let id = parse_panel_id(field());
    let title = non_empty_or(field(), UNTITLED_PANEL);
    let narration = field().to_string();
    let dialog = split_dialog(field());
    let file = field().to_string();
    let snippet = field().to_string();

    Panel {
        id,
        title,
        narration,
        dialog,
        file,
        snippet,
        goal: DEFAULT_PANEL_GOAL.to_string(),
    }
}

/// Skip leading non-digits (`#3`, `Panel 3`) and parse the digit run; 0 if none.
fn parse_panel_id(text: &str) -> u32 {
    let digits: String = text
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().unwrap_or(0)
}

fn split_dialog(group: &str) -> Vec<String> {
    if group.is_empty() {
        return Vec::new();
    }
    group
        .split(DIALOG_DELIMITER)
        .map(|d| d.trim().to_string())
        .collect()
}

fn non_empty_or(value: &str, default: &str) -> String {
    if value.is_empty() {
        default.to_string()
    } else {
        value.to_string()
    }
}
