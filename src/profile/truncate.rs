//! Bounded rendering of unbounded lists (role mentions) into a single embed text block.

/// Summary line appended when items had to be dropped. `{number}` is substituted at the end.
const OVERFLOW_TEMPLATE: &str = "and {number} more roles not displayed due to embed limits.";

/// Result of fitting a list into a character budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListDisplay {
    /// Nothing to show. Distinct from an empty string: callers substitute their own note.
    Empty,
    /// Every item fit; comma joined.
    Full(String),
    /// Newline separated leading items plus the overflow line.
    Truncated { text: String, omitted: usize },
}

impl ListDisplay {
    pub fn into_text(self) -> Option<String> {
        match self {
            ListDisplay::Empty => None,
            ListDisplay::Full(text) | ListDisplay::Truncated { text, .. } => Some(text),
        }
    }

    pub fn omitted(&self) -> usize {
        match self {
            ListDisplay::Truncated { omitted, .. } => *omitted,
            _ => 0,
        }
    }
}

/// Fit `items` into `budget` characters.
///
/// The reservation for the overflow line is taken from the raw template length, not from the
/// digit width of the final count. Eight placeholder characters cover counts up to 99,999,999,
/// so the output stays under `budget` for any realistic role list.
pub fn format_bounded<S: AsRef<str>>(items: &[S], budget: usize) -> ListDisplay {
    if items.is_empty() {
        return ListDisplay::Empty;
    }
    let joined = items
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(", ");
    if joined.chars().count() <= budget {
        return ListDisplay::Full(joined);
    }

    let mut available = budget.saturating_sub(OVERFLOW_TEMPLATE.chars().count());
    let mut text = String::new();
    let mut omitted = 0;
    for item in items {
        let item = item.as_ref();
        // +1 for the trailing newline
        let size = item.chars().count() + 1;
        if size < available {
            available -= size;
            text.push_str(item);
            text.push('\n');
        } else {
            omitted += 1;
        }
    }
    text.push_str(&OVERFLOW_TEMPLATE.replace("{number}", &omitted.to_string()));
    ListDisplay::Truncated { text, omitted }
}
