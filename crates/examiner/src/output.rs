//! Terminal output: notifications on stderr, tables and JSON on stdout.

use color_eyre::Result;
use portal_client::{Notification, Notifier, TracingNotifier};
use questions::Page;
use serde::Serialize;

/// Notifications as single stderr lines, mirrored into the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, n: Notification) {
        let line = console_line(&n);
        TracingNotifier.notify(n);
        eprintln!("{line}");
    }
}

fn console_line(n: &Notification) -> String {
    format!("{}: {}", n.level, n.message.trim_end())
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn page_footer<T>(page: &Page<T>) -> String {
    format!(
        "page {} of {} ({} total)",
        page.page,
        page.total_pages().max(1),
        page.total
    )
}

/// Clip to `width` characters, marking the cut with `…`.
pub fn clip(text: &str, width: usize) -> String {
    let single_line = text.replace('\n', " ");
    if single_line.chars().count() <= width {
        return single_line;
    }
    let mut clipped: String = single_line.chars().take(width.saturating_sub(1)).collect();
    clipped.push('…');
    clipped
}

/// Hide all but the last four characters of a token.
pub fn mask_token(token: &str) -> String {
    let count = token.chars().count();
    if count <= 8 {
        return "*".repeat(count);
    }
    let tail: String = token.chars().skip(count - 4).collect();
    format!("{}{}", "*".repeat(count - 4), tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clip_marks_cut() {
        assert_eq!(clip("short", 10), "short");
        assert_eq!(clip("a long question text", 8), "a long …");
        assert_eq!(clip("two\nlines", 20), "two lines");
    }

    #[test]
    fn notification_line_names_level() {
        assert_eq!(
            console_line(&Notification::warning("No students match the current filters\n")),
            "warning: No students match the current filters"
        );
        assert_eq!(console_line(&Notification::success("saved")), "success: saved");
    }

    #[test]
    fn mask_keeps_tail() {
        assert_eq!(mask_token("abcd"), "****");
        assert_eq!(mask_token("eyJhbGciOiJIUzI1"), "************UzI1");
    }

    #[test]
    fn footer_counts_pages() {
        let page = Page::<u8> {
            items: vec![],
            page: 2,
            per_page: 10,
            total: 25,
        };
        assert_eq!(page_footer(&page), "page 2 of 3 (25 total)");
    }
}
