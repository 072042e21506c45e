pub mod day;
pub mod elimination;
pub mod game_over;
pub mod hunter;
pub mod metadata;
pub mod morning;
pub mod night;
pub mod rounds;
pub mod voting;

use regex::Regex;

use crate::phrases::{find_marker, line_end, line_start};

/// The part of `window` that opens on the line holding the first of
/// `markers` and closes right before the first of `end_markers` found after
/// the marker. `None` when no marker is present.
pub(crate) fn marker_window<'t>(
    window: &'t str,
    markers: &[String],
    end_markers: &[&[String]],
) -> Option<&'t str> {
    let (start, marker_end) = find_marker(window, markers)?;
    let rest = &window[marker_end..];
    let end = end_markers
        .iter()
        .filter_map(|markers| find_marker(rest, markers))
        .map(|(pos, _)| marker_end + pos)
        .min()
        .unwrap_or(window.len());
    Some(&window[line_start(window, start)..end])
}

/// Where a section-specific search starts: the line of its marker when the
/// marker is present, otherwise the whole window.
pub(crate) fn section<'t>(window: &'t str, markers: &[String]) -> &'t str {
    find_marker(window, markers).map_or(window, |(start, _)| &window[line_start(window, start)..])
}

/// The first non-blank line after byte offset `pos`.
pub(crate) fn next_line(text: &str, pos: usize) -> Option<&str> {
    let after = line_end(text, pos);
    text.get(after..)?.lines().find(|line| !line.trim().is_empty())
}

/// `<name>: <statement>` on the first non-blank line after `pos`.
pub(crate) fn statement_after(text: &str, pos: usize, name: &str) -> Option<String> {
    let line = next_line(text, pos)?;
    let pattern = format!(r"^\s*{}\s*[:：]\s*(.+?)\s*$", regex::escape(name));
    let regex = Regex::new(&pattern).ok()?;
    regex.captures(line).map(|caps| caps[1].to_string())
}
