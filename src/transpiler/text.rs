use crate::script::document::Comment;
use crate::transpiler::defaults::CommentStyle;

/// Boxed section banner:
///
/// ```text
/// ######################
/// # Script Function(s) #
/// ######################
/// ```
pub fn banner(title: &str, style: &CommentStyle) -> String {
    let marker = &style.comment_char;
    let padding = style.padding_char.repeat(style.header_padding);
    let middle = format!("{marker}{padding}{}{padding}{marker}", title.trim());
    let width = middle.chars().count();
    let border: String = marker.chars().cycle().take(width).collect();

    let eol = &style.end_line;
    format!("{border}{eol}{middle}{eol}{border}{eol}")
}

/// Renders free comment text. Multi-line text becomes a `"""` block when the
/// style prefers it, otherwise one marked line per line.
pub fn render_comment(text: &str, style: &CommentStyle, padding: usize) -> String {
    let eol = style.end_line.as_str();
    let lines: Vec<&str> = if eol.is_empty() {
        vec![text]
    } else {
        text.split(eol).collect()
    };

    if !style.prefer_multiline || lines.len() <= 1 {
        let pad = " ".repeat(padding);
        return lines
            .iter()
            .map(|line| format!("{}{}{}{}", style.comment_char, pad, line, eol))
            .collect();
    }

    format!(
        "{quote}{eol}{text}{eol}{quote}{eol}",
        quote = style.comments_char
    )
}

/// Renders a comment attached to a declaration.
pub fn render_comment_entry(comment: &Comment, style: &CommentStyle) -> String {
    match &comment.marker {
        Some(marker) => format!(
            "{}{}{}{}",
            marker,
            " ".repeat(comment.padding.unwrap_or(0)),
            comment.text,
            style.end_line
        ),
        None => render_comment(
            &comment.text,
            style,
            comment.padding.unwrap_or(style.comment_padding),
        ),
    }
}

/// Trailing comment appended to a declaration line, including the leading space.
pub fn inline_comment(text: &str, style: &CommentStyle) -> String {
    format!(
        " {}{}{}",
        style.comment_char,
        " ".repeat(style.comment_padding),
        text
    )
}

/// Prefixes each line with `indent` and joins with `end_line`. No lines join to "".
pub fn indent_block(lines: &[&str], indent: &str, end_line: &str) -> String {
    lines
        .iter()
        .map(|line| format!("{}{}", indent, line))
        .collect::<Vec<_>>()
        .join(end_line)
}
