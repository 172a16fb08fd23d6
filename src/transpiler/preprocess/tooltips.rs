use crate::script::document::{Comment, Document};
use crate::transpiler::defaults::CommentStyle;

/// Turns tooltips into comment lines and drops the tooltip.
///
/// Exported variables get documentation comments (`## `) so the editor shows
/// them in the inspector; everything else gets plain comments.
pub fn lower_tooltips(document: &mut Document, style: &CommentStyle) {
    for variable in &mut document.variables {
        let Some(tooltip) = variable.tooltip.take() else {
            continue;
        };
        let marker = if variable.export {
            style.doc_marker()
        } else {
            style.plain_marker()
        };
        variable.comments.extend(
            tooltip
                .flatten()
                .into_iter()
                .map(|line| Comment::marked(marker.as_str(), 0, line)),
        );
    }

    let marker = style.plain_marker();
    for constant in &mut document.constants {
        if let Some(tooltip) = constant.tooltip.take() {
            constant.comments.extend(
                tooltip
                    .flatten()
                    .into_iter()
                    .map(|line| Comment::marked(marker.as_str(), 0, line)),
            );
        }
    }
}
