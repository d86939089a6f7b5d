//! Console rendering of fetched tables.

use datasource_core::TopicFrame;

/// Number of rows shown per table by default.
pub const DEFAULT_PREVIEW_ROWS: usize = 5;

/// Renders each frame as a `DataFrame {n} ({topic})` header followed by its
/// first `preview_rows` rows. Numbering starts at 1 and follows slice order.
#[must_use]
pub fn render(frames: &[TopicFrame], preview_rows: usize) -> String {
    frames
        .iter()
        .enumerate()
        .map(|(i, item)| {
            format!(
                "{}\n{}\n",
                header(i, item),
                item.frame.head(Some(preview_rows))
            )
        })
        .collect()
}

fn header(index: usize, item: &TopicFrame) -> String {
    format!("DataFrame {} ({})", index + 1, item.topic)
}
