use super::Walker;
use crate::html;
use markup5ever_rcdom::Handle;

/// Marker for unordered list items and for stray `li` elements.
pub const BULLET: &str = "• ";

impl Walker {
    /// Renders the direct `li` children of a `ul`/`ol`, one block per item.
    ///
    /// The counter is local to this call, so nested lists (reached through
    /// an item's children) start again at 1 with their own ordered flag.
    pub(crate) fn render_list(&mut self, list: &Handle, ordered: bool) {
        let mut counter = 1usize;
        for child in list.children.borrow().iter() {
            if html::tag_name(child).as_deref() != Some("li") {
                continue;
            }
            if ordered {
                let marker = format!("{}. ", counter);
                self.render_item(child, &marker);
            } else {
                self.render_item(child, BULLET);
            }
            counter += 1;
        }
    }

    /// Opens a block at the item indent led by `marker`, walks the item, closes it.
    pub(crate) fn render_item(&mut self, item: &Handle, marker: &str) {
        let context = self.state.context().nested();
        self.in_context(context, |walker| {
            walker.state.open_block(context.block());
            walker.state.push_marker(marker);
            walker.walk(item);
            walker.state.close_block();
        });
    }
}
