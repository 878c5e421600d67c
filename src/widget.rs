use std::sync::Arc;

use crate::{
    event::{
        key::Key,
        mouse::{MouseAction, MouseEvent},
    },
    geom::{Point, Rect},
    screen::Screen,
};

/// Callback handed to components so they can redirect focus, e.g. a
/// container immediately delegating focus to one of its children. Calling it
/// re-enters the coordinator's focus handoff.
pub type RequestFocus<'a> = dyn FnMut(Component) + 'a;

/// The capability contract between the runtime and the widgets it drives.
///
/// The runtime never knows concrete widget kinds; it only invokes
/// capabilities. All methods take `&self`: the dispatch thread is the only
/// thread that calls them, so widgets that carry mutable state keep it
/// behind their own interior mutability and never contend.
pub trait Widget: Send + Sync {
    /// Render this component onto the surface.
    fn draw(&self, screen: &dyn Screen);

    /// The component's bounding rectangle.
    fn rect(&self) -> Rect;

    /// Move/resize the component. The runtime calls this on the root when
    /// it is set to fullscreen and the terminal changes size.
    fn set_rect(&self, rect: Rect);

    fn is_visible(&self) -> bool {
        true
    }

    /// Handle a key event. Return true if the component consumed it. The
    /// default signals that the component has no input handler.
    fn handle_key(&self, key: Key, request: &mut RequestFocus) -> bool {
        let _ = (key, request);
        false
    }

    /// Handle a semantic mouse action together with the raw event it was
    /// derived from. Returns whether the action was consumed, and the
    /// component (if any) that should capture all subsequent mouse actions
    /// regardless of position. The returned capture unconditionally replaces
    /// the current one - returning `None` releases capture.
    fn handle_mouse(
        &self,
        action: MouseAction,
        event: &MouseEvent,
        request: &mut RequestFocus,
    ) -> (bool, Option<Component>) {
        let _ = (action, event, request);
        (false, None)
    }

    /// The component received focus. `request` may be used to immediately
    /// redirect focus elsewhere.
    fn focus(&self, request: &mut RequestFocus) {
        let _ = request;
    }

    /// The component lost focus.
    fn blur(&self) {}

    /// Does this component (or one of its descendants) hold focus?
    fn has_focus(&self) -> bool;

    /// Enumerate direct children in z-order. Container components implement
    /// this so the runtime can hit-test the tree; leaves use the default.
    fn children(&self, f: &mut dyn FnMut(&Component)) {
        let _ = f;
    }
}

/// A shared, polymorphic component node. Identity is pointer identity.
pub type Component = Arc<dyn Widget>;

/// Locate the deepest visible component whose bounds contain `pos`,
/// recursing only through the [`Widget::children`] capability. Children are
/// preferred over their parent; among siblings the first match wins.
pub fn component_at(c: &Component, pos: Point) -> Option<Component> {
    if !c.is_visible() {
        return None;
    }
    let mut found = None;
    c.children(&mut |child| {
        if found.is_none() {
            found = component_at(child, pos);
        }
    });
    if found.is_some() {
        return found;
    }
    if c.rect().contains(pos) { Some(c.clone()) } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tutils::LogWidget;

    #[test]
    fn hit_test_prefers_deepest_child() {
        let leaf = LogWidget::arc("leaf");
        leaf.set_rect(Rect::new(2, 2, 2, 2));
        let mid = LogWidget::arc("mid");
        mid.set_rect(Rect::new(1, 1, 6, 6));
        mid.add_child(leaf.clone());
        let root = LogWidget::arc("root");
        root.set_rect(Rect::new(0, 0, 10, 10));
        root.add_child(mid.clone());

        let leaf: Component = leaf;
        let mid: Component = mid;
        let root: Component = root;
        let hit = component_at(&root, Point::new(3, 3)).unwrap();
        assert!(Arc::ptr_eq(&hit, &leaf));

        // Inside mid but outside leaf.
        let hit = component_at(&root, Point::new(6, 6)).unwrap();
        assert!(Arc::ptr_eq(&hit, &mid));

        // Inside root only.
        let hit = component_at(&root, Point::new(9, 0)).unwrap();
        assert!(Arc::ptr_eq(&hit, &root));

        assert!(component_at(&root, Point::new(20, 20)).is_none());
    }

    #[test]
    fn hit_test_skips_invisible_subtrees() {
        let leaf = LogWidget::arc("leaf");
        leaf.set_rect(Rect::new(0, 0, 4, 4));
        leaf.set_visible(false);
        let root = LogWidget::arc("root");
        root.set_rect(Rect::new(0, 0, 10, 10));
        root.add_child(leaf);

        let root: Component = root;
        let hit = component_at(&root, Point::new(1, 1)).unwrap();
        assert!(Arc::ptr_eq(&hit, &root));
    }
}
