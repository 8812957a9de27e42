//! Outward callback surface
//!
//! Hosts that prefer callbacks over matching on [`InputEvent`] implement
//! [`InputCallbacks`] and route each frame's events through [`dispatch`].
//! Every method defaults to a no-op.

use crate::input::InputEvent;

pub trait InputCallbacks {
    fn on_menu_toggle(&mut self) {}
    fn on_next_image(&mut self) {}
    fn on_prev_image(&mut self) {}
    fn on_info_toggle(&mut self) {}
    fn on_console_toggle(&mut self) {}
    fn on_controller_info_toggle(&mut self) {}
    fn on_menu_item_select(&mut self) {}
    /// Menu scroll in panel units, positive reveals later items
    fn on_vr_menu_scroll(&mut self, _amount: f32) {}
    fn on_console_scroll(&mut self, _dx: f32, _dy: f32) {}
}

/// Call the matching callback for one event
pub fn dispatch(event: &InputEvent, callbacks: &mut impl InputCallbacks) {
    match *event {
        InputEvent::MenuToggle => callbacks.on_menu_toggle(),
        InputEvent::NextImage => callbacks.on_next_image(),
        InputEvent::PrevImage => callbacks.on_prev_image(),
        InputEvent::InfoToggle => callbacks.on_info_toggle(),
        InputEvent::ConsoleToggle => callbacks.on_console_toggle(),
        InputEvent::ControllerInfoToggle => callbacks.on_controller_info_toggle(),
        InputEvent::MenuItemSelect => callbacks.on_menu_item_select(),
        InputEvent::MenuScroll(amount) => callbacks.on_vr_menu_scroll(amount),
        InputEvent::ConsoleScroll(dx, dy) => callbacks.on_console_scroll(dx, dy),
    }
}

/// Dispatch a whole frame's events in order
pub fn dispatch_all<'a>(events: impl IntoIterator<Item = &'a InputEvent>, callbacks: &mut impl InputCallbacks) {
    for event in events {
        dispatch(event, callbacks);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
    }

    impl InputCallbacks for Recorder {
        fn on_menu_toggle(&mut self) {
            self.calls.push("menu".into());
        }
        fn on_next_image(&mut self) {
            self.calls.push("next".into());
        }
        fn on_vr_menu_scroll(&mut self, amount: f32) {
            self.calls.push(format!("scroll {}", amount));
        }
        fn on_console_scroll(&mut self, dx: f32, dy: f32) {
            self.calls.push(format!("console {} {}", dx, dy));
        }
    }

    #[test]
    fn test_dispatch_routes_in_order() {
        let mut recorder = Recorder::default();
        let events = [
            InputEvent::NextImage,
            InputEvent::MenuToggle,
            InputEvent::InfoToggle,
            InputEvent::MenuScroll(0.5),
            InputEvent::ConsoleScroll(1.0, -2.0),
        ];
        dispatch_all(&events, &mut recorder);
        assert_eq!(recorder.calls, vec!["next", "menu", "scroll 0.5", "console 1 -2"]);
    }
}
