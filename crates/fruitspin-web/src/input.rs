use fruitspin_core::constants::{PULL_CLICK_MAX_MS, PULL_DRAG_TOLERANCE_PX};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;

/// How a completed pointer press is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressKind {
    /// Short, still press: pulls the lever.
    Pull,
    /// Held too long to count as a click.
    LongPress,
    /// Moved too far to count as a click.
    Drag,
}

/// Classify a press from its duration and the farthest the pointer travelled.
pub fn classify_press(duration_ms: f64, travel_px: f32) -> PressKind {
    if travel_px > PULL_DRAG_TOLERANCE_PX {
        PressKind::Drag
    } else if duration_ms >= PULL_CLICK_MAX_MS {
        PressKind::LongPress
    } else {
        PressKind::Pull
    }
}

#[derive(Debug, Clone, Copy)]
struct Press {
    start_ms: f64,
    start: (f32, f32),
    travel: f32,
}

/// Pointer state accumulated by DOM listeners and consumed once per frame.
pub struct InputState {
    /// Last pointer position in CSS pixels relative to the canvas.
    pub pointer: Option<(f32, f32)>,
    /// Set when a press classified as `Pull`; cleared by the frame loop.
    pub pull_requested: bool,
    /// Pointer events forwarded to egui on the next frame.
    pub egui_events: Vec<egui::Event>,
    /// Page visibility transition not yet handled (`Some(true)` = hidden).
    pub visibility_change: Option<bool>,
    press: Option<Press>,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            pointer: None,
            pull_requested: false,
            egui_events: Vec::new(),
            visibility_change: None,
            press: None,
        }
    }

    pub fn pointer_down(&mut self, x: f32, y: f32, time_ms: f64) {
        self.pointer = Some((x, y));
        self.press = Some(Press {
            start_ms: time_ms,
            start: (x, y),
            travel: 0.0,
        });
        self.egui_events.push(egui::Event::PointerButton {
            pos: egui::pos2(x, y),
            button: egui::PointerButton::Primary,
            pressed: true,
            modifiers: egui::Modifiers::default(),
        });
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.pointer = Some((x, y));
        if let Some(press) = self.press.as_mut() {
            let (sx, sy) = press.start;
            let distance = ((x - sx).powi(2) + (y - sy).powi(2)).sqrt();
            press.travel = press.travel.max(distance);
        }
        self.egui_events.push(egui::Event::PointerMoved(egui::pos2(x, y)));
    }

    /// Finish a press. Returns how it was classified, if one was in progress.
    pub fn pointer_up(&mut self, x: f32, y: f32, time_ms: f64) -> Option<PressKind> {
        self.pointer_move(x, y);
        self.egui_events.push(egui::Event::PointerButton {
            pos: egui::pos2(x, y),
            button: egui::PointerButton::Primary,
            pressed: false,
            modifiers: egui::Modifiers::default(),
        });

        let press = self.press.take()?;
        let kind = classify_press(time_ms - press.start_ms, press.travel);
        if kind == PressKind::Pull {
            self.pull_requested = true;
        }
        Some(kind)
    }

    /// Pointer left the canvas: any press in progress is abandoned.
    pub fn pointer_gone(&mut self) {
        self.pointer = None;
        self.press = None;
        self.egui_events.push(egui::Event::PointerGone);
    }

    pub fn take_egui_events(&mut self) -> Vec<egui::Event> {
        std::mem::take(&mut self.egui_events)
    }

    pub fn take_pull(&mut self) -> bool {
        std::mem::take(&mut self.pull_requested)
    }
}

/// Register pointer and visibility listeners once at init.
/// Closures are leaked via `.forget()` since they live for the page lifetime.
pub fn register_input_listeners(
    canvas: &web_sys::HtmlCanvasElement,
    document: &web_sys::Document,
    state: Rc<RefCell<InputState>>,
) {
    let target: &web_sys::EventTarget = canvas.as_ref();

    // pointerdown
    {
        let state = state.clone();
        let closure =
            Closure::<dyn FnMut(web_sys::PointerEvent)>::new(move |e: web_sys::PointerEvent| {
                if e.button() != 0 {
                    return;
                }
                state.borrow_mut().pointer_down(
                    e.offset_x() as f32,
                    e.offset_y() as f32,
                    e.time_stamp(),
                );
            });
        target
            .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref())
            .expect("failed to add pointerdown listener");
        closure.forget();
    }

    // pointermove
    {
        let state = state.clone();
        let closure =
            Closure::<dyn FnMut(web_sys::PointerEvent)>::new(move |e: web_sys::PointerEvent| {
                state
                    .borrow_mut()
                    .pointer_move(e.offset_x() as f32, e.offset_y() as f32);
            });
        target
            .add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref())
            .expect("failed to add pointermove listener");
        closure.forget();
    }

    // pointerup
    {
        let state = state.clone();
        let closure =
            Closure::<dyn FnMut(web_sys::PointerEvent)>::new(move |e: web_sys::PointerEvent| {
                if e.button() != 0 {
                    return;
                }
                let kind = state.borrow_mut().pointer_up(
                    e.offset_x() as f32,
                    e.offset_y() as f32,
                    e.time_stamp(),
                );
                if let Some(kind) = kind {
                    log::debug!("Press classified as {:?}", kind);
                }
            });
        target
            .add_event_listener_with_callback("pointerup", closure.as_ref().unchecked_ref())
            .expect("failed to add pointerup listener");
        closure.forget();
    }

    // pointerleave
    {
        let state = state.clone();
        let closure =
            Closure::<dyn FnMut(web_sys::PointerEvent)>::new(move |_e: web_sys::PointerEvent| {
                state.borrow_mut().pointer_gone();
            });
        target
            .add_event_listener_with_callback("pointerleave", closure.as_ref().unchecked_ref())
            .expect("failed to add pointerleave listener");
        closure.forget();
    }

    // contextmenu (no browser menu over the machine)
    {
        let closure =
            Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |e: web_sys::MouseEvent| {
                e.prevent_default();
            });
        target
            .add_event_listener_with_callback("contextmenu", closure.as_ref().unchecked_ref())
            .expect("failed to add contextmenu listener");
        closure.forget();
    }

    // visibilitychange
    {
        let doc = document.clone();
        let closure = Closure::<dyn FnMut()>::new(move || {
            state.borrow_mut().visibility_change = Some(doc.hidden());
        });
        document
            .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref())
            .expect("failed to add visibilitychange listener");
        closure.forget();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quick_still_press_is_pull() {
        assert_eq!(classify_press(80.0, 0.0), PressKind::Pull);
        assert_eq!(classify_press(199.0, PULL_DRAG_TOLERANCE_PX), PressKind::Pull);
    }

    #[test]
    fn test_slow_press_is_not_pull() {
        assert_eq!(classify_press(200.0, 0.0), PressKind::LongPress);
        assert_eq!(classify_press(1500.0, 1.0), PressKind::LongPress);
    }

    #[test]
    fn test_drag_wins_over_duration() {
        assert_eq!(classify_press(50.0, 40.0), PressKind::Drag);
        assert_eq!(classify_press(900.0, 40.0), PressKind::Drag);
    }

    #[test]
    fn test_press_sequence_requests_pull() {
        let mut input = InputState::new();
        input.pointer_down(10.0, 10.0, 1000.0);
        input.pointer_move(12.0, 11.0);
        assert_eq!(input.pointer_up(12.0, 11.0, 1100.0), Some(PressKind::Pull));
        assert!(input.take_pull());
        assert!(!input.take_pull());
    }

    #[test]
    fn test_travel_is_farthest_excursion() {
        let mut input = InputState::new();
        input.pointer_down(0.0, 0.0, 0.0);
        input.pointer_move(30.0, 0.0);
        // Coming back does not make it a click
        assert_eq!(input.pointer_up(0.0, 0.0, 50.0), Some(PressKind::Drag));
        assert!(!input.take_pull());
    }

    #[test]
    fn test_pointer_gone_cancels_press() {
        let mut input = InputState::new();
        input.pointer_down(5.0, 5.0, 0.0);
        input.pointer_gone();
        assert_eq!(input.pointer_up(5.0, 5.0, 20.0), None);
        assert!(!input.take_pull());
        assert!(input.pointer.is_some());
    }

    #[test]
    fn test_events_forwarded_to_ui() {
        let mut input = InputState::new();
        input.pointer_down(1.0, 2.0, 0.0);
        input.pointer_up(1.0, 2.0, 10.0);
        let events = input.take_egui_events();
        assert_eq!(events.len(), 3);
        assert!(input.take_egui_events().is_empty());
    }
}
