use nannou::event::TouchPhase;
use nannou::prelude::*;

use crate::config::Settings;
use crate::model::Model;
use crate::pos::Pos;

/// Window point (centred, y up) to canvas pixels (top-left origin, y down),
/// stretching the canvas over the whole window.
pub fn to_canvas(window: Rect, settings: &Settings, p: Point2) -> Pos {
    Pos::new(
        (p.x - window.left()) / window.w() * settings.canvas_width,
        (window.top() - p.y) / window.h() * settings.canvas_height,
    )
}

fn pointer(app: &App, model: &Model, p: Point2) -> Pos {
    to_canvas(app.window_rect(), model.session.settings(), p)
}

pub fn event(app: &App, model: &mut Model, event: WindowEvent) {
    match event {
        WindowEvent::MousePressed(MouseButton::Left) => {
            let p = pointer(app, model, app.mouse.position());
            pointer_down(model, p);
        }
        WindowEvent::MouseMoved(position) => {
            let p = pointer(app, model, position);
            model.with_audio(|session, audio| session.pointer_move(p, audio));
            model.pointer_changed();
        }
        WindowEvent::MouseReleased(MouseButton::Left) => {
            model.session.pointer_up();
            model.pointer_changed();
        }
        WindowEvent::Resized(_) => model.resized(),
        WindowEvent::MouseExited => {
            model.session.pointer_left();
            model.pointer_changed();
        }
        WindowEvent::Touch(touch) => {
            let p = pointer(app, model, touch.position);
            match touch.phase {
                TouchPhase::Started => {
                    pointer_down(model, p);
                    model.with_audio(|session, audio| session.pointer_move(p, audio));
                }
                TouchPhase::Moved => {
                    model.with_audio(|session, audio| session.pointer_move(p, audio));
                }
                TouchPhase::Ended | TouchPhase::Cancelled => model.session.pointer_up(),
            }
            model.pointer_changed();
        }
        _ => (),
    }
}

fn pointer_down(model: &mut Model, p: Pos) {
    model.ensure_audio();
    model.with_audio(|session, audio| session.pointer_down(p, audio));
    model.pointer_changed();
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn window_centre_is_canvas_centre() {
        let settings = Settings::default();
        let window = Rect::from_w_h(360.0, 640.0);
        let p = to_canvas(window, &settings, pt2(0.0, 0.0));
        assert_approx_eq!(p.x, 180.0);
        assert_approx_eq!(p.y, 320.0);
    }

    #[test]
    fn window_top_left_is_canvas_origin() {
        let settings = Settings::default();
        let window = Rect::from_w_h(360.0, 640.0);
        let p = to_canvas(window, &settings, pt2(-180.0, 320.0));
        assert_approx_eq!(p.x, 0.0);
        assert_approx_eq!(p.y, 0.0);
    }

    #[test]
    fn resized_window_stretches_onto_the_canvas() {
        let settings = Settings::default();
        let window = Rect::from_w_h(720.0, 1280.0);
        let p = to_canvas(window, &settings, pt2(360.0, -640.0));
        assert_approx_eq!(p.x, 360.0);
        assert_approx_eq!(p.y, 640.0);
    }
}
