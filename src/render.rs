use nannou::prelude::*;

use crate::ball::BallState;
use crate::bounds::BBox;
use crate::model::Model;
use crate::note_line::LineState;
use crate::scale::scale;
use crate::session::Session;

const GRADIENT_BANDS: usize = 48;

/// Canvas pixels to window coordinates, the inverse of
/// [`crate::input::to_canvas`].
struct Canvas {
    window: Rect,
    sx: f32,
    sy: f32,
}

impl Canvas {
    fn new(window: Rect, session: &Session) -> Self {
        let settings = session.settings();
        Canvas {
            window,
            sx: window.w() / settings.canvas_width,
            sy: window.h() / settings.canvas_height,
        }
    }

    fn point(&self, x: f32, y: f32) -> Point2 {
        pt2(
            self.window.left() + x * self.sx,
            self.window.top() - y * self.sy,
        )
    }

    fn rect(&self, draw: &Draw, bbox: BBox, color: Rgb) {
        let centre = self.point(bbox.x + bbox.width / 2.0, bbox.y + bbox.height / 2.0);
        draw.rect()
            .xy(centre)
            .w_h(bbox.width * self.sx, bbox.height * self.sy)
            .color(color);
    }
}

pub fn view(app: &App, model: &Model, frame: Frame) {
    if !model.redraw {
        return;
    }

    let session = &model.session;
    let canvas = Canvas::new(app.window_rect(), session);
    let draw = app.draw();
    draw.background().color(BLACK);

    draw_linear_area(&draw, &canvas, session);
    draw_ball(&draw, &canvas, session);
    draw_piano_roll(&draw, &canvas, session);
    draw_note_line(&draw, &canvas, session);
    draw_readout(&draw, &canvas, session);

    draw.to_frame(app, &frame).unwrap();
}

// Black at the floor fading to green at the top.
fn draw_linear_area(draw: &Draw, canvas: &Canvas, session: &Session) {
    let area = session.linear();
    let bbox = area.bbox();
    let [(stop_low, level_low), (stop_high, level_high)] = area.fill_stops();
    let band_height = bbox.height / GRADIENT_BANDS as f32;

    for i in 0..GRADIENT_BANDS {
        let from_bottom = (i as f32 + 0.5) / GRADIENT_BANDS as f32;
        let level = if from_bottom < stop_low {
            0.0
        } else {
            scale(stop_low, stop_high, from_bottom, level_low, level_high)
        };
        let band = BBox::new(
            bbox.x,
            bbox.y + bbox.height - band_height * (i + 1) as f32,
            bbox.width,
            band_height,
        );
        canvas.rect(draw, band, rgb(0.0, level * 0.5, 0.0));
    }
}

fn draw_piano_roll(draw: &Draw, canvas: &Canvas, session: &Session) {
    let roll = session.piano();
    let bbox = roll.bbox();
    canvas.rect(draw, bbox, rgb(0.0, 0.0, 0.0));

    for lane in 0..roll.note_count() {
        let divider = BBox::new(bbox.x, roll.lane_divider_y(lane), bbox.width, 1.0);
        canvas.rect(draw, divider, rgb(1.0, 1.0, 1.0));
        canvas.rect(draw, roll.lane_key_bbox(lane), rgb(1.0, 1.0, 1.0));
    }
}

fn draw_ball(draw: &Draw, canvas: &Canvas, session: &Session) {
    let ball = session.ball();
    let color = match session.ball_state() {
        BallState::SlippingAway => rgb(0.6, 0.8, 0.2),
        _ => rgb(0.0, 0.5, 0.0),
    };
    draw.ellipse()
        .xy(canvas.point(ball.pos.x, ball.pos.y))
        .w_h(
            ball.radius() * 2.0 * canvas.sx,
            ball.radius() * 2.0 * canvas.sy,
        )
        .color(color);
}

fn draw_note_line(draw: &Draw, canvas: &Canvas, session: &Session) {
    let line = session.line();
    if line.state() != LineState::Chasing {
        return;
    }
    let bounds = session.linear().bounds();
    draw.line()
        .start(canvas.point(bounds.left, line.y()))
        .end(canvas.point(bounds.right, line.y()))
        .weight(2.0)
        .color(WHITE);
}

fn draw_readout(draw: &Draw, canvas: &Canvas, session: &Session) {
    let text = format!(
        "{:.1} Hz  shifts {}",
        session.current_frequency(),
        session.shifts()
    );
    draw.text(&text)
        .xy(canvas.point(80.0, 12.0))
        .w(150.0 * canvas.sx)
        .left_justify()
        .font_size(12)
        .color(WHITE);
}
