// Board geometry, palette, and hit testing.
// Pure functions only so the layout can be tested natively.

/// Visual description of one colored square.
#[derive(Clone, Copy, Debug)]
pub struct SquareStyle {
    pub name: &'static str,
    pub color: &'static str,
    pub tone_hz: f32,
}

pub const SQUARE_STYLES: [SquareStyle; 4] = [
    SquareStyle { name: "one", color: "#00FF27", tone_hz: 329.63 },
    SquareStyle { name: "two", color: "#FF4700", tone_hz: 261.63 },
    SquareStyle { name: "three", color: "#FFE33B", tone_hz: 220.00 },
    SquareStyle { name: "four", color: "#0B81EB", tone_hz: 164.81 },
];

/// Canvas geometry. Squares sit in a 2x2 grid separated by `gap`, with the
/// action button (a circle on a background-colored ring) over the middle.
#[derive(Clone, Copy, Debug)]
pub struct BoardLayout {
    pub canvas_size: f64,
    pub square_size: f64,
    pub gap: f64,
    pub background: &'static str,
    pub circle_radius: f64,
    pub circle_color: &'static str,
    pub text_color: &'static str,
    pub label_font: &'static str,
    pub counter_font: &'static str,
}

pub const CLASSIC_LAYOUT: BoardLayout = BoardLayout {
    canvas_size: 430.0,
    square_size: 200.0,
    gap: 10.0,
    background: "#222",
    circle_radius: 75.0,
    circle_color: "#333",
    text_color: "#eee",
    label_font: "bold 2em Orbitron",
    counter_font: "bold 4em Orbitron",
};

/// What a click on the canvas landed on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hit {
    ActionButton,
    /// Ring around the button; swallows the click.
    Ring,
    Square(u8),
}

impl BoardLayout {
    pub fn center(&self) -> (f64, f64) {
        (self.canvas_size / 2.0, self.canvas_size / 2.0)
    }

    pub fn ring_radius(&self) -> f64 {
        self.circle_radius + self.gap
    }

    /// Top-left corner of square `index` (row-major 2x2).
    pub fn square_origin(&self, index: u8) -> (f64, f64) {
        let col = (index % 2) as f64;
        let row = (index / 2) as f64;
        let step = self.square_size + self.gap;
        (self.gap + col * step, self.gap + row * step)
    }

    /// Where the action button label is drawn.
    pub fn label_position(&self) -> (f64, f64) {
        let (cx, cy) = self.center();
        (cx, cy + self.circle_radius / 2.0)
    }

    /// Button first, then the ring, then squares (the circle overlaps them).
    pub fn hit_test(&self, x: f64, y: f64, square_count: u8) -> Option<Hit> {
        let (cx, cy) = self.center();
        let dist = ((x - cx).powi(2) + (y - cy).powi(2)).sqrt();
        if dist <= self.circle_radius {
            return Some(Hit::ActionButton);
        }
        if dist <= self.ring_radius() {
            return Some(Hit::Ring);
        }
        (0..square_count).find_map(|i| {
            let (sx, sy) = self.square_origin(i);
            let inside = x >= sx && x < sx + self.square_size && y >= sy && y < sy + self.square_size;
            inside.then_some(Hit::Square(i))
        })
    }
}

/// Opacity of a flashing element `elapsed_ms` into a blink of `duration_ms`:
/// dark for the first half, fading back in over the second.
pub fn blink_alpha(elapsed_ms: f64, duration_ms: f64) -> f64 {
    if duration_ms <= 0.0 || elapsed_ms >= duration_ms || elapsed_ms < 0.0 {
        return 1.0;
    }
    let t = elapsed_ms / duration_ms;
    if t < 0.5 { 0.0 } else { (t - 0.5) * 2.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn squares_tile_the_canvas() {
        let l = CLASSIC_LAYOUT;
        assert_eq!(l.square_origin(0), (10.0, 10.0));
        assert_eq!(l.square_origin(1), (220.0, 10.0));
        assert_eq!(l.square_origin(2), (10.0, 220.0));
        assert_eq!(l.square_origin(3), (220.0, 220.0));
        let (x, y) = l.square_origin(3);
        assert_eq!(x + l.square_size + l.gap, l.canvas_size);
        assert_eq!(y + l.square_size + l.gap, l.canvas_size);
    }

    #[test]
    fn button_takes_priority_over_squares() {
        let l = CLASSIC_LAYOUT;
        assert_eq!(l.hit_test(215.0, 215.0, 4), Some(Hit::ActionButton));
        // inside square 0 but under the circle
        assert_eq!(l.hit_test(180.0, 180.0, 4), Some(Hit::ActionButton));
        // 80px from center: ring
        assert_eq!(l.hit_test(215.0 + 80.0, 215.0, 4), Some(Hit::Ring));
    }

    #[test]
    fn corners_hit_their_square() {
        let l = CLASSIC_LAYOUT;
        assert_eq!(l.hit_test(20.0, 20.0, 4), Some(Hit::Square(0)));
        assert_eq!(l.hit_test(410.0, 20.0, 4), Some(Hit::Square(1)));
        assert_eq!(l.hit_test(20.0, 410.0, 4), Some(Hit::Square(2)));
        assert_eq!(l.hit_test(410.0, 410.0, 4), Some(Hit::Square(3)));
        // gaps and borders hit nothing
        assert_eq!(l.hit_test(5.0, 5.0, 4), None);
        assert_eq!(l.hit_test(215.0, 20.0, 4), None);
        // squares beyond the configured count are not clickable
        assert_eq!(l.hit_test(410.0, 410.0, 2), None);
    }

    #[test]
    fn blink_goes_dark_then_recovers() {
        assert_eq!(blink_alpha(0.0, 400.0), 0.0);
        assert_eq!(blink_alpha(199.0, 400.0), 0.0);
        assert!((blink_alpha(300.0, 400.0) - 0.5).abs() < 1e-9);
        assert_eq!(blink_alpha(400.0, 400.0), 1.0);
        assert_eq!(blink_alpha(10.0, 0.0), 1.0);
    }
}
