// Debug overlay: Input, Prev and Prev2 stacked down the left edge,
// each a third of the screen tall, with a label strip at the bottom of each.

use crate::cycle::WaveBufferCycle;
use crate::draw::{draw_label_box, shade_rect};
use crate::shade::blit_gray;
use crate::types::{Buffer, FrameBuffer};

const LABEL_HEIGHT: i32 = 20;

pub fn draw_debug_overlay(screen: &mut FrameBuffer, cycle: &WaveBufferCycle) {
    let cells: [(&str, Option<&Buffer>); 3] = [
        ("INPUT", cycle.input()),
        ("PREV", cycle.prev()),
        ("PREV2", cycle.prev2()),
    ];

    let h = screen.height / 3;
    if h == 0 { return; }
    let hi = h as i32;
    shade_rect(screen, 0, 0, hi, hi * 3, 0.8);

    for (i, (label, buf)) in cells.into_iter().enumerate() {
        let top = i * h;
        if let Some(buf) = buf {
            blit_gray(buf, screen, 0, top, h);
        }
        let label_top = (i as i32 + 1) * hi - LABEL_HEIGHT;
        draw_label_box(screen, 0, label_top, hi, LABEL_HEIGHT, label);
    }
}
