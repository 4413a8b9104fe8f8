use serde::{Deserialize, Serialize};

use crate::{Base, Position, Snapshot};

/// An opaque 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Drawing surface the simulation is visualized on.
///
/// Implementations must not feed anything back into the simulation; the
/// core ignores whatever happens inside these calls.
pub trait Renderer {
    fn draw_dot(&mut self, position: Position, color: Rgb);
    fn draw_circle(&mut self, center: Position, radius: u32, color: Rgb);
    fn draw_line(&mut self, from: Position, to: Position, color: Rgb);
}

/// Draws bases, then agents, then the shout links of the last tick.
pub fn draw<R: Renderer + ?Sized>(snapshot: &Snapshot<'_>, renderer: &mut R) {
    for base in [snapshot.base_a, snapshot.base_b] {
        renderer.draw_circle(base.position(), Base::RADIUS, base.id().color());
    }
    for agent in snapshot.agents {
        renderer.draw_dot(agent.position(), agent.target().color());
    }
    for link in snapshot.links {
        renderer.draw_line(link.from, link.to, link.target.color());
    }
}
