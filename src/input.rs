/// Movement flags for the current frame. The binary derives them from held
/// keys; tests build them directly.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl InputState {
    /// Unit-ish movement direction; diagonals are scaled by 0.707.
    pub fn direction(&self) -> (f32, f32) {
        let mut dx = 0.0;
        let mut dy = 0.0;
        if self.left {
            dx -= 1.0;
        }
        if self.right {
            dx += 1.0;
        }
        if self.up {
            dy -= 1.0;
        }
        if self.down {
            dy += 1.0;
        }
        if dx != 0.0 && dy != 0.0 {
            dx *= 0.707;
            dy *= 0.707;
        }
        (dx, dy)
    }

    pub fn is_moving(&self) -> bool {
        let (dx, dy) = self.direction();
        dx != 0.0 || dy != 0.0
    }
}
