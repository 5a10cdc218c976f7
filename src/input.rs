/// What a held pointer does to the scalar field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InjectMode {
    #[default]
    Heat,
    Cool,
}

/// Pending pointer interaction, sampled once at the start of every tick.
/// Grid coordinates address interior cells in 1..=N; anything else is clipped
/// by the injector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Interaction {
    pub active: bool,
    pub mode: InjectMode,
    pub grid_x: i32,
    pub grid_y: i32,
}

impl Interaction {
    /// Active interaction at grid cell (x, y).
    pub fn at(grid_x: i32, grid_y: i32, mode: InjectMode) -> Self {
        Self { active: true, mode, grid_x, grid_y }
    }

    /// Map a pointer position in window pixels onto the grid. Pixel row 0 is
    /// the top of the window, which is grid row N.
    /// A degenerate window yields an inactive interaction.
    pub fn from_pointer(px: f32, py: f32, width: usize, height: usize, n: usize, mode: InjectMode) -> Self {
        if width == 0 || height == 0 || n == 0 {
            return Self::default();
        }
        let cell_w = width as f64 / n as f64;
        let cell_h = height as f64 / n as f64;
        let grid_x = (px as f64 / cell_w).floor() as i32 + 1;
        let grid_y = n as i32 - (py as f64 / cell_h).floor() as i32;
        Self::at(grid_x, grid_y, mode)
    }

    /// Stop injecting; the last position is kept.
    pub fn release(&mut self) {
        self.active = false;
    }

    /// Carry the interaction over to a grid of side `new_n`, keeping its
    /// relative position.
    pub fn remap(self, old_n: usize, new_n: usize) -> Self {
        if old_n == 0 || new_n == 0 {
            return Self { active: false, ..self };
        }
        let scale = new_n as f64 / old_n as f64;
        let map = |c: i32| -> i32 {
            let mapped = ((c as f64 - 0.5) * scale).floor() as i32 + 1;
            mapped.clamp(1, new_n as i32)
        };
        Self {
            grid_x: map(self.grid_x),
            grid_y: map(self.grid_y),
            ..self
        }
    }
}
