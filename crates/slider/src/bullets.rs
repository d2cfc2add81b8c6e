/// Receives the active slide whenever the cursor moves.
pub trait BulletIndicator {
    fn update(&mut self, active: usize, count: usize);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoBullets;

impl BulletIndicator for NoBullets {
    fn update(&mut self, _active: usize, _count: usize) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LogBullets;

impl BulletIndicator for LogBullets {
    fn update(&mut self, active: usize, count: usize) {
        tracing::info!(active, "slide {}", bullet_line(active, count));
    }
}

/// `● ○ ○` style indicator with the active slide filled.
pub fn bullet_line(active: usize, count: usize) -> String {
    (0..count)
        .map(|index| if index == active { "●" } else { "○" })
        .collect::<Vec<_>>()
        .join(" ")
}
