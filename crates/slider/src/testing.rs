use std::cell::RefCell;
use std::rc::Rc;

use crate::bullets::BulletIndicator;
use crate::orchestrator::RenderTarget;
use crate::uniforms::{DisplacementUniforms, TextureSlots};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderedFrame {
    pub disp_power: f32,
    pub slots: TextureSlots,
    pub resolution: [f32; 2],
}

#[derive(Debug, Default)]
pub struct TargetLog {
    pub renders: Vec<RenderedFrame>,
    pub resizes: Vec<(u32, u32)>,
    pub fail_render: bool,
}

#[derive(Debug, Clone, Default)]
pub struct FakeTarget {
    pub log: Rc<RefCell<TargetLog>>,
}

impl RenderTarget for FakeTarget {
    fn resize(&mut self, width: u32, height: u32) -> anyhow::Result<()> {
        self.log.borrow_mut().resizes.push((width, height));
        Ok(())
    }

    fn render(&mut self, uniforms: &DisplacementUniforms) -> anyhow::Result<()> {
        let mut log = self.log.borrow_mut();
        if log.fail_render {
            anyhow::bail!("surface unavailable");
        }
        log.renders.push(RenderedFrame {
            disp_power: uniforms.disp_power(),
            slots: uniforms.slots(),
            resolution: uniforms.resolution(),
        });
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecordingBullets {
    pub seen: Rc<RefCell<Vec<(usize, usize)>>>,
}

impl BulletIndicator for RecordingBullets {
    fn update(&mut self, active: usize, count: usize) {
        self.seen.borrow_mut().push((active, count));
    }
}
