//! Headless backend
//!
//! Keeps per-frame statistics instead of producing pixels. Used when no GPU
//! backend is plugged in and by the tests.

use log;

use super::{
    GraphicsResult, Primitive, RenderBackend, RendererCreateInfo, RenderingData,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStats {
    pub index: u64,
    pub width: u32,
    pub height: u32,
    pub draw_calls: usize,
    pub points: usize,
    pub lights: usize,
    pub shadow_casters: usize,
    pub double_sided: usize,
    pub textured: usize,
}

pub struct HeadlessRenderer {
    create_info: RendererCreateInfo,
    frames: u64,
    last_frame: Option<FrameStats>,
    last_data: Option<RenderingData>,
}

impl HeadlessRenderer {
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn size(&self) -> (u32, u32) {
        (self.create_info.width, self.create_info.height)
    }

    pub fn last_frame(&self) -> Option<&FrameStats> {
        self.last_frame.as_ref()
    }

    pub fn last_data(&self) -> Option<&RenderingData> {
        self.last_data.as_ref()
    }
}

impl RenderBackend for HeadlessRenderer {
    fn new(create_info: &RendererCreateInfo) -> GraphicsResult<Self> {
        create_info.check()?;
        log::info!(
            "Headless renderer created ({}x{}, {} samples)",
            create_info.width,
            create_info.height,
            create_info.samples
        );
        Ok(HeadlessRenderer {
            create_info: *create_info,
            frames: 0,
            last_frame: None,
            last_data: None,
        })
    }

    fn recreate(&mut self, create_info: &RendererCreateInfo) -> GraphicsResult<()> {
        create_info.check()?;
        self.create_info = *create_info;
        Ok(())
    }

    fn render(&mut self, rendering_data: RenderingData) -> GraphicsResult<()> {
        let stats = FrameStats {
            index: self.frames,
            width: self.create_info.width,
            height: self.create_info.height,
            draw_calls: rendering_data.draws.len(),
            points: rendering_data
                .draws
                .iter()
                .map(|d| match &d.primitive {
                    Primitive::Points(positions) => positions.len(),
                    Primitive::Mesh(_) => 0,
                })
                .sum(),
            lights: rendering_data.lights.len(),
            shadow_casters: if rendering_data.needs_shadow_pass() {
                rendering_data.shadow_casters()
            } else {
                0
            },
            double_sided: rendering_data
                .draws
                .iter()
                .filter(|d| d.material.is_double_sided())
                .count(),
            textured: rendering_data
                .draws
                .iter()
                .filter(|d| d.material.map.is_some())
                .count(),
        };
        log::trace!("Frame {:?}", stats);
        self.frames += 1;
        self.last_frame = Some(stats);
        self.last_data = Some(rendering_data);
        Ok(())
    }
}
