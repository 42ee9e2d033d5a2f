use std::time::Duration;

use wgpu::{
    Color, CommandEncoderDescriptor, Device, LoadOp, Operations, Queue,
    RenderPassColorAttachment, RenderPassDescriptor, StoreOp, TextureFormat, TextureView,
};
use winit::window::Window;

mod runner;

pub use runner::run_app;
pub use winit::dpi::LogicalSize;
pub use winit::event::WindowEvent;
pub use winit::window::WindowAttributes;

/// A windowed application driven by the [`run_app`] event loop.
///
/// The runner owns the window, the wgpu device/queue and the surface; the
/// handler owns everything else. `Init` carries whatever the caller built
/// before the event loop started (resources whose acquisition may fail and
/// should abort the process before a window ever opens).
pub trait AppHandler: Sized {
    const TITLE: &str = "Untitled App";

    /// Minimum time between update/draw cycles. `None` runs uncapped.
    const FRAME_INTERVAL: Option<Duration> = None;

    type Init;

    fn window_attributes(_init: &Self::Init) -> WindowAttributes {
        WindowAttributes::default().with_title(Self::TITLE)
    }

    fn new(init: Self::Init, ctx: AppContext<'_>) -> Self;

    fn update(&mut self, _delta_time: Duration, _ctx: AppContext<'_>) -> AppFlow {
        AppFlow::Continue
    }

    fn event(&mut self, event: AppEvent<'_>, _ctx: AppContext<'_>) -> AppFlow {
        match event {
            AppEvent::CloseRequested => AppFlow::Exit,
            _ => AppFlow::Continue,
        }
    }

    fn draw(&mut self, output: &TextureView, ctx: AppContext<'_>) {
        let mut encoder = ctx
            .device
            .create_command_encoder(&CommandEncoderDescriptor::default());

        encoder.begin_render_pass(&RenderPassDescriptor {
            label: None,
            color_attachments: &[Some(RenderPassColorAttachment {
                view: output,
                ops: Operations {
                    load: LoadOp::Clear(Color::BLACK),
                    store: StoreOp::Store,
                },
                depth_slice: None,
                resolve_target: None,
            })],
            depth_stencil_attachment: None,
            occlusion_query_set: None,
            timestamp_writes: None,
            multiview_mask: None,
        });

        ctx.queue.submit([encoder.finish()]);
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AppContext<'a> {
    pub window: &'a Window,
    pub device: &'a Device,
    pub queue: &'a Queue,
    pub surface_format: TextureFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum AppFlow {
    Continue,
    Exit,
}

#[non_exhaustive]
#[derive(Debug, Clone, Copy)]
pub enum AppEvent<'a> {
    CloseRequested,
    UnhandledWindowEvent(&'a WindowEvent),
}
