use std::time::Duration;

use lib_app::{AppContext, AppEvent, AppFlow, AppHandler, LogicalSize, WindowAttributes};
use wgpu::TextureView;

use crate::{
    config::Config,
    renderer::{Renderer, Scene},
    sensor::{SerialTransport, SmoothingWindow, decode_line},
};

pub struct AppInit {
    pub transport: SerialTransport,
    pub config: Config,
}

pub struct TiltApp {
    transport: SerialTransport,
    smoothing: SmoothingWindow,
    renderer: Renderer,
    rotation_scale: f32,
}

impl AppHandler for TiltApp {
    const TITLE: &str = "MPU6050 Tilt Cube";
    const FRAME_INTERVAL: Option<Duration> = Some(Duration::from_millis(33));

    type Init = AppInit;

    fn window_attributes(init: &AppInit) -> WindowAttributes {
        WindowAttributes::default()
            .with_title(Self::TITLE)
            .with_inner_size(LogicalSize::new(init.config.width, init.config.height))
    }

    fn new(init: AppInit, ctx: AppContext<'_>) -> Self {
        Self {
            transport: init.transport,
            smoothing: SmoothingWindow::new(init.config.smoothing_window),
            renderer: Renderer::new(ctx.into()),
            rotation_scale: init.config.rotation_scale,
        }
    }

    fn update(&mut self, _delta_time: Duration, _ctx: AppContext<'_>) -> AppFlow {
        // At most one line per frame. A quiet port or a garbled line leaves
        // the previous rotation state in place.
        if let Some(raw) = self.transport.poll_line() {
            match decode_line(&raw) {
                Ok(sample) => self.smoothing.push(sample),
                Err(reason) => log::debug!("ignoring line: {reason}"),
            }
        }

        AppFlow::Continue
    }

    fn event(&mut self, event: AppEvent<'_>, _ctx: AppContext<'_>) -> AppFlow {
        match event {
            AppEvent::CloseRequested => AppFlow::Exit,
            _ => AppFlow::Continue,
        }
    }

    fn draw(&mut self, output: &TextureView, ctx: AppContext<'_>) {
        let (avg_x, avg_y) = self.smoothing.current_average();
        let (rot_x_deg, rot_z_deg) = rotation_degrees(avg_x, avg_y, self.rotation_scale);

        self.renderer.draw(
            &Scene {
                rot_x_deg,
                rot_z_deg,
                labels: vec![format!("Avg X: {avg_x:.2}"), format!("Avg Y: {avg_y:.2}")],
            },
            output,
            ctx.into(),
        );
    }
}

/// Averaged tilt to rotation angles: X tilt turns the cube around the X
/// axis, Y tilt around the Z axis, both negated.
fn rotation_degrees(avg_x: f32, avg_y: f32, scale: f32) -> (f32, f32) {
    (-avg_x * scale, -avg_y * scale)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn x_tilt_maps_to_negated_scaled_x_rotation() {
        assert_eq!(rotation_degrees(2.0, 0.0, 5.0), (-10.0, 0.0));
    }

    #[test]
    fn y_tilt_maps_to_negated_scaled_z_rotation() {
        assert_eq!(rotation_degrees(0.0, -1.5, 5.0), (0.0, 7.5));
    }

    #[test]
    fn level_sensor_leaves_the_cube_still() {
        assert_eq!(rotation_degrees(0.0, 0.0, 5.0), (0.0, 0.0));
    }
}
